//! Smart search endpoint.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use super::{error, listings::run_search, parse_region, success, ApiResult};
use crate::filter;
use crate::models::{Event, HelpOffer};
use crate::search::{MatchResult, SuggestedView};
use crate::AppState;

/// Search request body.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub region: Option<String>,
}

/// Match result plus the listings it produces.
///
/// A blank query leaves out the match fields and returns the unfiltered approved listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(flatten)]
    pub matched: Option<MatchResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_view: Option<SuggestedView>,
    pub events: Vec<Event>,
    pub help: Vec<HelpOffer>,
}

/// POST /api/search - Natural-language search over approved records.
pub async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> ApiResult<SearchResponse> {
    let (dataset, revision_id) = state.directory.snapshot().await;
    let region = match parse_region(request.region.as_deref()) {
        Ok(region) => region,
        Err(e) => return error(e, revision_id),
    };

    let matched = run_search(&state.search, Some(&request.query), &dataset).await;
    let listing = filter::visible(&dataset, matched.as_ref(), region).into_dataset();

    success(
        SearchResponse {
            suggested_view: matched.as_ref().and_then(MatchResult::suggested_view),
            matched,
            events: listing.events,
            help: listing.help,
        },
        revision_id,
    )
}
