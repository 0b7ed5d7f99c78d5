//! Public listing endpoints.

use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use super::{error, parse_region, success, ApiResult};
use crate::filter;
use crate::models::{Dataset, Event, HelpOffer};
use crate::search::{is_searchable, MatchResult, SearchDelegate};
use crate::AppState;

/// Listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    /// District wire value; blank or "Все районы" means every region.
    pub region: Option<String>,
    /// Free-text query for the smart search.
    pub q: Option<String>,
}

/// One filtered collection, with the matcher's explanation when a search ran.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionView<T: Serialize> {
    pub items: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

/// GET /api/events - Visible events.
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> ApiResult<CollectionView<Event>> {
    let (dataset, revision_id) = state.directory.snapshot().await;
    let region = match parse_region(query.region.as_deref()) {
        Ok(region) => region,
        Err(e) => return error(e, revision_id),
    };

    let matched = run_search(&state.search, query.q.as_deref(), &dataset).await;
    let listing = filter::visible(&dataset, matched.as_ref(), region);

    success(
        CollectionView {
            items: listing.events.into_iter().cloned().collect(),
            reasoning: matched.map(|m| m.reasoning),
        },
        revision_id,
    )
}

/// GET /api/help - Visible help offers.
pub async fn list_help(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> ApiResult<CollectionView<HelpOffer>> {
    let (dataset, revision_id) = state.directory.snapshot().await;
    let region = match parse_region(query.region.as_deref()) {
        Ok(region) => region,
        Err(e) => return error(e, revision_id),
    };

    let matched = run_search(&state.search, query.q.as_deref(), &dataset).await;
    let listing = filter::visible(&dataset, matched.as_ref(), region);

    success(
        CollectionView {
            items: listing.help.into_iter().cloned().collect(),
            reasoning: matched.map(|m| m.reasoning),
        },
        revision_id,
    )
}

/// Run the matcher when the query is non-blank. Only approved records are sent.
pub(super) async fn run_search(
    search: &SearchDelegate,
    query: Option<&str>,
    dataset: &Dataset,
) -> Option<MatchResult> {
    let query = query.filter(|q| is_searchable(q))?;
    Some(search.search(query, &dataset.events, &dataset.help).await)
}
