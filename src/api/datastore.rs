//! Datastore API endpoints.

use axum::extract::State;

use super::{success, ApiResult};
use crate::models::{Dataset, RevisionInfo};
use crate::AppState;

/// GET /api/datastore - Full dataset, all statuses.
pub async fn get_datastore(State(state): State<AppState>) -> ApiResult<Dataset> {
    let (dataset, revision_id) = state.directory.snapshot().await;
    success(dataset, revision_id)
}

/// GET /api/datastore/revision - Get the current revision info.
pub async fn get_revision(State(state): State<AppState>) -> ApiResult<RevisionInfo> {
    let revision_info = state.directory.revision_info().await;
    let revision_id = revision_info.revision_id;
    success(revision_info, revision_id)
}
