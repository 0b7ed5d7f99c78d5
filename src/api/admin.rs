//! Admin login and moderation endpoints.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use super::{error, parse_kind, success, ApiResult};
use crate::directory::SyncReport;
use crate::errors::AppError;
use crate::models::{Event, HelpOffer, RecordKind};
use crate::reconcile;
use crate::session::{Commit, EditingTarget, Session};
use crate::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub admin: bool,
}

/// Records awaiting moderation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingRequests {
    pub events: Vec<Event>,
    pub help: Vec<HelpOffer>,
    pub pending_count: usize,
}

/// Explicit remote push request.
#[derive(Debug, Default, Deserialize)]
pub struct SyncRequest {
    /// Push the bundled seed when the directory is empty.
    #[serde(default)]
    pub seed: bool,
}

/// POST /api/admin/login - Check the static admin credentials.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let revision_id = state.directory.revision_id().await;

    match Session::anonymous().login(&state.credentials, &request.username, &request.password) {
        Ok(session) => success(
            LoginResponse {
                admin: session.is_admin(),
            },
            revision_id,
        ),
        Err(e) => {
            tracing::warn!("Rejected admin login for {:?}", request.username);
            error(e, revision_id)
        }
    }
}

/// GET /api/admin/requests - Pending events and help offers.
pub async fn list_requests(State(state): State<AppState>) -> ApiResult<PendingRequests> {
    let (dataset, revision_id) = state.directory.snapshot().await;
    let events: Vec<Event> = dataset.pending_events().into_iter().cloned().collect();
    let help: Vec<HelpOffer> = dataset.pending_help().into_iter().cloned().collect();

    success(
        PendingRequests {
            pending_count: events.len() + help.len(),
            events,
            help,
        },
        revision_id,
    )
}

/// GET /api/admin/:kind/:id/draft - Open an existing record in the edit form.
pub async fn edit_draft(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path((kind, id)): Path<(String, String)>,
) -> ApiResult<EditingTarget> {
    let (dataset, revision_id) = state.directory.snapshot().await;
    let kind = match parse_kind(&kind) {
        Ok(kind) => kind,
        Err(e) => return error(e, revision_id),
    };

    let session = match kind {
        RecordKind::Event => {
            reconcile::find(&id, &dataset.events).map(|e| session.begin_edit_event(e))
        }
        RecordKind::Help => reconcile::find(&id, &dataset.help).map(|h| session.begin_edit_help(h)),
    };

    match session {
        Some(session) => success(session.editing().clone(), revision_id),
        None => error(
            AppError::NotFound(format!("{:?} {} not found", kind, id)),
            revision_id,
        ),
    }
}

/// POST /api/admin/records - Create or edit a record on the admin path.
pub async fn save_record(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(target): Json<EditingTarget>,
) -> ApiResult<Commit> {
    let revision_id = state.directory.revision_id().await;
    let path = session.path();

    let commit = match session.with_draft(target).commit() {
        Ok((_, commit)) => commit,
        Err(e) => return error(e, revision_id),
    };

    match state.directory.save(commit, path).await {
        Ok(applied) => success(applied.value, applied.revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/admin/:kind/:id/approve - Publish a pending record.
pub async fn approve_record(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
) -> ApiResult<Commit> {
    let revision_id = state.directory.revision_id().await;
    let kind = match parse_kind(&kind) {
        Ok(kind) => kind,
        Err(e) => return error(e, revision_id),
    };

    match state.directory.approve(kind, &id).await {
        Ok(applied) => success(applied.value, applied.revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/admin/:kind/:id - Delete or reject a record.
pub async fn delete_record(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path((kind, id)): Path<(String, String)>,
) -> ApiResult<()> {
    let revision_id = state.directory.revision_id().await;
    let kind = match parse_kind(&kind) {
        Ok(kind) => kind,
        Err(e) => return error(e, revision_id),
    };

    match state.directory.delete(kind, &id, session.path()).await {
        Ok(applied) => success((), applied.revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/admin/sync - Push the dataset to the remote endpoint and wait for the answer.
pub async fn sync_remote(
    State(state): State<AppState>,
    Json(request): Json<SyncRequest>,
) -> ApiResult<SyncReport> {
    let revision_id = state.directory.revision_id().await;

    match state.directory.push_to_remote(request.seed).await {
        Ok((report, revision_id)) => success(report, revision_id),
        Err(e) => error(e, revision_id),
    }
}
