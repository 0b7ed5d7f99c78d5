//! Public suggestion form endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use super::{error, parse_kind, success, ApiResult};
use crate::session::{Commit, EditingTarget, Session};
use crate::AppState;

pub const SUBMISSION_THANKS: &str = "Спасибо! Ваша заявка отправлена на модерацию.";

/// A stored suggestion and the notice shown to the submitter.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub record: Commit,
    pub message: &'static str,
}

/// GET /api/submissions/draft/:kind - Empty suggestion form with its default values.
pub async fn submission_draft(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> ApiResult<EditingTarget> {
    let revision_id = state.directory.revision_id().await;
    match parse_kind(&kind) {
        Ok(kind) => {
            let session = Session::anonymous().begin_suggestion(kind);
            success(session.editing().clone(), revision_id)
        }
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/submissions - Suggest an event or help offer. Stored as pending.
pub async fn submit(
    State(state): State<AppState>,
    Json(target): Json<EditingTarget>,
) -> ApiResult<SubmissionReceipt> {
    let revision_id = state.directory.revision_id().await;
    let session = Session::anonymous().with_draft(target);
    let path = session.path();

    let commit = match session.commit() {
        Ok((_, commit)) => commit,
        Err(e) => return error(e, revision_id),
    };

    match state.directory.save(commit, path).await {
        Ok(applied) => success(
            SubmissionReceipt {
                record: applied.value,
                message: SUBMISSION_THANKS,
            },
            applied.revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/submissions/:kind/:id - Withdraw a suggestion still awaiting moderation.
pub async fn withdraw_submission(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
) -> ApiResult<()> {
    let revision_id = state.directory.revision_id().await;
    let kind = match parse_kind(&kind) {
        Ok(kind) => kind,
        Err(e) => return error(e, revision_id),
    };

    match state
        .directory
        .delete(kind, &id, Session::anonymous().path())
        .await
    {
        Ok(applied) => success((), applied.revision_id),
        Err(e) => error(e, revision_id),
    }
}
