//! REST API module.
//!
//! Public listing, search and submission routes plus the admin moderation routes.

mod admin;
mod datastore;
mod listings;
mod search;
mod submissions;

pub use admin::*;
pub use datastore::*;
pub use listings::*;
pub use search::*;
pub use submissions::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::{AppError, AppErrorWithRevision};
use crate::models::{RecordKind, Region};

/// Success response envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub revision_id: i64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T, revision_id: i64) -> Self {
        Self {
            success: true,
            data,
            revision_id,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppErrorWithRevision>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T, revision_id: i64) -> ApiResult<T> {
    Ok(ApiResponse::new(data, revision_id))
}

/// Create an error API response.
pub fn error<T: Serialize>(err: AppError, revision_id: i64) -> ApiResult<T> {
    Err(AppErrorWithRevision {
        error: err,
        revision_id,
    })
}

/// Parse the `{kind}` path segment.
fn parse_kind(raw: &str) -> Result<RecordKind, AppError> {
    RecordKind::parse_wire(raw)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown record kind: {}", raw)))
}

/// Parse an optional region selector. Blank means no selector.
fn parse_region(raw: Option<&str>) -> Result<Option<Region>, AppError> {
    match raw.map(str::trim).filter(|r| !r.is_empty()) {
        None => Ok(None),
        Some(raw) => Region::parse_wire(raw)
            .map(Some)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown region: {}", raw))),
    }
}
