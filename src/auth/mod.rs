//! Static admin credential check.
//!
//! Implements constant-time comparison to mitigate timing attacks.

use axum::{
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use subtle::ConstantTimeEq;

use crate::errors::{codes, ErrorDetails, ErrorResponse};
use crate::session::Session;

/// Header carrying the admin username.
pub const ADMIN_USERNAME_HEADER: &str = "x-admin-username";
/// Header carrying the admin password.
pub const ADMIN_PASSWORD_HEADER: &str = "x-admin-password";

/// The configured admin login.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    username: String,
    password: String,
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Check a username/password pair. Both halves are always compared.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let user_ok = constant_time_compare(username, &self.username);
        let pass_ok = constant_time_compare(password, &self.password);
        user_ok & pass_ok
    }
}

/// Admin authentication layer. On success the request carries an admin [`Session`].
pub async fn admin_auth_layer(
    credentials: AdminCredentials,
    mut request: Request,
    next: Next,
) -> Response {
    let username = header_value(request.headers(), ADMIN_USERNAME_HEADER);
    let password = header_value(request.headers(), ADMIN_PASSWORD_HEADER);

    match (username, password) {
        (Some(username), Some(password)) => {
            match Session::anonymous().login(&credentials, &username, &password) {
                Ok(session) => {
                    request.extensions_mut().insert(session);
                    next.run(request).await
                }
                Err(_) => unauthorized_response("Invalid admin credentials"),
            }
        }
        _ => unauthorized_response("Missing admin credentials"),
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    // Constant-time comparison
    a_bytes.ct_eq(b_bytes).into()
}

/// Create an unauthorized response.
fn unauthorized_response(message: &str) -> Response {
    let body = ErrorResponse {
        success: false,
        error: ErrorDetails {
            code: codes::UNAUTHORIZED.to_string(),
            message: message.to_string(),
            details: None,
        },
        revision_id: 0,
    };

    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}
