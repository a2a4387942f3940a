// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Gather Project

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Access-guard and token-verification errors.
#[derive(Debug)]
pub enum AuthError {
    /// No token in the Authorization header or the session cookie
    NotLoggedIn,
    /// Token is malformed
    MalformedToken,
    /// Token signature is invalid
    InvalidSignature,
    /// Token has expired
    TokenExpired,
    /// Token is not yet valid
    TokenNotYetValid,
    /// Token is valid but the user it belongs to is gone or deactivated
    UserNoLongerExists,
    /// Internal error (token issuance, store access)
    InternalError(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    status: &'static str,
    message: String,
}

impl AuthError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::NotLoggedIn
            | AuthError::MalformedToken
            | AuthError::InvalidSignature
            | AuthError::TokenExpired
            | AuthError::TokenNotYetValid
            | AuthError::UserNoLongerExists => StatusCode::UNAUTHORIZED,
            AuthError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::NotLoggedIn => {
                write!(f, "You are not logged in. Please login to get access.")
            }
            AuthError::MalformedToken => write!(f, "Token is malformed"),
            AuthError::InvalidSignature => write!(f, "Token signature is invalid"),
            AuthError::TokenExpired => write!(f, "Token has expired"),
            AuthError::TokenNotYetValid => write!(f, "Token is not yet valid"),
            AuthError::UserNoLongerExists => {
                write!(f, "The user belonging to this token does no longer exist.")
            }
            AuthError::InternalError(msg) => write!(f, "Internal authentication error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Internal failures stay opaque on the wire; the detail goes to the log.
        let (status_class, message) = if status.is_server_error() {
            tracing::error!(error = %self, "authentication failed unexpectedly");
            ("error", "Something went wrong".to_string())
        } else {
            ("fail", self.to_string())
        };
        let body = Json(AuthErrorBody {
            status: status_class,
            message,
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn missing_token_returns_401_fail() {
        let response = AuthError::NotLoggedIn.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["status"], "fail");
        assert_eq!(
            body["message"],
            "You are not logged in. Please login to get access."
        );
    }

    #[tokio::test]
    async fn internal_errors_are_opaque() {
        let response = AuthError::InternalError("store exploded".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Something went wrong");
    }

    #[test]
    fn deleted_user_message_is_exact() {
        assert_eq!(
            AuthError::UserNoLongerExists.to_string(),
            "The user belonging to this token does no longer exist."
        );
    }
}
