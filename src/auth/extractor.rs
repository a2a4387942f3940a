// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Gather Project

//! Axum extractor for authenticated users.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is AuthenticatedUser
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{
        header::{AUTHORIZATION, COOKIE},
        request::Parts,
    },
};

use super::session::token_from_cookie_header;
use super::tokens::verify_token;
use super::AuthError;
use crate::state::AppState;
use crate::storage::{StoredUser, UserCounts, UserRepository};

/// The resolved identity of the caller, attached to the request once the
/// token has been verified against a live user record.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub full_name: String,
    pub profile_picture: String,
    pub counts: UserCounts,
}

impl From<StoredUser> for AuthenticatedUser {
    fn from(user: StoredUser) -> Self {
        Self {
            user_id: user.id,
            full_name: user.full_name,
            profile_picture: user.profile_picture,
            counts: user.counts,
        }
    }
}

/// Extractor for authenticated users.
///
/// The token is taken from `Authorization: Bearer <token>`, falling back to
/// the `jwt` session cookie; the header wins when both are present. The
/// encoded user id must still resolve to an active user - a valid token
/// whose account has been deactivated is rejected.
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // First check if middleware already set the user
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>().cloned() {
            return Ok(Auth(user));
        }

        let token = bearer_token(parts)
            .or_else(|| cookie_token(parts))
            .ok_or(AuthError::NotLoggedIn)?;

        let claims = verify_token(token, &state.auth)?;

        // The token may outlive the account; resolve to a live user record.
        let user = UserRepository::new(&state.store)
            .find_by_id(&claims.sub)
            .map_err(|e| AuthError::InternalError(e.to_string()))?
            .ok_or(AuthError::UserNoLongerExists)?;

        Ok(Auth(user.into()))
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

fn cookie_token(parts: &Parts) -> Option<&str> {
    token_from_cookie_header(parts.headers.get(COOKIE)?.to_str().ok()?)
}
