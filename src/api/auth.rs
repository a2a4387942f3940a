// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Gather Project

//! Authentication endpoints.

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    auth::session::{logout_cookie, session_cookie},
    auth::sign_token,
    error::ApiError,
    models::{AuthRequest, StatusResponse, TokenResponse, STATUS_SUCCESS},
    state::AppState,
    storage::UserRepository,
};

/// Authenticate with email and password.
///
/// On success the signed bearer token is returned in the body and mirrored
/// into the `jwt` session cookie. The missing-input check runs before any
/// lookup.
#[utoipa::path(
    post,
    path = "/api/authenticate",
    tag = "Auth",
    request_body = AuthRequest,
    responses(
        (status = 200, description = "Authenticated", body = TokenResponse),
        (status = 400, description = "Email or password missing"),
        (status = 401, description = "Incorrect credentials")
    )
)]
pub async fn authenticate(
    State(state): State<AppState>,
    Json(request): Json<AuthRequest>,
) -> Result<Response, ApiError> {
    // Empty strings count as missing, like absent fields.
    let email = request.email.filter(|e| !e.is_empty());
    let password = request.password.filter(|p| !p.is_empty());
    let (Some(email), Some(password)) = (email, password) else {
        return Err(ApiError::bad_request("Please provide email and password"));
    };

    let user = UserRepository::new(&state.store)
        .find_by_email(&email)?
        .ok_or_else(|| ApiError::unauthorized("Incorrect email or password"))?;

    let password_matches = bcrypt::verify(&password, &user.password_hash).map_err(|e| {
        tracing::error!(error = %e, "password verification failed");
        ApiError::internal("Something went wrong")
    })?;
    if !password_matches {
        return Err(ApiError::unauthorized("Incorrect email or password"));
    }

    let token = sign_token(&user.id, &state.auth)
        .map_err(|e| ApiError::internal(format!("Token issuance failed: {e}")))?;
    let cookie = session_cookie(&token, state.auth.cookie_ttl_days);

    let mut response = (
        StatusCode::OK,
        Json(TokenResponse {
            status: STATUS_SUCCESS.to_string(),
            token,
        }),
    )
        .into_response();
    response.headers_mut().insert(
        SET_COOKIE,
        HeaderValue::from_str(&cookie)
            .map_err(|e| ApiError::internal(format!("Invalid cookie value: {e}")))?,
    );
    Ok(response)
}

/// Log out by overwriting the session cookie with a short-lived sentinel.
///
/// Idempotent; issued tokens stay valid until their natural expiry.
#[utoipa::path(
    get,
    path = "/api/logout",
    tag = "Auth",
    responses((status = 200, description = "Session cookie cleared", body = StatusResponse))
)]
pub async fn logout() -> Result<Response, ApiError> {
    let mut response = Json(StatusResponse {
        status: STATUS_SUCCESS.to_string(),
    })
    .into_response();
    response.headers_mut().insert(
        SET_COOKIE,
        HeaderValue::from_str(&logout_cookie())
            .map_err(|e| ApiError::internal(format!("Invalid cookie value: {e}")))?,
    );
    Ok(response)
}
