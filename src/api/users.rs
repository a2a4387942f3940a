// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Gather Project

//! Relationship endpoints: follow, unfollow, and the current-user summary.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    auth::Auth,
    error::ApiError,
    models::{CurrentUserResponse, MessageResponse, UserSummary, STATUS_SUCCESS},
    state::AppState,
    storage::UserRepository,
};

/// Follow a user.
///
/// Increments the target's follower count and the actor's following count
/// in one store transaction.
#[utoipa::path(
    post,
    path = "/api/follow/{id}",
    params(("id" = String, Path, description = "Id of the user to follow")),
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Now following", body = MessageResponse),
        (status = 400, description = "Unknown user id"),
        (status = 401, description = "Unauthenticated")
    )
)]
pub async fn follow_user(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let target = UserRepository::new(&state.store)
        .follow(&user.user_id, &id)?
        .ok_or_else(|| ApiError::bad_request("Invalid user id. Please provide a valid one"))?;

    Ok(Json(MessageResponse::success(format!(
        "You are now following {}.",
        target.full_name
    ))))
}

/// Unfollow a user.
///
/// The symmetric decrement; counters floor at zero. There is no check that
/// the actor currently follows the target.
#[utoipa::path(
    post,
    path = "/api/unfollow/{id}",
    params(("id" = String, Path, description = "Id of the user to unfollow")),
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Unfollowed", body = MessageResponse),
        (status = 400, description = "Unknown user id"),
        (status = 401, description = "Unauthenticated")
    )
)]
pub async fn unfollow_user(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let target = UserRepository::new(&state.store)
        .unfollow(&user.user_id, &id)?
        .ok_or_else(|| ApiError::bad_request("Invalid user id. Please provide a valid one"))?;

    Ok(Json(MessageResponse::success(format!(
        "You have unfollowed {}.",
        target.full_name
    ))))
}

/// Get the current authenticated user's summary.
#[utoipa::path(
    get,
    path = "/api/user",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Current user summary", body = CurrentUserResponse),
        (status = 401, description = "Unauthenticated")
    )
)]
pub async fn get_current_user(Auth(user): Auth) -> Json<CurrentUserResponse> {
    Json(CurrentUserResponse {
        status: STATUS_SUCCESS.to_string(),
        data: UserSummary::from(&user),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthenticatedUser;
    use crate::state::AuthConfig;
    use crate::storage::{NewUser, SocialStore, StoredUser};
    use axum::http::StatusCode;
    use tempfile::TempDir;

    fn test_state() -> (AppState, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let store = SocialStore::open(dir.path()).expect("store opens");
        let state = AppState::new(
            store,
            AuthConfig {
                secret: "test-secret".to_string(),
                token_ttl_days: 90,
                cookie_ttl_days: 90,
            },
        );
        (state, dir)
    }

    fn seed_user(state: &AppState, name: &str, email: &str) -> StoredUser {
        UserRepository::new(&state.store)
            .create(NewUser {
                full_name: name.to_string(),
                email: email.to_string(),
                password_hash: bcrypt::hash("password", 4).unwrap(),
                profile_picture: None,
            })
            .expect("user creation succeeds")
    }

    #[tokio::test]
    async fn follow_updates_both_counters_and_names_the_target() {
        let (state, _dir) = test_state();
        let a = seed_user(&state, "User A", "a@example.com");
        let b = seed_user(&state, "User B", "b@example.com");

        let Json(response) = follow_user(
            Auth(a.clone().into()),
            State(state.clone()),
            Path(b.id.clone()),
        )
        .await
        .expect("follow succeeds");

        assert_eq!(response.status, "success");
        assert_eq!(response.message, "You are now following User B.");

        let repo = UserRepository::new(&state.store);
        assert_eq!(repo.find_by_id(&a.id).unwrap().unwrap().counts.follows, 1);
        assert_eq!(
            repo.find_by_id(&b.id).unwrap().unwrap().counts.followed_by,
            1
        );
    }

    #[tokio::test]
    async fn follow_then_unfollow_returns_counters_to_zero() {
        let (state, _dir) = test_state();
        let a = seed_user(&state, "User A", "a@example.com");
        let b = seed_user(&state, "User B", "b@example.com");

        follow_user(
            Auth(a.clone().into()),
            State(state.clone()),
            Path(b.id.clone()),
        )
        .await
        .unwrap();

        let Json(response) = unfollow_user(
            Auth(a.clone().into()),
            State(state.clone()),
            Path(b.id.clone()),
        )
        .await
        .expect("unfollow succeeds");
        assert_eq!(response.message, "You have unfollowed User B.");

        let repo = UserRepository::new(&state.store);
        assert_eq!(repo.find_by_id(&a.id).unwrap().unwrap().counts.follows, 0);
        assert_eq!(
            repo.find_by_id(&b.id).unwrap().unwrap().counts.followed_by,
            0
        );
    }

    #[tokio::test]
    async fn follow_unknown_user_is_a_bad_request() {
        let (state, _dir) = test_state();
        let a = seed_user(&state, "User A", "a@example.com");

        let err = follow_user(
            Auth(a.into()),
            State(state),
            Path("missing-id".to_string()),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Invalid user id. Please provide a valid one");
    }

    #[tokio::test]
    async fn current_user_summary_uses_display_labels() {
        let user = AuthenticatedUser {
            user_id: "u1".to_string(),
            full_name: "Test User".to_string(),
            profile_picture: "default.jpg".to_string(),
            counts: crate::storage::UserCounts {
                followed_by: 2,
                follows: 5,
            },
        };

        let Json(response) = get_current_user(Auth(user)).await;
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["status"], "success");
        assert_eq!(json["data"]["User Name"], "Test User");
        assert_eq!(json["data"]["Followers"], 2);
        assert_eq!(json["data"]["Following"], 5);
    }
}
