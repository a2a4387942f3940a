// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Gather Project

//! Engagement endpoints: like, unlike, comment.
//!
//! Like state per (user, post) is a free toggle; commenting is one-way and
//! at most once per (user, post).

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    auth::Auth,
    error::ApiError,
    models::{CommentRequest, MessageResponse},
    state::AppState,
    storage::{
        CommentOutcome, CommentRepository, LikeOutcome, LikeRepository, NewComment, UnlikeOutcome,
    },
};

/// Maximum comment length in characters.
const MAX_COMMENT_CHARS: usize = 300;

/// Like a post. Liking a post twice is a silent no-op.
#[utoipa::path(
    post,
    path = "/api/like/{id}",
    params(("id" = String, Path, description = "Post id")),
    tag = "Engagement",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Liked", body = MessageResponse),
        (status = 404, description = "No such post"),
        (status = 401, description = "Unauthenticated")
    )
)]
pub async fn like_post(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    match LikeRepository::new(&state.store).like(&user.user_id, &id)? {
        LikeOutcome::Liked | LikeOutcome::AlreadyLiked => {
            Ok(Json(MessageResponse::success("Liked successfully")))
        }
        LikeOutcome::PostNotFound => {
            Err(ApiError::not_found("A post with that ID could not be found"))
        }
    }
}

/// Remove a previously placed like.
#[utoipa::path(
    post,
    path = "/api/unlike/{id}",
    params(("id" = String, Path, description = "Post id")),
    tag = "Engagement",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Unliked", body = MessageResponse),
        (status = 400, description = "Post was not liked"),
        (status = 404, description = "No such post"),
        (status = 401, description = "Unauthenticated")
    )
)]
pub async fn unlike_post(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    match LikeRepository::new(&state.store).unlike(&user.user_id, &id)? {
        UnlikeOutcome::Unliked => Ok(Json(MessageResponse::success("Unliked Successfully"))),
        UnlikeOutcome::NotLiked => Err(ApiError::bad_request("You have not liked this post")),
        UnlikeOutcome::PostNotFound => {
            Err(ApiError::not_found("A post with that ID could not be found"))
        }
    }
}

/// Comment on a post. At most one comment per user per post.
#[utoipa::path(
    post,
    path = "/api/comment/{id}",
    params(("id" = String, Path, description = "Post id")),
    tag = "Engagement",
    security(("bearer" = [])),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Commented", body = MessageResponse),
        (status = 400, description = "Already commented or invalid text"),
        (status = 404, description = "No such post"),
        (status = 401, description = "Unauthenticated")
    )
)]
pub async fn comment_post(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<CommentRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let text = request
        .comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::bad_request("Comment cannot be empty"))?;
    if text.chars().count() > MAX_COMMENT_CHARS {
        return Err(ApiError::bad_request("Maximum character limit reached"));
    }

    match CommentRepository::new(&state.store).comment(NewComment {
        user: user.user_id,
        post: id,
        comment: text,
    })? {
        CommentOutcome::Commented(_) => Ok(Json(MessageResponse::success(
            "You have commented on this post",
        ))),
        CommentOutcome::AlreadyCommented => Err(ApiError::bad_request(
            "You have already commented on this post",
        )),
        CommentOutcome::PostNotFound => {
            Err(ApiError::not_found("A post with that ID could not be found"))
        }
    }
}
