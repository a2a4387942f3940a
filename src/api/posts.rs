// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Gather Project

//! Post endpoints: create, read, list, delete.
//!
//! Reads resolve their related records explicitly: the owner summary and
//! the reduced comment views are joined in the handler, and only the like
//! count leaves the store.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    auth::Auth,
    error::ApiError,
    models::{
        CreatePostRequest, CreatedPostResponse, PostDetail, PostDetailResponse, PostListItem,
        PostListResponse, STATUS_SUCCESS,
    },
    state::AppState,
    storage::{
        CommentRepository, DeletePostOutcome, NewPost, PostRepository, UserRepository,
    },
};

/// Maximum description length in characters.
const MAX_DESCRIPTION_CHARS: usize = 1000;

/// Create a post owned by the authenticated user.
#[utoipa::path(
    post,
    path = "/api/posts",
    tag = "Posts",
    security(("bearer" = [])),
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = CreatedPostResponse),
        (status = 400, description = "Missing title or oversized description"),
        (status = 401, description = "Unauthenticated")
    )
)]
pub async fn create_post(
    Auth(user): Auth,
    State(state): State<AppState>,
    Json(request): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<CreatedPostResponse>), ApiError> {
    let title = request
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::bad_request("Please provide a title for the post"))?;

    let description = request
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());
    if let Some(description) = &description {
        if description.chars().count() > MAX_DESCRIPTION_CHARS {
            return Err(ApiError::bad_request(
                "Description must not exceed 1000 characters",
            ));
        }
    }

    let post = PostRepository::new(&state.store).create(NewPost {
        user: user.user_id,
        title,
        description,
    })?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedPostResponse {
            status: STATUS_SUCCESS.to_string(),
            data: post,
        }),
    ))
}

/// Get a single post with its owner and comments resolved.
#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    params(("id" = String, Path, description = "Post id")),
    tag = "Posts",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Post found", body = PostDetailResponse),
        (status = 404, description = "No such post"),
        (status = 401, description = "Unauthenticated")
    )
)]
pub async fn get_post(
    Auth(_user): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PostDetailResponse>, ApiError> {
    let post = PostRepository::new(&state.store)
        .get(&id)?
        .ok_or_else(|| ApiError::not_found("A post with that ID could not be found"))?;

    // A post whose owner has been deactivated is unreachable, like the
    // owner themselves.
    let owner = UserRepository::new(&state.store)
        .find_by_id(&post.user)?
        .ok_or_else(|| ApiError::not_found("A post with that ID could not be found"))?;

    let comments = CommentRepository::new(&state.store).get_many(&post.comments.data)?;

    Ok(Json(PostDetailResponse {
        status: STATUS_SUCCESS.to_string(),
        data: PostDetail::from_parts(&post, &owner, &comments),
    }))
}

/// List the authenticated user's posts, newest first.
#[utoipa::path(
    get,
    path = "/api/posts/all_posts",
    tag = "Posts",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "The caller's posts", body = PostListResponse),
        (status = 401, description = "Unauthenticated")
    )
)]
pub async fn get_all_posts(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<PostListResponse>, ApiError> {
    let posts = PostRepository::new(&state.store).list_by_owner(&user.user_id)?;

    let comment_repo = CommentRepository::new(&state.store);
    let mut items = Vec::with_capacity(posts.len());
    for post in &posts {
        let comments = comment_repo.get_many(&post.comments.data)?;
        items.push(PostListItem::from_parts(post, &comments));
    }

    Ok(Json(PostListResponse {
        status: STATUS_SUCCESS.to_string(),
        results: items.len(),
        data: items,
    }))
}

/// Delete a post. Only the owner may delete it; the record is removed
/// permanently.
#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    params(("id" = String, Path, description = "Post id")),
    tag = "Posts",
    security(("bearer" = [])),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 400, description = "Not the owner"),
        (status = 404, description = "No such post"),
        (status = 401, description = "Unauthenticated")
    )
)]
pub async fn delete_post(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    match PostRepository::new(&state.store).delete(&id, &user.user_id)? {
        DeletePostOutcome::Deleted => Ok(StatusCode::NO_CONTENT),
        DeletePostOutcome::NotOwner => {
            Err(ApiError::bad_request("This post is not created by you"))
        }
        DeletePostOutcome::NotFound => {
            Err(ApiError::not_found("A post with that ID could not be found"))
        }
    }
}
