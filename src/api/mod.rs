// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Gather Project

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{
        AuthRequest, CommentRequest, CommentView, CreatePostRequest, CreatedPostResponse,
        CurrentUserResponse, LikeCount, MessageResponse, OwnerSummary, PostDetail,
        PostDetailResponse, PostListItem, PostListResponse, ResolvedComments, StatusResponse,
        TokenResponse, UserSummary,
    },
    state::AppState,
    storage::{EngagementAggregate, StoredPost, UserCounts},
};

pub mod auth;
pub mod engagement;
pub mod health;
pub mod posts;
pub mod users;

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/authenticate", post(auth::authenticate))
        .route("/logout", get(auth::logout))
        .route("/posts", post(posts::create_post))
        .route("/posts/all_posts", get(posts::get_all_posts))
        .route(
            "/posts/{id}",
            get(posts::get_post).delete(posts::delete_post),
        )
        .route("/follow/{id}", post(users::follow_user))
        .route("/unfollow/{id}", post(users::unfollow_user))
        .route("/user", get(users::get_current_user))
        .route("/like/{id}", post(engagement::like_post))
        .route("/unlike/{id}", post(engagement::unlike_post))
        .route("/comment/{id}", post(engagement::comment_post))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health::health))
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::authenticate,
        auth::logout,
        users::follow_user,
        users::unfollow_user,
        users::get_current_user,
        posts::create_post,
        posts::get_all_posts,
        posts::get_post,
        posts::delete_post,
        engagement::like_post,
        engagement::unlike_post,
        engagement::comment_post,
        health::health
    ),
    components(
        schemas(
            AuthRequest,
            TokenResponse,
            StatusResponse,
            MessageResponse,
            CurrentUserResponse,
            UserSummary,
            UserCounts,
            CreatePostRequest,
            CreatedPostResponse,
            StoredPost,
            EngagementAggregate,
            OwnerSummary,
            CommentView,
            ResolvedComments,
            LikeCount,
            PostDetail,
            PostListItem,
            PostDetailResponse,
            PostListResponse,
            CommentRequest,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Auth", description = "Authentication and session handling"),
        (name = "Users", description = "Relationships and the current user"),
        (name = "Posts", description = "Post creation, reading and deletion"),
        (name = "Engagement", description = "Likes and comments"),
        (name = "Health", description = "Liveness probes")
    )
)]
struct ApiDoc;
