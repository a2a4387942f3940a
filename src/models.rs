// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Gather Project

//! # API Data Models
//!
//! Request and response data structures used by the REST API. All types
//! derive `Serialize`/`Deserialize` and `ToSchema` for automatic JSON
//! handling and OpenAPI documentation.
//!
//! Response envelopes follow the `{status, data}` convention: `status` is
//! `"success"` on the happy path; failures are produced by
//! [`crate::error::ApiError`] with `"fail"` or `"error"`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::AuthenticatedUser;
use crate::storage::{StoredComment, StoredPost, StoredUser, UserCounts};

pub const STATUS_SUCCESS: &str = "success";

// =============================================================================
// Authentication
// =============================================================================

/// Credentials for POST /api/authenticate.
///
/// Both fields are optional at the serde layer so that a missing field
/// surfaces as the documented 400 instead of a deserialization rejection.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AuthRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Response for a successful authentication.
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub status: String,
    /// Signed bearer token; also mirrored into the `jwt` session cookie.
    pub token: String,
}

/// Bare `{status}` body (logout).
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
}

/// `{status, message}` body used by follow/unfollow and engagement routes.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub status: String,
    pub message: String,
}

impl MessageResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            message: message.into(),
        }
    }
}

// =============================================================================
// Current User
// =============================================================================

/// Projection of the authenticated identity for GET /api/user.
///
/// The field names on the wire are display labels, kept verbatim from the
/// public API contract.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserSummary {
    #[serde(rename = "User Name")]
    pub user_name: String,
    #[serde(rename = "Followers")]
    pub followers: u32,
    #[serde(rename = "Following")]
    pub following: u32,
}

impl From<&AuthenticatedUser> for UserSummary {
    fn from(user: &AuthenticatedUser) -> Self {
        Self {
            user_name: user.full_name.clone(),
            followers: user.counts.followed_by,
            following: user.counts.follows,
        }
    }
}

/// Response for GET /api/user.
#[derive(Debug, Serialize, ToSchema)]
pub struct CurrentUserResponse {
    pub status: String,
    pub data: UserSummary,
}

// =============================================================================
// Posts
// =============================================================================

/// Body for POST /api/posts.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreatePostRequest {
    /// Post title (required, non-empty after trimming).
    pub title: Option<String>,
    /// Optional description, at most 1000 characters.
    pub description: Option<String>,
}

/// Response for POST /api/posts: the stored post as created.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedPostResponse {
    pub status: String,
    pub data: StoredPost,
}

/// Post owner resolved inline with a post read.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OwnerSummary {
    pub id: String,
    pub full_name: String,
    pub profile_picture: String,
    pub counts: UserCounts,
}

impl From<&StoredUser> for OwnerSummary {
    fn from(user: &StoredUser) -> Self {
        Self {
            id: user.id.clone(),
            full_name: user.full_name.clone(),
            profile_picture: user.profile_picture.clone(),
            counts: user.counts.clone(),
        }
    }
}

/// Comment reduced to its public fields; owner, post and timestamp are
/// stripped from post reads.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CommentView {
    pub id: String,
    pub comment: String,
}

impl From<&StoredComment> for CommentView {
    fn from(comment: &StoredComment) -> Self {
        Self {
            id: comment.id.clone(),
            comment: comment.comment.clone(),
        }
    }
}

/// Comment aggregate with resolved comment bodies.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ResolvedComments {
    pub count: u32,
    pub data: Vec<CommentView>,
}

/// Like aggregate exposed on reads: the count only, never the id list.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LikeCount {
    pub count: u32,
}

/// A single post with its owner and comments resolved (GET /api/posts/{id}).
#[derive(Debug, Serialize, ToSchema)]
pub struct PostDetail {
    pub id: String,
    pub user: OwnerSummary,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub comments: ResolvedComments,
    pub likes: LikeCount,
}

impl PostDetail {
    pub fn from_parts(post: &StoredPost, owner: &StoredUser, comments: &[StoredComment]) -> Self {
        Self {
            id: post.id.clone(),
            user: OwnerSummary::from(owner),
            title: post.title.clone(),
            description: post.description.clone(),
            created_at: post.created_at,
            comments: ResolvedComments {
                count: post.comments.count,
                data: comments.iter().map(CommentView::from).collect(),
            },
            likes: LikeCount {
                count: post.likes.count,
            },
        }
    }
}

/// A post in the caller's own feed (GET /api/posts/all_posts): the owner
/// field is omitted since the caller is the owner.
#[derive(Debug, Serialize, ToSchema)]
pub struct PostListItem {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub comments: ResolvedComments,
    pub likes: LikeCount,
}

impl PostListItem {
    pub fn from_parts(post: &StoredPost, comments: &[StoredComment]) -> Self {
        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            description: post.description.clone(),
            created_at: post.created_at,
            comments: ResolvedComments {
                count: post.comments.count,
                data: comments.iter().map(CommentView::from).collect(),
            },
            likes: LikeCount {
                count: post.likes.count,
            },
        }
    }
}

/// Response for GET /api/posts/{id}.
#[derive(Debug, Serialize, ToSchema)]
pub struct PostDetailResponse {
    pub status: String,
    pub data: PostDetail,
}

/// Response for GET /api/posts/all_posts.
#[derive(Debug, Serialize, ToSchema)]
pub struct PostListResponse {
    pub status: String,
    pub results: usize,
    pub data: Vec<PostListItem>,
}

// =============================================================================
// Engagement
// =============================================================================

/// Body for POST /api/comment/{id}.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CommentRequest {
    /// Comment text, 1-300 characters.
    pub comment: Option<String>,
}
