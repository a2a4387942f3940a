// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Gather Project

//! Repository layer providing typed access to the embedded store.
//!
//! Each repository covers one entity type. Multi-step mutations (counter
//! updates paired with entity writes) are performed inside a single write
//! transaction by the repository that owns them.

pub mod comments;
pub mod likes;
pub mod posts;
pub mod users;

pub use comments::{CommentOutcome, CommentRepository, NewComment, StoredComment};
pub use likes::{LikeOutcome, LikeRepository, StoredLike, UnlikeOutcome};
pub use posts::{DeletePostOutcome, EngagementAggregate, NewPost, PostRepository, StoredPost};
pub use users::{NewUser, StoredUser, UserCounts, UserRepository};
