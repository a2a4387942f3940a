// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Gather Project

//! # Embedded Social Store
//!
//! Single logical data store backed by redb (pure Rust, ACID). Entities are
//! stored as JSON bytes keyed by id; uniqueness constraints and ordered
//! listings are served by dedicated index tables.
//!
//! ## Table Layout
//!
//! - `users`: user_id → serialized StoredUser
//! - `users_by_email`: normalized email → user_id
//! - `posts`: post_id → serialized StoredPost
//! - `posts_by_owner`: composite key (owner|!timestamp|post_id) → post_id
//! - `likes`: like_id → serialized StoredLike
//! - `likes_by_user_post`: composite key (post|user) → like_id
//! - `comments`: comment_id → serialized StoredComment
//! - `comments_by_user_post`: composite key (post|user) → comment_id
//!
//! Every multi-step mutation (follow/unfollow counter pairs, like/unlike
//! and comment aggregate updates) runs inside one write transaction, so the
//! denormalized counts cannot diverge from their id lists.

use std::fs;
use std::path::Path;

use redb::{Database, TableDefinition};

pub mod repository;

pub use repository::{
    CommentOutcome, CommentRepository, DeletePostOutcome, EngagementAggregate, LikeOutcome,
    LikeRepository, NewComment, NewPost, NewUser, PostRepository, StoredComment, StoredLike,
    StoredPost, StoredUser, UnlikeOutcome, UserCounts, UserRepository,
};

/// Database file name inside the data directory.
const DB_FILE: &str = "gather.redb";

// =============================================================================
// Table Definitions
// =============================================================================

pub(crate) const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");
pub(crate) const USERS_BY_EMAIL: TableDefinition<&str, &str> =
    TableDefinition::new("users_by_email");

pub(crate) const POSTS: TableDefinition<&str, &[u8]> = TableDefinition::new("posts");
/// Key format: `owner_id|!timestamp_be|post_id` for newest-first range scans.
pub(crate) const POSTS_BY_OWNER: TableDefinition<&[u8], &str> =
    TableDefinition::new("posts_by_owner");

pub(crate) const LIKES: TableDefinition<&str, &[u8]> = TableDefinition::new("likes");
/// Key format: `post_id|user_id`; enforces one like per user per post.
pub(crate) const LIKES_BY_USER_POST: TableDefinition<&str, &str> =
    TableDefinition::new("likes_by_user_post");

pub(crate) const COMMENTS: TableDefinition<&str, &[u8]> = TableDefinition::new("comments");
/// Key format: `post_id|user_id`; enforces one comment per user per post.
pub(crate) const COMMENTS_BY_USER_POST: TableDefinition<&str, &str> =
    TableDefinition::new("comments_by_user_post");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// SocialStore
// =============================================================================

/// Handle to the embedded database.
///
/// Constructed once at startup and passed through [`crate::state::AppState`];
/// dropping the last handle closes the database file.
pub struct SocialStore {
    db: Database,
}

impl SocialStore {
    /// Open (or create) the store inside the given data directory.
    pub fn open(data_dir: &Path) -> StoreResult<Self> {
        fs::create_dir_all(data_dir)?;
        let db = Database::create(data_dir.join(DB_FILE))?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(USERS_BY_EMAIL)?;
            let _ = write_txn.open_table(POSTS)?;
            let _ = write_txn.open_table(POSTS_BY_OWNER)?;
            let _ = write_txn.open_table(LIKES)?;
            let _ = write_txn.open_table(LIKES_BY_USER_POST)?;
            let _ = write_txn.open_table(COMMENTS)?;
            let _ = write_txn.open_table(COMMENTS_BY_USER_POST)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    pub(crate) fn db(&self) -> &Database {
        &self.db
    }
}

/// Composite key joining a post and a user, used by the engagement
/// uniqueness indexes. Ids are UUIDs, so `|` cannot occur in either half.
pub(crate) fn user_post_key(post_id: &str, user_id: &str) -> String {
    format!("{post_id}|{user_id}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use redb::ReadableDatabase;
    use tempfile::TempDir;

    #[test]
    fn open_creates_database_and_tables() {
        let dir = TempDir::new().expect("temp dir");
        let store = SocialStore::open(dir.path()).expect("store opens");

        // All tables must be readable immediately after open.
        let read_txn = store.db().begin_read().unwrap();
        assert!(read_txn.open_table(USERS).is_ok());
        assert!(read_txn.open_table(POSTS_BY_OWNER).is_ok());
        assert!(read_txn.open_table(COMMENTS_BY_USER_POST).is_ok());
    }

    #[test]
    fn open_is_idempotent_across_restarts() {
        let dir = TempDir::new().expect("temp dir");
        drop(SocialStore::open(dir.path()).expect("first open"));
        let reopened = SocialStore::open(dir.path());
        assert!(reopened.is_ok());
    }

    #[test]
    fn user_post_key_is_unambiguous() {
        assert_eq!(user_post_key("p1", "u1"), "p1|u1");
        assert_ne!(user_post_key("p1", "u1"), user_post_key("u1", "p1"));
    }
}
