// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Gather Project

//! Post repository.
//!
//! Posts carry two denormalized engagement aggregates (`likes`,
//! `comments`), each a count plus the list of join-entity ids. The
//! aggregates are mutated only by the like/comment repositories, inside the
//! same transaction that writes the join entity.
//!
//! Listing a user's posts newest-first is served by the `posts_by_owner`
//! index, keyed `owner_id|!timestamp_be|post_id` so a forward range scan
//! yields descending creation time.

use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::super::{SocialStore, StoreResult, POSTS, POSTS_BY_OWNER};

/// Denormalized count + join-entity id list.
///
/// Invariant: `count == data.len()`, guaranteed because both fields are
/// always updated in the same write transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EngagementAggregate {
    pub count: u32,
    pub data: Vec<String>,
}

/// Post record as stored (and as returned verbatim on creation).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct StoredPost {
    pub id: String,
    /// Owning user id.
    pub user: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub comments: EngagementAggregate,
    pub likes: EngagementAggregate,
}

/// Input for creating a post. Validation (non-empty title, description
/// bounds) happens at the API layer before this is built.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub user: String,
    pub title: String,
    pub description: Option<String>,
}

/// Outcome of a delete attempt.
#[derive(Debug, PartialEq, Eq)]
pub enum DeletePostOutcome {
    Deleted,
    NotOwner,
    NotFound,
}

/// Build a composite key for the posts_by_owner index.
///
/// Format: `owner_id | inverted_timestamp_be_bytes | post_id`
///
/// The inverted timestamp ensures newest-first ordering when scanning
/// forward.
fn make_owner_key(owner_id: &str, timestamp_micros: i64, post_id: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(owner_id.len() + 1 + 8 + 1 + post_id.len());
    key.extend_from_slice(owner_id.as_bytes());
    key.push(b'|');
    key.extend_from_slice(&(!timestamp_micros as u64).to_be_bytes());
    key.push(b'|');
    key.extend_from_slice(post_id.as_bytes());
    key
}

/// Build a prefix key for range scanning all posts of an owner.
fn make_owner_prefix(owner_id: &str) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(owner_id.len() + 1);
    prefix.extend_from_slice(owner_id.as_bytes());
    prefix.push(b'|');
    prefix
}

/// Build the upper bound for a range scan (prefix with 0xFF bytes appended).
fn make_owner_prefix_end(owner_id: &str) -> Vec<u8> {
    let mut end = Vec::with_capacity(owner_id.len() + 1 + 20);
    end.extend_from_slice(owner_id.as_bytes());
    end.push(b'|');
    end.extend_from_slice(&[0xFF; 20]);
    end
}

/// Repository for post records.
pub struct PostRepository<'a> {
    store: &'a SocialStore,
}

impl<'a> PostRepository<'a> {
    pub fn new(store: &'a SocialStore) -> Self {
        Self { store }
    }

    /// Create a post with empty engagement aggregates, stamped now.
    pub fn create(&self, new_post: NewPost) -> StoreResult<StoredPost> {
        let post = StoredPost {
            id: Uuid::new_v4().to_string(),
            user: new_post.user,
            title: new_post.title,
            description: new_post.description,
            created_at: Utc::now(),
            comments: EngagementAggregate::default(),
            likes: EngagementAggregate::default(),
        };

        let write_txn = self.store.db().begin_write()?;
        {
            let mut posts = write_txn.open_table(POSTS)?;
            let json = serde_json::to_vec(&post)?;
            posts.insert(post.id.as_str(), json.as_slice())?;

            let mut owner_index = write_txn.open_table(POSTS_BY_OWNER)?;
            let key = make_owner_key(&post.user, post.created_at.timestamp_micros(), &post.id);
            owner_index.insert(key.as_slice(), post.id.as_str())?;
        }
        write_txn.commit()?;

        Ok(post)
    }

    /// Look up a post by id.
    pub fn get(&self, post_id: &str) -> StoreResult<Option<StoredPost>> {
        let read_txn = self.store.db().begin_read()?;
        let posts = read_txn.open_table(POSTS)?;
        match posts.get(post_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// All posts of an owner, newest first.
    pub fn list_by_owner(&self, owner_id: &str) -> StoreResult<Vec<StoredPost>> {
        let read_txn = self.store.db().begin_read()?;
        let owner_index = read_txn.open_table(POSTS_BY_OWNER)?;
        let posts = read_txn.open_table(POSTS)?;

        let prefix = make_owner_prefix(owner_id);
        let prefix_end = make_owner_prefix_end(owner_id);

        let mut results = Vec::new();
        for entry in owner_index.range(prefix.as_slice()..prefix_end.as_slice())? {
            let entry = entry?;
            let post_id = entry.1.value();
            if let Some(value) = posts.get(post_id)? {
                results.push(serde_json::from_slice(value.value())?);
            }
        }

        Ok(results)
    }

    /// Delete a post, enforcing ownership. The post's like and comment
    /// records are left in place (no cascade); they become unreachable
    /// through the API once the post is gone.
    pub fn delete(&self, post_id: &str, actor_id: &str) -> StoreResult<DeletePostOutcome> {
        let write_txn = self.store.db().begin_write()?;
        {
            let mut posts = write_txn.open_table(POSTS)?;
            let post = match posts.get(post_id)? {
                Some(value) => serde_json::from_slice::<StoredPost>(value.value())?,
                None => return Ok(DeletePostOutcome::NotFound),
            };
            if post.user != actor_id {
                return Ok(DeletePostOutcome::NotOwner);
            }

            posts.remove(post_id)?;

            let mut owner_index = write_txn.open_table(POSTS_BY_OWNER)?;
            let key = make_owner_key(&post.user, post.created_at.timestamp_micros(), &post.id);
            owner_index.remove(key.as_slice())?;
        }
        write_txn.commit()?;

        Ok(DeletePostOutcome::Deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (SocialStore, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let store = SocialStore::open(dir.path()).expect("store opens");
        (store, dir)
    }

    fn test_post(repo: &PostRepository, owner: &str, title: &str) -> StoredPost {
        repo.create(NewPost {
            user: owner.to_string(),
            title: title.to_string(),
            description: Some("a description".to_string()),
        })
        .expect("post creation succeeds")
    }

    #[test]
    fn create_starts_with_empty_aggregates() {
        let (store, _dir) = test_store();
        let repo = PostRepository::new(&store);
        let post = test_post(&repo, "user-1", "First");

        assert_eq!(post.likes.count, 0);
        assert!(post.likes.data.is_empty());
        assert_eq!(post.comments.count, 0);
        assert!(post.comments.data.is_empty());

        let loaded = repo.get(&post.id).unwrap();
        assert_eq!(loaded, Some(post));
    }

    #[test]
    fn get_missing_post_is_none() {
        let (store, _dir) = test_store();
        let repo = PostRepository::new(&store);
        assert_eq!(repo.get("missing").unwrap(), None);
    }

    #[test]
    fn list_by_owner_is_newest_first_and_filtered() {
        let (store, _dir) = test_store();
        let repo = PostRepository::new(&store);

        let first = test_post(&repo, "user-1", "first");
        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = test_post(&repo, "user-1", "second");
        std::thread::sleep(std::time::Duration::from_millis(5));
        let third = test_post(&repo, "user-1", "third");
        test_post(&repo, "user-2", "someone else's");

        let listed = repo.list_by_owner("user-1").unwrap();
        let ids: Vec<&str> = listed.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec![&third.id, &second.id, &first.id]);
    }

    #[test]
    fn delete_enforces_ownership() {
        let (store, _dir) = test_store();
        let repo = PostRepository::new(&store);
        let post = test_post(&repo, "owner", "mine");

        let outcome = repo.delete(&post.id, "intruder").unwrap();
        assert_eq!(outcome, DeletePostOutcome::NotOwner);
        assert!(repo.get(&post.id).unwrap().is_some());

        let outcome = repo.delete(&post.id, "owner").unwrap();
        assert_eq!(outcome, DeletePostOutcome::Deleted);
        assert_eq!(repo.get(&post.id).unwrap(), None);
        assert!(repo.list_by_owner("owner").unwrap().is_empty());
    }

    #[test]
    fn delete_missing_post_reports_not_found() {
        let (store, _dir) = test_store();
        let repo = PostRepository::new(&store);
        assert_eq!(
            repo.delete("missing", "anyone").unwrap(),
            DeletePostOutcome::NotFound
        );
    }
}
