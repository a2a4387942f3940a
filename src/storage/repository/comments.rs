// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Gather Project

//! Comment repository.
//!
//! A comment is a join entity that also carries content. A user may comment
//! at most once per post (enforced by the `comments_by_user_post` index),
//! and comments are create-only: no update or delete path exists.

use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::super::{
    user_post_key, SocialStore, StoreResult, COMMENTS, COMMENTS_BY_USER_POST, POSTS,
};
use super::posts::StoredPost;

/// Comment record as stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredComment {
    pub id: String,
    pub user: String,
    pub post: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a comment. Text bounds (1-300 chars) are validated at
/// the API layer.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub user: String,
    pub post: String,
    pub comment: String,
}

/// Outcome of a comment attempt.
#[derive(Debug, PartialEq, Eq)]
pub enum CommentOutcome {
    Commented(StoredComment),
    AlreadyCommented,
    PostNotFound,
}

/// Repository for comment records.
pub struct CommentRepository<'a> {
    store: &'a SocialStore,
}

impl<'a> CommentRepository<'a> {
    pub fn new(store: &'a SocialStore) -> Self {
        Self { store }
    }

    /// Comment on a post: create the entity and bump the post's aggregate,
    /// atomically. At most one comment per (user, post).
    pub fn comment(&self, new_comment: NewComment) -> StoreResult<CommentOutcome> {
        let write_txn = self.store.db().begin_write()?;
        let comment = {
            let mut posts = write_txn.open_table(POSTS)?;
            let mut post = match posts.get(new_comment.post.as_str())? {
                Some(value) => serde_json::from_slice::<StoredPost>(value.value())?,
                None => return Ok(CommentOutcome::PostNotFound),
            };

            let mut pair_index = write_txn.open_table(COMMENTS_BY_USER_POST)?;
            let pair_key = user_post_key(&new_comment.post, &new_comment.user);
            if pair_index.get(pair_key.as_str())?.is_some() {
                return Ok(CommentOutcome::AlreadyCommented);
            }

            let comment = StoredComment {
                id: Uuid::new_v4().to_string(),
                user: new_comment.user,
                post: new_comment.post,
                comment: new_comment.comment,
                created_at: Utc::now(),
            };
            let mut comments = write_txn.open_table(COMMENTS)?;
            let json = serde_json::to_vec(&comment)?;
            comments.insert(comment.id.as_str(), json.as_slice())?;
            pair_index.insert(pair_key.as_str(), comment.id.as_str())?;

            post.comments.count += 1;
            post.comments.data.push(comment.id.clone());
            let json = serde_json::to_vec(&post)?;
            posts.insert(comment.post.as_str(), json.as_slice())?;

            comment
        };
        write_txn.commit()?;

        Ok(CommentOutcome::Commented(comment))
    }

    /// Resolve a list of comment ids, preserving order. Ids that no longer
    /// resolve are skipped.
    pub fn get_many(&self, comment_ids: &[String]) -> StoreResult<Vec<StoredComment>> {
        let read_txn = self.store.db().begin_read()?;
        let comments = read_txn.open_table(COMMENTS)?;

        let mut results = Vec::with_capacity(comment_ids.len());
        for id in comment_ids {
            if let Some(value) = comments.get(id.as_str())? {
                results.push(serde_json::from_slice(value.value())?);
            }
        }
        Ok(results)
    }

    /// Look up the comment a user placed on a post, if any.
    pub fn find_by_user_post(
        &self,
        user_id: &str,
        post_id: &str,
    ) -> StoreResult<Option<StoredComment>> {
        let read_txn = self.store.db().begin_read()?;
        let pair_index = read_txn.open_table(COMMENTS_BY_USER_POST)?;
        let comment_id = match pair_index.get(user_post_key(post_id, user_id).as_str())? {
            Some(value) => value.value().to_string(),
            None => return Ok(None),
        };

        let comments = read_txn.open_table(COMMENTS)?;
        match comments.get(comment_id.as_str())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::repository::posts::{NewPost, PostRepository};
    use tempfile::TempDir;

    fn test_store() -> (SocialStore, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let store = SocialStore::open(dir.path()).expect("store opens");
        (store, dir)
    }

    fn test_post(store: &SocialStore) -> StoredPost {
        PostRepository::new(store)
            .create(NewPost {
                user: "owner".to_string(),
                title: "a post".to_string(),
                description: None,
            })
            .expect("post creation succeeds")
    }

    fn new_comment(user: &str, post: &str, text: &str) -> NewComment {
        NewComment {
            user: user.to_string(),
            post: post.to_string(),
            comment: text.to_string(),
        }
    }

    #[test]
    fn comment_creates_record_and_bumps_aggregate() {
        let (store, _dir) = test_store();
        let repo = CommentRepository::new(&store);
        let post = test_post(&store);

        let outcome = repo
            .comment(new_comment("u1", &post.id, "nice post"))
            .unwrap();
        let CommentOutcome::Commented(comment) = outcome else {
            panic!("expected a created comment, got {outcome:?}");
        };
        assert_eq!(comment.comment, "nice post");

        let post = PostRepository::new(&store).get(&post.id).unwrap().unwrap();
        assert_eq!(post.comments.count, 1);
        assert_eq!(post.comments.data, vec![comment.id]);
    }

    #[test]
    fn second_comment_by_same_user_is_rejected() {
        let (store, _dir) = test_store();
        let repo = CommentRepository::new(&store);
        let post = test_post(&store);

        repo.comment(new_comment("u1", &post.id, "first")).unwrap();
        let outcome = repo.comment(new_comment("u1", &post.id, "second")).unwrap();
        assert_eq!(outcome, CommentOutcome::AlreadyCommented);

        // The rejected comment must not have altered the aggregate.
        let post = PostRepository::new(&store).get(&post.id).unwrap().unwrap();
        assert_eq!(post.comments.count, 1);
        assert_eq!(post.comments.data.len(), 1);
    }

    #[test]
    fn different_users_can_comment_on_the_same_post() {
        let (store, _dir) = test_store();
        let repo = CommentRepository::new(&store);
        let post = test_post(&store);

        repo.comment(new_comment("u1", &post.id, "one")).unwrap();
        repo.comment(new_comment("u2", &post.id, "two")).unwrap();

        let post = PostRepository::new(&store).get(&post.id).unwrap().unwrap();
        assert_eq!(post.comments.count, 2);

        let resolved = repo.get_many(&post.comments.data).unwrap();
        let texts: Vec<&str> = resolved.iter().map(|c| c.comment.as_str()).collect();
        assert_eq!(texts, vec!["one", "two"]);
    }

    #[test]
    fn comment_on_missing_post_reports_not_found() {
        let (store, _dir) = test_store();
        let repo = CommentRepository::new(&store);
        assert_eq!(
            repo.comment(new_comment("u1", "missing", "text")).unwrap(),
            CommentOutcome::PostNotFound
        );
    }

    #[test]
    fn find_by_user_post_resolves_the_pair() {
        let (store, _dir) = test_store();
        let repo = CommentRepository::new(&store);
        let post = test_post(&store);

        repo.comment(new_comment("u1", &post.id, "hello")).unwrap();

        let found = repo.find_by_user_post("u1", &post.id).unwrap().unwrap();
        assert_eq!(found.comment, "hello");
        assert!(repo.find_by_user_post("u2", &post.id).unwrap().is_none());
    }
}
