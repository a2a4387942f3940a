// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Gather Project

//! Like repository.
//!
//! A like is a join entity between a user and a post, unique per
//! (user, post) pair via the `likes_by_user_post` index. Creating or
//! deleting a like updates the parent post's `likes` aggregate in the same
//! write transaction.

use redb::{ReadableDatabase, ReadableTable};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::super::{
    user_post_key, SocialStore, StoreResult, LIKES, LIKES_BY_USER_POST, POSTS,
};
use super::posts::StoredPost;

/// Like record as stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredLike {
    pub id: String,
    pub user: String,
    pub post: String,
}

/// Outcome of a like attempt. Liking an already-liked post is a silent
/// no-op, not an error.
#[derive(Debug, PartialEq, Eq)]
pub enum LikeOutcome {
    Liked,
    AlreadyLiked,
    PostNotFound,
}

/// Outcome of an unlike attempt.
#[derive(Debug, PartialEq, Eq)]
pub enum UnlikeOutcome {
    Unliked,
    NotLiked,
    PostNotFound,
}

/// Repository for like records.
pub struct LikeRepository<'a> {
    store: &'a SocialStore,
}

impl<'a> LikeRepository<'a> {
    pub fn new(store: &'a SocialStore) -> Self {
        Self { store }
    }

    /// Like a post: create the join entity and bump the post's aggregate,
    /// atomically. Idempotent per (user, post).
    pub fn like(&self, user_id: &str, post_id: &str) -> StoreResult<LikeOutcome> {
        let write_txn = self.store.db().begin_write()?;
        {
            let mut posts = write_txn.open_table(POSTS)?;
            let mut post = match posts.get(post_id)? {
                Some(value) => serde_json::from_slice::<StoredPost>(value.value())?,
                None => return Ok(LikeOutcome::PostNotFound),
            };

            let mut pair_index = write_txn.open_table(LIKES_BY_USER_POST)?;
            let pair_key = user_post_key(post_id, user_id);
            if pair_index.get(pair_key.as_str())?.is_some() {
                return Ok(LikeOutcome::AlreadyLiked);
            }

            let like = StoredLike {
                id: Uuid::new_v4().to_string(),
                user: user_id.to_string(),
                post: post_id.to_string(),
            };
            let mut likes = write_txn.open_table(LIKES)?;
            let json = serde_json::to_vec(&like)?;
            likes.insert(like.id.as_str(), json.as_slice())?;
            pair_index.insert(pair_key.as_str(), like.id.as_str())?;

            post.likes.count += 1;
            post.likes.data.push(like.id.clone());
            let json = serde_json::to_vec(&post)?;
            posts.insert(post_id, json.as_slice())?;
        }
        write_txn.commit()?;

        Ok(LikeOutcome::Liked)
    }

    /// Unlike a post: delete the join entity and shrink the post's
    /// aggregate, atomically.
    pub fn unlike(&self, user_id: &str, post_id: &str) -> StoreResult<UnlikeOutcome> {
        let write_txn = self.store.db().begin_write()?;
        {
            let mut posts = write_txn.open_table(POSTS)?;
            let mut post = match posts.get(post_id)? {
                Some(value) => serde_json::from_slice::<StoredPost>(value.value())?,
                None => return Ok(UnlikeOutcome::PostNotFound),
            };

            let mut pair_index = write_txn.open_table(LIKES_BY_USER_POST)?;
            let pair_key = user_post_key(post_id, user_id);
            let like_id = match pair_index.get(pair_key.as_str())? {
                Some(value) => value.value().to_string(),
                None => return Ok(UnlikeOutcome::NotLiked),
            };

            let mut likes = write_txn.open_table(LIKES)?;
            likes.remove(like_id.as_str())?;
            pair_index.remove(pair_key.as_str())?;

            post.likes.count = post.likes.count.saturating_sub(1);
            post.likes.data.retain(|id| id != &like_id);
            let json = serde_json::to_vec(&post)?;
            posts.insert(post_id, json.as_slice())?;
        }
        write_txn.commit()?;

        Ok(UnlikeOutcome::Unliked)
    }

    /// Look up the like a user placed on a post, if any.
    pub fn find_by_user_post(
        &self,
        user_id: &str,
        post_id: &str,
    ) -> StoreResult<Option<StoredLike>> {
        let read_txn = self.store.db().begin_read()?;
        let pair_index = read_txn.open_table(LIKES_BY_USER_POST)?;
        let like_id = match pair_index.get(user_post_key(post_id, user_id).as_str())? {
            Some(value) => value.value().to_string(),
            None => return Ok(None),
        };

        let likes = read_txn.open_table(LIKES)?;
        match likes.get(like_id.as_str())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }
}
