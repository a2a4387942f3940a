// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Gather Project

//! User repository: credential lookup and the relationship counters.
//!
//! Follower/following counts are denormalized onto the user record. A
//! follow or unfollow touches two user rows; both writes happen inside one
//! write transaction so the pair can never be observed half-applied.

use redb::{ReadableDatabase, ReadableTable};
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use utoipa::ToSchema;
use uuid::Uuid;

use super::super::{SocialStore, StoreError, StoreResult, USERS, USERS_BY_EMAIL};

/// Denormalized relationship counters.
///
/// Decrements saturate at zero; the floor stands in for true referential
/// consistency, which this store does not track (there is no follow edge
/// collection, only the counters).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserCounts {
    /// Number of followers of this user.
    pub followed_by: u32,
    /// Number of users this user follows.
    pub follows: u32,
}

/// User record as stored. Never serialized to the wire directly (the hash
/// would leak); API responses go through the projection types in `models`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredUser {
    pub id: String,
    pub full_name: String,
    /// Normalized (NFKC + lowercase) unique email.
    pub email: String,
    pub profile_picture: String,
    pub password_hash: String,
    /// Deactivated users keep their row but are excluded from every lookup.
    pub active: bool,
    pub counts: UserCounts,
}

/// Input for creating a user (seed import and tests).
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

/// Normalize an email address for the uniqueness index: NFKC fold, then
/// lowercase, then trim.
pub fn normalize_email(email: &str) -> String {
    email.trim().nfkc().collect::<String>().to_lowercase()
}

/// Repository for user records.
pub struct UserRepository<'a> {
    store: &'a SocialStore,
}

impl<'a> UserRepository<'a> {
    pub fn new(store: &'a SocialStore) -> Self {
        Self { store }
    }

    /// Create a new user. Fails with `AlreadyExists` if the normalized
    /// email is already taken.
    pub fn create(&self, new_user: NewUser) -> StoreResult<StoredUser> {
        let email = normalize_email(&new_user.email);
        let user = StoredUser {
            id: Uuid::new_v4().to_string(),
            full_name: new_user.full_name,
            email: email.clone(),
            profile_picture: new_user
                .profile_picture
                .unwrap_or_else(|| "default.jpg".to_string()),
            password_hash: new_user.password_hash,
            active: true,
            counts: UserCounts::default(),
        };

        let write_txn = self.store.db().begin_write()?;
        {
            let mut email_index = write_txn.open_table(USERS_BY_EMAIL)?;
            if email_index.get(email.as_str())?.is_some() {
                return Err(StoreError::AlreadyExists(format!("User {email}")));
            }
            email_index.insert(email.as_str(), user.id.as_str())?;

            let mut users = write_txn.open_table(USERS)?;
            let json = serde_json::to_vec(&user)?;
            users.insert(user.id.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;

        Ok(user)
    }

    /// Look up an active user by id. Deactivated users resolve to `None`.
    pub fn find_by_id(&self, user_id: &str) -> StoreResult<Option<StoredUser>> {
        let read_txn = self.store.db().begin_read()?;
        let users = read_txn.open_table(USERS)?;
        let user = match users.get(user_id)? {
            Some(value) => serde_json::from_slice::<StoredUser>(value.value())?,
            None => return Ok(None),
        };
        Ok(user.active.then_some(user))
    }

    /// Look up an active user by email (case-insensitive).
    pub fn find_by_email(&self, email: &str) -> StoreResult<Option<StoredUser>> {
        let normalized = normalize_email(email);
        let read_txn = self.store.db().begin_read()?;
        let email_index = read_txn.open_table(USERS_BY_EMAIL)?;
        let user_id = match email_index.get(normalized.as_str())? {
            Some(value) => value.value().to_string(),
            None => return Ok(None),
        };

        let users = read_txn.open_table(USERS)?;
        let user = match users.get(user_id.as_str())? {
            Some(value) => serde_json::from_slice::<StoredUser>(value.value())?,
            None => return Ok(None),
        };
        Ok(user.active.then_some(user))
    }

    /// Follow a user: increments the target's `followed_by` and the actor's
    /// `follows` in one transaction. Returns the updated target, or `None`
    /// if the target does not exist (or is deactivated).
    pub fn follow(&self, actor_id: &str, target_id: &str) -> StoreResult<Option<StoredUser>> {
        self.update_counter_pair(actor_id, target_id, |counts| {
            counts.followed_by += 1;
        }, |counts| {
            counts.follows += 1;
        })
    }

    /// Unfollow a user: the symmetric decrement, saturating at zero. There
    /// is no check that the actor currently follows the target.
    pub fn unfollow(&self, actor_id: &str, target_id: &str) -> StoreResult<Option<StoredUser>> {
        self.update_counter_pair(actor_id, target_id, |counts| {
            counts.followed_by = counts.followed_by.saturating_sub(1);
        }, |counts| {
            counts.follows = counts.follows.saturating_sub(1);
        })
    }

    /// Deactivate a user. The row stays; every lookup starts excluding it.
    pub fn deactivate(&self, user_id: &str) -> StoreResult<()> {
        let write_txn = self.store.db().begin_write()?;
        {
            let mut users = write_txn.open_table(USERS)?;
            let mut user = match users.get(user_id)? {
                Some(value) => serde_json::from_slice::<StoredUser>(value.value())?,
                None => return Err(StoreError::NotFound(format!("User {user_id}"))),
            };
            user.active = false;
            let json = serde_json::to_vec(&user)?;
            users.insert(user_id, json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn update_counter_pair(
        &self,
        actor_id: &str,
        target_id: &str,
        update_target: impl FnOnce(&mut UserCounts),
        update_actor: impl FnOnce(&mut UserCounts),
    ) -> StoreResult<Option<StoredUser>> {
        let write_txn = self.store.db().begin_write()?;
        let updated_target = {
            let mut users = write_txn.open_table(USERS)?;

            let mut target = match users.get(target_id)? {
                Some(value) => serde_json::from_slice::<StoredUser>(value.value())?,
                None => return Ok(None),
            };
            if !target.active {
                return Ok(None);
            }
            update_target(&mut target.counts);
            let json = serde_json::to_vec(&target)?;
            users.insert(target_id, json.as_slice())?;

            let mut actor = match users.get(actor_id)? {
                Some(value) => serde_json::from_slice::<StoredUser>(value.value())?,
                None => return Err(StoreError::NotFound(format!("User {actor_id}"))),
            };
            update_actor(&mut actor.counts);
            let json = serde_json::to_vec(&actor)?;
            users.insert(actor_id, json.as_slice())?;

            target
        };
        write_txn.commit()?;

        Ok(Some(updated_target))
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

    fn test_user(repo: &UserRepository, name: &str, email: &str) -> StoredUser {
        repo.create(NewUser {
            full_name: name.to_string(),
            email: email.to_string(),
            password_hash: "$2b$04$test".to_string(),
            profile_picture: None,
        })
        .expect("user creation succeeds")
    }

    #[test]
    fn normalize_email_folds_case_and_whitespace() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
        // NFKC folds compatibility characters (ﬁ ligature) to ASCII.
        assert_eq!(normalize_email("ﬁrst@example.com"), "first@example.com");
    }

    #[test]
    fn create_and_find_by_email_is_case_insensitive() {
        let (store, _dir) = test_store();
        let repo = UserRepository::new(&store);
        let created = test_user(&repo, "Alice", "Alice@Example.com");

        let found = repo.find_by_email("alice@EXAMPLE.com").unwrap();
        assert_eq!(found, Some(created));
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let (store, _dir) = test_store();
        let repo = UserRepository::new(&store);
        test_user(&repo, "Alice", "alice@example.com");

        let err = repo
            .create(NewUser {
                full_name: "Imposter".to_string(),
                email: "ALICE@example.com".to_string(),
                password_hash: "$2b$04$test".to_string(),
                profile_picture: None,
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists(_)));
    }

    #[test]
    fn new_users_start_with_zero_counts_and_default_picture() {
        let (store, _dir) = test_store();
        let repo = UserRepository::new(&store);
        let user = test_user(&repo, "Alice", "alice@example.com");

        assert_eq!(user.counts, UserCounts::default());
        assert_eq!(user.profile_picture, "default.jpg");
        assert!(user.active);
    }

    #[test]
    fn deactivated_users_are_excluded_from_lookups() {
        let (store, _dir) = test_store();
        let repo = UserRepository::new(&store);
        let user = test_user(&repo, "Alice", "alice@example.com");

        repo.deactivate(&user.id).unwrap();

        assert_eq!(repo.find_by_id(&user.id).unwrap(), None);
        assert_eq!(repo.find_by_email("alice@example.com").unwrap(), None);
    }

    #[test]
    fn follow_and_unfollow_keep_both_counters_in_step() {
        let (store, _dir) = test_store();
        let repo = UserRepository::new(&store);
        let a = test_user(&repo, "A", "a@example.com");
        let b = test_user(&repo, "B", "b@example.com");

        let target = repo.follow(&a.id, &b.id).unwrap().expect("target exists");
        assert_eq!(target.counts.followed_by, 1);

        let a_after = repo.find_by_id(&a.id).unwrap().unwrap();
        let b_after = repo.find_by_id(&b.id).unwrap().unwrap();
        assert_eq!(a_after.counts.follows, 1);
        assert_eq!(a_after.counts.followed_by, 0);
        assert_eq!(b_after.counts.followed_by, 1);
        assert_eq!(b_after.counts.follows, 0);

        repo.unfollow(&a.id, &b.id).unwrap().expect("target exists");
        let a_after = repo.find_by_id(&a.id).unwrap().unwrap();
        let b_after = repo.find_by_id(&b.id).unwrap().unwrap();
        assert_eq!(a_after.counts.follows, 0);
        assert_eq!(b_after.counts.followed_by, 0);
    }

    #[test]
    fn follow_unknown_target_reports_none() {
        let (store, _dir) = test_store();
        let repo = UserRepository::new(&store);
        let a = test_user(&repo, "A", "a@example.com");

        assert!(repo.follow(&a.id, "missing").unwrap().is_none());
        // Nothing was applied to the actor either.
        assert_eq!(repo.find_by_id(&a.id).unwrap().unwrap().counts.follows, 0);
    }

    #[test]
    fn unfollow_without_prior_follow_floors_at_zero() {
        let (store, _dir) = test_store();
        let repo = UserRepository::new(&store);
        let a = test_user(&repo, "A", "a@example.com");
        let b = test_user(&repo, "B", "b@example.com");

        repo.unfollow(&a.id, &b.id).unwrap().expect("target exists");

        assert_eq!(repo.find_by_id(&a.id).unwrap().unwrap().counts.follows, 0);
        assert_eq!(
            repo.find_by_id(&b.id).unwrap().unwrap().counts.followed_by,
            0
        );
    }
}
