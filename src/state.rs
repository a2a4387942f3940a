// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Gather Project

use std::sync::Arc;

use crate::config::Config;
use crate::storage::SocialStore;

/// Token signing/verification parameters.
#[derive(Clone)]
pub struct AuthConfig {
    /// HS256 signing secret.
    pub secret: String,
    /// Bearer token lifetime in days.
    pub token_ttl_days: i64,
    /// Session cookie lifetime in days.
    pub cookie_ttl_days: i64,
}

impl From<&Config> for AuthConfig {
    fn from(config: &Config) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            token_ttl_days: config.jwt_expires_in_days,
            cookie_ttl_days: config.jwt_cookie_expires_in_days,
        }
    }
}

/// Shared application state: the explicitly constructed store handle plus
/// the auth parameters. Cloning is cheap (the store is behind an `Arc`).
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SocialStore>,
    pub auth: AuthConfig,
}

impl AppState {
    pub fn new(store: SocialStore, auth: AuthConfig) -> Self {
        Self {
            store: Arc::new(store),
            auth,
        }
    }
}
