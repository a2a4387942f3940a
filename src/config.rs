// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Gather Project

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Directory holding the embedded database file | `./data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `3000` |
//! | `JWT_SECRET` | HS256 signing secret for bearer tokens | Required |
//! | `JWT_EXPIRES_IN_DAYS` | Token lifetime in days | `90` |
//! | `JWT_COOKIE_EXPIRES_IN_DAYS` | Session cookie lifetime in days | `90` |
//! | `SEED_USERS_FILE` | Optional JSON file of dev users imported at startup | Unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;
use std::path::PathBuf;

/// Environment variable name for the data directory path.
///
/// The embedded database file lives inside this directory. The directory is
/// created at startup if it does not exist.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Environment variable name for the token signing secret.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

/// Environment variable name for the token lifetime (days).
pub const JWT_EXPIRES_IN_DAYS_ENV: &str = "JWT_EXPIRES_IN_DAYS";

/// Environment variable name for the session cookie lifetime (days).
pub const JWT_COOKIE_EXPIRES_IN_DAYS_ENV: &str = "JWT_COOKIE_EXPIRES_IN_DAYS";

/// Environment variable name for the optional dev-data seed file.
pub const SEED_USERS_FILE_ENV: &str = "SEED_USERS_FILE";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("invalid value for {var}: {value}")]
    InvalidVar { var: &'static str, value: String },
}

/// Process configuration resolved from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the embedded database file.
    pub data_dir: PathBuf,
    /// Server bind address.
    pub host: String,
    /// Server bind port.
    pub port: u16,
    /// HS256 signing secret for bearer tokens.
    pub jwt_secret: String,
    /// Bearer token lifetime in days.
    pub jwt_expires_in_days: i64,
    /// Session cookie lifetime in days.
    pub jwt_cookie_expires_in_days: i64,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// `JWT_SECRET` is required; everything else falls back to a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret =
            env::var(JWT_SECRET_ENV).map_err(|_| ConfigError::MissingVar(JWT_SECRET_ENV))?;

        let data_dir = env::var(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = parse_var("PORT", 3000)?;

        let jwt_expires_in_days = parse_var(JWT_EXPIRES_IN_DAYS_ENV, 90)?;
        let jwt_cookie_expires_in_days = parse_var(JWT_COOKIE_EXPIRES_IN_DAYS_ENV, 90)?;

        Ok(Self {
            data_dir,
            host,
            port,
            jwt_secret,
            jwt_expires_in_days,
            jwt_cookie_expires_in_days,
        })
    }
}

fn parse_var<T: std::str::FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidVar { var, value }),
        Err(_) => Ok(default),
    }
}
