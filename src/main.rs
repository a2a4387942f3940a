// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Gather Project

use std::{env, fs, net::SocketAddr, path::Path};

use serde::Deserialize;
use tokio::signal;

use gather_server::{
    api::router,
    config::{Config, SEED_USERS_FILE_ENV},
    state::{AppState, AuthConfig},
    storage::{NewUser, SocialStore, StoreError, UserRepository},
};

#[tokio::main]
async fn main() {
    init_tracing();

    let config = Config::from_env().expect("Failed to load configuration");

    let store = SocialStore::open(&config.data_dir).expect("Failed to open data store");

    // Import development users if a seed file is configured
    if let Ok(path) = env::var(SEED_USERS_FILE_ENV) {
        seed_users(&store, Path::new(&path));
    }

    let state = AppState::new(store, AuthConfig::from(&config));
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Failed to parse bind address");

    tracing::info!("Gather server listening on http://{addr} (docs at /docs)");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("HTTP server failed");
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=debug"));

    if env::var("LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// A development user as read from the seed file.
#[derive(Debug, Deserialize)]
struct SeedUser {
    full_name: String,
    email: String,
    password: String,
    #[serde(default)]
    profile_picture: Option<String>,
}

/// Import users from a JSON seed file. Users whose email already exists are
/// skipped so the import stays idempotent across restarts.
fn seed_users(store: &SocialStore, path: &Path) {
    let raw = fs::read_to_string(path).expect("Failed to read seed users file");
    let seeds: Vec<SeedUser> = serde_json::from_str(&raw).expect("Failed to parse seed users file");

    let repo = UserRepository::new(store);
    let mut imported = 0usize;
    for seed in seeds {
        let password_hash =
            bcrypt::hash(&seed.password, bcrypt::DEFAULT_COST).expect("Failed to hash password");
        match repo.create(NewUser {
            full_name: seed.full_name,
            email: seed.email,
            password_hash,
            profile_picture: seed.profile_picture,
        }) {
            Ok(_) => imported += 1,
            Err(StoreError::AlreadyExists(_)) => {}
            Err(e) => panic!("Failed to import seed user: {e}"),
        }
    }
    tracing::info!(imported, "seed users imported");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received, closing listener");
}
