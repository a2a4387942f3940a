// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Gather Project

//! Session cookie handling.
//!
//! The session cookie mirrors the bearer token so browser clients stay
//! logged in without managing the Authorization header themselves. Logout
//! overwrites the cookie with a sentinel value that expires almost
//! immediately; it does not invalidate the token server-side.

use chrono::{DateTime, Duration, Utc};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "jwt";

/// Value written on logout. Never verifies as a token.
pub const LOGOUT_SENTINEL: &str = "loggedout";

/// Lifetime of the logout sentinel cookie.
const LOGOUT_TTL_SECONDS: i64 = 10;

/// Format a timestamp as an RFC 7231 HTTP date for the Expires attribute.
fn http_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Build the Set-Cookie value carrying a freshly issued token.
pub fn session_cookie(token: &str, ttl_days: i64) -> String {
    let expires = Utc::now() + Duration::days(ttl_days);
    format!(
        "{SESSION_COOKIE}={token}; Expires={}; Path=/; HttpOnly",
        http_date(expires)
    )
}

/// Build the Set-Cookie value that logs the session out.
pub fn logout_cookie() -> String {
    let expires = Utc::now() + Duration::seconds(LOGOUT_TTL_SECONDS);
    format!(
        "{SESSION_COOKIE}={LOGOUT_SENTINEL}; Expires={}; Path=/; HttpOnly",
        http_date(expires)
    )
}

/// Extract the session token from a Cookie request header value.
pub fn token_from_cookie_header(header: &str) -> Option<&str> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|pair| {
            pair.strip_prefix(SESSION_COOKIE)
                .and_then(|rest| rest.strip_prefix('='))
        })
        .filter(|token| !token.is_empty())
}
