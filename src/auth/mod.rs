// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Gather Project

//! # Authentication Module
//!
//! Credential verification and the per-request access guard.
//!
//! ## Auth Flow
//!
//! 1. `POST /api/authenticate` checks the password against the stored
//!    bcrypt hash and issues a signed HS256 token; the same token is
//!    mirrored into the `jwt` session cookie.
//! 2. Subsequent requests carry the token in `Authorization: Bearer ...`
//!    or the session cookie (the header takes precedence).
//! 3. The [`Auth`] extractor verifies signature and expiry, then resolves
//!    the encoded user id to a live user record; deactivated users are
//!    rejected even while their tokens are formally valid.
//!
//! Logout only overwrites the cookie with a short-lived sentinel; issued
//! tokens stay valid until natural expiry.

pub mod error;
pub mod extractor;
pub mod session;
pub mod tokens;

pub use error::AuthError;
pub use extractor::{Auth, AuthenticatedUser};
pub use tokens::{sign_token, verify_token, TokenClaims};
