// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Salesboard

//! Salesboard Auth - Token-Based Authentication Core
//!
//! This crate provides credential verification, access/refresh token
//! issuance, token validation, and role-gated authorization for the
//! Salesboard dashboard API.
//!
//! ## Auth Flow
//!
//! 1. HTTP layer calls [`SessionIssuer::login`] with the presented
//!    credentials and returns the [`SessionPair`] to the client
//! 2. Protected requests carry `Authorization: Bearer <access token>`;
//!    the [`Auth`] extractor (or [`TokenValidator::authenticate`]
//!    directly) turns it into a verified [`Principal`]
//! 3. [`guard::require`] gates role-restricted operations
//! 4. Clients exchange the refresh token for new access tokens via
//!    [`SessionIssuer::refresh`]; [`SessionIssuer::logout`] revokes it
//!
//! ## Modules
//!
//! - `claims` - Claim sets and the authenticated principal view
//! - `codec` - Signed token encode/decode (HMAC)
//! - `config` - Authentication settings
//! - `error` - Error taxonomy and HTTP response mapping
//! - `extract` - Axum extractors (`Auth`, `AdminOnly`)
//! - `guard` - Role-gated authorization
//! - `ledger` - Revocation ledger boundary + in-memory implementation
//! - `password` - Secret hashing (bcrypt)
//! - `roles` - Role enumeration
//! - `session` - Login, refresh, logout
//! - `state` - Composition root for the HTTP layer
//! - `store` - Credential store boundary + in-memory implementation
//! - `validator` - Access token validation
//!
//! ## Security
//!
//! - Unknown identifiers and wrong secrets are indistinguishable to callers
//! - Tokens are HMAC-signed with a process-wide key and expire exactly
//! - Inactive principals never receive new tokens
//! - Refresh tokens are individually revocable by jti, or per principal

pub mod claims;
pub mod codec;
pub mod config;
pub mod error;
pub mod extract;
pub mod guard;
pub mod ledger;
pub mod password;
pub mod roles;
pub mod session;
pub mod state;
pub mod store;
pub mod validator;

pub use claims::{Claims, Principal, TokenPurpose};
pub use config::AuthSettings;
pub use error::AuthError;
pub use extract::{AdminOnly, Auth};
pub use ledger::{InMemoryRevocationLedger, RevocationLedger};
pub use roles::Role;
pub use session::{SessionIssuer, SessionPair};
pub use state::AuthState;
pub use store::{CredentialRecord, CredentialStore, InMemoryCredentialStore, StoredPrincipal};
pub use validator::TokenValidator;
