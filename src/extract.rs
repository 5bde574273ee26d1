// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Salesboard

//! Axum extractors for authenticated principals.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(principal): Auth) -> impl IntoResponse {
//!     // principal is a verified Principal
//! }
//! ```
//!
//! `AdminOnly` additionally runs the authorization guard with
//! [`Role::Admin`](crate::roles::Role). Routing itself lives in the
//! surrounding application; these extractors are the only HTTP-facing
//! surface this crate owns.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::claims::Principal;
use crate::error::AuthError;
use crate::guard;
use crate::roles::Role;
use crate::state::AuthState;

/// Extractor for authenticated principals.
///
/// Validates the bearer token from the Authorization header against the
/// [`TokenValidator`](crate::validator::TokenValidator) in [`AuthState`].
/// A `Principal` already placed in request extensions by upstream
/// middleware takes precedence over re-validation.
pub struct Auth(pub Principal);

impl FromRequestParts<AuthState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AuthState,
    ) -> Result<Self, Self::Rejection> {
        // First check if middleware already authenticated the request
        if let Some(principal) = parts.extensions.get::<Principal>().cloned() {
            return Ok(Auth(principal));
        }

        // Extract Authorization header
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidAuthHeader)?;

        // Extract Bearer token
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidAuthHeader)?;

        let principal = state.validator.authenticate(token.trim()).await?;
        Ok(Auth(principal))
    }
}

/// Extractor that requires admin role.
pub struct AdminOnly(pub Principal);

impl FromRequestParts<AuthState> for AdminOnly {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AuthState,
    ) -> Result<Self, Self::Rejection> {
        let Auth(principal) = Auth::from_request_parts(parts, state).await?;
        guard::require(&principal, Role::Admin)?;
        Ok(AdminOnly(principal))
    }
}
