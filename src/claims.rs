// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Salesboard

//! Token claims and the authenticated principal view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::roles::Role;
use crate::store::StoredPrincipal;

/// Declared purpose of a token.
///
/// Access tokens are short-lived and presented on every protected request;
/// refresh tokens are long-lived, carry a unique `jti`, and are only ever
/// exchanged for new access tokens. A token is never accepted for the
/// other purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenPurpose {
    /// Short-lived, presented on every protected request
    Access,
    /// Long-lived, exchanged for new access tokens
    Refresh,
}

impl std::fmt::Display for TokenPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenPurpose::Access => write!(f, "access"),
            TokenPurpose::Refresh => write!(f, "refresh"),
        }
    }
}

/// Claim set embedded in a signed token.
///
/// Immutable once issued; exists only inside a signed token or as a
/// transient decode result. The secret hash never appears here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - the principal's stable identifier (email)
    pub sub: String,

    /// Display name
    pub name: String,

    /// Role at issuance time
    pub role: Role,

    /// Sales region the principal reports under
    pub region: String,

    /// Declared purpose (`access` or `refresh`)
    pub purpose: TokenPurpose,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// Unique token identifier; present on refresh tokens only, used for
    /// targeted revocation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl Claims {
    /// Build an access claim set for a principal.
    pub fn access(principal: &StoredPrincipal, now: DateTime<Utc>, lifetime: chrono::Duration) -> Self {
        Self {
            sub: principal.id.clone(),
            name: principal.name.clone(),
            role: principal.role,
            region: principal.region.clone(),
            purpose: TokenPurpose::Access,
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
            jti: None,
        }
    }

    /// Build a refresh claim set for a principal with a fresh random jti.
    pub fn refresh(principal: &StoredPrincipal, now: DateTime<Utc>, lifetime: chrono::Duration) -> Self {
        Self {
            sub: principal.id.clone(),
            name: principal.name.clone(),
            role: principal.role,
            region: principal.region.clone(),
            purpose: TokenPurpose::Refresh,
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
            jti: Some(Uuid::new_v4().to_string()),
        }
    }
}

/// Authenticated principal derived from a verified access token.
///
/// This is the primary type handed to the HTTP layer to represent the
/// caller of a protected request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Principal {
    /// Stable identifier (email)
    pub id: String,

    /// Display name
    pub name: String,

    /// Role
    pub role: Role,

    /// Sales region
    pub region: String,

    /// Token expiration (Unix timestamp, used for logging, not serialized)
    #[serde(skip)]
    pub expires_at: i64,
}

impl Principal {
    /// Reconstruct the principal view from a verified claim set.
    pub fn from_claims(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            name: claims.name,
            role: claims.role,
            region: claims.region,
            expires_at: claims.exp,
        }
    }

    /// Check if the principal satisfies the required role.
    pub fn has_role(&self, required: Role) -> bool {
        self.role.has_privilege(required)
    }

    /// Check if this principal is an admin.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
