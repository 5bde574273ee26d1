// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Salesboard

//! # Runtime Configuration
//!
//! Authentication settings are loaded from the environment at startup and
//! passed into the constructors of [`SessionIssuer`](crate::session::SessionIssuer)
//! and [`TokenValidator`](crate::validator::TokenValidator). There is no
//! process-wide settings singleton; tests build an [`AuthSettings`] directly
//! with a per-test signing key.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_SECRET_KEY` | Symmetric signing key (>= 32 bytes recommended) | Required |
//! | `JWT_ALGORITHM` | Signing algorithm (`HS256`, `HS384`, `HS512`) | `HS256` |
//! | `ACCESS_TOKEN_EXPIRE_MINUTES` | Access token lifetime | `30` |
//! | `REFRESH_TOKEN_EXPIRE_DAYS` | Refresh token lifetime | `7` |
//! | `AUTH_COLLABORATOR_TIMEOUT_MS` | Credential store / ledger call timeout | `5000` |
//! | `AUTH_REVALIDATE_PRINCIPAL` | Re-check the credential store on every `authenticate` | `false` |

use std::env;
use std::time::Duration;

use jsonwebtoken::Algorithm;

/// Environment variable name for the symmetric signing key.
pub const SECRET_KEY_ENV: &str = "JWT_SECRET_KEY";

/// Environment variable name for the signing algorithm identifier.
pub const ALGORITHM_ENV: &str = "JWT_ALGORITHM";

/// Environment variable name for the access token lifetime in minutes.
pub const ACCESS_EXPIRE_ENV: &str = "ACCESS_TOKEN_EXPIRE_MINUTES";

/// Environment variable name for the refresh token lifetime in days.
pub const REFRESH_EXPIRE_ENV: &str = "REFRESH_TOKEN_EXPIRE_DAYS";

/// Environment variable name for the collaborator call timeout in milliseconds.
pub const COLLABORATOR_TIMEOUT_ENV: &str = "AUTH_COLLABORATOR_TIMEOUT_MS";

/// Environment variable name for the per-request principal revalidation flag.
pub const REVALIDATE_PRINCIPAL_ENV: &str = "AUTH_REVALIDATE_PRINCIPAL";

/// Minimum recommended signing key length in bytes.
const RECOMMENDED_KEY_BYTES: usize = 32;

/// Error raised when the environment holds an unusable configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The signing key is missing or empty.
    #[error("{SECRET_KEY_ENV} must be set to a non-empty signing key")]
    MissingSecretKey,
    /// The algorithm identifier is not a symmetric HMAC variant.
    #[error("unsupported signing algorithm: {0} (expected HS256, HS384 or HS512)")]
    UnsupportedAlgorithm(String),
    /// A numeric variable failed to parse.
    #[error("invalid value for {name}: {value}")]
    InvalidNumber { name: &'static str, value: String },
}

/// Authentication settings consumed by the token codec, session issuer and
/// token validator.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// Symmetric signing key for token encode/decode.
    pub secret_key: String,
    /// HMAC signing algorithm.
    pub algorithm: Algorithm,
    /// Access token lifetime in minutes.
    pub access_token_expire_minutes: i64,
    /// Refresh token lifetime in days.
    pub refresh_token_expire_days: i64,
    /// Timeout applied to every credential store and revocation ledger call.
    pub collaborator_timeout: Duration,
    /// Re-fetch the principal from the credential store on every
    /// `authenticate` call. Trades a lookup per request for immediate
    /// pickup of role/status changes; off by default.
    pub revalidate_principal: bool,
}

impl AuthSettings {
    /// Build settings with defaults around the given signing key.
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            algorithm: Algorithm::HS256,
            access_token_expire_minutes: 30,
            refresh_token_expire_days: 7,
            collaborator_timeout: Duration::from_millis(5000),
            revalidate_principal: false,
        }
    }

    /// Load settings from the environment.
    ///
    /// Fails on a missing/empty signing key or an unparseable variable;
    /// everything else falls back to the documented defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret_key = env::var(SECRET_KEY_ENV)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingSecretKey)?;

        if secret_key.len() < RECOMMENDED_KEY_BYTES {
            tracing::warn!(
                key_bytes = secret_key.len(),
                "signing key is shorter than the recommended {} bytes",
                RECOMMENDED_KEY_BYTES
            );
        }

        let algorithm = match env::var(ALGORITHM_ENV).as_deref() {
            Err(_) | Ok("HS256") => Algorithm::HS256,
            Ok("HS384") => Algorithm::HS384,
            Ok("HS512") => Algorithm::HS512,
            Ok(other) => return Err(ConfigError::UnsupportedAlgorithm(other.to_string())),
        };

        let mut settings = Self::new(secret_key);
        settings.algorithm = algorithm;
        settings.access_token_expire_minutes =
            parse_env_number(ACCESS_EXPIRE_ENV, settings.access_token_expire_minutes)?;
        settings.refresh_token_expire_days =
            parse_env_number(REFRESH_EXPIRE_ENV, settings.refresh_token_expire_days)?;

        let timeout_ms = parse_env_number(
            COLLABORATOR_TIMEOUT_ENV,
            settings.collaborator_timeout.as_millis() as i64,
        )?;
        settings.collaborator_timeout = Duration::from_millis(timeout_ms.max(0) as u64);

        settings.revalidate_principal = matches!(
            env::var(REVALIDATE_PRINCIPAL_ENV).as_deref(),
            Ok("1") | Ok("true") | Ok("TRUE")
        );

        Ok(settings)
    }

    /// Access token lifetime as a chrono duration.
    pub fn access_token_lifetime(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.access_token_expire_minutes)
    }

    /// Refresh token lifetime as a chrono duration.
    pub fn refresh_token_lifetime(&self) -> chrono::Duration {
        chrono::Duration::days(self.refresh_token_expire_days)
    }
}

fn parse_env_number(name: &'static str, default: i64) -> Result<i64, ConfigError> {
    match env::var(name) {
        Err(_) => Ok(default),
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { name, value: raw }),
    }
}
