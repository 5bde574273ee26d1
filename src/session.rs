// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Salesboard

//! Session issuance: login, refresh, logout.
//!
//! The issuer orchestrates the credential store, the secret hasher, the
//! token codec and the revocation ledger. Unknown identifiers and wrong
//! secrets are deliberately indistinguishable in both the returned error
//! and the logs; account inactivity is only surfaced after the secret
//! verified, since inactivity is not a secret.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::claims::{Claims, TokenPurpose};
use crate::codec::TokenCodec;
use crate::config::AuthSettings;
use crate::error::AuthError;
use crate::ledger::RevocationLedger;
use crate::password;
use crate::store::{with_timeout, CredentialStore};

/// Access/refresh token pair returned by `login` and `refresh`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionPair {
    /// Short-lived access token
    pub access_token: String,
    /// Long-lived refresh token
    pub refresh_token: String,
    /// Always `"bearer"`
    pub token_type: String,
    /// Access token lifetime in seconds, for client convenience
    pub expires_in: i64,
}

/// Issues and ends sessions.
pub struct SessionIssuer {
    settings: AuthSettings,
    codec: TokenCodec,
    store: Arc<dyn CredentialStore>,
    ledger: Arc<dyn RevocationLedger>,
}

impl SessionIssuer {
    /// Build an issuer from explicit settings and collaborators.
    pub fn new(
        settings: AuthSettings,
        store: Arc<dyn CredentialStore>,
        ledger: Arc<dyn RevocationLedger>,
    ) -> Self {
        Self {
            codec: TokenCodec::new(&settings),
            settings,
            store,
            ledger,
        }
    }

    /// Verify credentials and issue an access/refresh token pair.
    pub async fn login(&self, identifier: &str, secret: &str) -> Result<SessionPair, AuthError> {
        let timeout = self.settings.collaborator_timeout;
        let record = with_timeout(timeout, self.store.find_by_identifier(identifier)).await?;

        // Absent record and wrong secret collapse into the same error and
        // the same log event; nothing observable reveals which it was.
        let Some(record) = record else {
            warn!(identifier = %identifier, "login_failed");
            return Err(AuthError::InvalidCredentials);
        };
        if !password::verify_secret(secret, &record.secret_hash) {
            warn!(identifier = %identifier, "login_failed");
            return Err(AuthError::InvalidCredentials);
        }

        if !record.principal.active {
            warn!(user_id = %record.principal.id, "login_inactive");
            return Err(AuthError::AccountInactive);
        }

        let now = Utc::now();
        let access = Claims::access(&record.principal, now, self.settings.access_token_lifetime());
        let refresh =
            Claims::refresh(&record.principal, now, self.settings.refresh_token_lifetime());

        let pair = SessionPair {
            access_token: self.codec.encode(&access)?,
            refresh_token: self.codec.encode(&refresh)?,
            token_type: "bearer".to_string(),
            expires_in: self.settings.access_token_expire_minutes * 60,
        };

        info!(user_id = %record.principal.id, role = %record.principal.role, "login_success");
        Ok(pair)
    }

    /// Exchange a refresh token for a fresh access token.
    ///
    /// The new access claims come from the principal's *current* record,
    /// not the stale refresh claims, so role and status changes take
    /// effect at the next refresh. The refresh token itself is reused
    /// as-is (non-rotating policy).
    pub async fn refresh(&self, refresh_token: &str) -> Result<SessionPair, AuthError> {
        let timeout = self.settings.collaborator_timeout;
        let claims = self.codec.decode(refresh_token)?;

        if claims.purpose != TokenPurpose::Refresh {
            return Err(AuthError::WrongTokenType);
        }
        // Every refresh token is issued with a jti; one without has been
        // forged from an access claim set at best.
        let jti = claims.jti.as_deref().ok_or(AuthError::InvalidToken)?;
        let issued_at = DateTime::from_timestamp(claims.iat, 0).ok_or(AuthError::InvalidToken)?;

        if with_timeout(timeout, self.ledger.is_revoked(jti)).await? {
            return Err(AuthError::TokenRevoked);
        }
        if with_timeout(timeout, self.ledger.is_principal_revoked(&claims.sub, issued_at)).await? {
            return Err(AuthError::TokenRevoked);
        }

        // Re-fetch: the principal may have been deactivated, deleted, or
        // re-roled since the refresh token was minted.
        let record = with_timeout(timeout, self.store.find_by_identifier(&claims.sub)).await?;
        let Some(record) = record else {
            return Err(AuthError::AccountInactive);
        };
        if !record.principal.active {
            return Err(AuthError::AccountInactive);
        }

        let now = Utc::now();
        let access = Claims::access(&record.principal, now, self.settings.access_token_lifetime());

        info!(user_id = %record.principal.id, "token_refreshed");
        Ok(SessionPair {
            access_token: self.codec.encode(&access)?,
            refresh_token: refresh_token.to_string(),
            token_type: "bearer".to_string(),
            expires_in: self.settings.access_token_expire_minutes * 60,
        })
    }

    /// End a session by revoking its refresh token.
    ///
    /// Decode failures are ignored: logging out with a garbage or expired
    /// token is a no-op, not an error. Already-issued access tokens are
    /// unaffected and simply age out, which is why the access lifetime is
    /// kept short.
    pub async fn logout(&self, refresh_token: &str) -> Result<(), AuthError> {
        let Ok(claims) = self.codec.decode(refresh_token) else {
            return Ok(());
        };
        if claims.purpose != TokenPurpose::Refresh {
            return Ok(());
        }
        let (Some(jti), Some(expires_at)) = (claims.jti, DateTime::from_timestamp(claims.exp, 0))
        else {
            return Ok(());
        };

        with_timeout(
            self.settings.collaborator_timeout,
            self.ledger.record(&jti, expires_at),
        )
        .await?;

        info!(user_id = %claims.sub, "logout");
        Ok(())
    }

    /// Revoke every outstanding refresh token for a principal.
    ///
    /// Called by the account layer on password change. Records a
    /// principal-wide cutoff of now; tokens issued from here on are
    /// unaffected.
    pub async fn revoke_principal_sessions(&self, identifier: &str) -> Result<(), AuthError> {
        let now = Utc::now();
        let expires_at = now + self.settings.refresh_token_lifetime();

        with_timeout(
            self.settings.collaborator_timeout,
            self.ledger.record_principal(identifier, now, expires_at),
        )
        .await?;

        info!(user_id = %identifier, "principal_sessions_revoked");
        Ok(())
    }

    /// Codec access for tests.
    #[cfg(test)]
    pub(crate) fn codec(&self) -> &TokenCodec {
        &self.codec
    }
}
