// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Salesboard

//! Access token validation.
//!
//! `authenticate` runs once per protected request: decode, check the
//! declared purpose, and rebuild the principal view from the claims. By
//! default no collaborator is touched, so validation is pure computation;
//! the `revalidate_principal` setting trades a credential-store lookup per
//! request for immediate pickup of role and status changes.

use std::sync::Arc;

use tracing::warn;

use crate::claims::{Principal, TokenPurpose};
use crate::codec::TokenCodec;
use crate::config::AuthSettings;
use crate::error::AuthError;
use crate::store::{with_timeout, CredentialStore};

/// Validates presented access tokens.
pub struct TokenValidator {
    settings: AuthSettings,
    codec: TokenCodec,
    store: Arc<dyn CredentialStore>,
}

impl TokenValidator {
    /// Build a validator from explicit settings and the credential store.
    pub fn new(settings: AuthSettings, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            codec: TokenCodec::new(&settings),
            settings,
            store,
        }
    }

    /// Verify an access token and return the authenticated principal.
    pub async fn authenticate(&self, token: &str) -> Result<Principal, AuthError> {
        let claims = self.codec.decode(token).map_err(|e| {
            warn!(error = %e, "token_rejected");
            AuthError::from(e)
        })?;

        if claims.purpose != TokenPurpose::Access {
            return Err(AuthError::WrongTokenType);
        }

        if self.settings.revalidate_principal {
            let record = with_timeout(
                self.settings.collaborator_timeout,
                self.store.find_by_identifier(&claims.sub),
            )
            .await?;
            match record {
                Some(record) if record.principal.active => {}
                _ => return Err(AuthError::AccountInactive),
            }
        }

        Ok(Principal::from_claims(claims))
    }
}
