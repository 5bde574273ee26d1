// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Salesboard

//! Composition root handed to the HTTP layer.

use std::sync::Arc;

use crate::config::AuthSettings;
use crate::ledger::RevocationLedger;
use crate::session::SessionIssuer;
use crate::store::CredentialStore;
use crate::validator::TokenValidator;

/// Shared authentication state.
///
/// Built once at startup from explicit settings and the two collaborator
/// implementations, then cloned into the router. Cheap to clone; the
/// components are stateless per call.
#[derive(Clone)]
pub struct AuthState {
    pub issuer: Arc<SessionIssuer>,
    pub validator: Arc<TokenValidator>,
}

impl AuthState {
    /// Wire the issuer and validator around shared collaborators.
    pub fn new(
        settings: AuthSettings,
        store: Arc<dyn CredentialStore>,
        ledger: Arc<dyn RevocationLedger>,
    ) -> Self {
        Self {
            issuer: Arc::new(SessionIssuer::new(
                settings.clone(),
                Arc::clone(&store),
                ledger,
            )),
            validator: Arc::new(TokenValidator::new(settings, store)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::InMemoryRevocationLedger;
    use crate::store::InMemoryCredentialStore;

    #[tokio::test]
    async fn state_is_cloneable_and_shares_components() {
        let state = AuthState::new(
            AuthSettings::new("state-test-signing-key-0123456789"),
            Arc::new(InMemoryCredentialStore::new()),
            Arc::new(InMemoryRevocationLedger::new()),
        );
        let clone = state.clone();
        assert!(Arc::ptr_eq(&state.validator, &clone.validator));
        assert!(Arc::ptr_eq(&state.issuer, &clone.issuer));
    }
}
