// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Salesboard

//! Credential store boundary.
//!
//! The auth core never owns user records; it reads them through the
//! [`CredentialStore`] capability. The in-memory implementation below backs
//! tests and the demo deployment, and a persistent implementation is wired
//! in by the composing application at startup.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::AuthError;
use crate::password;
use crate::roles::Role;

/// Principal data owned by the credential store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredPrincipal {
    /// Stable, unique identifier (email)
    pub id: String,
    /// Display name
    pub name: String,
    /// Capability level
    pub role: Role,
    /// Sales region the principal reports under
    pub region: String,
    /// Account status; inactive principals never receive new tokens
    pub active: bool,
}

/// A principal plus its secret hash.
///
/// The hash is write-only from the core's perspective: it is compared
/// against presented secrets and never transmitted, serialized, or logged.
#[derive(Debug, Clone)]
pub struct CredentialRecord {
    pub principal: StoredPrincipal,
    pub secret_hash: String,
}

/// Infrastructure failure inside a collaborator implementation (credential
/// store or revocation ledger).
///
/// "No such identifier" is not an error; it is `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("backend failure: {0}")]
    Backend(String),
}

/// Run a collaborator call under the configured timeout.
///
/// An elapsed timeout surfaces as `AuthError::Unavailable`, the retryable
/// infrastructure outcome; nothing in the core blocks indefinitely on a
/// store or ledger.
pub(crate) async fn with_timeout<T, F>(
    timeout: std::time::Duration,
    fut: F,
) -> Result<T, AuthError>
where
    F: std::future::Future<Output = Result<T, StoreError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result.map_err(AuthError::from),
        Err(_) => Err(AuthError::Unavailable(
            "collaborator call timed out".to_string(),
        )),
    }
}

/// Lookup capability the auth core depends on.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Fetch the credential record for an identifier, or `None` if no such
    /// principal exists.
    async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<CredentialRecord>, StoreError>;
}

/// In-memory credential store for tests and the demo deployment.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    records: RwLock<HashMap<String, CredentialRecord>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the two demo accounts the dashboard ships with.
    ///
    /// - `admin@example.com` / `admin123` (admin)
    /// - `seller@example.com` / `seller123` (standard)
    pub fn demo() -> Result<Self, AuthError> {
        let mut records = HashMap::new();
        for (id, name, secret, role) in [
            ("admin@example.com", "System Administrator", "admin123", Role::Admin),
            ("seller@example.com", "Demo Seller", "seller123", Role::Standard),
        ] {
            records.insert(
                id.to_string(),
                CredentialRecord {
                    principal: StoredPrincipal {
                        id: id.to_string(),
                        name: name.to_string(),
                        role,
                        region: "peru".to_string(),
                        active: true,
                    },
                    secret_hash: password::hash_secret(secret)?,
                },
            );
        }

        Ok(Self {
            records: RwLock::new(records),
        })
    }

    /// Insert or replace a credential record.
    pub async fn insert(&self, record: CredentialRecord) {
        self.records
            .write()
            .await
            .insert(record.principal.id.clone(), record);
    }

    /// Flip a principal's account status. Returns false if unknown.
    pub async fn set_active(&self, identifier: &str, active: bool) -> bool {
        match self.records.write().await.get_mut(identifier) {
            Some(record) => {
                record.principal.active = active;
                true
            }
            None => false,
        }
    }

    /// Change a principal's role. Returns false if unknown.
    pub async fn set_role(&self, identifier: &str, role: Role) -> bool {
        match self.records.write().await.get_mut(identifier) {
            Some(record) => {
                record.principal.role = role;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<CredentialRecord>, StoreError> {
        Ok(self.records.read().await.get(identifier).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, role: Role, active: bool) -> CredentialRecord {
        CredentialRecord {
            principal: StoredPrincipal {
                id: id.to_string(),
                name: "Test User".to_string(),
                role,
                region: "peru".to_string(),
                active,
            },
            secret_hash: password::hash_secret_with_cost("secret", 4).unwrap(),
        }
    }

    #[tokio::test]
    async fn find_returns_none_for_unknown_identifier() {
        let store = InMemoryCredentialStore::new();
        let found = store.find_by_identifier("ghost@example.com").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn insert_then_find_round_trips() {
        let store = InMemoryCredentialStore::new();
        store.insert(record("user@example.com", Role::Standard, true)).await;

        let found = store
            .find_by_identifier("user@example.com")
            .await
            .unwrap()
            .expect("record should exist");
        assert_eq!(found.principal.id, "user@example.com");
        assert!(found.principal.active);
    }

    #[tokio::test]
    async fn set_active_and_set_role_mutate_existing_records() {
        let store = InMemoryCredentialStore::new();
        store.insert(record("user@example.com", Role::Standard, true)).await;

        assert!(store.set_active("user@example.com", false).await);
        assert!(store.set_role("user@example.com", Role::Admin).await);
        assert!(!store.set_active("ghost@example.com", false).await);

        let found = store
            .find_by_identifier("user@example.com")
            .await
            .unwrap()
            .unwrap();
        assert!(!found.principal.active);
        assert_eq!(found.principal.role, Role::Admin);
    }

    #[tokio::test]
    async fn demo_store_seeds_verifiable_accounts() {
        let store = InMemoryCredentialStore::demo().unwrap();
        let admin = store
            .find_by_identifier("admin@example.com")
            .await
            .unwrap()
            .expect("demo admin should exist");
        assert_eq!(admin.principal.role, Role::Admin);
        assert!(password::verify_secret("admin123", &admin.secret_hash));
        assert!(!password::verify_secret("wrong", &admin.secret_hash));
    }
}
