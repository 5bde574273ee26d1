// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Salesboard

//! Revocation ledger boundary.
//!
//! Refresh tokens are the only long-lived credential this core issues, so
//! they are the only revocable one. The ledger tracks two kinds of entry:
//!
//! - **jti entries** - a single refresh token invalidated by `logout`
//! - **principal entries** - a cutoff timestamp for one principal; every
//!   refresh token issued at or before the cutoff is dead (password change)
//!
//! Entries carry an expiry equal to the token lifetime they cover, so the
//! ledger can discard them once the tokens they block have expired anyway.
//! A `logout` racing an in-flight `refresh` of the same token may let that
//! one refresh through; the issued access token still dies within the
//! access-token lifetime.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::store::StoreError;

/// Revocation tracking capability for refresh tokens.
#[async_trait]
pub trait RevocationLedger: Send + Sync {
    /// Record a revoked refresh-token jti. `expires_at` is the token's own
    /// expiry; the entry is prunable after that instant.
    async fn record(&self, jti: &str, expires_at: DateTime<Utc>) -> Result<(), StoreError>;

    /// Check whether a jti has been revoked.
    async fn is_revoked(&self, jti: &str) -> Result<bool, StoreError>;

    /// Record a principal-wide cutoff: refresh tokens for `identifier`
    /// issued at or before `cutoff` are revoked. `expires_at` bounds how
    /// long the entry must be kept.
    async fn record_principal(
        &self,
        identifier: &str,
        cutoff: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Check whether a principal-wide cutoff covers a token issued at
    /// `issued_at`.
    async fn is_principal_revoked(
        &self,
        identifier: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<bool, StoreError>;
}

#[derive(Debug, Clone, Copy)]
struct PrincipalEntry {
    cutoff: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

/// In-memory revocation ledger.
///
/// Entries are pruned lazily on insert; a deployment fronting many
/// instances swaps this for a shared implementation behind the same trait.
#[derive(Default)]
pub struct InMemoryRevocationLedger {
    jtis: RwLock<HashMap<String, DateTime<Utc>>>,
    principals: RwLock<HashMap<String, PrincipalEntry>>,
}

impl InMemoryRevocationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live jti entries (prunes first).
    pub async fn len(&self) -> usize {
        let now = Utc::now();
        let mut jtis = self.jtis.write().await;
        jtis.retain(|_, expires_at| *expires_at > now);
        jtis.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl RevocationLedger for InMemoryRevocationLedger {
    async fn record(&self, jti: &str, expires_at: DateTime<Utc>) -> Result<(), StoreError> {
        let now = Utc::now();
        let mut jtis = self.jtis.write().await;
        jtis.retain(|_, entry_expiry| *entry_expiry > now);
        jtis.insert(jti.to_string(), expires_at);
        Ok(())
    }

    async fn is_revoked(&self, jti: &str) -> Result<bool, StoreError> {
        let now = Utc::now();
        let jtis = self.jtis.read().await;
        Ok(matches!(jtis.get(jti), Some(expires_at) if *expires_at > now))
    }

    async fn record_principal(
        &self,
        identifier: &str,
        cutoff: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let now = Utc::now();
        let mut principals = self.principals.write().await;
        principals.retain(|_, entry| entry.expires_at > now);

        // A later cutoff supersedes an earlier one.
        let entry = PrincipalEntry { cutoff, expires_at };
        principals
            .entry(identifier.to_string())
            .and_modify(|existing| {
                if entry.cutoff > existing.cutoff {
                    *existing = entry;
                }
            })
            .or_insert(entry);
        Ok(())
    }

    async fn is_principal_revoked(
        &self,
        identifier: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let now = Utc::now();
        let principals = self.principals.read().await;
        Ok(matches!(
            principals.get(identifier),
            Some(entry) if entry.expires_at > now && issued_at <= entry.cutoff
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn recorded_jti_reads_back_revoked() {
        let ledger = InMemoryRevocationLedger::new();
        let expiry = Utc::now() + Duration::days(7);

        assert!(!ledger.is_revoked("jti-1").await.unwrap());
        ledger.record("jti-1", expiry).await.unwrap();
        assert!(ledger.is_revoked("jti-1").await.unwrap());
        assert!(!ledger.is_revoked("jti-2").await.unwrap());
    }

    #[tokio::test]
    async fn expired_entries_stop_counting_and_get_pruned() {
        let ledger = InMemoryRevocationLedger::new();
        ledger
            .record("stale", Utc::now() - Duration::seconds(1))
            .await
            .unwrap();

        assert!(!ledger.is_revoked("stale").await.unwrap());
        // Next write sweeps the dead entry out.
        ledger
            .record("live", Utc::now() + Duration::days(1))
            .await
            .unwrap();
        assert_eq!(ledger.len().await, 1);
    }

    #[tokio::test]
    async fn principal_cutoff_covers_earlier_issuance_only() {
        let ledger = InMemoryRevocationLedger::new();
        let cutoff = Utc::now();
        ledger
            .record_principal("user@example.com", cutoff, cutoff + Duration::days(7))
            .await
            .unwrap();

        let before = cutoff - Duration::minutes(5);
        let after = cutoff + Duration::minutes(5);
        assert!(ledger
            .is_principal_revoked("user@example.com", before)
            .await
            .unwrap());
        assert!(!ledger
            .is_principal_revoked("user@example.com", after)
            .await
            .unwrap());
        assert!(!ledger
            .is_principal_revoked("other@example.com", before)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn later_principal_cutoff_supersedes_earlier() {
        let ledger = InMemoryRevocationLedger::new();
        let first = Utc::now();
        let second = first + Duration::hours(1);
        let expiry = first + Duration::days(7);

        ledger
            .record_principal("user@example.com", second, expiry)
            .await
            .unwrap();
        // An older cutoff must not narrow the revocation window.
        ledger
            .record_principal("user@example.com", first, expiry)
            .await
            .unwrap();

        assert!(ledger
            .is_principal_revoked("user@example.com", first + Duration::minutes(30))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn concurrent_records_and_lookups_do_not_lose_entries() {
        use std::sync::Arc;

        let ledger = Arc::new(InMemoryRevocationLedger::new());
        let expiry = Utc::now() + Duration::days(1);

        let mut handles = Vec::new();
        for i in 0..16 {
            let ledger = Arc::clone(&ledger);
            handles.push(tokio::spawn(async move {
                ledger.record(&format!("jti-{i}"), expiry).await.unwrap();
                assert!(ledger.is_revoked(&format!("jti-{i}")).await.unwrap());
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(ledger.len().await, 16);
    }
}
