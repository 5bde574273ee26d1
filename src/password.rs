// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Salesboard

//! Secret hashing and verification.
//!
//! Secrets are stored as bcrypt hashes: randomly salted, deliberately slow,
//! one-way. No plaintext survives past this boundary, and verification of a
//! malformed hash is reported as a mismatch rather than an error.

use crate::error::AuthError;

/// Hash a secret with bcrypt at the default work factor.
pub fn hash_secret(secret: &str) -> Result<String, AuthError> {
    hash_secret_with_cost(secret, bcrypt::DEFAULT_COST)
}

/// Hash a secret with an explicit bcrypt cost.
///
/// Provisioning tools and tests pick their own work factor; everything else
/// should go through [`hash_secret`].
pub fn hash_secret_with_cost(secret: &str, cost: u32) -> Result<String, AuthError> {
    bcrypt::hash(secret, cost).map_err(|e| AuthError::Internal(format!("bcrypt hash failed: {e}")))
}

/// Verify a presented secret against a stored bcrypt hash.
///
/// A malformed or truncated stored hash verifies false. bcrypt's comparison
/// does not short-circuit on the first mismatching byte.
pub fn verify_secret(secret: &str, stored_hash: &str) -> bool {
    bcrypt::verify(secret, stored_hash).unwrap_or(false)
}
