// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Salesboard

//! Role-gated authorization.
//!
//! A request is either unauthenticated or carries a [`Principal`] produced
//! by a successful `authenticate`; there is no third state. `require` is
//! the single decision point: exact role match, or admin override.

use crate::claims::Principal;
use crate::error::AuthError;
use crate::roles::Role;

/// Allow the principal through if it holds the required role.
///
/// Admin satisfies every requirement; any other role must match exactly.
pub fn require(principal: &Principal, minimum_role: Role) -> Result<(), AuthError> {
    if principal.has_role(minimum_role) {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(role: Role) -> Principal {
        Principal {
            id: "user@example.com".to_string(),
            name: "Test User".to_string(),
            role,
            region: "peru".to_string(),
            expires_at: 0,
        }
    }

    #[test]
    fn standard_cannot_pass_an_admin_gate() {
        let err = require(&principal(Role::Standard), Role::Admin).unwrap_err();
        assert!(matches!(err, AuthError::Forbidden));
    }

    #[test]
    fn admin_passes_every_gate() {
        assert!(require(&principal(Role::Admin), Role::Admin).is_ok());
        assert!(require(&principal(Role::Admin), Role::Standard).is_ok());
    }

    #[test]
    fn standard_passes_a_standard_gate() {
        assert!(require(&principal(Role::Standard), Role::Standard).is_ok());
    }
}
