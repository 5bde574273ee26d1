// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Salesboard

//! User roles for authorization.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User roles for authorization.
///
/// ## Role Semantics
///
/// - `Admin` - Full access; satisfies every role requirement
/// - `Standard` - Normal dashboard user
///
/// Comparison is exact-match-or-admin-override, not a hierarchy. If richer
/// privilege levels are ever needed, this enum should become totally
/// ordered rather than grow more special cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full administrative access
    Admin,
    /// Normal dashboard user
    Standard,
}

impl Role {
    /// Check if this role satisfies the required role.
    pub fn has_privilege(&self, required: Role) -> bool {
        match (self, required) {
            // Admin can do anything
            (Role::Admin, _) => true,
            // Standard can do Standard things
            (Role::Standard, Role::Standard) => true,
            // Everything else is denied
            _ => false,
        }
    }

    /// Parse role from string (case-insensitive).
    pub fn from_str(s: &str) -> Option<Role> {
        match s.to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "standard" => Some(Role::Standard),
            _ => None,
        }
    }
}

impl Default for Role {
    /// Default role is Standard (least privilege).
    fn default() -> Self {
        Role::Standard
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Standard => write!(f, "standard"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_has_all_privileges() {
        assert!(Role::Admin.has_privilege(Role::Admin));
        assert!(Role::Admin.has_privilege(Role::Standard));
    }

    #[test]
    fn standard_only_has_standard_privilege() {
        assert!(!Role::Standard.has_privilege(Role::Admin));
        assert!(Role::Standard.has_privilege(Role::Standard));
    }

    #[test]
    fn from_str_parses_correctly() {
        assert_eq!(Role::from_str("admin"), Some(Role::Admin));
        assert_eq!(Role::from_str("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::from_str("Standard"), Some(Role::Standard));
        assert_eq!(Role::from_str("unknown"), None);
    }

    #[test]
    fn default_role_is_standard() {
        assert_eq!(Role::default(), Role::Standard);
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), r#""admin""#);
        assert_eq!(
            serde_json::from_str::<Role>(r#""standard""#).unwrap(),
            Role::Standard
        );
    }
}
