//! Permission levels
//!
//! Admin rights come from a configured email allow-list, assigned into
//! the session token at login. There is no in-band escalation path.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Permission levels for API operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum PermissionLevel {
    /// No authentication - registration, login, health probes
    #[default]
    Public = 0,
    /// Authenticated user - own ledger, submissions, purchases, chat
    Authenticated = 1,
    /// Admin - review queue, catalog management, credit adjustments
    Admin = 2,
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PermissionLevel::Public => write!(f, "PUBLIC"),
            PermissionLevel::Authenticated => write!(f, "AUTHENTICATED"),
            PermissionLevel::Admin => write!(f, "ADMIN"),
        }
    }
}

/// Permission level granted to an email at login.
///
/// Matching is case-insensitive against the configured allow-list.
pub fn level_for_email(email: &str, admin_emails: &[String]) -> PermissionLevel {
    let email = email.to_lowercase();
    if admin_emails.iter().any(|admin| admin == &email) {
        PermissionLevel::Admin
    } else {
        PermissionLevel::Authenticated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admins() -> Vec<String> {
        vec!["ops@grove.io".to_string(), "reviewer@grove.io".to_string()]
    }

    #[test]
    fn test_allow_listed_email_is_admin() {
        assert_eq!(
            level_for_email("ops@grove.io", &admins()),
            PermissionLevel::Admin
        );
    }

    #[test]
    fn test_match_is_case_insensitive() {
        assert_eq!(
            level_for_email("Ops@Grove.IO", &admins()),
            PermissionLevel::Admin
        );
    }

    #[test]
    fn test_other_emails_are_authenticated() {
        assert_eq!(
            level_for_email("user@example.com", &admins()),
            PermissionLevel::Authenticated
        );
        // Substrings are not enough; "admin" in the local part grants nothing
        assert_eq!(
            level_for_email("admin@example.com", &admins()),
            PermissionLevel::Authenticated
        );
    }

    #[test]
    fn test_permission_ordering() {
        assert!(PermissionLevel::Admin > PermissionLevel::Authenticated);
        assert!(PermissionLevel::Authenticated > PermissionLevel::Public);
    }
}
