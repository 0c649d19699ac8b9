//! Roles
//!
//! Roles live in the database and are referenced by a stable string key.
//! The two seeded keys are exposed as constants; deployments may add more
//! rows without code changes.

use serde::Serialize;

/// Default role granted to every self-registered account.
pub const ROLE_CITIZEN: &str = "citizen";

/// Role required for the admin console.
pub const ROLE_PLATFORM_ADMIN: &str = "platform_admin";

/// A role as stored in the `roles` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: i32,
    pub key: String,
    pub name: String,
}

impl Role {
    pub fn is_platform_admin(&self) -> bool {
        self.key == ROLE_PLATFORM_ADMIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_platform_admin() {
        let admin = Role {
            id: 2,
            key: ROLE_PLATFORM_ADMIN.to_string(),
            name: "Platform Administrator".to_string(),
        };
        let citizen = Role {
            id: 1,
            key: ROLE_CITIZEN.to_string(),
            name: "Citizen".to_string(),
        };

        assert!(admin.is_platform_admin());
        assert!(!citizen.is_platform_admin());
    }
}
