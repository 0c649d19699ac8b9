//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::Account;
use crate::domain::value_object::{AccountStatus, NidaStatus, Role};

// ============================================================================
// Account
// ============================================================================

/// Account as returned to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub id: String,
    pub phone: String,
    pub display_name: Option<String>,
    pub status: AccountStatus,
    pub nida_number: Option<String>,
    pub nida_status: NidaStatus,
    pub nida_verification_updated_at: Option<DateTime<Utc>>,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AccountDto {
    pub fn from_account(account: Account, roles: &[Role]) -> Self {
        Self {
            id: account.id.to_string(),
            phone: account.phone.into_string(),
            display_name: account.display_name,
            status: account.status,
            nida_number: account.nida_number.map(|n| n.as_str().to_string()),
            nida_status: account.nida_status,
            nida_verification_updated_at: account.nida_verification_updated_at,
            roles: roles.iter().map(|r| r.key.clone()).collect(),
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

// ============================================================================
// Register
// ============================================================================

/// Register request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub phone: String,
    pub password: String,
    pub display_name: Option<String>,
    pub nida_number: Option<String>,
}

// ============================================================================
// Login
// ============================================================================

/// Login request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
}

/// Successful login response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub account: AccountDto,
}

/// Failed login response
///
/// Sent with 200 OK so that clients distinguish bad credentials from
/// transport or auth-middleware failures.
#[derive(Debug, Clone, Serialize)]
pub struct LoginFailureResponse {
    pub error: &'static str,
}

impl LoginFailureResponse {
    pub fn invalid_credentials() -> Self {
        Self {
            error: "invalid_credentials",
        }
    }
}

// ============================================================================
// Current Account
// ============================================================================

/// GET /me response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    #[serde(flatten)]
    pub account: AccountDto,
    pub session_expires_at: DateTime<Utc>,
}

/// PATCH /me request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::PhoneE164;
    use kernel::id::Id;

    #[test]
    fn test_account_dto_serialization() {
        let now = Utc::now();
        let account = Account {
            id: Id::new(),
            phone: PhoneE164::normalize("0712345678").unwrap(),
            display_name: Some("Asha".to_string()),
            status: AccountStatus::Active,
            nida_number: None,
            nida_status: NidaStatus::NotProvided,
            nida_verification_updated_at: None,
            created_at: now,
            updated_at: now,
        };
        let roles = vec![Role {
            id: 1,
            key: "citizen".to_string(),
            name: "Citizen".to_string(),
        }];

        let dto = AccountDto::from_account(account, &roles);
        let json = serde_json::to_value(&dto).unwrap();

        assert_eq!(json["phone"], "+255712345678");
        assert_eq!(json["displayName"], "Asha");
        assert_eq!(json["status"], "active");
        assert_eq!(json["nidaStatus"], "not_provided");
        assert_eq!(json["roles"][0], "citizen");
    }

    #[test]
    fn test_register_request_camel_case() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"phone":"0712345678","password":"secret123","nidaNumber":"12345678901234567890"}"#,
        )
        .unwrap();

        assert_eq!(req.phone, "0712345678");
        assert_eq!(req.nida_number.as_deref(), Some("12345678901234567890"));
        assert!(req.display_name.is_none());
    }

    #[test]
    fn test_login_failure_body() {
        let json = serde_json::to_value(LoginFailureResponse::invalid_credentials()).unwrap();
        assert_eq!(json["error"], "invalid_credentials");
    }
}
