//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use identity::domain::value_object::Role;

use crate::application::overview::Overview;
use crate::domain::entity::{IssuedKey, Partner, PartnerApiKey, PartnerStatus};
use crate::domain::repository::AccountSummary;

// ============================================================================
// Partners
// ============================================================================

/// Partner as returned to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerDto {
    pub id: String,
    pub name: String,
    pub status: PartnerStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Partner> for PartnerDto {
    fn from(partner: Partner) -> Self {
        Self {
            id: partner.id.to_string(),
            name: partner.name,
            status: partner.status,
            created_at: partner.created_at,
            updated_at: partner.updated_at,
        }
    }
}

/// Create partner request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePartnerRequest {
    pub name: String,
}

// ============================================================================
// API Keys
// ============================================================================

/// API key metadata as returned to clients. Never carries the hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyDto {
    pub id: String,
    pub partner_id: String,
    pub prefix: String,
    pub label: Option<String>,
    pub revoked: bool,
    pub revoked_at: Option<DateTime<Utc>>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<PartnerApiKey> for ApiKeyDto {
    fn from(key: PartnerApiKey) -> Self {
        Self {
            id: key.id.to_string(),
            partner_id: key.partner_id.to_string(),
            prefix: key.prefix,
            label: key.label,
            revoked: key.revoked_at.is_some(),
            revoked_at: key.revoked_at,
            last_used_at: key.last_used_at,
            created_at: key.created_at,
        }
    }
}

/// Issue key request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueKeyRequest {
    pub label: Option<String>,
}

/// Issue key response: the only response that ever carries the plaintext
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueKeyResponse {
    pub api_key: String,
    pub key: ApiKeyDto,
}

impl From<IssuedKey> for IssueKeyResponse {
    fn from(issued: IssuedKey) -> Self {
        Self {
            api_key: issued.plaintext,
            key: issued.api_key.into(),
        }
    }
}

// ============================================================================
// Account Directory
// ============================================================================

/// Account search query parameters
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchAccountsQuery {
    pub q: Option<String>,
    pub limit: Option<i64>,
}

/// Account row in admin search results
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummaryDto {
    pub id: String,
    pub phone: String,
    pub display_name: Option<String>,
    pub status: String,
    pub nida_number: Option<String>,
    pub nida_status: String,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<AccountSummary> for AccountSummaryDto {
    fn from(summary: AccountSummary) -> Self {
        Self {
            id: summary.id.to_string(),
            phone: summary.phone,
            display_name: summary.display_name,
            status: summary.status,
            nida_number: summary.nida_number,
            nida_status: summary.nida_status,
            roles: summary.roles,
            created_at: summary.created_at,
        }
    }
}

// ============================================================================
// Roles
// ============================================================================

/// Role mutation request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleMutationRequest {
    pub role: String,
}

/// Post-mutation role list
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RolesResponse {
    pub roles: Vec<Role>,
}

// ============================================================================
// Overview
// ============================================================================

/// Dashboard overview response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewResponse {
    pub status: &'static str,
    pub accounts: i64,
    pub partners: i64,
    pub active_api_keys: i64,
    pub revoked_api_keys: i64,
    pub audit_events_24h: i64,
}

impl From<Overview> for OverviewResponse {
    fn from(overview: Overview) -> Self {
        Self {
            status: overview.status.as_str(),
            accounts: overview.counts.accounts,
            partners: overview.counts.partners,
            active_api_keys: overview.counts.active_api_keys,
            revoked_api_keys: overview.counts.revoked_api_keys,
            audit_events_24h: overview.counts.audit_events_24h,
        }
    }
}

// ============================================================================
// Partner Self-Service
// ============================================================================

/// GET /v1/partner/me response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerMeResponse {
    pub partner: PartnerDto,
    pub key: ApiKeyDto,
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::id::Id;

    #[test]
    fn test_api_key_dto_never_exposes_hash() {
        let now = Utc::now();
        let dto: ApiKeyDto = PartnerApiKey {
            id: Id::new(),
            partner_id: Id::new(),
            prefix: "ph_abcdefg".to_string(),
            key_hash: "deadbeef".repeat(8),
            label: None,
            revoked_at: None,
            last_used_at: None,
            created_at: now,
        }
        .into();

        let json = serde_json::to_string(&dto).unwrap();
        assert!(!json.contains("deadbeef"));
        assert!(json.contains("ph_abcdefg"));
    }

    #[test]
    fn test_search_and_role_wire_names() {
        let query: SearchAccountsQuery = serde_json::from_str(r#"{"q":"0712","limit":10}"#).unwrap();
        assert_eq!(query.q.as_deref(), Some("0712"));
        assert_eq!(query.limit, Some(10));

        let req: RoleMutationRequest =
            serde_json::from_str(r#"{"role":"platform_admin"}"#).unwrap();
        assert_eq!(req.role, "platform_admin");
    }

    #[test]
    fn test_partner_dto_carries_status() {
        let now = Utc::now();
        let dto = PartnerDto::from(Partner {
            id: Id::new(),
            name: "Posta Wallet".to_string(),
            status: PartnerStatus::Suspended,
            created_at: now,
            updated_at: now,
        });

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["status"], "suspended");
    }

    #[test]
    fn test_overview_response_shape() {
        let overview = Overview {
            status: crate::application::PlatformStatus::Error,
            counts: Default::default(),
        };
        let json = serde_json::to_value(OverviewResponse::from(overview)).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["accounts"], 0);
        assert!(json.get("activeApiKeys").is_some());
    }
}
