//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use chrono::{DateTime, Utc};
use kernel::id::{AccountId, ApiKeyId, PartnerId};

use crate::domain::entity::{NewApiKey, NewPartner, Partner, PartnerApiKey};
use crate::error::AdminResult;

/// Account row as seen from the admin directory
///
/// A read-only projection over the identity store; mutation goes through
/// the identity crate.
#[derive(Debug, Clone)]
pub struct AccountSummary {
    pub id: AccountId,
    pub phone: String,
    pub display_name: Option<String>,
    pub status: String,
    pub nida_number: Option<String>,
    pub nida_status: String,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Aggregate counters for the admin overview
#[derive(Debug, Clone, Copy, Default)]
pub struct OverviewCounts {
    pub accounts: i64,
    pub partners: i64,
    pub active_api_keys: i64,
    pub revoked_api_keys: i64,
    pub audit_events_24h: i64,
}

/// Partner repository trait
#[trait_variant::make(PartnerRepository: Send)]
pub trait LocalPartnerRepository {
    /// Register a new partner
    async fn create(&self, partner: &NewPartner) -> AdminResult<Partner>;

    /// Find partner by ID
    async fn find_by_id(&self, partner_id: PartnerId) -> AdminResult<Option<Partner>>;

    /// List all partners, newest first
    async fn list(&self) -> AdminResult<Vec<Partner>>;
}

/// API key repository trait
#[trait_variant::make(ApiKeyRepository: Send)]
pub trait LocalApiKeyRepository {
    /// Persist a freshly generated key
    async fn insert(&self, key: &NewApiKey) -> AdminResult<PartnerApiKey>;

    /// Keys belonging to a partner, newest first
    async fn list_for_partner(&self, partner_id: PartnerId) -> AdminResult<Vec<PartnerApiKey>>;

    /// Stamp a key revoked, returning the updated row.
    ///
    /// Re-revoking refreshes the timestamp rather than failing.
    async fn revoke(&self, key_id: ApiKeyId) -> AdminResult<Option<PartnerApiKey>>;

    /// Non-revoked keys sharing a prefix, each with its partner.
    ///
    /// The prefix is not unique by construction, so callers compare the
    /// presented key's hash against every candidate.
    async fn find_active_by_prefix(
        &self,
        prefix: &str,
    ) -> AdminResult<Vec<(PartnerApiKey, Partner)>>;

    /// Record a successful use of the key
    async fn touch_last_used(&self, key_id: ApiKeyId) -> AdminResult<()>;
}

/// Account directory trait (read-only admin views)
#[trait_variant::make(AccountDirectory: Send)]
pub trait LocalAccountDirectory {
    /// Case-insensitive substring search over id, phone, display name,
    /// and NIDA number; most recent accounts first.
    async fn search(&self, query: Option<&str>, limit: i64) -> AdminResult<Vec<AccountSummary>>;

    /// Single account lookup for the detail view
    async fn find_by_id(&self, account_id: AccountId) -> AdminResult<Option<AccountSummary>>;
}

/// Overview repository trait
#[trait_variant::make(OverviewRepository: Send)]
pub trait LocalOverviewRepository {
    /// Cheap connectivity probe
    async fn ping(&self) -> AdminResult<()>;

    /// Gather the overview counters
    async fn counts(&self) -> AdminResult<OverviewCounts>;
}
