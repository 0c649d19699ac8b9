//! Partner API Key Entity
//!
//! Only a SHA-256 hash of the key is stored; the plaintext exists once,
//! in the issuance response. The prefix column keeps keys identifiable
//! in listings without exposing anything usable.

use chrono::{DateTime, Utc};
use kernel::id::{ApiKeyId, PartnerId};

/// A stored partner API key (hash only, never plaintext)
#[derive(Debug, Clone)]
pub struct PartnerApiKey {
    pub id: ApiKeyId,
    pub partner_id: PartnerId,
    /// First characters of the plaintext, for display
    pub prefix: String,
    /// SHA-256 hex digest of the full plaintext
    pub key_hash: String,
    pub label: Option<String>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl PartnerApiKey {
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }
}

/// Data required to persist a freshly generated key
#[derive(Debug)]
pub struct NewApiKey {
    pub partner_id: PartnerId,
    pub prefix: String,
    pub key_hash: String,
    pub label: Option<String>,
}

/// An issued key: the stored record plus the one-time plaintext
#[derive(Debug)]
pub struct IssuedKey {
    pub api_key: PartnerApiKey,
    /// Shown to the caller exactly once
    pub plaintext: String,
}
