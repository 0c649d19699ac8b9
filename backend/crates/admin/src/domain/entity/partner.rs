//! Partner Entity

use chrono::{DateTime, Utc};
use kernel::id::PartnerId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An external organization integrating against the platform API
#[derive(Debug, Clone)]
pub struct Partner {
    pub id: PartnerId,
    pub name: String,
    pub status: PartnerStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Suspension is an operator action; registration always starts active.
/// A suspended partner's API keys stop verifying without being revoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartnerStatus {
    #[default]
    Active,
    Suspended,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown partner status: {0}")]
pub struct UnknownPartnerStatus(pub String);

impl PartnerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
        }
    }

    pub fn from_str(value: &str) -> Result<Self, UnknownPartnerStatus> {
        match value {
            "active" => Ok(Self::Active),
            "suspended" => Ok(Self::Suspended),
            other => Err(UnknownPartnerStatus(other.to_string())),
        }
    }
}

/// Data required to register a new partner
#[derive(Debug)]
pub struct NewPartner {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [PartnerStatus::Active, PartnerStatus::Suspended] {
            assert_eq!(PartnerStatus::from_str(status.as_str()).unwrap(), status);
        }
        assert!(PartnerStatus::from_str("dormant").is_err());
    }

    #[test]
    fn test_default_is_active() {
        assert_eq!(PartnerStatus::default(), PartnerStatus::Active);
    }
}
