//! Account Status
//!
//! Suspension is an operator action; registration always starts active.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    #[default]
    Active,
    Suspended,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown account status: {0}")]
pub struct UnknownAccountStatus(pub String);

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
        }
    }

    pub fn from_str(value: &str) -> Result<Self, UnknownAccountStatus> {
        match value {
            "active" => Ok(Self::Active),
            "suspended" => Ok(Self::Suspended),
            other => Err(UnknownAccountStatus(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        for status in [AccountStatus::Active, AccountStatus::Suspended] {
            assert_eq!(AccountStatus::from_str(status.as_str()).unwrap(), status);
        }
        assert!(AccountStatus::from_str("frozen").is_err());
    }

    #[test]
    fn test_default_is_active() {
        assert_eq!(AccountStatus::default(), AccountStatus::Active);
    }
}
