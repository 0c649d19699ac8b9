//! NIDA Verification Status
//!
//! Tracks where an account stands in national-ID verification. Accounts
//! registered without a NIDA number stay at `NotProvided`; supplying one
//! moves the account to `Pending` until an out-of-band check resolves it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Verification state of an account's national ID number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NidaStatus {
    NotProvided,
    Pending,
    Verified,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown nida verification status: {0}")]
pub struct UnknownNidaStatus(pub String);

impl NidaStatus {
    /// Initial status for a new registration.
    pub fn initial(nida_supplied: bool) -> Self {
        if nida_supplied {
            Self::Pending
        } else {
            Self::NotProvided
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotProvided => "not_provided",
            Self::Pending => "pending",
            Self::Verified => "verified",
            Self::Failed => "failed",
        }
    }

    pub fn from_str(value: &str) -> Result<Self, UnknownNidaStatus> {
        match value {
            "not_provided" => Ok(Self::NotProvided),
            "pending" => Ok(Self::Pending),
            "verified" => Ok(Self::Verified),
            "failed" => Ok(Self::Failed),
            other => Err(UnknownNidaStatus(other.to_string())),
        }
    }
}

/// A 20-digit NIDA (National Identification Authority) number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NidaNumber(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("nida number must be exactly 20 digits")]
pub struct InvalidNidaNumber;

impl NidaNumber {
    pub fn new(raw: &str) -> Result<Self, InvalidNidaNumber> {
        let raw = raw.trim();
        if raw.len() == 20 && raw.chars().all(|c| c.is_ascii_digit()) {
            Ok(Self(raw.to_string()))
        } else {
            Err(InvalidNidaNumber)
        }
    }

    /// Wrap a value already validated at write time.
    pub fn from_db(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_status() {
        assert_eq!(NidaStatus::initial(true), NidaStatus::Pending);
        assert_eq!(NidaStatus::initial(false), NidaStatus::NotProvided);
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            NidaStatus::NotProvided,
            NidaStatus::Pending,
            NidaStatus::Verified,
            NidaStatus::Failed,
        ] {
            assert_eq!(NidaStatus::from_str(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn test_unknown_status_rejected() {
        let err = NidaStatus::from_str("bogus").unwrap_err();
        assert_eq!(err.0, "bogus");
    }

    #[test]
    fn test_nida_number_validation() {
        assert!(NidaNumber::new("12345678901234567890").is_ok());
        assert!(NidaNumber::new(" 12345678901234567890 ").is_ok());
        assert!(NidaNumber::new("1234567890123456789").is_err());
        assert!(NidaNumber::new("123456789012345678901").is_err());
        assert!(NidaNumber::new("1234567890123456789x").is_err());
        assert!(NidaNumber::new("").is_err());
    }
}
