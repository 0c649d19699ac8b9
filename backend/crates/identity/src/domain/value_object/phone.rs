//! Phone Number Value Object
//!
//! Canonical E.164 phone representation for Tanzanian numbers.
//! Registration and lookup both normalize through here, so the same raw
//! input always resolves to the same account.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Tanzania country calling code, without the leading `+`.
const COUNTRY_PREFIX: &str = "255";

/// Phone normalization errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhoneFormatError {
    #[error("phone is required")]
    Empty,

    #[error("phone must be E.164 (+255...) or local (07XXXXXXXX)")]
    InvalidFormat,
}

/// A phone number in canonical `+<countrycode><national number>` form.
///
/// Construction goes through [`PhoneE164::normalize`]; values loaded from
/// storage are already canonical and use [`PhoneE164::from_db`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PhoneE164(String);

impl PhoneE164 {
    /// Normalize a raw user-supplied phone string.
    ///
    /// Rules, in order:
    /// 1. inputs already starting with `+` pass through trimmed
    ///    (intentionally permissive, matching existing data)
    /// 2. all non-digit characters are stripped
    /// 3. `255` + 12 digits total gains a `+`
    /// 4. local trunk `0` + 10 digits total becomes `+255` + rest
    /// 5. anything else is rejected
    pub fn normalize(raw: &str) -> Result<Self, PhoneFormatError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(PhoneFormatError::Empty);
        }

        if raw.starts_with('+') {
            return Ok(Self(raw.to_string()));
        }

        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

        if digits.starts_with(COUNTRY_PREFIX) && digits.len() == 12 {
            return Ok(Self(format!("+{digits}")));
        }

        if digits.starts_with('0') && digits.len() == 10 {
            return Ok(Self(format!("+{COUNTRY_PREFIX}{}", &digits[1..])));
        }

        Err(PhoneFormatError::InvalidFormat)
    }

    /// Wrap a canonical value loaded from storage.
    pub fn from_db(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for PhoneE164 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_format() {
        let phone = PhoneE164::normalize("0712345678").unwrap();
        assert_eq!(phone.as_str(), "+255712345678");
    }

    #[test]
    fn test_country_prefix_without_plus() {
        let phone = PhoneE164::normalize("255712345678").unwrap();
        assert_eq!(phone.as_str(), "+255712345678");
    }

    #[test]
    fn test_plus_passthrough() {
        let phone = PhoneE164::normalize("+255712345678").unwrap();
        assert_eq!(phone.as_str(), "+255712345678");
    }

    #[test]
    fn test_idempotent_on_canonical_input() {
        let once = PhoneE164::normalize("0712345678").unwrap();
        let twice = PhoneE164::normalize(once.as_str()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_separators_are_stripped() {
        let phone = PhoneE164::normalize("0712 345-678").unwrap();
        assert_eq!(phone.as_str(), "+255712345678");

        let phone = PhoneE164::normalize("(255) 712 345 678").unwrap();
        assert_eq!(phone.as_str(), "+255712345678");
    }

    #[test]
    fn test_whitespace_trimmed() {
        let phone = PhoneE164::normalize("  0712345678  ").unwrap();
        assert_eq!(phone.as_str(), "+255712345678");
    }

    #[test]
    fn test_empty_input_fails() {
        assert_eq!(PhoneE164::normalize("").unwrap_err(), PhoneFormatError::Empty);
        assert_eq!(
            PhoneE164::normalize("   ").unwrap_err(),
            PhoneFormatError::Empty
        );
    }

    #[test]
    fn test_malformed_inputs_fail() {
        for input in ["abc", "12345", "07123456789", "071234567", "25571234567"] {
            assert_eq!(
                PhoneE164::normalize(input).unwrap_err(),
                PhoneFormatError::InvalidFormat,
                "input {input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_all_local_numbers_map_to_country_code() {
        for suffix in 0..10u32 {
            let local = format!("071234567{suffix}");
            let phone = PhoneE164::normalize(&local).unwrap();
            assert_eq!(phone.as_str(), format!("+255{}", &local[1..]));
        }
    }
}
