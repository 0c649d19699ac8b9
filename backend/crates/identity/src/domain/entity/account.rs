//! Account Entity

use chrono::{DateTime, Utc};
use kernel::id::AccountId;

use crate::domain::value_object::{AccountStatus, NidaNumber, NidaStatus, PhoneE164};

/// A registered account, keyed by phone identity
#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    pub phone: PhoneE164,
    pub display_name: Option<String>,
    pub status: AccountStatus,
    pub nida_number: Option<NidaNumber>,
    pub nida_status: NidaStatus,
    pub nida_verification_updated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new account
///
/// `nida_status` is derived from whether a NIDA number was supplied;
/// callers never pick it directly.
#[derive(Debug)]
pub struct NewAccount {
    pub phone: PhoneE164,
    pub display_name: Option<String>,
    pub nida_number: Option<NidaNumber>,
}

impl NewAccount {
    pub fn nida_status(&self) -> NidaStatus {
        NidaStatus::initial(self.nida_number.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account_nida_status() {
        let without = NewAccount {
            phone: PhoneE164::normalize("0712345678").unwrap(),
            display_name: None,
            nida_number: None,
        };
        assert_eq!(without.nida_status(), NidaStatus::NotProvided);

        let with = NewAccount {
            phone: PhoneE164::normalize("0712345678").unwrap(),
            display_name: Some("Asha".to_string()),
            nida_number: Some(NidaNumber::new("12345678901234567890").unwrap()),
        };
        assert_eq!(with.nida_status(), NidaStatus::Pending);
    }
}
