//! Session Entity
//!
//! Server-side session records. The cookie carries only a signed session
//! id; everything else lives in this row and can be revoked server-side.

use chrono::{DateTime, Utc};
use kernel::id::{AccountId, SessionId};

/// A server-side login session
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub account_id: AccountId,
    pub expires_at: DateTime<Utc>,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Data required to open a new session
#[derive(Debug)]
pub struct NewSession {
    pub account_id: AccountId,
    pub expires_at: DateTime<Utc>,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    #[test]
    fn test_is_expired() {
        let now = Utc::now();
        let session = Session {
            id: SessionId::from(Uuid::new_v4()),
            account_id: AccountId::from(Uuid::new_v4()),
            expires_at: now + Duration::hours(12),
            client_ip: None,
            user_agent: None,
            created_at: now,
        };

        assert!(!session.is_expired(now));
        assert!(session.is_expired(now + Duration::hours(12)));
        assert!(session.is_expired(now + Duration::hours(13)));
    }
}
