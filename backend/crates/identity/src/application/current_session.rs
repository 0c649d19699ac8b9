//! Current Session Use Case
//!
//! Resolves a signed cookie token to the authenticated account and its
//! roles. This is the single path the session guard and `/me` share.

use std::sync::Arc;

use crate::application::config::IdentityConfig;
use crate::application::session_token;
use crate::domain::entity::{Account, Session};
use crate::domain::repository::{AccountRepository, RoleRepository, SessionRepository};
use crate::domain::value_object::Role;
use crate::error::{IdentityError, IdentityResult};

/// The authenticated caller, as resolved from a session cookie
#[derive(Debug, Clone)]
pub struct CurrentAccount {
    pub account: Account,
    pub roles: Vec<Role>,
    pub session: Session,
}

impl CurrentAccount {
    /// Whether the account holds any of the given role keys
    pub fn has_any_role(&self, required: &[&str]) -> bool {
        self.roles.iter().any(|r| required.contains(&r.key.as_str()))
    }
}

/// Current session use case
pub struct CurrentSessionUseCase<A, R, S>
where
    A: AccountRepository,
    R: RoleRepository,
    S: SessionRepository,
{
    account_repo: Arc<A>,
    role_repo: Arc<R>,
    session_repo: Arc<S>,
    config: Arc<IdentityConfig>,
}

impl<A, R, S> CurrentSessionUseCase<A, R, S>
where
    A: AccountRepository,
    R: RoleRepository,
    S: SessionRepository,
{
    pub fn new(
        account_repo: Arc<A>,
        role_repo: Arc<R>,
        session_repo: Arc<S>,
        config: Arc<IdentityConfig>,
    ) -> Self {
        Self {
            account_repo,
            role_repo,
            session_repo,
            config,
        }
    }

    /// Resolve a cookie token to the current account.
    ///
    /// Fails with `AuthenticationRequired` for any token that does not map
    /// to a live session backed by an existing account.
    pub async fn execute(&self, session_token: Option<&str>) -> IdentityResult<CurrentAccount> {
        let token = session_token.ok_or(IdentityError::AuthenticationRequired)?;

        let session_id = session_token::parse(token, &self.config.session_secret)
            .ok_or(IdentityError::AuthenticationRequired)?;

        let session = self
            .session_repo
            .find_valid(session_id)
            .await?
            .ok_or(IdentityError::AuthenticationRequired)?;

        let account = self
            .account_repo
            .find_by_id(session.account_id)
            .await?
            .ok_or(IdentityError::AuthenticationRequired)?;

        let roles = self.role_repo.roles_for_account(account.id).await?;

        Ok(CurrentAccount {
            account,
            roles,
            session,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{
        AccountStatus, NidaStatus, PhoneE164, ROLE_CITIZEN, ROLE_PLATFORM_ADMIN,
    };
    use chrono::{Duration, Utc};
    use kernel::id::Id;

    fn current(role_keys: &[&str]) -> CurrentAccount {
        let now = Utc::now();
        CurrentAccount {
            account: Account {
                id: Id::new(),
                phone: PhoneE164::normalize("0712345678").unwrap(),
                display_name: None,
                status: AccountStatus::Active,
                nida_number: None,
                nida_status: NidaStatus::NotProvided,
                nida_verification_updated_at: None,
                created_at: now,
                updated_at: now,
            },
            roles: role_keys
                .iter()
                .enumerate()
                .map(|(i, key)| Role {
                    id: i as i32 + 1,
                    key: key.to_string(),
                    name: key.to_string(),
                })
                .collect(),
            session: Session {
                id: Id::new(),
                account_id: Id::new(),
                expires_at: now + Duration::hours(12),
                client_ip: None,
                user_agent: None,
                created_at: now,
            },
        }
    }

    #[test]
    fn test_has_any_role_or_semantics() {
        let citizen = current(&[ROLE_CITIZEN]);
        assert!(citizen.has_any_role(&[ROLE_CITIZEN]));
        assert!(citizen.has_any_role(&[ROLE_CITIZEN, ROLE_PLATFORM_ADMIN]));
        assert!(!citizen.has_any_role(&[ROLE_PLATFORM_ADMIN]));
    }

    #[test]
    fn test_has_any_role_empty_requirement() {
        let citizen = current(&[ROLE_CITIZEN]);
        assert!(!citizen.has_any_role(&[]));
    }

    #[test]
    fn test_has_any_role_no_roles() {
        let bare = current(&[]);
        assert!(!bare.has_any_role(&[ROLE_CITIZEN]));
    }
}
