//! Register Use Case
//!
//! Creates a new account from a phone number and password, then opens a
//! session for it: a freshly registered caller is logged in. The phone is
//! normalized before any lookup or insert; the credential and the default
//! citizen role are written in the same transaction as the account row.

use std::sync::Arc;

use chrono::{Duration, Utc};

use platform::password::{ClearTextPassword, HashedPassword};

use crate::application::config::IdentityConfig;
use crate::application::session_token;
use crate::domain::entity::{Account, NewAccount, NewSession};
use crate::domain::repository::{AccountRepository, RoleRepository, SessionRepository};
use crate::domain::value_object::{NidaNumber, PhoneE164, ROLE_CITIZEN, Role};
use crate::error::{IdentityError, IdentityResult};

/// Register input
pub struct RegisterInput {
    pub phone: String,
    pub password: String,
    pub display_name: Option<String>,
    pub nida_number: Option<String>,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
}

/// Register output
pub struct RegisterOutput {
    /// Signed token for the session cookie
    pub session_token: String,
    pub account: Account,
    pub roles: Vec<Role>,
}

/// Register use case
pub struct RegisterUseCase<A, R, S>
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

impl<A, R, S> RegisterUseCase<A, R, S>
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

    pub async fn execute(&self, input: RegisterInput) -> IdentityResult<RegisterOutput> {
        let phone = PhoneE164::normalize(&input.phone)?;

        let nida_number = match input.nida_number.as_deref() {
            Some(raw) if !raw.trim().is_empty() => {
                Some(NidaNumber::new(raw).map_err(|_| IdentityError::InvalidNidaNumber)?)
            }
            _ => None,
        };

        let password = ClearTextPassword::new(input.password)
            .map_err(|e| IdentityError::PasswordPolicy(e.to_string()))?;
        let password_hash = HashedPassword::from_clear_text(&password)
            .map_err(|e| IdentityError::Internal(e.to_string()))?;

        let display_name = input
            .display_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        let new_account = NewAccount {
            phone,
            display_name,
            nida_number,
        };

        let account = self
            .account_repo
            .create_with_credential(&new_account, password_hash.as_str(), ROLE_CITIZEN)
            .await?;

        let roles = self.role_repo.roles_for_account(account.id).await?;

        let ttl = Duration::from_std(self.config.session_ttl)
            .map_err(|e| IdentityError::Internal(format!("Invalid session TTL: {e}")))?;

        let session = self
            .session_repo
            .create(&NewSession {
                account_id: account.id,
                expires_at: Utc::now() + ttl,
                client_ip: input.client_ip,
                user_agent: input.user_agent,
            })
            .await?;

        let session_token = session_token::generate(session.id, &self.config.session_secret);

        tracing::info!(
            account_id = %account.id,
            session_id = %session.id,
            nida_status = %account.nida_status.as_str(),
            "Account registered"
        );

        Ok(RegisterOutput {
            session_token,
            account,
            roles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::Session;
    use crate::domain::value_object::AccountStatus;
    use kernel::id::{AccountId, Id, SessionId};
    use std::sync::Mutex;

    /// In-memory repository: enough behavior to register one account.
    #[derive(Clone, Default)]
    struct MemoryRepo {
        sessions: Arc<Mutex<Vec<Session>>>,
    }

    impl AccountRepository for MemoryRepo {
        async fn create_with_credential(
            &self,
            account: &NewAccount,
            _password_phc: &str,
            _default_role_key: &str,
        ) -> IdentityResult<Account> {
            let now = Utc::now();
            Ok(Account {
                id: Id::new(),
                phone: account.phone.clone(),
                display_name: account.display_name.clone(),
                status: AccountStatus::Active,
                nida_number: account.nida_number.clone(),
                nida_status: account.nida_status(),
                nida_verification_updated_at: None,
                created_at: now,
                updated_at: now,
            })
        }

        async fn find_by_id(&self, _account_id: AccountId) -> IdentityResult<Option<Account>> {
            Ok(None)
        }

        async fn find_by_phone(&self, _phone: &PhoneE164) -> IdentityResult<Option<Account>> {
            Ok(None)
        }

        async fn find_with_credential_by_phone(
            &self,
            _phone: &PhoneE164,
        ) -> IdentityResult<Option<(Account, String)>> {
            Ok(None)
        }

        async fn replace_credential(
            &self,
            _account_id: AccountId,
            _password_phc: &str,
        ) -> IdentityResult<()> {
            Ok(())
        }

        async fn set_display_name(
            &self,
            _account_id: AccountId,
            _display_name: Option<&str>,
        ) -> IdentityResult<Account> {
            Err(IdentityError::AccountNotFound)
        }
    }

    impl RoleRepository for MemoryRepo {
        async fn roles_for_account(&self, _account_id: AccountId) -> IdentityResult<Vec<Role>> {
            Ok(vec![Role {
                id: 1,
                key: ROLE_CITIZEN.to_string(),
                name: "Citizen".to_string(),
            }])
        }

        async fn assign(&self, _account_id: AccountId, _role_key: &str) -> IdentityResult<()> {
            Ok(())
        }

        async fn remove(&self, _account_id: AccountId, _role_key: &str) -> IdentityResult<()> {
            Ok(())
        }
    }

    impl SessionRepository for MemoryRepo {
        async fn create(&self, session: &NewSession) -> IdentityResult<Session> {
            let session = Session {
                id: Id::new(),
                account_id: session.account_id,
                expires_at: session.expires_at,
                client_ip: session.client_ip.clone(),
                user_agent: session.user_agent.clone(),
                created_at: Utc::now(),
            };
            self.sessions.lock().unwrap().push(session.clone());
            Ok(session)
        }

        async fn find_valid(&self, session_id: SessionId) -> IdentityResult<Option<Session>> {
            Ok(self
                .sessions
                .lock()
                .unwrap()
                .iter()
                .find(|s| s.id == session_id)
                .cloned())
        }

        async fn delete(&self, _session_id: SessionId) -> IdentityResult<()> {
            Ok(())
        }

        async fn delete_expired(&self) -> IdentityResult<u64> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn test_register_opens_a_session() {
        let repo = Arc::new(MemoryRepo::default());
        let config = Arc::new(IdentityConfig::development());

        let use_case = RegisterUseCase::new(repo.clone(), repo.clone(), repo.clone(), config.clone());

        let output = use_case
            .execute(RegisterInput {
                phone: "0712345678".to_string(),
                password: "change-me-now".to_string(),
                display_name: Some("Asha".to_string()),
                nida_number: None,
                client_ip: None,
                user_agent: None,
            })
            .await
            .unwrap();

        let sessions = repo.sessions.lock().unwrap();
        assert_eq!(sessions.len(), 1, "registration must create a session");
        assert_eq!(sessions[0].account_id, output.account.id);

        // The token must verify against the session that was stored.
        let parsed = session_token::parse(&output.session_token, &config.session_secret);
        assert_eq!(parsed, Some(sessions[0].id));
    }
}
