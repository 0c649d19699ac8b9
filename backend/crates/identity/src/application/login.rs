//! Login Use Case
//!
//! Authenticates a phone/password pair and opens a session.
//!
//! Every failure mode before password verification (unparseable phone,
//! unknown account, policy-rejected password) collapses into the same
//! invalid-credentials outcome, so responses never reveal whether a phone
//! is registered.

use std::sync::Arc;

use chrono::{Duration, Utc};

use platform::password::{ClearTextPassword, HashedPassword};

use crate::application::config::IdentityConfig;
use crate::application::session_token;
use crate::domain::entity::{Account, NewSession};
use crate::domain::repository::{AccountRepository, RoleRepository, SessionRepository};
use crate::domain::value_object::{PhoneE164, Role};
use crate::error::{IdentityError, IdentityResult};

/// Login input
pub struct LoginInput {
    pub phone: String,
    pub password: String,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
}

/// Successful login
pub struct LoginSuccess {
    /// Signed token for the session cookie
    pub session_token: String,
    pub account: Account,
    pub roles: Vec<Role>,
}

/// Login outcome
///
/// Invalid credentials are a modelled outcome rather than an error: the
/// endpoint answers 200 with a structured body either way.
pub enum LoginOutcome {
    Success(Box<LoginSuccess>),
    InvalidCredentials,
}

/// Login use case
pub struct LoginUseCase<A, R, S>
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

impl<A, R, S> LoginUseCase<A, R, S>
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

    pub async fn execute(&self, input: LoginInput) -> IdentityResult<LoginOutcome> {
        let Ok(phone) = PhoneE164::normalize(&input.phone) else {
            return Ok(LoginOutcome::InvalidCredentials);
        };

        let Some((account, stored_phc)) =
            self.account_repo.find_with_credential_by_phone(&phone).await?
        else {
            return Ok(LoginOutcome::InvalidCredentials);
        };

        let Ok(password) = ClearTextPassword::new(input.password) else {
            return Ok(LoginOutcome::InvalidCredentials);
        };

        let password_valid = HashedPassword::from_phc_string(stored_phc)
            .verify(&password)
            .map_err(|e| IdentityError::Internal(e.to_string()))?;

        if !password_valid {
            return Ok(LoginOutcome::InvalidCredentials);
        }

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
        let roles = self.role_repo.roles_for_account(account.id).await?;

        tracing::info!(
            account_id = %account.id,
            session_id = %session.id,
            "Account logged in"
        );

        Ok(LoginOutcome::Success(Box::new(LoginSuccess {
            session_token,
            account,
            roles,
        })))
    }
}
