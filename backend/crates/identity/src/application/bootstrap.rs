//! Bootstrap Use Case
//!
//! Seeds or repairs the first platform administrator. Run from the
//! `bootstrap-admin` binary, never from a request handler.
//!
//! Idempotent: an existing account keeps its id, gets its password reset
//! to the supplied one, and gains the admin role if missing.

use std::sync::Arc;

use platform::password::{ClearTextPassword, HashedPassword};

use crate::domain::entity::{Account, NewAccount};
use crate::domain::repository::{AccountRepository, RoleRepository};
use crate::domain::value_object::{PhoneE164, ROLE_CITIZEN, ROLE_PLATFORM_ADMIN};
use crate::error::{IdentityError, IdentityResult};

/// Bootstrap input
pub struct BootstrapInput {
    pub phone: String,
    pub password: String,
    pub display_name: Option<String>,
}

/// Bootstrap output
pub struct BootstrapOutput {
    pub account: Account,
    /// False when the account already existed and was updated in place
    pub created: bool,
}

/// Bootstrap admin use case
pub struct BootstrapAdminUseCase<A, R>
where
    A: AccountRepository,
    R: RoleRepository,
{
    account_repo: Arc<A>,
    role_repo: Arc<R>,
}

impl<A, R> BootstrapAdminUseCase<A, R>
where
    A: AccountRepository,
    R: RoleRepository,
{
    pub fn new(account_repo: Arc<A>, role_repo: Arc<R>) -> Self {
        Self {
            account_repo,
            role_repo,
        }
    }

    pub async fn execute(&self, input: BootstrapInput) -> IdentityResult<BootstrapOutput> {
        let phone = PhoneE164::normalize(&input.phone)?;

        let password = ClearTextPassword::new(input.password)
            .map_err(|e| IdentityError::PasswordPolicy(e.to_string()))?;
        let password_hash = HashedPassword::from_clear_text(&password)
            .map_err(|e| IdentityError::Internal(e.to_string()))?;

        let (account, created) = match self.account_repo.find_by_phone(&phone).await? {
            Some(existing) => {
                self.account_repo
                    .replace_credential(existing.id, password_hash.as_str())
                    .await?;
                (existing, false)
            }
            None => {
                let account = self
                    .account_repo
                    .create_with_credential(
                        &NewAccount {
                            phone,
                            display_name: input.display_name,
                            nida_number: None,
                        },
                        password_hash.as_str(),
                        ROLE_CITIZEN,
                    )
                    .await?;
                (account, true)
            }
        };

        self.role_repo
            .assign(account.id, ROLE_PLATFORM_ADMIN)
            .await?;

        tracing::info!(
            account_id = %account.id,
            created,
            "Platform admin bootstrapped"
        );

        Ok(BootstrapOutput { account, created })
    }
}
