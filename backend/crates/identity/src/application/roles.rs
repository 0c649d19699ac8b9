//! Role Management Use Case
//!
//! Assign and remove role keys on an account. Assignment is idempotent;
//! removal of an unheld role is a no-op. Both return the fresh role list
//! so callers always render the post-mutation state.

use std::sync::Arc;

use kernel::id::AccountId;

use crate::domain::repository::{AccountRepository, RoleRepository};
use crate::domain::value_object::Role;
use crate::error::{IdentityError, IdentityResult};

/// Role management use case
pub struct ManageRolesUseCase<A, R>
where
    A: AccountRepository,
    R: RoleRepository,
{
    account_repo: Arc<A>,
    role_repo: Arc<R>,
}

impl<A, R> ManageRolesUseCase<A, R>
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

    /// Assign `role_key` to the account, returning its updated role list
    pub async fn assign(&self, account_id: AccountId, role_key: &str) -> IdentityResult<Vec<Role>> {
        self.ensure_account_exists(account_id).await?;
        self.role_repo.assign(account_id, role_key).await?;

        tracing::info!(account_id = %account_id, role = role_key, "Role assigned");
        self.role_repo.roles_for_account(account_id).await
    }

    /// Remove `role_key` from the account, returning its updated role list
    pub async fn remove(&self, account_id: AccountId, role_key: &str) -> IdentityResult<Vec<Role>> {
        self.ensure_account_exists(account_id).await?;
        self.role_repo.remove(account_id, role_key).await?;

        tracing::info!(account_id = %account_id, role = role_key, "Role removed");
        self.role_repo.roles_for_account(account_id).await
    }

    /// List the account's roles
    pub async fn list(&self, account_id: AccountId) -> IdentityResult<Vec<Role>> {
        self.ensure_account_exists(account_id).await?;
        self.role_repo.roles_for_account(account_id).await
    }

    async fn ensure_account_exists(&self, account_id: AccountId) -> IdentityResult<()> {
        self.account_repo
            .find_by_id(account_id)
            .await?
            .map(|_| ())
            .ok_or(IdentityError::AccountNotFound)
    }
}
