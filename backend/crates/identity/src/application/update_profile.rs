//! Update Profile Use Case
//!
//! Self-service display name change for the authenticated account.

use std::sync::Arc;

use kernel::id::AccountId;

use crate::domain::entity::Account;
use crate::domain::repository::AccountRepository;
use crate::error::IdentityResult;

/// Update profile use case
pub struct UpdateProfileUseCase<A>
where
    A: AccountRepository,
{
    account_repo: Arc<A>,
}

impl<A> UpdateProfileUseCase<A>
where
    A: AccountRepository,
{
    pub fn new(account_repo: Arc<A>) -> Self {
        Self { account_repo }
    }

    /// Set or clear the display name. Whitespace-only names clear it.
    pub async fn execute(
        &self,
        account_id: AccountId,
        display_name: Option<String>,
    ) -> IdentityResult<Account> {
        let display_name = display_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        self.account_repo
            .set_display_name(account_id, display_name.as_deref())
            .await
    }
}
