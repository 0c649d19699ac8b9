//! Account Directory Use Case
//!
//! Read-only account search for the admin console.

use std::sync::Arc;

use kernel::id::AccountId;

use crate::domain::repository::{AccountDirectory, AccountSummary};
use crate::error::{AdminError, AdminResult};

/// Default page size when the client sends no limit
pub const DEFAULT_SEARCH_LIMIT: i64 = 25;

/// Hard cap on page size
pub const MAX_SEARCH_LIMIT: i64 = 100;

/// Clamp a client-supplied limit into `[1, MAX_SEARCH_LIMIT]`
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit
        .unwrap_or(DEFAULT_SEARCH_LIMIT)
        .clamp(1, MAX_SEARCH_LIMIT)
}

/// Account search use case
pub struct SearchAccountsUseCase<D>
where
    D: AccountDirectory,
{
    directory: Arc<D>,
}

impl<D> SearchAccountsUseCase<D>
where
    D: AccountDirectory,
{
    pub fn new(directory: Arc<D>) -> Self {
        Self { directory }
    }

    /// Search accounts; empty or whitespace queries list recent accounts.
    pub async fn execute(
        &self,
        query: Option<String>,
        limit: Option<i64>,
    ) -> AdminResult<Vec<AccountSummary>> {
        let query = query.map(|q| q.trim().to_string()).filter(|q| !q.is_empty());
        let limit = clamp_limit(limit);

        self.directory.search(query.as_deref(), limit).await
    }

    /// Fetch one account for the detail view.
    pub async fn get(&self, account_id: AccountId) -> AdminResult<AccountSummary> {
        self.directory
            .find_by_id(account_id)
            .await?
            .ok_or(AdminError::AccountNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_limit_default() {
        assert_eq!(clamp_limit(None), 25);
    }

    #[test]
    fn test_clamp_limit_bounds() {
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(-5)), 1);
        assert_eq!(clamp_limit(Some(1)), 1);
        assert_eq!(clamp_limit(Some(100)), 100);
        assert_eq!(clamp_limit(Some(101)), 100);
        assert_eq!(clamp_limit(Some(10_000)), 100);
    }

    #[test]
    fn test_clamp_limit_passthrough() {
        assert_eq!(clamp_limit(Some(50)), 50);
    }
}
