//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::{AccountId, SessionId};

use crate::domain::entity::{Account, NewAccount, NewSession, Session};
use crate::domain::value_object::{PhoneE164, Role};
use crate::error::IdentityResult;

/// Account repository trait
#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    /// Create an account with its credential and default role, atomically.
    ///
    /// `password_phc` is the Argon2 hash to store; `default_role_key` is
    /// assigned in the same transaction. Fails with `DuplicatePhone` /
    /// `DuplicateNationalId` on unique violations.
    async fn create_with_credential(
        &self,
        account: &NewAccount,
        password_phc: &str,
        default_role_key: &str,
    ) -> IdentityResult<Account>;

    /// Find account by ID
    async fn find_by_id(&self, account_id: AccountId) -> IdentityResult<Option<Account>>;

    /// Find account by canonical phone
    async fn find_by_phone(&self, phone: &PhoneE164) -> IdentityResult<Option<Account>>;

    /// Find account plus its stored password hash by canonical phone
    async fn find_with_credential_by_phone(
        &self,
        phone: &PhoneE164,
    ) -> IdentityResult<Option<(Account, String)>>;

    /// Replace the stored password hash for an account
    async fn replace_credential(
        &self,
        account_id: AccountId,
        password_phc: &str,
    ) -> IdentityResult<()>;

    /// Update display name, returning the fresh row
    async fn set_display_name(
        &self,
        account_id: AccountId,
        display_name: Option<&str>,
    ) -> IdentityResult<Account>;
}

/// Role repository trait
#[trait_variant::make(RoleRepository: Send)]
pub trait LocalRoleRepository {
    /// Roles assigned to an account, ordered by role id ascending
    async fn roles_for_account(&self, account_id: AccountId) -> IdentityResult<Vec<Role>>;

    /// Assign a role by key. Idempotent; fails with `UnknownRole` if the
    /// key does not exist.
    async fn assign(&self, account_id: AccountId, role_key: &str) -> IdentityResult<()>;

    /// Remove a role assignment by key. Removing an unassigned or unknown
    /// role is a no-op.
    async fn remove(&self, account_id: AccountId, role_key: &str) -> IdentityResult<()>;
}

/// Session repository trait
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    /// Persist a new session
    async fn create(&self, session: &NewSession) -> IdentityResult<Session>;

    /// Find a session by ID, excluding expired rows
    async fn find_valid(&self, session_id: SessionId) -> IdentityResult<Option<Session>>;

    /// Delete a session (logout / revocation)
    async fn delete(&self, session_id: SessionId) -> IdentityResult<()>;

    /// Sweep expired sessions, returning the number of rows removed
    async fn delete_expired(&self) -> IdentityResult<u64>;
}
