//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use kernel::id::{AccountId, Id, SessionId};

use crate::domain::entity::{Account, NewAccount, NewSession, Session};
use crate::domain::repository::{AccountRepository, RoleRepository, SessionRepository};
use crate::domain::value_object::{AccountStatus, NidaNumber, NidaStatus, PhoneE164, Role};
use crate::error::{IdentityError, IdentityResult};

/// Unique index guarding one account per NIDA number. Phone uniqueness is
/// enforced by the `accounts_phone_key` constraint on the column itself.
const NIDA_UNIQUE_INDEX: &str = "accounts_nida_number_unique_idx";

/// PostgreSQL-backed identity repository
///
/// Implements the account, role, and session repository traits over a
/// shared connection pool.
#[derive(Clone)]
pub struct PgIdentityRepository {
    pool: PgPool,
}

impl PgIdentityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map a unique violation to the duplicate it represents.
///
/// The unique indexes are the real enforcement point; any pre-checks are
/// only there for friendlier messages under low contention.
fn map_unique_violation(err: sqlx::Error) -> IdentityError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.code().as_deref() == Some("23505") {
            if db_err
                .constraint()
                .is_some_and(|name| name == NIDA_UNIQUE_INDEX)
            {
                return IdentityError::DuplicateNationalId;
            }
            return IdentityError::DuplicatePhone;
        }
    }
    IdentityError::Database(err)
}

// ============================================================================
// Account Repository Implementation
// ============================================================================

impl AccountRepository for PgIdentityRepository {
    async fn create_with_credential(
        &self,
        account: &NewAccount,
        password_phc: &str,
        default_role_key: &str,
    ) -> IdentityResult<Account> {
        let mut tx = self.pool.begin().await?;

        // Friendly duplicate check; the unique index still backstops races.
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM accounts WHERE phone = $1)",
        )
        .bind(account.phone.as_str())
        .fetch_one(&mut *tx)
        .await?;

        if taken {
            return Err(IdentityError::DuplicatePhone);
        }

        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            INSERT INTO accounts (
                id,
                phone,
                display_name,
                status,
                nida_number,
                nida_status,
                nida_verification_updated_at,
                created_at,
                updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6,
                CASE WHEN $5 IS NOT NULL THEN now() END,
                now(), now()
            )
            RETURNING
                id,
                phone,
                display_name,
                status,
                nida_number,
                nida_status,
                nida_verification_updated_at,
                created_at,
                updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(account.phone.as_str())
        .bind(account.display_name.as_deref())
        .bind(AccountStatus::default().as_str())
        .bind(account.nida_number.as_ref().map(|n| n.as_str()))
        .bind(account.nida_status().as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_unique_violation)?;

        sqlx::query(
            r#"
            INSERT INTO auth_credentials (account_id, password_hash, created_at, updated_at)
            VALUES ($1, $2, now(), now())
            "#,
        )
        .bind(row.id)
        .bind(password_phc)
        .execute(&mut *tx)
        .await?;

        let assigned = sqlx::query(
            r#"
            INSERT INTO account_roles (account_id, role_id)
            SELECT $1, id FROM roles WHERE key = $2
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(row.id)
        .bind(default_role_key)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if assigned == 0 {
            return Err(IdentityError::Internal(format!(
                "Default role '{default_role_key}' is not seeded"
            )));
        }

        tx.commit().await?;

        row.into_account()
    }

    async fn find_by_id(&self, account_id: AccountId) -> IdentityResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, phone, display_name, status, nida_number, nida_status,
                   nida_verification_updated_at, created_at, updated_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(account_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_account()).transpose()
    }

    async fn find_by_phone(&self, phone: &PhoneE164) -> IdentityResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, phone, display_name, status, nida_number, nida_status,
                   nida_verification_updated_at, created_at, updated_at
            FROM accounts
            WHERE phone = $1
            "#,
        )
        .bind(phone.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_account()).transpose()
    }

    async fn find_with_credential_by_phone(
        &self,
        phone: &PhoneE164,
    ) -> IdentityResult<Option<(Account, String)>> {
        let row = sqlx::query_as::<_, AccountWithCredentialRow>(
            r#"
            SELECT
                a.id,
                a.phone,
                a.display_name,
                a.status,
                a.nida_number,
                a.nida_status,
                a.nida_verification_updated_at,
                a.created_at,
                a.updated_at,
                c.password_hash
            FROM accounts a
            JOIN auth_credentials c ON c.account_id = a.id
            WHERE a.phone = $1
            "#,
        )
        .bind(phone.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| {
            let password_hash = r.password_hash.clone();
            r.into_account_row().into_account().map(|a| (a, password_hash))
        })
        .transpose()
    }

    async fn replace_credential(
        &self,
        account_id: AccountId,
        password_phc: &str,
    ) -> IdentityResult<()> {
        sqlx::query(
            r#"
            INSERT INTO auth_credentials (account_id, password_hash, created_at, updated_at)
            VALUES ($1, $2, now(), now())
            ON CONFLICT (account_id)
            DO UPDATE SET password_hash = EXCLUDED.password_hash, updated_at = now()
            "#,
        )
        .bind(account_id.as_uuid())
        .bind(password_phc)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn set_display_name(
        &self,
        account_id: AccountId,
        display_name: Option<&str>,
    ) -> IdentityResult<Account> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            UPDATE accounts
            SET display_name = $2, updated_at = now()
            WHERE id = $1
            RETURNING id, phone, display_name, status, nida_number, nida_status,
                      nida_verification_updated_at, created_at, updated_at
            "#,
        )
        .bind(account_id.as_uuid())
        .bind(display_name)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(IdentityError::AccountNotFound)?.into_account()
    }
}

// ============================================================================
// Role Repository Implementation
// ============================================================================

impl RoleRepository for PgIdentityRepository {
    async fn roles_for_account(&self, account_id: AccountId) -> IdentityResult<Vec<Role>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT r.id, r.key, r.name
            FROM roles r
            JOIN account_roles ar ON ar.role_id = r.id
            WHERE ar.account_id = $1
            ORDER BY r.id ASC
            "#,
        )
        .bind(account_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(RoleRow::into_role).collect())
    }

    async fn assign(&self, account_id: AccountId, role_key: &str) -> IdentityResult<()> {
        let mut tx = self.pool.begin().await?;

        let role_id = sqlx::query_scalar::<_, i32>("SELECT id FROM roles WHERE key = $1")
            .bind(role_key)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| IdentityError::UnknownRole(role_key.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO account_roles (account_id, role_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(account_id.as_uuid())
        .bind(role_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    async fn remove(&self, account_id: AccountId, role_key: &str) -> IdentityResult<()> {
        sqlx::query(
            r#"
            DELETE FROM account_roles ar
            USING roles r
            WHERE ar.role_id = r.id
              AND ar.account_id = $1
              AND r.key = $2
            "#,
        )
        .bind(account_id.as_uuid())
        .bind(role_key)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Session Repository Implementation
// ============================================================================

impl SessionRepository for PgIdentityRepository {
    async fn create(&self, session: &NewSession) -> IdentityResult<Session> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            INSERT INTO sessions (id, account_id, expires_at, client_ip, user_agent, created_at)
            VALUES ($1, $2, $3, $4, $5, now())
            RETURNING id, account_id, expires_at, client_ip, user_agent, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(session.account_id.as_uuid())
        .bind(session.expires_at)
        .bind(session.client_ip.as_deref())
        .bind(session.user_agent.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_session())
    }

    async fn find_valid(&self, session_id: SessionId) -> IdentityResult<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, account_id, expires_at, client_ip, user_agent, created_at
            FROM sessions
            WHERE id = $1 AND expires_at > now()
            "#,
        )
        .bind(session_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SessionRow::into_session))
    }

    async fn delete(&self, session_id: SessionId) -> IdentityResult<()> {
        sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(session_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_expired(&self) -> IdentityResult<u64> {
        let deleted = sqlx::query("DELETE FROM sessions WHERE expires_at <= now()")
            .execute(&self.pool)
            .await?
            .rows_affected();

        if deleted > 0 {
            tracing::info!(sessions_deleted = deleted, "Cleaned up expired sessions");
        }

        Ok(deleted)
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    phone: String,
    display_name: Option<String>,
    status: String,
    nida_number: Option<String>,
    nida_status: String,
    nida_verification_updated_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> IdentityResult<Account> {
        let status = AccountStatus::from_str(&self.status)
            .map_err(|e| IdentityError::Internal(e.to_string()))?;
        let nida_status = NidaStatus::from_str(&self.nida_status)
            .map_err(|e| IdentityError::Internal(e.to_string()))?;

        Ok(Account {
            id: Id::from_uuid(self.id),
            phone: PhoneE164::from_db(self.phone),
            display_name: self.display_name,
            status,
            nida_number: self.nida_number.map(NidaNumber::from_db),
            nida_status,
            nida_verification_updated_at: self.nida_verification_updated_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct AccountWithCredentialRow {
    id: Uuid,
    phone: String,
    display_name: Option<String>,
    status: String,
    nida_number: Option<String>,
    nida_status: String,
    nida_verification_updated_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    password_hash: String,
}

impl AccountWithCredentialRow {
    fn into_account_row(self) -> AccountRow {
        AccountRow {
            id: self.id,
            phone: self.phone,
            display_name: self.display_name,
            status: self.status,
            nida_number: self.nida_number,
            nida_status: self.nida_status,
            nida_verification_updated_at: self.nida_verification_updated_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct RoleRow {
    id: i32,
    key: String,
    name: String,
}

impl RoleRow {
    fn into_role(self) -> Role {
        Role {
            id: self.id,
            key: self.key,
            name: self.name,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    id: Uuid,
    account_id: Uuid,
    expires_at: DateTime<Utc>,
    client_ip: Option<String>,
    user_agent: Option<String>,
    created_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_session(self) -> Session {
        Session {
            id: Id::from_uuid(self.id),
            account_id: Id::from_uuid(self.account_id),
            expires_at: self.expires_at,
            client_ip: self.client_ip,
            user_agent: self.user_agent,
            created_at: self.created_at,
        }
    }
}
