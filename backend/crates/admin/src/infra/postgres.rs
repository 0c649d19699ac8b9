//! PostgreSQL Repository Implementations

use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use kernel::id::{AccountId, ApiKeyId, Id, PartnerId};

use crate::domain::entity::{NewApiKey, NewPartner, Partner, PartnerApiKey, PartnerStatus};
use crate::domain::repository::{
    AccountDirectory, AccountSummary, ApiKeyRepository, OverviewCounts, OverviewRepository,
    PartnerRepository,
};
use crate::error::{AdminError, AdminResult};

/// PostgreSQL-backed admin repository
#[derive(Clone)]
pub struct PgAdminRepository {
    pool: PgPool,
}

impl PgAdminRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Partner Repository Implementation
// ============================================================================

impl PartnerRepository for PgAdminRepository {
    async fn create(&self, partner: &NewPartner) -> AdminResult<Partner> {
        let row = sqlx::query_as::<_, PartnerRow>(
            r#"
            INSERT INTO partners (id, name, status, created_at, updated_at)
            VALUES ($1, $2, $3, now(), now())
            RETURNING id, name, status, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&partner.name)
        .bind(PartnerStatus::default().as_str())
        .fetch_one(&self.pool)
        .await?;

        row.into_partner()
    }

    async fn find_by_id(&self, partner_id: PartnerId) -> AdminResult<Option<Partner>> {
        let row = sqlx::query_as::<_, PartnerRow>(
            r#"
            SELECT id, name, status, created_at, updated_at
            FROM partners
            WHERE id = $1
            "#,
        )
        .bind(partner_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(PartnerRow::into_partner).transpose()
    }

    async fn list(&self) -> AdminResult<Vec<Partner>> {
        let rows = sqlx::query_as::<_, PartnerRow>(
            r#"
            SELECT id, name, status, created_at, updated_at
            FROM partners
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(PartnerRow::into_partner).collect()
    }
}

// ============================================================================
// API Key Repository Implementation
// ============================================================================

impl ApiKeyRepository for PgAdminRepository {
    async fn insert(&self, key: &NewApiKey) -> AdminResult<PartnerApiKey> {
        let row = sqlx::query_as::<_, ApiKeyRow>(
            r#"
            INSERT INTO partner_api_keys (
                id, partner_id, prefix, key_hash, label, created_at
            ) VALUES ($1, $2, $3, $4, $5, now())
            RETURNING
                id, partner_id, prefix, key_hash, label,
                revoked_at, last_used_at, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(key.partner_id.as_uuid())
        .bind(&key.prefix)
        .bind(&key.key_hash)
        .bind(key.label.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_api_key())
    }

    async fn list_for_partner(&self, partner_id: PartnerId) -> AdminResult<Vec<PartnerApiKey>> {
        let rows = sqlx::query_as::<_, ApiKeyRow>(
            r#"
            SELECT
                id, partner_id, prefix, key_hash, label,
                revoked_at, last_used_at, created_at
            FROM partner_api_keys
            WHERE partner_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(partner_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ApiKeyRow::into_api_key).collect())
    }

    async fn revoke(&self, key_id: ApiKeyId) -> AdminResult<Option<PartnerApiKey>> {
        let row = sqlx::query_as::<_, ApiKeyRow>(
            r#"
            UPDATE partner_api_keys
            SET revoked_at = now()
            WHERE id = $1
            RETURNING
                id, partner_id, prefix, key_hash, label,
                revoked_at, last_used_at, created_at
            "#,
        )
        .bind(key_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ApiKeyRow::into_api_key))
    }

    async fn find_active_by_prefix(
        &self,
        prefix: &str,
    ) -> AdminResult<Vec<(PartnerApiKey, Partner)>> {
        let rows = sqlx::query_as::<_, ApiKeyWithPartnerRow>(
            r#"
            SELECT
                k.id, k.partner_id, k.prefix, k.key_hash, k.label,
                k.revoked_at, k.last_used_at, k.created_at,
                p.name AS partner_name,
                p.status AS partner_status,
                p.created_at AS partner_created_at,
                p.updated_at AS partner_updated_at
            FROM partner_api_keys k
            JOIN partners p ON p.id = k.partner_id
            WHERE k.prefix = $1 AND k.revoked_at IS NULL
            "#,
        )
        .bind(prefix)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ApiKeyWithPartnerRow::into_pair).collect()
    }

    async fn touch_last_used(&self, key_id: ApiKeyId) -> AdminResult<()> {
        sqlx::query("UPDATE partner_api_keys SET last_used_at = now() WHERE id = $1")
            .bind(key_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// ============================================================================
// Account Directory Implementation
// ============================================================================

/// Shared SELECT skeleton; role keys are aggregated per account so a
/// result page never fans out into N follow-up queries.
const ACCOUNT_SUMMARY_SELECT: &str = r#"
    SELECT
        a.id, a.phone, a.display_name, a.status, a.nida_number,
        a.nida_status, a.created_at,
        COALESCE(
            array_agg(r.key ORDER BY r.key) FILTER (WHERE r.key IS NOT NULL),
            '{}'
        ) AS roles
    FROM accounts a
    LEFT JOIN account_roles ar ON ar.account_id = a.id
    LEFT JOIN roles r ON r.id = ar.role_id
"#;

impl AccountDirectory for PgAdminRepository {
    async fn search(&self, query: Option<&str>, limit: i64) -> AdminResult<Vec<AccountSummary>> {
        let rows = match query {
            Some(q) => {
                let pattern = format!("%{}%", q);
                let sql = format!(
                    r#"{ACCOUNT_SUMMARY_SELECT}
                    WHERE a.id::text ILIKE $1
                       OR a.phone ILIKE $1
                       OR a.display_name ILIKE $1
                       OR a.nida_number ILIKE $1
                    GROUP BY a.id
                    ORDER BY a.created_at DESC
                    LIMIT $2
                    "#
                );
                sqlx::query_as::<_, AccountSummaryRow>(&sql)
                    .bind(pattern)
                    .bind(limit)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    r#"{ACCOUNT_SUMMARY_SELECT}
                    GROUP BY a.id
                    ORDER BY a.created_at DESC
                    LIMIT $1
                    "#
                );
                sqlx::query_as::<_, AccountSummaryRow>(&sql)
                    .bind(limit)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(rows.into_iter().map(AccountSummaryRow::into_summary).collect())
    }

    async fn find_by_id(&self, account_id: AccountId) -> AdminResult<Option<AccountSummary>> {
        let sql = format!(
            r#"{ACCOUNT_SUMMARY_SELECT}
            WHERE a.id = $1
            GROUP BY a.id
            "#
        );
        let row = sqlx::query_as::<_, AccountSummaryRow>(&sql)
            .bind(account_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(AccountSummaryRow::into_summary))
    }
}

// ============================================================================
// Overview Repository Implementation
// ============================================================================

impl OverviewRepository for PgAdminRepository {
    async fn ping(&self) -> AdminResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(())
    }

    async fn counts(&self) -> AdminResult<OverviewCounts> {
        let audit_since = Utc::now() - Duration::hours(24);

        let (accounts, partners, active_api_keys, revoked_api_keys, audit_events_24h) = tokio::try_join!(
            count(&self.pool, "SELECT COUNT(*) FROM accounts", None),
            count(&self.pool, "SELECT COUNT(*) FROM partners", None),
            count(
                &self.pool,
                "SELECT COUNT(*) FROM partner_api_keys WHERE revoked_at IS NULL",
                None,
            ),
            count(
                &self.pool,
                "SELECT COUNT(*) FROM partner_api_keys WHERE revoked_at IS NOT NULL",
                None,
            ),
            count(
                &self.pool,
                "SELECT COUNT(*) FROM audit_logs WHERE created_at >= $1",
                Some(audit_since),
            ),
        )?;

        Ok(OverviewCounts {
            accounts,
            partners,
            active_api_keys,
            revoked_api_keys,
            audit_events_24h,
        })
    }
}

async fn count(
    pool: &PgPool,
    sql: &str,
    since: Option<DateTime<Utc>>,
) -> AdminResult<i64> {
    let query = sqlx::query_scalar::<_, i64>(sql);
    let query = match since {
        Some(ts) => query.bind(ts),
        None => query,
    };

    Ok(query.fetch_one(pool).await?)
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct PartnerRow {
    id: Uuid,
    name: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PartnerRow {
    fn into_partner(self) -> AdminResult<Partner> {
        let status = PartnerStatus::from_str(&self.status)
            .map_err(|e| AdminError::Internal(e.to_string()))?;

        Ok(Partner {
            id: Id::from_uuid(self.id),
            name: self.name,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ApiKeyRow {
    id: Uuid,
    partner_id: Uuid,
    prefix: String,
    key_hash: String,
    label: Option<String>,
    revoked_at: Option<DateTime<Utc>>,
    last_used_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl ApiKeyRow {
    fn into_api_key(self) -> PartnerApiKey {
        PartnerApiKey {
            id: Id::from_uuid(self.id),
            partner_id: Id::from_uuid(self.partner_id),
            prefix: self.prefix,
            key_hash: self.key_hash,
            label: self.label,
            revoked_at: self.revoked_at,
            last_used_at: self.last_used_at,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ApiKeyWithPartnerRow {
    id: Uuid,
    partner_id: Uuid,
    prefix: String,
    key_hash: String,
    label: Option<String>,
    revoked_at: Option<DateTime<Utc>>,
    last_used_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    partner_name: String,
    partner_status: String,
    partner_created_at: DateTime<Utc>,
    partner_updated_at: DateTime<Utc>,
}

impl ApiKeyWithPartnerRow {
    fn into_pair(self) -> AdminResult<(PartnerApiKey, Partner)> {
        let status = PartnerStatus::from_str(&self.partner_status)
            .map_err(|e| AdminError::Internal(e.to_string()))?;

        let partner = Partner {
            id: Id::from_uuid(self.partner_id),
            name: self.partner_name,
            status,
            created_at: self.partner_created_at,
            updated_at: self.partner_updated_at,
        };

        let key = PartnerApiKey {
            id: Id::from_uuid(self.id),
            partner_id: Id::from_uuid(self.partner_id),
            prefix: self.prefix,
            key_hash: self.key_hash,
            label: self.label,
            revoked_at: self.revoked_at,
            last_used_at: self.last_used_at,
            created_at: self.created_at,
        };

        Ok((key, partner))
    }
}

#[derive(sqlx::FromRow)]
struct AccountSummaryRow {
    id: Uuid,
    phone: String,
    display_name: Option<String>,
    status: String,
    nida_number: Option<String>,
    nida_status: String,
    roles: Vec<String>,
    created_at: DateTime<Utc>,
}

impl AccountSummaryRow {
    fn into_summary(self) -> AccountSummary {
        AccountSummary {
            id: Id::from_uuid(self.id),
            phone: self.phone,
            display_name: self.display_name,
            status: self.status,
            nida_number: self.nida_number,
            nida_status: self.nida_status,
            roles: self.roles,
            created_at: self.created_at,
        }
    }
}
