//! HTTP Handlers
//!
//! Admin console handlers run behind the session and role guards from the
//! identity crate; the partner self-service handler authenticates with a
//! bearer API key instead.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use std::sync::Arc;
use uuid::Uuid;

use identity::application::ManageRolesUseCase;
use identity::domain::repository::{
    AccountRepository, RoleRepository as IdentityRoleRepository, SessionRepository,
};
use identity::error::IdentityResult;
use kernel::id::Id;

use crate::application::{
    IssueApiKeyUseCase, ManagePartnersUseCase, OverviewUseCase, RevokeApiKeyUseCase,
    SearchAccountsUseCase, VerifyApiKeyUseCase,
};
use crate::domain::repository::{
    AccountDirectory, ApiKeyRepository, OverviewRepository, PartnerRepository,
};
use crate::error::{AdminError, AdminResult};
use crate::presentation::dto::{
    AccountSummaryDto, ApiKeyDto, CreatePartnerRequest, IssueKeyRequest, IssueKeyResponse,
    OverviewResponse, PartnerDto, PartnerMeResponse, RoleMutationRequest, RolesResponse,
    SearchAccountsQuery,
};

/// Shared state for admin console handlers
#[derive(Clone)]
pub struct AdminAppState<A, R>
where
    A: PartnerRepository
        + ApiKeyRepository
        + AccountDirectory
        + OverviewRepository
        + Clone
        + Send
        + Sync
        + 'static,
    R: AccountRepository + IdentityRoleRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    pub admin: Arc<A>,
    pub identity: Arc<R>,
}

/// Shared state for partner bearer-key handlers
#[derive(Clone)]
pub struct PartnerAppState<A>
where
    A: ApiKeyRepository + Clone + Send + Sync + 'static,
{
    pub admin: Arc<A>,
}

// ============================================================================
// Overview
// ============================================================================

/// GET /v1/admin/overview
pub async fn overview<A, R>(
    State(state): State<AdminAppState<A, R>>,
) -> AdminResult<Json<OverviewResponse>>
where
    A: PartnerRepository
        + ApiKeyRepository
        + AccountDirectory
        + OverviewRepository
        + Clone
        + Send
        + Sync
        + 'static,
    R: AccountRepository + IdentityRoleRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let use_case = OverviewUseCase::new(state.admin.clone());
    let overview = use_case.execute().await?;

    Ok(Json(overview.into()))
}

// ============================================================================
// Account Directory
// ============================================================================

/// GET /v1/admin/accounts
pub async fn search_accounts<A, R>(
    State(state): State<AdminAppState<A, R>>,
    Query(params): Query<SearchAccountsQuery>,
) -> AdminResult<Json<Vec<AccountSummaryDto>>>
where
    A: PartnerRepository
        + ApiKeyRepository
        + AccountDirectory
        + OverviewRepository
        + Clone
        + Send
        + Sync
        + 'static,
    R: AccountRepository + IdentityRoleRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let use_case = SearchAccountsUseCase::new(state.admin.clone());
    let summaries = use_case.execute(params.q, params.limit).await?;

    Ok(Json(summaries.into_iter().map(Into::into).collect()))
}

/// GET /v1/admin/accounts/{id}
pub async fn get_account<A, R>(
    State(state): State<AdminAppState<A, R>>,
    Path(account_id): Path<Uuid>,
) -> AdminResult<Json<AccountSummaryDto>>
where
    A: PartnerRepository
        + ApiKeyRepository
        + AccountDirectory
        + OverviewRepository
        + Clone
        + Send
        + Sync
        + 'static,
    R: AccountRepository + IdentityRoleRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let use_case = SearchAccountsUseCase::new(state.admin.clone());
    let summary = use_case.get(Id::from_uuid(account_id)).await?;

    Ok(Json(summary.into()))
}

// ============================================================================
// Role Mutation
// ============================================================================

/// POST /v1/admin/accounts/{id}/roles/add
pub async fn assign_role<A, R>(
    State(state): State<AdminAppState<A, R>>,
    Path(account_id): Path<Uuid>,
    Json(req): Json<RoleMutationRequest>,
) -> IdentityResult<Json<RolesResponse>>
where
    A: PartnerRepository
        + ApiKeyRepository
        + AccountDirectory
        + OverviewRepository
        + Clone
        + Send
        + Sync
        + 'static,
    R: AccountRepository + IdentityRoleRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let use_case = ManageRolesUseCase::new(state.identity.clone(), state.identity.clone());
    let roles = use_case
        .assign(Id::from_uuid(account_id), &req.role)
        .await?;

    Ok(Json(RolesResponse { roles }))
}

/// POST /v1/admin/accounts/{id}/roles/remove
pub async fn remove_role<A, R>(
    State(state): State<AdminAppState<A, R>>,
    Path(account_id): Path<Uuid>,
    Json(req): Json<RoleMutationRequest>,
) -> IdentityResult<Json<RolesResponse>>
where
    A: PartnerRepository
        + ApiKeyRepository
        + AccountDirectory
        + OverviewRepository
        + Clone
        + Send
        + Sync
        + 'static,
    R: AccountRepository + IdentityRoleRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let use_case = ManageRolesUseCase::new(state.identity.clone(), state.identity.clone());
    let roles = use_case
        .remove(Id::from_uuid(account_id), &req.role)
        .await?;

    Ok(Json(RolesResponse { roles }))
}

// ============================================================================
// Partners
// ============================================================================

/// POST /v1/admin/partners
pub async fn create_partner<A, R>(
    State(state): State<AdminAppState<A, R>>,
    Json(req): Json<CreatePartnerRequest>,
) -> AdminResult<impl IntoResponse>
where
    A: PartnerRepository
        + ApiKeyRepository
        + AccountDirectory
        + OverviewRepository
        + Clone
        + Send
        + Sync
        + 'static,
    R: AccountRepository + IdentityRoleRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let use_case = ManagePartnersUseCase::new(state.admin.clone());
    let partner = use_case.create(req.name).await?;

    Ok((StatusCode::CREATED, Json(PartnerDto::from(partner))))
}

/// GET /v1/admin/partners
pub async fn list_partners<A, R>(
    State(state): State<AdminAppState<A, R>>,
) -> AdminResult<Json<Vec<PartnerDto>>>
where
    A: PartnerRepository
        + ApiKeyRepository
        + AccountDirectory
        + OverviewRepository
        + Clone
        + Send
        + Sync
        + 'static,
    R: AccountRepository + IdentityRoleRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let use_case = ManagePartnersUseCase::new(state.admin.clone());
    let partners = use_case.list().await?;

    Ok(Json(partners.into_iter().map(Into::into).collect()))
}

/// GET /v1/admin/partners/{id}
pub async fn get_partner<A, R>(
    State(state): State<AdminAppState<A, R>>,
    Path(partner_id): Path<Uuid>,
) -> AdminResult<Json<PartnerDto>>
where
    A: PartnerRepository
        + ApiKeyRepository
        + AccountDirectory
        + OverviewRepository
        + Clone
        + Send
        + Sync
        + 'static,
    R: AccountRepository + IdentityRoleRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let use_case = ManagePartnersUseCase::new(state.admin.clone());
    let partner = use_case.get(Id::from_uuid(partner_id)).await?;

    Ok(Json(partner.into()))
}

// ============================================================================
// API Keys
// ============================================================================

/// GET /v1/admin/partners/{id}/api-keys
pub async fn list_keys<A, R>(
    State(state): State<AdminAppState<A, R>>,
    Path(partner_id): Path<Uuid>,
) -> AdminResult<Json<Vec<ApiKeyDto>>>
where
    A: PartnerRepository
        + ApiKeyRepository
        + AccountDirectory
        + OverviewRepository
        + Clone
        + Send
        + Sync
        + 'static,
    R: AccountRepository + IdentityRoleRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let partner_id = Id::from_uuid(partner_id);

    // 404 for unknown partners rather than an empty list
    ManagePartnersUseCase::new(state.admin.clone())
        .get(partner_id)
        .await?;

    let keys = state.admin.list_for_partner(partner_id).await?;

    Ok(Json(keys.into_iter().map(Into::into).collect()))
}

/// POST /v1/admin/partners/{id}/api-keys
pub async fn issue_key<A, R>(
    State(state): State<AdminAppState<A, R>>,
    Path(partner_id): Path<Uuid>,
    Json(req): Json<IssueKeyRequest>,
) -> AdminResult<impl IntoResponse>
where
    A: PartnerRepository
        + ApiKeyRepository
        + AccountDirectory
        + OverviewRepository
        + Clone
        + Send
        + Sync
        + 'static,
    R: AccountRepository + IdentityRoleRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let use_case = IssueApiKeyUseCase::new(state.admin.clone(), state.admin.clone());
    let issued = use_case.execute(Id::from_uuid(partner_id), req.label).await?;

    Ok((StatusCode::CREATED, Json(IssueKeyResponse::from(issued))))
}

/// POST /v1/admin/partners/api-keys/{id}/revoke
pub async fn revoke_key<A, R>(
    State(state): State<AdminAppState<A, R>>,
    Path(key_id): Path<Uuid>,
) -> AdminResult<Json<ApiKeyDto>>
where
    A: PartnerRepository
        + ApiKeyRepository
        + AccountDirectory
        + OverviewRepository
        + Clone
        + Send
        + Sync
        + 'static,
    R: AccountRepository + IdentityRoleRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let use_case = RevokeApiKeyUseCase::new(state.admin.clone());
    let key = use_case.execute(Id::from_uuid(key_id)).await?;

    Ok(Json(key.into()))
}

// ============================================================================
// Partner Self-Service
// ============================================================================

/// GET /v1/partner/me
///
/// Authenticates with `Authorization: Bearer ph_...`.
pub async fn partner_me<A>(
    State(state): State<PartnerAppState<A>>,
    headers: HeaderMap,
) -> AdminResult<Json<PartnerMeResponse>>
where
    A: ApiKeyRepository + Clone + Send + Sync + 'static,
{
    let presented = extract_bearer(&headers).ok_or(AdminError::InvalidApiKey)?;

    let use_case = VerifyApiKeyUseCase::new(state.admin.clone());
    let (partner, key) = use_case.execute(presented).await?;

    Ok(Json(PartnerMeResponse {
        partner: partner.into(),
        key: key.into(),
    }))
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer ph_abc123"),
        );
        assert_eq!(extract_bearer(&headers), Some("ph_abc123"));
    }

    #[test]
    fn test_extract_bearer_rejects_other_schemes() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        );
        assert_eq!(extract_bearer(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(extract_bearer(&headers), None);

        assert_eq!(extract_bearer(&HeaderMap::new()), None);
    }
}
