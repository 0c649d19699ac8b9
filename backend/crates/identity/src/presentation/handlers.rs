//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use std::sync::Arc;

use platform::client::{extract_client_ip, extract_user_agent};

use crate::application::config::IdentityConfig;
use crate::application::{
    CurrentAccount, LoginInput, LoginOutcome, LoginUseCase, LogoutUseCase, RegisterInput,
    RegisterUseCase, UpdateProfileUseCase,
};
use crate::domain::repository::{AccountRepository, RoleRepository, SessionRepository};
use crate::error::IdentityResult;
use crate::presentation::dto::{
    AccountDto, LoginFailureResponse, LoginRequest, LoginResponse, MeResponse, RegisterRequest,
    UpdateProfileRequest,
};

/// Shared state for identity handlers
#[derive(Clone)]
pub struct IdentityAppState<R>
where
    R: AccountRepository + RoleRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<IdentityConfig>,
}

// ============================================================================
// Register
// ============================================================================

/// POST /v1/auth/register
///
/// A successful registration also opens a session, so the response sets
/// the session cookie just like login.
pub async fn register<R>(
    State(state): State<IdentityAppState<R>>,
    headers: HeaderMap,
    Json(req): Json<RegisterRequest>,
) -> IdentityResult<impl IntoResponse>
where
    R: AccountRepository + RoleRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let client_ip = extract_client_ip(&headers, None).map(|ip| ip.to_string());
    let user_agent = extract_user_agent(&headers);

    let use_case = RegisterUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.repo.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(RegisterInput {
            phone: req.phone,
            password: req.password,
            display_name: req.display_name,
            nida_number: req.nida_number,
            client_ip,
            user_agent,
        })
        .await?;

    let cookie = state.config.cookie().build_set_cookie(&output.session_token);

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(AccountDto::from_account(output.account, &output.roles)),
    ))
}

// ============================================================================
// Login
// ============================================================================

/// POST /v1/auth/login
pub async fn login<R>(
    State(state): State<IdentityAppState<R>>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> IdentityResult<impl IntoResponse>
where
    R: AccountRepository + RoleRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let client_ip = extract_client_ip(&headers, None).map(|ip| ip.to_string());
    let user_agent = extract_user_agent(&headers);

    let use_case = LoginUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.repo.clone(),
        state.config.clone(),
    );

    let outcome = use_case
        .execute(LoginInput {
            phone: req.phone,
            password: req.password,
            client_ip,
            user_agent,
        })
        .await?;

    match outcome {
        LoginOutcome::Success(success) => {
            let cookie = state.config.cookie().build_set_cookie(&success.session_token);

            Ok((
                StatusCode::OK,
                [(header::SET_COOKIE, cookie)],
                Json(LoginResponse {
                    account: AccountDto::from_account(success.account, &success.roles),
                }),
            )
                .into_response())
        }
        // 200 with a structured body and no cookie
        LoginOutcome::InvalidCredentials => Ok((
            StatusCode::OK,
            Json(LoginFailureResponse::invalid_credentials()),
        )
            .into_response()),
    }
}

// ============================================================================
// Logout
// ============================================================================

/// POST /v1/auth/logout
pub async fn logout<R>(
    State(state): State<IdentityAppState<R>>,
    headers: HeaderMap,
) -> IdentityResult<impl IntoResponse>
where
    R: AccountRepository + RoleRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let token =
        platform::cookie::extract_cookie(&headers, &state.config.session_cookie_name);

    let use_case = LogoutUseCase::new(state.repo.clone(), state.config.clone());
    use_case.execute(token.as_deref()).await?;

    let delete_cookie = state.config.cookie().build_delete_cookie();

    Ok((
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, delete_cookie)],
    ))
}

// ============================================================================
// Current Account
// ============================================================================

/// GET /v1/auth/me
///
/// Runs behind the session guard; the guard puts `CurrentAccount` into
/// request extensions.
pub async fn me(
    axum::Extension(current): axum::Extension<CurrentAccount>,
) -> IdentityResult<Json<MeResponse>> {
    let expires_at = current.session.expires_at;

    Ok(Json(MeResponse {
        account: AccountDto::from_account(current.account, &current.roles),
        session_expires_at: expires_at,
    }))
}

/// PATCH /v1/auth/me
pub async fn update_me<R>(
    State(state): State<IdentityAppState<R>>,
    axum::Extension(current): axum::Extension<CurrentAccount>,
    Json(req): Json<UpdateProfileRequest>,
) -> IdentityResult<Json<AccountDto>>
where
    R: AccountRepository + RoleRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let use_case = UpdateProfileUseCase::new(state.repo.clone());
    let account = use_case.execute(current.account.id, req.display_name).await?;

    Ok(Json(AccountDto::from_account(account, &current.roles)))
}
