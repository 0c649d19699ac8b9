//! Session and Role Guards
//!
//! Two composable middleware layers:
//!
//! * [`require_session`] resolves the cookie to a [`CurrentAccount`] and
//!   stores it in request extensions; failures answer 401 with the
//!   `authentication_required` code.
//! * [`require_roles`] runs after it and answers 403 `forbidden` unless
//!   the account holds at least one of the role keys declared at router
//!   construction.
//!
//! Keeping the two separate means a route's access rules are visible in
//! the router, not buried in handler bodies.

use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::application::config::IdentityConfig;
use crate::application::{CurrentAccount, CurrentSessionUseCase};
use crate::domain::repository::{AccountRepository, RoleRepository, SessionRepository};
use crate::error::IdentityError;

/// Guard middleware state
#[derive(Clone)]
pub struct GuardState<R>
where
    R: AccountRepository + RoleRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<IdentityConfig>,
}

/// Middleware that requires a valid session cookie.
///
/// On success the resolved [`CurrentAccount`] is inserted into request
/// extensions for handlers and downstream guards.
pub async fn require_session<R>(
    state: GuardState<R>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    R: AccountRepository + RoleRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let token =
        platform::cookie::extract_cookie(req.headers(), &state.config.session_cookie_name);

    let use_case = CurrentSessionUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.repo.clone(),
        state.config.clone(),
    );

    let current = use_case
        .execute(token.as_deref())
        .await
        .map_err(|e| e.into_response())?;

    req.extensions_mut().insert(current);

    Ok(next.run(req).await)
}

/// Middleware that requires any of the given role keys.
///
/// Must be layered inside [`require_session`]; a missing `CurrentAccount`
/// extension means the session guard did not run and is answered 401.
pub async fn require_roles(
    required: Arc<Vec<String>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let Some(current) = req.extensions().get::<CurrentAccount>() else {
        return Err(IdentityError::AuthenticationRequired.into_response());
    };

    let required: Vec<&str> = required.iter().map(String::as_str).collect();
    if !current.has_any_role(&required) {
        return Err(IdentityError::Forbidden.into_response());
    }

    Ok(next.run(req).await)
}
