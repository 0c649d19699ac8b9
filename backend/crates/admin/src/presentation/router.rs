//! Admin and Partner Routers
//!
//! The admin router is gated twice: the session guard resolves the
//! cookie, then the role guard requires `platform_admin`. Both guards are
//! declared here so a route's access rules are visible at a glance.

use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};
use std::sync::Arc;

use identity::application::IdentityConfig;
use identity::domain::value_object::ROLE_PLATFORM_ADMIN;
use identity::infra::PgIdentityRepository;
use identity::presentation::{GuardState, require_roles, require_session};

use crate::infra::PgAdminRepository;
use crate::presentation::handlers::{self, AdminAppState, PartnerAppState};

/// Create the admin console router (mounted under `/v1/admin`)
pub fn admin_router(
    admin_repo: PgAdminRepository,
    identity_repo: PgIdentityRepository,
    config: IdentityConfig,
) -> Router {
    type A = PgAdminRepository;
    type R = PgIdentityRepository;

    let state = AdminAppState::<A, R> {
        admin: Arc::new(admin_repo),
        identity: Arc::new(identity_repo),
    };

    let guard = GuardState {
        repo: state.identity.clone(),
        config: Arc::new(config),
    };

    let required_roles = Arc::new(vec![ROLE_PLATFORM_ADMIN.to_string()]);

    Router::new()
        .route("/overview", get(handlers::overview::<A, R>))
        .route("/accounts", get(handlers::search_accounts::<A, R>))
        .route("/accounts/{id}", get(handlers::get_account::<A, R>))
        .route(
            "/accounts/{id}/roles/add",
            post(handlers::assign_role::<A, R>),
        )
        .route(
            "/accounts/{id}/roles/remove",
            post(handlers::remove_role::<A, R>),
        )
        .route(
            "/partners",
            get(handlers::list_partners::<A, R>).post(handlers::create_partner::<A, R>),
        )
        .route("/partners/{id}", get(handlers::get_partner::<A, R>))
        .route(
            "/partners/{id}/api-keys",
            get(handlers::list_keys::<A, R>).post(handlers::issue_key::<A, R>),
        )
        .route(
            "/partners/api-keys/{id}/revoke",
            post(handlers::revoke_key::<A, R>),
        )
        .layer(from_fn(move |req, next| {
            require_roles(required_roles.clone(), req, next)
        }))
        .layer(from_fn(move |req, next| {
            require_session(guard.clone(), req, next)
        }))
        .with_state(state)
}

/// Create the partner self-service router (mounted under `/v1/partner`)
pub fn partner_router(admin_repo: PgAdminRepository) -> Router {
    let state = PartnerAppState {
        admin: Arc::new(admin_repo),
    };

    Router::new()
        .route("/me", get(handlers::partner_me::<PgAdminRepository>))
        .with_state(state)
}
