//! Identity Router

use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::IdentityConfig;
use crate::domain::repository::{AccountRepository, RoleRepository, SessionRepository};
use crate::infra::postgres::PgIdentityRepository;
use crate::presentation::handlers::{self, IdentityAppState};
use crate::presentation::middleware::{GuardState, require_session};

/// Create the identity router with PostgreSQL repository
pub fn auth_router(repo: PgIdentityRepository, config: IdentityConfig) -> Router {
    auth_router_generic(repo, config)
}

/// Create a generic identity router for any repository implementation
pub fn auth_router_generic<R>(repo: R, config: IdentityConfig) -> Router
where
    R: AccountRepository + RoleRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let state = IdentityAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };

    let guard = GuardState {
        repo: state.repo.clone(),
        config: state.config.clone(),
    };

    let protected = Router::new()
        .route("/me", get(handlers::me).patch(handlers::update_me::<R>))
        .layer(from_fn(move |req, next| {
            require_session(guard.clone(), req, next)
        }));

    Router::new()
        .route("/register", post(handlers::register::<R>))
        .route("/login", post(handlers::login::<R>))
        .route("/logout", post(handlers::logout::<R>))
        .merge(protected)
        .with_state(state)
}
