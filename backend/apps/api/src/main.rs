//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; application-level errors go through
//! `kernel::error::AppError`.

mod audit;
mod config;
mod health;

use admin::PgAdminRepository;
use axum::{
    Router, http,
    http::{Method, header},
    middleware::from_fn,
};
use identity::PgIdentityRepository;
use identity::domain::repository::SessionRepository;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppEnv;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,identity=info,admin=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let env = AppEnv::from_env()?;

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&env.database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Startup cleanup: sweep expired sessions
    // Errors here should not prevent server startup
    let identity_repo = PgIdentityRepository::new(pool.clone());
    match identity_repo.delete_expired().await {
        Ok(sessions) => {
            tracing::info!(sessions_deleted = sessions, "Session cleanup completed");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Session cleanup failed, continuing anyway");
        }
    }

    // CORS configuration
    let allowed_origins: Vec<http::HeaderValue> = env
        .frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let admin_repo = PgAdminRepository::new(pool.clone());
    let audit_state = audit::AuditState {
        pool: pool.clone(),
        session_secret: env.identity.session_secret,
        cookie_name: env.identity.session_cookie_name.clone(),
    };

    let app = Router::new()
        .nest(
            "/v1/auth",
            identity::auth_router(identity_repo.clone(), env.identity.clone()),
        )
        .nest(
            "/v1/admin",
            admin::admin_router(
                admin_repo.clone(),
                identity_repo.clone(),
                env.identity.clone(),
            ),
        )
        .nest("/v1/partner", admin::partner_router(admin_repo))
        .nest(
            "/health",
            health::health_router(pool.clone(), env.healthcheck_token.clone()),
        )
        .layer(from_fn(move |req, next| {
            audit::audit_trail(audit_state.clone(), req, next)
        }))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], env.port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
