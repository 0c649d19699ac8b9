//! Health Endpoints
//!
//! `/health/live` answers as long as the process runs; `/health/ready`
//! also probes the database. When HEALTHCHECK_TOKEN is configured, both
//! require it in the `x-healthcheck-token` header so the endpoints leak
//! nothing to the open internet.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::{Router, routing::get};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct HealthState {
    pub pool: PgPool,
    pub token: Option<Arc<String>>,
}

pub fn health_router(pool: PgPool, token: Option<String>) -> Router {
    let state = HealthState {
        pool,
        token: token.map(Arc::new),
    };

    Router::new()
        .route("/live", get(live))
        .route("/ready", get(ready))
        .with_state(state)
}

fn check_token(state: &HealthState, headers: &HeaderMap) -> Result<(), Response> {
    let Some(expected) = &state.token else {
        return Ok(());
    };

    let presented = headers
        .get("x-healthcheck-token")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if platform::crypto::constant_time_eq(presented.as_bytes(), expected.as_bytes()) {
        Ok(())
    } else {
        Err(StatusCode::NOT_FOUND.into_response())
    }
}

async fn live(State(state): State<HealthState>, headers: HeaderMap) -> Response {
    if let Err(resp) = check_token(&state, &headers) {
        return resp;
    }

    Json(json!({ "status": "ok" })).into_response()
}

async fn ready(State(state): State<HealthState>, headers: HeaderMap) -> Response {
    if let Err(resp) = check_token(&state, &headers) {
        return resp;
    }

    match sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.pool)
        .await
    {
        Ok(_) => Json(json!({ "status": "ok", "database": "ok" })).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness probe failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "database": "unreachable" })),
            )
                .into_response()
        }
    }
}
