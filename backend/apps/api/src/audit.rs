//! Audit Trail Middleware
//!
//! Every response carries an `x-request-id` header, and every request
//! lands as an `audit_logs` row keyed by that same id, recording method,
//! path, response status, duration, client address, and (when a valid
//! session cookie is present) the acting account. Inserts are best effort
//! and spawned off the request path; a full audit table must never take
//! the API down.

use std::time::Instant;

use axum::body::Body;
use axum::http::{HeaderName, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;
use sqlx::PgPool;
use uuid::Uuid;

use identity::application::session_token;
use platform::client::{extract_client_ip, extract_user_agent};
use platform::cookie::extract_cookie;

static REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// State captured by the audit middleware closure
#[derive(Clone)]
pub struct AuditState {
    pub pool: PgPool,
    pub session_secret: [u8; 32],
    pub cookie_name: String,
}

pub async fn audit_trail(state: AuditState, req: Request<Body>, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let started = Instant::now();

    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let client_ip = extract_client_ip(req.headers(), None).map(|ip| ip.to_string());
    let user_agent = extract_user_agent(req.headers());

    // The actor is resolved from the cookie alone; the signature check
    // keeps forged ids out without an extra guard round-trip.
    let session_id = extract_cookie(req.headers(), &state.cookie_name)
        .and_then(|token| session_token::parse(&token, &state.session_secret));

    let mut response = next.run(req).await;

    response.headers_mut().insert(
        REQUEST_ID.clone(),
        HeaderValue::from_str(&request_id.to_string())
            .unwrap_or_else(|_| HeaderValue::from_static("")),
    );

    let status = response.status().as_u16() as i32;
    let duration_ms = i32::try_from(started.elapsed().as_millis()).unwrap_or(i32::MAX);
    let AuditState { pool, .. } = state;

    tokio::spawn(async move {
        let account_id = match session_id {
            Some(id) => {
                sqlx::query_scalar::<_, Uuid>("SELECT account_id FROM sessions WHERE id = $1")
                    .bind(id.as_uuid())
                    .fetch_optional(&pool)
                    .await
                    .unwrap_or_default()
            }
            None => None,
        };

        let result = sqlx::query(
            r#"
            INSERT INTO audit_logs (
                id, method, path, status, account_id, duration_ms,
                client_ip, user_agent, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, now())
            "#,
        )
        .bind(request_id)
        .bind(&method)
        .bind(&path)
        .bind(status)
        .bind(account_id)
        .bind(duration_ms)
        .bind(client_ip.as_deref())
        .bind(user_agent.as_deref())
        .execute(&pool)
        .await;

        if let Err(e) = result {
            tracing::warn!(error = %e, method = %method, path = %path, "Audit insert failed");
        }
    });

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::middleware::from_fn;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    fn test_state() -> AuditState {
        AuditState {
            // Lazy pool: no connection is made until a query runs, and the
            // spawned insert failing in the background is the expected path
            // here.
            pool: sqlx::postgres::PgPoolOptions::new()
                .connect_lazy("postgres://localhost/unreachable")
                .unwrap(),
            session_secret: [7u8; 32],
            cookie_name: "posta_session".to_string(),
        }
    }

    async fn request_id_for(method: &str) -> Uuid {
        let state = test_state();
        let app = Router::new()
            .route("/ping", get(|| async { "pong" }).post(|| async { "pong" }))
            .layer(from_fn(move |req, next| {
                audit_trail(state.clone(), req, next)
            }));

        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri("/ping")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let header = response
            .headers()
            .get("x-request-id")
            .expect("every response carries a request id")
            .to_str()
            .unwrap()
            .to_string();
        Uuid::parse_str(&header).expect("request id is a uuid")
    }

    #[tokio::test]
    async fn test_reads_and_writes_both_get_a_request_id() {
        let get_id = request_id_for("GET").await;
        let post_id = request_id_for("POST").await;
        assert_ne!(get_id, post_id);
    }
}
