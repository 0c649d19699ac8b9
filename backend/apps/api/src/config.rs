//! Server Environment Configuration
//!
//! All knobs come from the environment (optionally via `.env`). Secrets
//! are required in release builds; debug builds fall back to random
//! per-process values so local setup needs nothing beyond DATABASE_URL.

use std::env;

use base64::Engine;
use base64::engine::general_purpose;

use identity::application::IdentityConfig;

/// Parsed server environment
pub struct AppEnv {
    pub database_url: String,
    pub port: u16,
    pub frontend_origins: Vec<String>,
    pub healthcheck_token: Option<String>,
    pub identity: IdentityConfig,
}

impl AppEnv {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set in environment"))?;

        let port = match env::var("PORT") {
            Ok(raw) => raw.parse()?,
            Err(_) => 8080,
        };

        let frontend_origins = env::var("FRONTEND_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string())
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();

        let healthcheck_token = env::var("HEALTHCHECK_TOKEN").ok().filter(|t| !t.is_empty());

        let identity = if cfg!(debug_assertions) {
            IdentityConfig::development()
        } else {
            let secret_b64 = env::var("SESSION_SECRET")
                .map_err(|_| anyhow::anyhow!("SESSION_SECRET must be set in production"))?;
            let secret_bytes = Engine::decode(&general_purpose::STANDARD, &secret_b64)?;

            if secret_bytes.len() != 32 {
                anyhow::bail!("SESSION_SECRET must decode to exactly 32 bytes");
            }

            let mut secret = [0u8; 32];
            secret.copy_from_slice(&secret_bytes);

            IdentityConfig {
                session_secret: secret,
                ..IdentityConfig::default()
            }
        };

        Ok(Self {
            database_url,
            port,
            frontend_origins,
            healthcheck_token,
            identity,
        })
    }
}
