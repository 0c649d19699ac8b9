//! Bootstrap Admin Binary
//!
//! One-shot tool that seeds (or repairs) the first platform
//! administrator, then exits. Safe to re-run: an existing account gets
//! its password reset and the admin role ensured.
//!
//! ```sh
//! cargo run -p api --bin bootstrap_admin -- \
//!     --phone +255712345678 --password change-me-now --displayName "Root Admin"
//! ```
//!
//! Each flag falls back to its `BOOTSTRAP_ADMIN_*` environment variable.

use std::env;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use identity::PgIdentityRepository;
use identity::application::{BootstrapAdminUseCase, BootstrapInput};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bootstrap_admin=info,identity=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse(env::args().skip(1))?;

    let database_url = env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set in environment"))?;
    let phone = args
        .phone
        .or_else(|| env::var("BOOTSTRAP_ADMIN_PHONE").ok())
        .ok_or_else(|| anyhow::anyhow!("--phone (or BOOTSTRAP_ADMIN_PHONE) must be set"))?;
    let password = args
        .password
        .or_else(|| env::var("BOOTSTRAP_ADMIN_PASSWORD").ok())
        .ok_or_else(|| anyhow::anyhow!("--password (or BOOTSTRAP_ADMIN_PASSWORD) must be set"))?;
    let display_name = args
        .display_name
        .or_else(|| env::var("BOOTSTRAP_ADMIN_NAME").ok());

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await?;

    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    let repo = Arc::new(PgIdentityRepository::new(pool));
    let use_case = BootstrapAdminUseCase::new(repo.clone(), repo);

    let output = use_case
        .execute(BootstrapInput {
            phone,
            password,
            display_name,
        })
        .await?;

    if output.created {
        tracing::info!(account_id = %output.account.id, "Created platform admin");
    } else {
        tracing::info!(
            account_id = %output.account.id,
            "Updated existing account and ensured admin role"
        );
    }

    Ok(())
}

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    phone: Option<String>,
    password: Option<String>,
    display_name: Option<String>,
}

impl CliArgs {
    fn parse(mut args: impl Iterator<Item = String>) -> anyhow::Result<Self> {
        let mut parsed = Self::default();

        while let Some(arg) = args.next() {
            let slot = match arg.as_str() {
                "--phone" => &mut parsed.phone,
                "--password" => &mut parsed.password,
                "--displayName" => &mut parsed.display_name,
                other => anyhow::bail!("Unknown argument: {other}"),
            };

            *slot = Some(
                args.next()
                    .ok_or_else(|| anyhow::anyhow!("{arg} requires a value"))?,
            );
        }

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> std::vec::IntoIter<String> {
        args.iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn test_parse_all_flags() {
        let parsed = CliArgs::parse(strings(&[
            "--phone",
            "+255712345678",
            "--password",
            "change-me-now",
            "--displayName",
            "Root Admin",
        ]))
        .unwrap();

        assert_eq!(parsed.phone.as_deref(), Some("+255712345678"));
        assert_eq!(parsed.password.as_deref(), Some("change-me-now"));
        assert_eq!(parsed.display_name.as_deref(), Some("Root Admin"));
    }

    #[test]
    fn test_parse_empty_is_default() {
        assert_eq!(CliArgs::parse(strings(&[])).unwrap(), CliArgs::default());
    }

    #[test]
    fn test_parse_rejects_unknown_and_dangling() {
        assert!(CliArgs::parse(strings(&["--nope"])).is_err());
        assert!(CliArgs::parse(strings(&["--phone"])).is_err());
    }
}
