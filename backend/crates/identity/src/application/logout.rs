//! Logout Use Case
//!
//! Deletes the server-side session. A missing, unsigned, or already
//! deleted session still logs out cleanly; the handler clears the cookie
//! regardless.

use std::sync::Arc;

use crate::application::config::IdentityConfig;
use crate::application::session_token;
use crate::domain::repository::SessionRepository;
use crate::error::IdentityResult;

/// Logout use case
pub struct LogoutUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
    config: Arc<IdentityConfig>,
}

impl<S> LogoutUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>, config: Arc<IdentityConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    pub async fn execute(&self, session_token: Option<&str>) -> IdentityResult<()> {
        let Some(token) = session_token else {
            return Ok(());
        };

        let Some(session_id) = session_token::parse(token, &self.config.session_secret) else {
            return Ok(());
        };

        self.session_repo.delete(session_id).await?;

        tracing::info!(session_id = %session_id, "Session terminated");
        Ok(())
    }
}
