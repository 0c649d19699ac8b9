//! Overview Use Case
//!
//! Dashboard snapshot: database reachability plus platform counters.
//! A failed ping degrades the snapshot instead of failing the request,
//! so the console still renders during a database incident.

use std::sync::Arc;

use crate::domain::repository::{OverviewCounts, OverviewRepository};
use crate::error::AdminResult;

/// Overall platform status as shown on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformStatus {
    Ok,
    Error,
}

impl PlatformStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformStatus::Ok => "ok",
            PlatformStatus::Error => "error",
        }
    }
}

/// Overview snapshot
#[derive(Debug, Clone)]
pub struct Overview {
    pub status: PlatformStatus,
    pub counts: OverviewCounts,
}

/// Overview use case
pub struct OverviewUseCase<O>
where
    O: OverviewRepository,
{
    overview_repo: Arc<O>,
}

impl<O> OverviewUseCase<O>
where
    O: OverviewRepository,
{
    pub fn new(overview_repo: Arc<O>) -> Self {
        Self { overview_repo }
    }

    pub async fn execute(&self) -> AdminResult<Overview> {
        let (ping, counts) =
            tokio::join!(self.overview_repo.ping(), self.overview_repo.counts());

        match (ping, counts) {
            (Ok(()), Ok(counts)) => Ok(Overview {
                status: PlatformStatus::Ok,
                counts,
            }),
            (ping, counts) => {
                if let Err(e) = &ping {
                    tracing::warn!(error = %e, "Overview ping failed");
                }
                if let Err(e) = &counts {
                    tracing::warn!(error = %e, "Overview counts failed");
                }
                Ok(Overview {
                    status: PlatformStatus::Error,
                    counts: counts.unwrap_or_default(),
                })
            }
        }
    }
}
