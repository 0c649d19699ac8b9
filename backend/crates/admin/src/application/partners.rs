//! Partner Use Cases

use std::sync::Arc;

use kernel::id::PartnerId;

use crate::domain::entity::{NewPartner, Partner};
use crate::domain::repository::PartnerRepository;
use crate::error::{AdminError, AdminResult};

/// Partner management use case
pub struct ManagePartnersUseCase<P>
where
    P: PartnerRepository,
{
    partner_repo: Arc<P>,
}

impl<P> ManagePartnersUseCase<P>
where
    P: PartnerRepository,
{
    pub fn new(partner_repo: Arc<P>) -> Self {
        Self { partner_repo }
    }

    /// Register a new partner; new partners always start active.
    pub async fn create(&self, name: String) -> AdminResult<Partner> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(AdminError::Validation("Partner name is required".to_string()));
        }

        let partner = self.partner_repo.create(&NewPartner { name }).await?;

        tracing::info!(partner_id = %partner.id, "Partner registered");
        Ok(partner)
    }

    /// List all partners, newest first
    pub async fn list(&self) -> AdminResult<Vec<Partner>> {
        self.partner_repo.list().await
    }

    /// Fetch a single partner
    pub async fn get(&self, partner_id: PartnerId) -> AdminResult<Partner> {
        self.partner_repo
            .find_by_id(partner_id)
            .await?
            .ok_or(AdminError::PartnerNotFound)
    }
}
