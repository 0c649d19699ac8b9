//! API Key Use Cases
//!
//! Issuance, revocation, and bearer verification of partner API keys.
//!
//! Keys look like `ph_<43 base64url chars>`. Storage keeps only the
//! SHA-256 hex digest plus a short display prefix; verification narrows
//! by prefix, then compares digests in constant time, so the hot path
//! is a single indexed query with no Argon2 cost.

use std::sync::Arc;

use platform::crypto::{constant_time_eq, random_bytes, sha256_hex, to_base64url};

use kernel::id::{ApiKeyId, PartnerId};

use crate::domain::entity::{IssuedKey, NewApiKey, Partner, PartnerApiKey, PartnerStatus};
use crate::domain::repository::{ApiKeyRepository, PartnerRepository};
use crate::error::{AdminError, AdminResult};

/// Plaintext key prefix marking the credential type
const KEY_SIGIL: &str = "ph_";

/// Random material per key, before encoding
const KEY_BYTES: usize = 32;

/// Display prefix length, counted over the full plaintext
const PREFIX_LEN: usize = 10;

/// Generate a fresh plaintext key with its display prefix and hash
pub fn generate_key_material() -> (String, String, String) {
    let plaintext = format!("{KEY_SIGIL}{}", to_base64url(&random_bytes(KEY_BYTES)));
    let prefix = plaintext[..PREFIX_LEN].to_string();
    let hash = sha256_hex(plaintext.as_bytes());
    (plaintext, prefix, hash)
}

/// Issue API key use case
pub struct IssueApiKeyUseCase<P, K>
where
    P: PartnerRepository,
    K: ApiKeyRepository,
{
    partner_repo: Arc<P>,
    key_repo: Arc<K>,
}

impl<P, K> IssueApiKeyUseCase<P, K>
where
    P: PartnerRepository,
    K: ApiKeyRepository,
{
    pub fn new(partner_repo: Arc<P>, key_repo: Arc<K>) -> Self {
        Self {
            partner_repo,
            key_repo,
        }
    }

    /// Generate and persist a key for the partner.
    ///
    /// The returned [`IssuedKey`] is the only place the plaintext ever
    /// appears.
    pub async fn execute(
        &self,
        partner_id: PartnerId,
        label: Option<String>,
    ) -> AdminResult<IssuedKey> {
        self.partner_repo
            .find_by_id(partner_id)
            .await?
            .ok_or(AdminError::PartnerNotFound)?;

        let (plaintext, prefix, key_hash) = generate_key_material();

        let api_key = self
            .key_repo
            .insert(&NewApiKey {
                partner_id,
                prefix,
                key_hash,
                label: label.map(|l| l.trim().to_string()).filter(|l| !l.is_empty()),
            })
            .await?;

        tracing::info!(
            partner_id = %partner_id,
            key_id = %api_key.id,
            prefix = %api_key.prefix,
            "API key issued"
        );

        Ok(IssuedKey { api_key, plaintext })
    }
}

/// Revoke API key use case
pub struct RevokeApiKeyUseCase<K>
where
    K: ApiKeyRepository,
{
    key_repo: Arc<K>,
}

impl<K> RevokeApiKeyUseCase<K>
where
    K: ApiKeyRepository,
{
    pub fn new(key_repo: Arc<K>) -> Self {
        Self { key_repo }
    }

    /// Revoke a key. Revoking an already revoked key re-stamps the
    /// timestamp and still succeeds.
    pub async fn execute(&self, key_id: ApiKeyId) -> AdminResult<PartnerApiKey> {
        let key = self
            .key_repo
            .revoke(key_id)
            .await?
            .ok_or(AdminError::ApiKeyNotFound)?;

        tracing::info!(key_id = %key.id, partner_id = %key.partner_id, "API key revoked");
        Ok(key)
    }
}

/// Verify API key use case (partner bearer auth)
pub struct VerifyApiKeyUseCase<K>
where
    K: ApiKeyRepository,
{
    key_repo: Arc<K>,
}

impl<K> VerifyApiKeyUseCase<K>
where
    K: ApiKeyRepository,
{
    pub fn new(key_repo: Arc<K>) -> Self {
        Self { key_repo }
    }

    /// Resolve a presented plaintext key to its partner.
    ///
    /// Unknown and revoked keys both fail with [`AdminError::InvalidApiKey`].
    pub async fn execute(&self, presented: &str) -> AdminResult<(Partner, PartnerApiKey)> {
        if !presented.starts_with(KEY_SIGIL) || presented.len() < PREFIX_LEN {
            return Err(AdminError::InvalidApiKey);
        }

        let hash = sha256_hex(presented.as_bytes());

        let candidates = self
            .key_repo
            .find_active_by_prefix(&presented[..PREFIX_LEN])
            .await?;

        let (key, partner) = candidates
            .into_iter()
            .find(|(key, _)| constant_time_eq(key.key_hash.as_bytes(), hash.as_bytes()))
            .ok_or(AdminError::InvalidApiKey)?;

        // Suspension disables all of a partner's keys without revoking them.
        if partner.status != PartnerStatus::Active {
            return Err(AdminError::InvalidApiKey);
        }

        // Best effort; a failed stamp must not fail the request.
        if let Err(e) = self.key_repo.touch_last_used(key.id).await {
            tracing::warn!(key_id = %key.id, error = %e, "Failed to stamp API key usage");
        }

        Ok((partner, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_material_shape() {
        let (plaintext, prefix, hash) = generate_key_material();

        assert!(plaintext.starts_with("ph_"));
        // 3 sigil chars + 43 chars of unpadded base64url over 32 bytes
        assert_eq!(plaintext.len(), 46);
        assert_eq!(prefix, plaintext[..10]);
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_keys_are_unique() {
        let (a, _, _) = generate_key_material();
        let (b, _, _) = generate_key_material();
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_matches_plaintext() {
        let (plaintext, _, hash) = generate_key_material();
        assert_eq!(hash, sha256_hex(plaintext.as_bytes()));
    }

    mod verification {
        use super::super::*;
        use chrono::Utc;
        use kernel::id::Id;

        /// Repository serving one key for a partner in a fixed status.
        #[derive(Clone)]
        struct SingleKeyRepo {
            prefix: String,
            key_hash: String,
            partner_status: PartnerStatus,
        }

        impl SingleKeyRepo {
            fn pair(&self) -> (PartnerApiKey, Partner) {
                let now = Utc::now();
                let partner = Partner {
                    id: Id::new(),
                    name: "Posta Wallet".to_string(),
                    status: self.partner_status,
                    created_at: now,
                    updated_at: now,
                };
                let key = PartnerApiKey {
                    id: Id::new(),
                    partner_id: partner.id,
                    prefix: self.prefix.clone(),
                    key_hash: self.key_hash.clone(),
                    label: None,
                    revoked_at: None,
                    last_used_at: None,
                    created_at: now,
                };
                (key, partner)
            }
        }

        impl ApiKeyRepository for SingleKeyRepo {
            async fn insert(&self, _key: &NewApiKey) -> AdminResult<PartnerApiKey> {
                unimplemented!("not used in verification tests")
            }

            async fn list_for_partner(
                &self,
                _partner_id: kernel::id::PartnerId,
            ) -> AdminResult<Vec<PartnerApiKey>> {
                Ok(vec![])
            }

            async fn revoke(&self, _key_id: ApiKeyId) -> AdminResult<Option<PartnerApiKey>> {
                Ok(None)
            }

            async fn find_active_by_prefix(
                &self,
                prefix: &str,
            ) -> AdminResult<Vec<(PartnerApiKey, Partner)>> {
                if prefix == self.prefix {
                    Ok(vec![self.pair()])
                } else {
                    Ok(vec![])
                }
            }

            async fn touch_last_used(&self, _key_id: ApiKeyId) -> AdminResult<()> {
                Ok(())
            }
        }

        fn repo_with(status: PartnerStatus) -> (Arc<SingleKeyRepo>, String) {
            let (plaintext, prefix, hash) = generate_key_material();
            let repo = Arc::new(SingleKeyRepo {
                prefix,
                key_hash: hash,
                partner_status: status,
            });
            (repo, plaintext)
        }

        #[tokio::test]
        async fn test_verify_accepts_active_partner_key() {
            let (repo, plaintext) = repo_with(PartnerStatus::Active);
            let use_case = VerifyApiKeyUseCase::new(repo);

            let (partner, key) = use_case.execute(&plaintext).await.unwrap();
            assert_eq!(partner.status, PartnerStatus::Active);
            assert_eq!(key.key_hash, sha256_hex(plaintext.as_bytes()));
        }

        #[tokio::test]
        async fn test_verify_rejects_suspended_partner_key() {
            let (repo, plaintext) = repo_with(PartnerStatus::Suspended);
            let use_case = VerifyApiKeyUseCase::new(repo);

            let err = use_case.execute(&plaintext).await.unwrap_err();
            assert!(matches!(err, AdminError::InvalidApiKey));
        }

        #[tokio::test]
        async fn test_verify_rejects_wrong_key_under_same_prefix() {
            let (repo, plaintext) = repo_with(PartnerStatus::Active);
            let use_case = VerifyApiKeyUseCase::new(repo);

            // Same length and sigil, different material.
            let mut forged = plaintext.clone();
            let last = if forged.ends_with('A') { 'B' } else { 'A' };
            forged.pop();
            forged.push(last);

            let err = use_case.execute(&forged).await.unwrap_err();
            assert!(matches!(err, AdminError::InvalidApiKey));
        }
    }
}
