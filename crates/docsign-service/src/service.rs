//! # Service Facade — External Interfaces
//!
//! The five operations external collaborators call. The facade wires the
//! registry, signer, and verifier to shared stores and holds the master
//! key supplied once at construction — never accepted as request data.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use docsign_core::{DocumentId, Error, KeyId, Timestamp, UserId};
use docsign_crypto::envelope::MasterKey;
use docsign_keys::{KeyStore, PassphrasePolicy, SigningKeyRegistry, UserDirectory};

use crate::signature::SignatureStore;
use crate::signer::{DocumentSigner, SignedDocument};
use crate::store::DocumentStore;
use crate::verifier::{DocumentVerifier, VerificationReport};

/// Response to a key creation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedKey {
    /// The fresh key identifier.
    pub kid: KeyId,
    /// The expiry that was set, if any.
    pub expires_at: Option<Timestamp>,
}

/// Response to a revocation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevokedKey {
    /// The revoked key.
    pub kid: KeyId,
    /// When revocation took effect (the original instant on re-revoke).
    pub revoked_at: Timestamp,
}

/// The document signing service.
///
/// Operations are short-lived and stateless; the facade itself is
/// shareable across request handlers (`Arc<SigningService>`).
pub struct SigningService {
    registry: Arc<SigningKeyRegistry>,
    signer: DocumentSigner,
    verifier: DocumentVerifier,
    master_key: Option<MasterKey>,
}

impl SigningService {
    /// Wire the service to its stores and collaborators.
    ///
    /// `master_key` is `None` when the deployment has not configured one;
    /// every operation that needs it then fails with
    /// [`Error::Configuration`] instead of panicking at startup.
    pub fn new(
        keys: Arc<dyn KeyStore>,
        signatures: Arc<dyn SignatureStore>,
        documents: Arc<dyn DocumentStore>,
        users: Arc<dyn UserDirectory>,
        policy: Arc<dyn PassphrasePolicy>,
        master_key: Option<MasterKey>,
    ) -> Self {
        let registry = Arc::new(SigningKeyRegistry::new(keys, users, policy));
        let signer = DocumentSigner::new(registry.clone(), documents.clone(), signatures.clone());
        let verifier = DocumentVerifier::new(registry.clone(), documents, signatures);
        Self {
            registry,
            signer,
            verifier,
            master_key,
        }
    }

    fn master_key(&self) -> Result<&MasterKey, Error> {
        self.master_key
            .as_ref()
            .ok_or_else(|| Error::Configuration("master key not configured".into()))
    }

    /// Create a signing key for `assigned_to`.
    ///
    /// `created_by` is recorded for the audit trail only; authorization
    /// is the caller's concern.
    pub fn create_signing_key(
        &self,
        created_by: &UserId,
        assigned_to: UserId,
        expires_at: Option<Timestamp>,
        passphrase: &str,
    ) -> Result<CreatedKey, Error> {
        let master_key = self.master_key()?;
        let key = self
            .registry
            .create(assigned_to, expires_at, passphrase, master_key)?;
        tracing::info!(kid = %key.kid, created_by = %created_by, "key creation requested");
        Ok(CreatedKey {
            kid: key.kid,
            expires_at: key.expires_at,
        })
    }

    /// Revoke a signing key. Idempotent.
    pub fn revoke_signing_key(&self, kid: &KeyId) -> Result<RevokedKey, Error> {
        let revoked_at = self.registry.revoke(kid)?;
        Ok(RevokedKey {
            kid: *kid,
            revoked_at,
        })
    }

    /// Change the passphrase on a live key.
    pub fn change_passphrase(&self, kid: &KeyId, old: &str, new: &str) -> Result<KeyId, Error> {
        self.registry.change_passphrase(kid, old, new)?;
        Ok(*kid)
    }

    /// Sign a document with the signer's latest usable key.
    pub fn sign_document(
        &self,
        document_id: &DocumentId,
        signer_user_id: &UserId,
        passphrase: &str,
    ) -> Result<SignedDocument, Error> {
        self.signer.sign_document(
            document_id,
            signer_user_id,
            passphrase,
            self.master_key.as_ref(),
        )
    }

    /// Verify a document's current signature. Pure read.
    pub fn verify_document(&self, document_id: &DocumentId) -> Result<VerificationReport, Error> {
        self.verifier.verify_document(document_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::InMemorySignatureStore;
    use crate::store::InMemoryDocumentStore;
    use docsign_keys::{InMemoryKeyStore, InMemoryUserDirectory, InstitutionalPolicy};

    fn service_without_master_key() -> (SigningService, Arc<InMemoryUserDirectory>) {
        let users = Arc::new(InMemoryUserDirectory::new());
        let service = SigningService::new(
            Arc::new(InMemoryKeyStore::new()),
            Arc::new(InMemorySignatureStore::new()),
            Arc::new(InMemoryDocumentStore::new()),
            users.clone(),
            Arc::new(InstitutionalPolicy::default()),
            None,
        );
        (service, users)
    }

    #[test]
    fn test_create_without_master_key_is_configuration_error() {
        let (service, users) = service_without_master_key();
        let owner = UserId::new();
        users.add(owner);
        let err = service
            .create_signing_key(&UserId::new(), owner, None, "CA-Secret!1")
            .unwrap_err();
        assert_eq!(err.kind(), "CONFIGURATION");
    }

    #[test]
    fn test_revoke_unknown_key_is_not_found() {
        let (service, _) = service_without_master_key();
        let err = service.revoke_signing_key(&KeyId::new()).unwrap_err();
        assert_eq!(err.kind(), "NOT_FOUND");
    }
}
