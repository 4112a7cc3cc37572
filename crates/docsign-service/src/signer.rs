//! # Document Signer
//!
//! Orchestrates one signing operation: passphrase gate → usability
//! re-check → envelope unwrap → canonical hash → Ed25519 → persist.
//!
//! ## Ordering Invariant
//!
//! The signature row is durably appended *before* the document is marked
//! signed, never the reverse. A crash between the two leaves only the
//! safely-retriable state "signature exists, document not yet flagged" —
//! a signed flag without a signature row can never occur.
//!
//! ## Security Invariant
//!
//! - The unwrapped private seed lives inside `Zeroizing` for the shortest
//!   possible scope and is dropped before any store is touched.
//! - Key usability is re-checked on a fresh row read at decryption time:
//!   a revoke that lands after selection but before decryption aborts
//!   the signing.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use docsign_core::{payload_digest, CanonicalPayload, DocumentId, Error, KeyId, Timestamp, UserId};
use docsign_crypto::ed25519::{Ed25519KeyPair, Ed25519Signature};
use docsign_crypto::envelope::{unwrap, MasterKey};
use docsign_crypto::verify_passphrase;
use docsign_keys::SigningKeyRegistry;

use crate::signature::{DocumentSignature, SignatureStore};
use crate::store::DocumentStore;

/// The result of a successful signing operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedDocument {
    /// The key that signed.
    pub key_id: KeyId,
    /// SHA-256 canonical payload hash, 64 lowercase hex chars.
    pub payload_hash: String,
    /// The Ed25519 signature over the hash bytes.
    pub signature: Ed25519Signature,
    /// Issue time of the signature row.
    pub signed_at: Timestamp,
}

/// Signs documents with the requesting user's latest usable key.
pub struct DocumentSigner {
    registry: Arc<SigningKeyRegistry>,
    documents: Arc<dyn DocumentStore>,
    signatures: Arc<dyn SignatureStore>,
}

impl DocumentSigner {
    /// Build a signer over its collaborators.
    pub fn new(
        registry: Arc<SigningKeyRegistry>,
        documents: Arc<dyn DocumentStore>,
        signatures: Arc<dyn SignatureStore>,
    ) -> Self {
        Self {
            registry,
            documents,
            signatures,
        }
    }

    /// Sign a document on behalf of `signer`.
    ///
    /// All cryptographic steps complete before anything is persisted, so
    /// any failure aborts wholly — no partial signature is ever stored.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] — document absent, no usable key, or the
    ///   selected key lost usability before decryption.
    /// - [`Error::Forbidden`] — wrong passphrase (no further detail).
    /// - [`Error::Configuration`] — master key missing or malformed.
    /// - [`Error::Integrity`] — envelope unwrap failed (operational alarm).
    pub fn sign_document(
        &self,
        document_id: &DocumentId,
        signer: &UserId,
        passphrase: &str,
        master_key: Option<&MasterKey>,
    ) -> Result<SignedDocument, Error> {
        let document = self
            .documents
            .load(document_id)?
            .ok_or_else(|| Error::NotFound(format!("document {document_id} not found")))?;

        let selected = self.registry.find_usable_for(signer)?;

        if !verify_passphrase(passphrase, &selected.passphrase_hash) {
            return Err(Error::Forbidden("passphrase verification failed".into()));
        }

        let master_key = master_key
            .ok_or_else(|| Error::Configuration("master key not configured".into()))?;

        // Fresh row read: a concurrent revoke may have landed since
        // selection. Decrypt only against the re-validated row.
        let key = self.registry.get(&selected.kid)?;
        if !key.is_usable_at(Timestamp::now()) {
            return Err(Error::NotFound(format!(
                "signing key {} is no longer usable",
                key.kid
            )));
        }

        let digest = payload_digest(&CanonicalPayload::of(&document));
        let signature = {
            let seed = unwrap(&key.encrypted_private.to_envelope()?, master_key)?;
            let pair = Ed25519KeyPair::from_seed(&seed)?;
            pair.sign(&digest)
        }; // seed zeroized here, before any persistence

        let signed_at = Timestamp::now();
        let row = DocumentSignature {
            document_id: *document_id,
            key_id: key.kid,
            payload_hash: digest.to_hex(),
            signature: signature.clone(),
            signed_at,
            signer_user_id: *signer,
        };

        // Signature row first, signed flag second — never the reverse.
        self.signatures.append(row)?;
        self.documents.mark_signed(document_id, &key.kid)?;

        tracing::info!(
            document = %document_id,
            kid = %key.kid,
            signer = %signer,
            "document signed"
        );

        Ok(SignedDocument {
            key_id: key.kid,
            payload_hash: digest.to_hex(),
            signature,
            signed_at,
        })
    }
}
