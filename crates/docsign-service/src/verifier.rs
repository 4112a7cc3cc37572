//! # Document Verifier
//!
//! Re-checks a document against its current signature. Verification is a
//! pure read: no key, signature, or document state is ever written.
//!
//! "Invalid" is a legitimate terminal answer, so every negative outcome
//! is data in the [`VerificationReport`] — never an error. Errors are
//! reserved for states that should not occur (the signature references a
//! key that no longer has a row).

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use docsign_core::{payload_digest, CanonicalPayload, DocumentId, Error, KeyId, PayloadDigest, Timestamp};
use docsign_crypto::ed25519::verify_digest;
use docsign_keys::SigningKeyRegistry;

use crate::signature::SignatureStore;
use crate::store::DocumentStore;

/// Why a verification returned its verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationReason {
    /// Signature is valid and the key is still trusted.
    Ok,
    /// The Ed25519 signature does not verify against the stored hash.
    SignatureInvalid,
    /// The document's canonical fields changed after signing.
    PayloadHashMismatch,
    /// The signing key is revoked, deleted, or expired — trust decayed.
    KeyRevoked,
    /// The document has no signature at all.
    Unsigned,
}

impl VerificationReason {
    /// The wire tag for this reason.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::SignatureInvalid => "SIGNATURE_INVALID",
            Self::PayloadHashMismatch => "PAYLOAD_HASH_MISMATCH",
            Self::KeyRevoked => "KEY_REVOKED",
            Self::Unsigned => "UNSIGNED",
        }
    }
}

impl std::fmt::Display for VerificationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The structured outcome of a verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// Whether the current signature stands.
    pub valid: bool,
    /// Why.
    pub reason: VerificationReason,
    /// The signing key, when a signature exists.
    pub key_id: Option<KeyId>,
    /// When the current signature was issued, when one exists.
    pub signed_at: Option<Timestamp>,
    /// The stored payload hash, when a signature exists.
    pub payload_hash: Option<String>,
}

impl VerificationReport {
    fn invalid(reason: VerificationReason) -> Self {
        Self {
            valid: false,
            reason,
            key_id: None,
            signed_at: None,
            payload_hash: None,
        }
    }
}

/// Verifies documents against their current signatures.
pub struct DocumentVerifier {
    registry: Arc<SigningKeyRegistry>,
    documents: Arc<dyn DocumentStore>,
    signatures: Arc<dyn SignatureStore>,
}

impl DocumentVerifier {
    /// Build a verifier over its collaborators.
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

    /// Verify a document's current signature.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] — the document does not exist, or a
    ///   signature references a key with no row (a custody fault, not a
    ///   verification verdict).
    pub fn verify_document(&self, document_id: &DocumentId) -> Result<VerificationReport, Error> {
        let document = self
            .documents
            .load(document_id)?
            .ok_or_else(|| Error::NotFound(format!("document {document_id} not found")))?;

        let Some(signature) = self.signatures.current_for(document_id)? else {
            return Ok(VerificationReport::invalid(VerificationReason::Unsigned));
        };

        let mut report = VerificationReport {
            valid: false,
            reason: VerificationReason::Unsigned,
            key_id: Some(signature.key_id),
            signed_at: Some(signature.signed_at),
            payload_hash: Some(signature.payload_hash.clone()),
        };

        // Trust decays to invalid the moment the key stops being usable —
        // no document or signature rows are touched.
        let key = self.registry.get(&signature.key_id)?;
        if !key.is_usable_at(Timestamp::now()) {
            report.reason = VerificationReason::KeyRevoked;
            return Ok(report);
        }

        // Recompute from current fields: did the document mutate?
        let recomputed = payload_digest(&CanonicalPayload::of(&document));
        if recomputed.to_hex() != signature.payload_hash {
            report.reason = VerificationReason::PayloadHashMismatch;
            return Ok(report);
        }

        // Verify over the STORED hash bytes, not the recomputation — the
        // signature attests to what was persisted at signing time.
        let stored = PayloadDigest::from_hex(&signature.payload_hash)?;
        if verify_digest(&stored, &signature.signature, &key.public_key) {
            report.valid = true;
            report.reason = VerificationReason::Ok;
        } else {
            report.reason = VerificationReason::SignatureInvalid;
        }
        Ok(report)
    }
}
