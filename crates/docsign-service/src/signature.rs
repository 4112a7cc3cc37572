//! # Document Signature Log
//!
//! The append-only record of issued signatures. Rows are never updated
//! or removed; re-signing a document appends a new row, and the "current"
//! signature is simply the latest one.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use docsign_core::{DocumentId, Error, KeyId, Timestamp, UserId};
use docsign_crypto::ed25519::Ed25519Signature;

/// One issued signature over a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSignature {
    /// The signed document.
    pub document_id: DocumentId,
    /// The key that produced the signature.
    pub key_id: KeyId,
    /// SHA-256 canonical payload hash, 64 lowercase hex chars.
    pub payload_hash: String,
    /// Ed25519 signature over the payload hash bytes (base64 via serde).
    pub signature: Ed25519Signature,
    /// When the signature was issued.
    pub signed_at: Timestamp,
    /// Who requested the signature.
    pub signer_user_id: UserId,
}

/// Append-only storage for signature rows.
pub trait SignatureStore: Send + Sync {
    /// Durably append one row. Single-row appends are atomic.
    fn append(&self, signature: DocumentSignature) -> Result<(), Error>;

    /// The current signature for a document: maximum `signed_at`, with
    /// insertion order breaking ties (the later append wins).
    fn current_for(&self, document: &DocumentId) -> Result<Option<DocumentSignature>, Error>;
}

/// In-process `SignatureStore` backed by an append-only `Vec`.
#[derive(Debug, Default)]
pub struct InMemorySignatureStore {
    rows: RwLock<Vec<DocumentSignature>>,
}

impl InMemorySignatureStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows ever appended. Rows are never removed.
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }
}

impl SignatureStore for InMemorySignatureStore {
    fn append(&self, signature: DocumentSignature) -> Result<(), Error> {
        self.rows.write().push(signature);
        Ok(())
    }

    fn current_for(&self, document: &DocumentId) -> Result<Option<DocumentSignature>, Error> {
        let rows = self.rows.read();
        let mut current: Option<&DocumentSignature> = None;
        for row in rows.iter().filter(|r| &r.document_id == document) {
            // >= so that among equal timestamps the later append wins.
            if current.map_or(true, |c| row.signed_at >= c.signed_at) {
                current = Some(row);
            }
        }
        Ok(current.cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsign_crypto::ed25519::Ed25519KeyPair;
    use docsign_core::{payload_digest, CanonicalPayload, Document};

    fn sample_row(document_id: DocumentId, signed_at: Timestamp) -> DocumentSignature {
        let pair = Ed25519KeyPair::generate();
        let doc = Document {
            id: document_id,
            title: "t".into(),
            content: "c".into(),
            user_id: UserId::new(),
            created_at: Timestamp::parse("2026-01-01T00:00:00Z").unwrap(),
        };
        let digest = payload_digest(&CanonicalPayload::of(&doc));
        DocumentSignature {
            document_id,
            key_id: KeyId::new(),
            payload_hash: digest.to_hex(),
            signature: pair.sign(&digest),
            signed_at,
            signer_user_id: UserId::new(),
        }
    }

    #[test]
    fn test_empty_store_has_no_current() {
        let store = InMemorySignatureStore::new();
        assert!(store.current_for(&DocumentId::new()).unwrap().is_none());
    }

    #[test]
    fn test_current_is_max_signed_at() {
        let store = InMemorySignatureStore::new();
        let doc = DocumentId::new();
        let early = Timestamp::parse("2026-01-01T00:00:00Z").unwrap();
        let late = Timestamp::parse("2026-01-02T00:00:00Z").unwrap();

        let late_row = sample_row(doc, late);
        store.append(sample_row(doc, early)).unwrap();
        store.append(late_row.clone()).unwrap();
        store.append(sample_row(DocumentId::new(), late)).unwrap();

        assert_eq!(store.current_for(&doc).unwrap().unwrap(), late_row);
    }

    #[test]
    fn test_equal_timestamps_later_append_wins() {
        let store = InMemorySignatureStore::new();
        let doc = DocumentId::new();
        let at = Timestamp::parse("2026-01-01T00:00:00Z").unwrap();
        let first = sample_row(doc, at);
        let second = sample_row(doc, at);
        store.append(first).unwrap();
        store.append(second.clone()).unwrap();
        assert_eq!(store.current_for(&doc).unwrap().unwrap(), second);
    }

    #[test]
    fn test_append_only_accumulates() {
        let store = InMemorySignatureStore::new();
        let doc = DocumentId::new();
        let at = Timestamp::now();
        store.append(sample_row(doc, at)).unwrap();
        store.append(sample_row(doc, at)).unwrap();
        assert_eq!(store.len(), 2);
    }
}
