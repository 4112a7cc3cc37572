//! # Document Store Seam
//!
//! Documents are owned by an external collaborator; the signing core
//! touches them through exactly two operations — load the cryptographic
//! view, and flag a document as signed after its signature row is
//! durable. Everything else about documents is out of scope.

use std::collections::HashMap;

use parking_lot::RwLock;

use docsign_core::{Document, DocumentId, Error, KeyId};

/// The external document collaborator.
pub trait DocumentStore: Send + Sync {
    /// Load the cryptographic view of a document.
    fn load(&self, id: &DocumentId) -> Result<Option<Document>, Error>;

    /// Mark a document signed and link the signing key. Called only
    /// after the signature row is durably written — never before.
    fn mark_signed(&self, id: &DocumentId, key: &KeyId) -> Result<(), Error>;
}

/// In-process `DocumentStore` for tests and single-process deployments.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    rows: RwLock<HashMap<DocumentId, (Document, Option<KeyId>)>>,
}

impl InMemoryDocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a document.
    pub fn put(&self, document: Document) {
        self.rows
            .write()
            .insert(document.id, (document, None));
    }

    /// The key a document was marked signed with, if any.
    pub fn signed_with(&self, id: &DocumentId) -> Option<KeyId> {
        self.rows.read().get(id).and_then(|(_, key)| *key)
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn load(&self, id: &DocumentId) -> Result<Option<Document>, Error> {
        Ok(self.rows.read().get(id).map(|(doc, _)| doc.clone()))
    }

    fn mark_signed(&self, id: &DocumentId, key: &KeyId) -> Result<(), Error> {
        let mut rows = self.rows.write();
        let (_, signed) = rows
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(format!("document {id} not found")))?;
        *signed = Some(*key);
        Ok(())
    }
}
