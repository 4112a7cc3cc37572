//! # Key Store Abstraction
//!
//! The persistence seam for signing-key rows. The only concurrency
//! guarantee custody logic relies on is atomic single-row operations:
//! inserts are independent rows, and `update` performs its whole
//! read-modify-write under the store's lock so a concurrent revoke and
//! passphrase change cannot interleave on one row.

use std::collections::HashMap;

use parking_lot::RwLock;

use docsign_core::{Error, KeyId, UserId};

use crate::key::SigningKey;

/// Persistent storage for signing-key rows.
pub trait KeyStore: Send + Sync {
    /// Insert a fresh row. Key ids are globally unique, so a collision is
    /// an integrity fault, not an expected outcome.
    fn insert(&self, key: SigningKey) -> Result<(), Error>;

    /// Read one row by key id.
    fn get(&self, kid: &KeyId) -> Result<Option<SigningKey>, Error>;

    /// Snapshot all rows assigned to an owner, in unspecified order.
    fn list_for_owner(&self, owner: &UserId) -> Result<Vec<SigningKey>, Error>;

    /// Atomically read-modify-write a single row, returning the updated
    /// row. The closure runs under the row lock; if it errors, the row is
    /// left unchanged.
    fn update(
        &self,
        kid: &KeyId,
        mutate: &mut dyn FnMut(&mut SigningKey) -> Result<(), Error>,
    ) -> Result<SigningKey, Error>;
}

/// In-process `KeyStore` backed by a `RwLock<HashMap>`.
#[derive(Debug, Default)]
pub struct InMemoryKeyStore {
    rows: RwLock<HashMap<KeyId, SigningKey>>,
}

impl InMemoryKeyStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyStore for InMemoryKeyStore {
    fn insert(&self, key: SigningKey) -> Result<(), Error> {
        let mut rows = self.rows.write();
        if rows.contains_key(&key.kid) {
            return Err(Error::Integrity(format!("duplicate key id {}", key.kid)));
        }
        rows.insert(key.kid, key);
        Ok(())
    }

    fn get(&self, kid: &KeyId) -> Result<Option<SigningKey>, Error> {
        Ok(self.rows.read().get(kid).cloned())
    }

    fn list_for_owner(&self, owner: &UserId) -> Result<Vec<SigningKey>, Error> {
        Ok(self
            .rows
            .read()
            .values()
            .filter(|k| &k.assigned_to == owner)
            .cloned()
            .collect())
    }

    fn update(
        &self,
        kid: &KeyId,
        mutate: &mut dyn FnMut(&mut SigningKey) -> Result<(), Error>,
    ) -> Result<SigningKey, Error> {
        let mut rows = self.rows.write();
        let row = rows
            .get_mut(kid)
            .ok_or_else(|| Error::NotFound(format!("signing key {kid} not found")))?;
        let mut candidate = row.clone();
        mutate(&mut candidate)?;
        *row = candidate.clone();
        Ok(candidate)
    }
}

/// External collaborator answering "does this owner exist".
pub trait UserDirectory: Send + Sync {
    /// Whether the user is known to the institution.
    fn exists(&self, user: &UserId) -> Result<bool, Error>;
}

/// In-process `UserDirectory` for tests and single-process deployments.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<Vec<UserId>>,
}

impl InMemoryUserDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user.
    pub fn add(&self, user: UserId) {
        self.users.write().push(user);
    }
}

impl UserDirectory for InMemoryUserDirectory {
    fn exists(&self, user: &UserId) -> Result<bool, Error> {
        Ok(self.users.read().contains(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::EncryptedSecret;
    use docsign_core::Timestamp;
    use docsign_crypto::ed25519::Ed25519KeyPair;
    use docsign_crypto::envelope::{wrap, MasterKey};

    fn sample_key(owner: UserId) -> SigningKey {
        let master = MasterKey::from_bytes(&[1u8; 32]).unwrap();
        let pair = Ed25519KeyPair::generate();
        let envelope = wrap(&*pair.seed(), &master).unwrap();
        SigningKey {
            kid: KeyId::new(),
            public_key: pair.public_key(),
            encrypted_private: EncryptedSecret::from_envelope(&envelope),
            passphrase_hash: docsign_crypto::hash_passphrase("CA-Secret!1"),
            assigned_to: owner,
            created_at: Timestamp::now(),
            expires_at: None,
            revoked_at: None,
            deleted_at: None,
        }
    }

    #[test]
    fn test_insert_and_get() {
        let store = InMemoryKeyStore::new();
        let key = sample_key(UserId::new());
        let kid = key.kid;
        store.insert(key).unwrap();
        assert!(store.get(&kid).unwrap().is_some());
        assert!(store.get(&KeyId::new()).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let store = InMemoryKeyStore::new();
        let key = sample_key(UserId::new());
        store.insert(key.clone()).unwrap();
        assert!(store.insert(key).is_err());
    }

    #[test]
    fn test_list_for_owner_filters() {
        let store = InMemoryKeyStore::new();
        let owner = UserId::new();
        store.insert(sample_key(owner)).unwrap();
        store.insert(sample_key(owner)).unwrap();
        store.insert(sample_key(UserId::new())).unwrap();
        assert_eq!(store.list_for_owner(&owner).unwrap().len(), 2);
    }

    #[test]
    fn test_update_is_atomic_per_row() {
        let store = InMemoryKeyStore::new();
        let key = sample_key(UserId::new());
        let kid = key.kid;
        store.insert(key).unwrap();

        let now = Timestamp::now();
        let updated = store
            .update(&kid, &mut |row| {
                row.revoked_at = Some(now);
                Ok(())
            })
            .unwrap();
        assert_eq!(updated.revoked_at, Some(now));
        assert_eq!(store.get(&kid).unwrap().unwrap().revoked_at, Some(now));
    }

    #[test]
    fn test_update_error_leaves_row_unchanged() {
        let store = InMemoryKeyStore::new();
        let key = sample_key(UserId::new());
        let kid = key.kid;
        store.insert(key).unwrap();

        let result = store.update(&kid, &mut |row| {
            row.revoked_at = Some(Timestamp::now());
            Err(Error::Validation("abort".into()))
        });
        assert!(result.is_err());
        assert!(store.get(&kid).unwrap().unwrap().revoked_at.is_none());
    }

    #[test]
    fn test_update_unknown_kid_is_not_found() {
        let store = InMemoryKeyStore::new();
        let err = store.update(&KeyId::new(), &mut |_| Ok(())).unwrap_err();
        assert_eq!(err.kind(), "NOT_FOUND");
    }

    #[test]
    fn test_user_directory() {
        let directory = InMemoryUserDirectory::new();
        let user = UserId::new();
        assert!(!directory.exists(&user).unwrap());
        directory.add(user);
        assert!(directory.exists(&user).unwrap());
    }
}
