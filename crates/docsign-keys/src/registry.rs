//! # Signing Key Registry
//!
//! Lifecycle operations over signing-key rows: create, select the latest
//! usable key, revoke, delete, and passphrase change.
//!
//! ## Concurrency
//!
//! Concurrent `create` calls produce independent rows and need no mutual
//! exclusion. Revoke and passphrase change go through the store's atomic
//! `update`. Sign vs. revoke on the same key can race — callers that
//! decrypt key material must re-check usability through [`get()`] at
//! decryption time, not only at selection time.
//!
//! [`get()`]: SigningKeyRegistry::get

use std::sync::Arc;

use docsign_core::{Error, KeyId, Timestamp, UserId};
use docsign_crypto::ed25519::Ed25519KeyPair;
use docsign_crypto::envelope::{wrap, MasterKey};
use docsign_crypto::{hash_passphrase, rotate_passphrase};

use crate::key::{EncryptedSecret, SigningKey};
use crate::policy::PassphrasePolicy;
use crate::store::{KeyStore, UserDirectory};

/// The signing key registry: custody CRUD over a key store, gated by a
/// passphrase policy and an owner directory.
pub struct SigningKeyRegistry {
    store: Arc<dyn KeyStore>,
    directory: Arc<dyn UserDirectory>,
    policy: Arc<dyn PassphrasePolicy>,
}

impl SigningKeyRegistry {
    /// Build a registry over its collaborators.
    pub fn new(
        store: Arc<dyn KeyStore>,
        directory: Arc<dyn UserDirectory>,
        policy: Arc<dyn PassphrasePolicy>,
    ) -> Self {
        Self {
            store,
            directory,
            policy,
        }
    }

    /// Create a signing key for an owner.
    ///
    /// The passphrase policy runs before anything else so an invalid
    /// passphrase never costs an asymmetric keygen. The private seed
    /// exists in plaintext only between generation and envelope wrap.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] — passphrase policy violation.
    /// - [`Error::NotFound`] — unknown owner.
    /// - [`Error::Crypto`] — key material could not be encoded.
    pub fn create(
        &self,
        owner: UserId,
        expires_at: Option<Timestamp>,
        passphrase: &str,
        master_key: &MasterKey,
    ) -> Result<SigningKey, Error> {
        self.policy.validate(passphrase)?;
        if !self.directory.exists(&owner)? {
            return Err(Error::NotFound(format!("owner {owner} not found")));
        }

        let pair = Ed25519KeyPair::generate();
        let seed = pair.seed();
        let envelope = wrap(&*seed, master_key)?;
        drop(seed);

        let key = SigningKey {
            kid: KeyId::new(),
            public_key: pair.public_key(),
            encrypted_private: EncryptedSecret::from_envelope(&envelope),
            passphrase_hash: hash_passphrase(passphrase),
            assigned_to: owner,
            created_at: Timestamp::now(),
            expires_at,
            revoked_at: None,
            deleted_at: None,
        };
        self.store.insert(key.clone())?;
        tracing::info!(kid = %key.kid, owner = %owner, "signing key created");
        Ok(key)
    }

    /// Read one row by key id, or `NotFound`.
    pub fn get(&self, kid: &KeyId) -> Result<SigningKey, Error> {
        self.store
            .get(kid)?
            .ok_or_else(|| Error::NotFound(format!("signing key {kid} not found")))
    }

    /// The latest usable key for an owner: maximum `created_at` among
    /// rows satisfying the usability invariant, ties broken by key id so
    /// the choice is deterministic over any row snapshot.
    ///
    /// `NotFound` when no row qualifies — including when the only
    /// candidate has expired.
    pub fn find_usable_for(&self, owner: &UserId) -> Result<SigningKey, Error> {
        let now = Timestamp::now();
        self.store
            .list_for_owner(owner)?
            .into_iter()
            .filter(|k| k.is_usable_at(now))
            .max_by_key(|k| (k.created_at, k.kid))
            .ok_or_else(|| Error::NotFound(format!("no usable signing key for {owner}")))
    }

    /// Revoke a key. Idempotent: re-revoking returns the original
    /// `revoked_at` rather than failing.
    pub fn revoke(&self, kid: &KeyId) -> Result<Timestamp, Error> {
        let now = Timestamp::now();
        let row = self.store.update(kid, &mut |row| {
            row.revoked_at.get_or_insert(now);
            Ok(())
        })?;
        tracing::info!(kid = %kid, "signing key revoked");
        // The closure guarantees the field is set.
        row.revoked_at
            .ok_or_else(|| Error::Integrity(format!("revocation of {kid} did not persist")))
    }

    /// Soft-delete a key. Idempotent like [`revoke()`](Self::revoke).
    pub fn delete(&self, kid: &KeyId) -> Result<Timestamp, Error> {
        let now = Timestamp::now();
        let row = self.store.update(kid, &mut |row| {
            row.deleted_at.get_or_insert(now);
            Ok(())
        })?;
        tracing::info!(kid = %kid, "signing key deleted");
        row.deleted_at
            .ok_or_else(|| Error::Integrity(format!("deletion of {kid} did not persist")))
    }

    /// Change the passphrase on a live key.
    ///
    /// Runs entirely inside the store's atomic update so a concurrent
    /// revoke cannot interleave: the liveness check and the rotation see
    /// the same row.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] — unknown kid.
    /// - [`Error::Validation`] — key revoked or deleted, or `new == old`.
    /// - [`Error::Forbidden`] — `old` does not verify.
    pub fn change_passphrase(&self, kid: &KeyId, old: &str, new: &str) -> Result<(), Error> {
        self.store.update(kid, &mut |row| {
            if row.revoked_at.is_some() || row.deleted_at.is_some() {
                return Err(Error::Validation(format!(
                    "signing key {kid} is revoked or deleted"
                )));
            }
            row.passphrase_hash = rotate_passphrase(old, new, &row.passphrase_hash)?;
            Ok(())
        })?;
        tracing::info!(kid = %kid, "signing key passphrase changed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::InstitutionalPolicy;
    use crate::store::{InMemoryKeyStore, InMemoryUserDirectory};
    use chrono::{Duration, Utc};
    use docsign_crypto::verify_passphrase;

    struct Fixture {
        registry: SigningKeyRegistry,
        directory: Arc<InMemoryUserDirectory>,
        master: MasterKey,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryKeyStore::new());
        let directory = Arc::new(InMemoryUserDirectory::new());
        let registry = SigningKeyRegistry::new(
            store,
            directory.clone(),
            Arc::new(InstitutionalPolicy::default()),
        );
        Fixture {
            registry,
            directory,
            master: MasterKey::from_bytes(&[3u8; 32]).unwrap(),
        }
    }

    fn known_owner(fx: &Fixture) -> UserId {
        let owner = UserId::new();
        fx.directory.add(owner);
        owner
    }

    #[test]
    fn test_create_happy_path() {
        let fx = fixture();
        let owner = known_owner(&fx);
        let key = fx
            .registry
            .create(owner, None, "CA-Secret!1", &fx.master)
            .unwrap();
        assert_eq!(key.assigned_to, owner);
        assert!(key.revoked_at.is_none());
        assert!(verify_passphrase("CA-Secret!1", &key.passphrase_hash));
    }

    #[test]
    fn test_create_rejects_policy_violation_before_owner_check() {
        let fx = fixture();
        // Unknown owner AND bad passphrase: policy must win, proving it
        // runs first (and that no keygen is spent on bad input).
        let err = fx
            .registry
            .create(UserId::new(), None, "weak", &fx.master)
            .unwrap_err();
        assert_eq!(err.kind(), "VALIDATION");
    }

    #[test]
    fn test_create_rejects_unknown_owner() {
        let fx = fixture();
        let err = fx
            .registry
            .create(UserId::new(), None, "CA-Secret!1", &fx.master)
            .unwrap_err();
        assert_eq!(err.kind(), "NOT_FOUND");
    }

    #[test]
    fn test_find_usable_prefers_latest_created() {
        let fx = fixture();
        let owner = known_owner(&fx);
        let first = fx
            .registry
            .create(owner, None, "CA-Secret!1", &fx.master)
            .unwrap();
        let second = fx
            .registry
            .create(owner, None, "CA-Secret!2", &fx.master)
            .unwrap();

        let found = fx.registry.find_usable_for(&owner).unwrap();
        // Timestamps have seconds precision, so both keys may share one;
        // the tie then breaks deterministically by kid.
        let expected =
            std::cmp::max((first.created_at, first.kid), (second.created_at, second.kid)).1;
        assert_eq!(found.kid, expected);
    }

    #[test]
    fn test_find_usable_skips_revoked() {
        let fx = fixture();
        let owner = known_owner(&fx);
        let key = fx
            .registry
            .create(owner, None, "CA-Secret!1", &fx.master)
            .unwrap();
        fx.registry.revoke(&key.kid).unwrap();
        let err = fx.registry.find_usable_for(&owner).unwrap_err();
        assert_eq!(err.kind(), "NOT_FOUND");
    }

    #[test]
    fn test_find_usable_skips_expired_only_candidate() {
        let fx = fixture();
        let owner = known_owner(&fx);
        let past = Timestamp::from_utc(Utc::now() - Duration::days(1));
        fx.registry
            .create(owner, Some(past), "CA-Secret!1", &fx.master)
            .unwrap();
        let err = fx.registry.find_usable_for(&owner).unwrap_err();
        assert_eq!(err.kind(), "NOT_FOUND");
    }

    #[test]
    fn test_revoke_is_idempotent() {
        let fx = fixture();
        let owner = known_owner(&fx);
        let key = fx
            .registry
            .create(owner, None, "CA-Secret!1", &fx.master)
            .unwrap();
        let first = fx.registry.revoke(&key.kid).unwrap();
        let second = fx.registry.revoke(&key.kid).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_revoke_unknown_kid() {
        let fx = fixture();
        let err = fx.registry.revoke(&KeyId::new()).unwrap_err();
        assert_eq!(err.kind(), "NOT_FOUND");
    }

    #[test]
    fn test_delete_makes_key_unusable() {
        let fx = fixture();
        let owner = known_owner(&fx);
        let key = fx
            .registry
            .create(owner, None, "CA-Secret!1", &fx.master)
            .unwrap();
        fx.registry.delete(&key.kid).unwrap();
        assert!(fx.registry.find_usable_for(&owner).is_err());
    }

    #[test]
    fn test_change_passphrase_happy_path() {
        let fx = fixture();
        let owner = known_owner(&fx);
        let key = fx
            .registry
            .create(owner, None, "CA-Secret!1", &fx.master)
            .unwrap();
        fx.registry
            .change_passphrase(&key.kid, "CA-Secret!1", "CA-Rotated!2")
            .unwrap();

        let row = fx.registry.get(&key.kid).unwrap();
        assert!(verify_passphrase("CA-Rotated!2", &row.passphrase_hash));
        assert!(!verify_passphrase("CA-Secret!1", &row.passphrase_hash));
    }

    #[test]
    fn test_change_passphrase_wrong_old_is_forbidden() {
        let fx = fixture();
        let owner = known_owner(&fx);
        let key = fx
            .registry
            .create(owner, None, "CA-Secret!1", &fx.master)
            .unwrap();
        let err = fx
            .registry
            .change_passphrase(&key.kid, "CA-Wrong!9", "CA-Rotated!2")
            .unwrap_err();
        assert_eq!(err.kind(), "FORBIDDEN");

        // Failed rotation leaves the record intact.
        let row = fx.registry.get(&key.kid).unwrap();
        assert!(verify_passphrase("CA-Secret!1", &row.passphrase_hash));
    }

    #[test]
    fn test_change_passphrase_rejected_on_revoked_key() {
        let fx = fixture();
        let owner = known_owner(&fx);
        let key = fx
            .registry
            .create(owner, None, "CA-Secret!1", &fx.master)
            .unwrap();
        fx.registry.revoke(&key.kid).unwrap();
        let err = fx
            .registry
            .change_passphrase(&key.kid, "CA-Secret!1", "CA-Rotated!2")
            .unwrap_err();
        assert_eq!(err.kind(), "VALIDATION");
    }

    #[test]
    fn test_change_passphrase_same_value_rejected() {
        let fx = fixture();
        let owner = known_owner(&fx);
        let key = fx
            .registry
            .create(owner, None, "CA-Secret!1", &fx.master)
            .unwrap();
        let err = fx
            .registry
            .change_passphrase(&key.kid, "CA-Secret!1", "CA-Secret!1")
            .unwrap_err();
        assert_eq!(err.kind(), "VALIDATION");
    }
}
