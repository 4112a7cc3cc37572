//! # Passphrase Gate
//!
//! Salted, iterated hashing and constant-time verification of the per-key
//! passphrase that gates access to wrapped private key material.
//!
//! ## Stored Record Format
//!
//! One string, `$`-separated:
//!
//! ```text
//! pbkdf2-sha256$<iterations>$<salt base64>$<derived key base64>
//! ```
//!
//! The iteration count is read back from each record, so records hashed
//! under an older (lower) default remain verifiable after the default is
//! raised.
//!
//! ## Security Invariant
//!
//! - Comparison is constant time over the full derived-key length
//!   (`subtle::ConstantTimeEq`) — no early exit that could leak a prefix.
//! - A malformed stored record fails **closed**: `verify_passphrase`
//!   returns `false` and never an error that could read as success.
//! - Passphrases and derived keys are never logged; intermediate derived
//!   material is zeroized.

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use docsign_core::encoding;
use docsign_core::Error;

/// Algorithm tag written into every stored record.
const ALGORITHM_TAG: &str = "pbkdf2-sha256";

/// Default PBKDF2 iteration count for new records. The floor for this
/// scheme is 100,000; raising the default does not invalidate old
/// records because verification re-reads the per-record count.
const DEFAULT_ITERATIONS: u32 = 310_000;

/// Random salt length in bytes.
const SALT_LEN: usize = 16;

/// Derived key length in bytes (256 bits).
const DERIVED_KEY_LEN: usize = 32;

/// Hash a passphrase into a self-describing stored record.
///
/// Generates a fresh random salt per call, so hashing the same passphrase
/// twice produces different records.
pub fn hash_passphrase(passphrase: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::rngs::OsRng.fill_bytes(&mut salt);
    let derived = derive(passphrase, &salt, DEFAULT_ITERATIONS);
    format!(
        "{ALGORITHM_TAG}${DEFAULT_ITERATIONS}${}${}",
        encoding::encode(salt),
        encoding::encode(&*derived),
    )
}

/// Verify a passphrase against a stored record.
///
/// Re-derives using the salt and iteration count embedded in `stored` and
/// compares in constant time. Returns `false` for any malformed record —
/// wrong tag, missing fields, bad base64, zero iterations, wrong derived
/// key length.
pub fn verify_passphrase(passphrase: &str, stored: &str) -> bool {
    let Some((iterations, salt, expected)) = parse_record(stored) else {
        return false;
    };
    let derived = derive(passphrase, &salt, iterations);
    derived[..].ct_eq(&expected[..]).into()
}

/// Rotate a passphrase: verify the old one, reject a no-op change, and
/// produce a fresh record for the new one.
///
/// # Errors
///
/// - [`Error::Forbidden`] when `old` does not verify against `stored`.
/// - [`Error::Validation`] when `new == old`.
pub fn rotate_passphrase(old: &str, new: &str, stored: &str) -> Result<String, Error> {
    if !verify_passphrase(old, stored) {
        return Err(Error::Forbidden("passphrase verification failed".into()));
    }
    if new == old {
        return Err(Error::Validation(
            "new passphrase must differ from the old one".into(),
        ));
    }
    Ok(hash_passphrase(new))
}

/// Derive a 256-bit key with PBKDF2-HMAC-SHA256.
fn derive(passphrase: &str, salt: &[u8], iterations: u32) -> Zeroizing<[u8; DERIVED_KEY_LEN]> {
    let mut out = Zeroizing::new([0u8; DERIVED_KEY_LEN]);
    pbkdf2_hmac::<Sha256>(passphrase.as_bytes(), salt, iterations, &mut *out);
    out
}

/// Parse a stored record into (iterations, salt, derived key).
///
/// Returns `None` for anything that does not match the record format —
/// the caller treats that as verification failure, never as an error.
fn parse_record(stored: &str) -> Option<(u32, Vec<u8>, Vec<u8>)> {
    let mut parts = stored.split('$');
    let tag = parts.next()?;
    let iterations = parts.next()?;
    let salt = parts.next()?;
    let derived = parts.next()?;
    if parts.next().is_some() || tag != ALGORITHM_TAG {
        return None;
    }
    let iterations: u32 = iterations.parse().ok()?;
    if iterations == 0 {
        return None;
    }
    let salt = encoding::decode(salt).ok()?;
    let derived = encoding::decode(derived).ok()?;
    if salt.is_empty() || derived.len() != DERIVED_KEY_LEN {
        return None;
    }
    Some((iterations, salt, derived))
}
