//! # Envelope Cipher — AES-256-GCM Key Wrapping
//!
//! Wraps private key seeds under a process-wide master key so the
//! material stored at rest is useless without both artifacts.
//!
//! ## Security Invariant
//!
//! - A fresh random 96-bit IV is drawn from the OS RNG on every wrap.
//!   IV reuse under one master key is forbidden — it breaks AES-GCM
//!   confidentiality and integrity.
//! - The master key is injected as an explicit argument, never read from
//!   a hidden global, and is zeroized on drop. It is never serialized,
//!   persisted, or logged; its `Debug` output is redacted.
//! - Unwrapped plaintext is returned inside [`zeroize::Zeroizing`] so the
//!   seed bytes are wiped as soon as they go out of scope.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use docsign_core::{encoding, Error};

/// AES-GCM IV length in bytes (96 bits).
pub const IV_LEN: usize = 12;

/// Master key length in bytes (AES-256).
pub const MASTER_KEY_LEN: usize = 32;

/// The process-wide 256-bit AES-GCM master key.
///
/// Supplied once via configuration, held only in memory, zeroized on
/// drop. Rotating it invalidates every previously wrapped private key —
/// an operational event that surfaces as [`Error::Integrity`] on unwrap,
/// not a recoverable caller error.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct MasterKey([u8; MASTER_KEY_LEN]);

impl MasterKey {
    /// Construct a master key from exactly 32 raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let arr: [u8; MASTER_KEY_LEN] = bytes.try_into().map_err(|_| {
            Error::Configuration(format!(
                "master key must be exactly {MASTER_KEY_LEN} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(arr))
    }

    /// Construct a master key from its base64 configuration form.
    ///
    /// Both malformed base64 and a wrong decoded length are configuration
    /// faults, not decode errors — the key arrives out of band, never as
    /// request data.
    pub fn from_base64(text: &str) -> Result<Self, Error> {
        let mut bytes = encoding::decode(text)
            .map_err(|e| Error::Configuration(format!("master key is not valid base64: {e}")))?;
        let key = Self::from_bytes(&bytes);
        bytes.zeroize();
        key
    }

    fn as_bytes(&self) -> &[u8; MASTER_KEY_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MasterKey(<secret>)")
    }
}

/// The output of a wrap operation: ciphertext (with appended GCM tag)
/// and the IV it was produced under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeCiphertext {
    /// AES-256-GCM ciphertext, authentication tag appended.
    pub ciphertext: Vec<u8>,
    /// The 96-bit IV used for this wrap. Unique per call.
    pub iv: [u8; IV_LEN],
}

/// Wrap plaintext under the master key.
///
/// Draws a fresh IV per call; two wraps of the same plaintext never
/// produce the same ciphertext.
pub fn wrap(plaintext: &[u8], master_key: &MasterKey) -> Result<EnvelopeCiphertext, Error> {
    let cipher = Aes256Gcm::new_from_slice(master_key.as_bytes())
        .map_err(|e| Error::Crypto(format!("cipher init failed: {e}")))?;
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| Error::Crypto(format!("envelope encryption failed: {e}")))?;
    let mut iv = [0u8; IV_LEN];
    iv.copy_from_slice(&nonce);
    Ok(EnvelopeCiphertext { ciphertext, iv })
}

/// Unwrap ciphertext under the master key.
///
/// # Errors
///
/// [`Error::Integrity`] when the authentication tag does not verify —
/// tampered ciphertext, wrong master key, or wrong IV. Treat as an
/// operational alarm.
pub fn unwrap(
    envelope: &EnvelopeCiphertext,
    master_key: &MasterKey,
) -> Result<Zeroizing<Vec<u8>>, Error> {
    let cipher = Aes256Gcm::new_from_slice(master_key.as_bytes())
        .map_err(|e| Error::Crypto(format!("cipher init failed: {e}")))?;
    let nonce = Nonce::from_slice(&envelope.iv);
    let plaintext = cipher
        .decrypt(nonce, envelope.ciphertext.as_slice())
        .map_err(|_| Error::Integrity("envelope authentication failed".into()))?;
    Ok(Zeroizing::new(plaintext))
}
