//! AES-256-GCM encryption and decryption of individual typed values.
//!
//! **Nonce policy:** GCM nonce reuse under one key is catastrophic for
//! *different* plaintexts. The stash only ever hands a nonce back for the
//! exact (value, associated data) pair it was first drawn for, which
//! reproduces the earlier ciphertext byte for byte. Any change to either
//! half of the pair draws a fresh random nonce.
//!
//! The key is supplied per call and dropped with the AEAD instance at the
//! end of that call; the cipher never keeps key material.

use aes_gcm::{
    aead::{consts::U32, Aead, KeyInit, Payload},
    aes::Aes256,
    AesGcm, Nonce,
};
use common::{CipherError, Kind, Plaintext};
use tracing::debug;

use super::{codec, EncryptedEnvelope, KEY_LEN, NONCE_LEN, TAG_LEN};
use crate::config::Config;
use crate::stash::{NonceSource, NonceStash, OsNonceSource};

/// AES-256-GCM with the format's 32-byte nonce.
type Aes256Gcm32 = AesGcm<Aes256, U32>;

/// Encrypts and decrypts single values to and from `ENC[...]` envelopes.
///
/// Create one per document. The nonce stash is scoped to this instance, so
/// re-encrypting an unchanged value through the same `Cipher` yields the
/// same envelope. A `Cipher` is `Sync` and may be shared across threads.
#[derive(Debug)]
pub struct Cipher<S = OsNonceSource> {
    stash: NonceStash<S>,
    stash_nonces: bool,
}

impl Cipher {
    /// Create a cipher using the OS random source with stashing enabled.
    pub fn new() -> Self {
        Self::with_nonce_source(OsNonceSource)
    }

    /// Create a cipher honouring the loaded [`Config`].
    pub fn from_config(cfg: &Config) -> Self {
        Self::new().with_stash(cfg.stash_nonces)
    }
}

impl Default for Cipher {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: NonceSource> Cipher<S> {
    /// Create a cipher drawing fresh nonces from `source`.
    pub fn with_nonce_source(source: S) -> Self {
        Self {
            stash: NonceStash::new(source),
            stash_nonces: true,
        }
    }

    /// Enable or disable nonce reuse in [`Cipher::encrypt`].
    pub fn with_stash(mut self, enabled: bool) -> Self {
        self.stash_nonces = enabled;
        self
    }

    /// Encrypt `plaintext`, binding it to `additional_data`.
    ///
    /// Empty values (empty string, integer zero, float zero) short-circuit
    /// to an empty string without touching the key or the stash.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKeyLength`] if `key` is not [`KEY_LEN`]
    /// bytes, [`CipherError::UnsupportedType`] for [`Plaintext::Bytes`], and
    /// [`CipherError::RandomSource`] if a fresh nonce could not be drawn.
    pub fn encrypt(
        &self,
        plaintext: &Plaintext,
        key: &[u8],
        additional_data: impl AsRef<[u8]>,
    ) -> Result<String, CipherError> {
        if plaintext.is_empty() {
            return Ok(String::new());
        }
        let aead = build_cipher(key)?;
        let kind = plaintext.kind();
        let plain_bytes = codec::encode(plaintext)?;
        let aad = additional_data.as_ref();

        let nonce = if self.stash_nonces {
            self.stash.obtain(kind, &plain_bytes, aad)?
        } else {
            self.stash.fresh()?
        };

        seal(&aead, kind, &plain_bytes, &nonce, aad)
    }

    /// Encrypt `plaintext` under a caller-chosen nonce.
    ///
    /// The stash is neither consulted nor updated. The caller is responsible
    /// for never pairing `nonce` with two different plaintexts under one key.
    ///
    /// # Errors
    ///
    /// As [`Cipher::encrypt`], minus the random-source failure.
    pub fn encrypt_with_nonce(
        &self,
        plaintext: &Plaintext,
        key: &[u8],
        nonce: &[u8; NONCE_LEN],
        additional_data: impl AsRef<[u8]>,
    ) -> Result<String, CipherError> {
        if plaintext.is_empty() {
            return Ok(String::new());
        }
        let aead = build_cipher(key)?;
        let plain_bytes = codec::encode(plaintext)?;
        seal(
            &aead,
            plaintext.kind(),
            &plain_bytes,
            nonce,
            additional_data.as_ref(),
        )
    }

    /// Decrypt an envelope produced under `key` and `additional_data`.
    ///
    /// An empty `ciphertext` decrypts to an empty string value.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKeyLength`] for a bad key,
    /// [`CipherError::InvalidFormat`] for a malformed envelope,
    /// [`CipherError::AuthenticationFailed`] if the tag does not verify, and
    /// [`CipherError::TypeDecode`] or [`CipherError::UnsupportedType`] if the
    /// authenticated bytes do not decode as the tagged kind.
    pub fn decrypt(
        &self,
        ciphertext: &str,
        key: &[u8],
        additional_data: impl AsRef<[u8]>,
    ) -> Result<Plaintext, CipherError> {
        if ciphertext.is_empty() {
            return Ok(Plaintext::Str(String::new()));
        }
        let aead = build_cipher(key)?;
        let envelope: EncryptedEnvelope = ciphertext.parse()?;

        let plain_bytes = aead
            .decrypt(
                nonce_of(&envelope.nonce),
                Payload {
                    msg: &envelope.sealed(),
                    aad: additional_data.as_ref(),
                },
            )
            .map_err(|_| {
                debug!(type_tag = %envelope.type_tag, "envelope failed authentication");
                CipherError::AuthenticationFailed
            })?;

        debug!(
            type_tag = %envelope.type_tag,
            len = plain_bytes.len(),
            "decrypted value"
        );
        codec::decode(&envelope.type_tag, plain_bytes)
    }

    /// Number of (value, associated data) pairs holding a stashed nonce.
    pub fn stashed(&self) -> usize {
        self.stash.len()
    }
}

fn seal(
    aead: &Aes256Gcm32,
    kind: Kind,
    plain_bytes: &[u8],
    nonce: &[u8; NONCE_LEN],
    aad: &[u8],
) -> Result<String, CipherError> {
    let mut body = aead
        .encrypt(
            nonce_of(nonce),
            Payload {
                msg: plain_bytes,
                aad,
            },
        )
        .map_err(|_| CipherError::SealFailure)?;

    // The AEAD output is `body || tag`; the tag is the trailing 16 bytes.
    let tag: [u8; TAG_LEN] = body
        .split_off(body.len() - TAG_LEN)
        .try_into()
        .map_err(|_| CipherError::SealFailure)?;

    debug!(%kind, len = plain_bytes.len(), "encrypted value");

    Ok(EncryptedEnvelope {
        body,
        nonce: *nonce,
        tag,
        type_tag: kind.as_str().to_owned(),
    }
    .to_string())
}

#[allow(deprecated)] // upstream generic-array 0.x deprecation
fn nonce_of(nonce: &[u8; NONCE_LEN]) -> &Nonce<U32> {
    Nonce::<U32>::from_slice(nonce)
}

fn build_cipher(key: &[u8]) -> Result<Aes256Gcm32, CipherError> {
    if key.len() != KEY_LEN {
        return Err(CipherError::InvalidKeyLength(key.len()));
    }
    Aes256Gcm32::new_from_slice(key).map_err(|_| CipherError::InvalidKeyLength(key.len()))
}
