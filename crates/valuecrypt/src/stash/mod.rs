//! Nonce supply: the random source and the per-cipher reuse stash.
//!
//! # Lifecycle
//!
//! 1. A [`NonceStash`] is created with its owning [`Cipher`](crate::Cipher)
//!    and lives exactly as long.
//! 2. The first encryption of a (plaintext, associated data) pair draws a
//!    fresh nonce from the [`NonceSource`] and records it.
//! 3. Every later encryption of the same pair gets the recorded nonce back,
//!    so an unchanged value re-encrypts to the identical envelope.
//!
//! # Security invariants
//!
//! - A nonce is only ever reused for the *same* plaintext under the *same*
//!   associated data, which reproduces the previous ciphertext and reveals
//!   nothing new.
//! - Nonces are never logged.

pub mod store;

pub use store::NonceStash;

use aes_gcm::aead::{rand_core::RngCore, OsRng};
use common::CipherError;

use crate::crypto::NONCE_LEN;

/// Supplier of fresh nonce bytes.
#[cfg_attr(test, mockall::automock)]
pub trait NonceSource: Send + Sync {
    /// Fill `nonce` with fresh unpredictable bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::RandomSource`] if no bytes could be produced.
    fn fill_nonce(&self, nonce: &mut [u8; NONCE_LEN]) -> Result<(), CipherError>;
}

/// Production [`NonceSource`] backed by the operating-system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsNonceSource;

impl NonceSource for OsNonceSource {
    fn fill_nonce(&self, nonce: &mut [u8; NONCE_LEN]) -> Result<(), CipherError> {
        OsRng
            .try_fill_bytes(nonce)
            .map_err(|e| CipherError::RandomSource(e.to_string()))
    }
}
