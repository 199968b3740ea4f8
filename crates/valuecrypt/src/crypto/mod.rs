//! AES-256-GCM value encryption primitives.
//!
//! This module is intentionally free of configuration and logging setup.
//! It provides the type codec, the envelope codec, and the [`Cipher`] that
//! ties them to the AEAD and the nonce stash.
//!
//! # Ciphertext format
//!
//! ```text
//! ENC[AES256_GCM,data:<b64(body)>,iv:<b64(nonce)>,tag:<b64(tag)>,type:<kind>]
//! ```
//!
//! The nonce is 32 bytes, not the usual 12. This is fixed by the wire format
//! and every parsed nonce is checked against it.

pub mod cipher;
pub mod codec;
pub mod envelope;

pub use cipher::Cipher;
pub use envelope::EncryptedEnvelope;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of the GCM nonce used by this format.
pub const NONCE_LEN: usize = 32;

/// Byte length of the GCM authentication tag (128 bits).
pub const TAG_LEN: usize = 16;
