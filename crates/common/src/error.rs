//! Common error types shared across crates.

use thiserror::Error;

use crate::plaintext::Kind;

/// Byte length of an AES-256 key, repeated here so error messages can name it.
const KEY_LEN: usize = 32;

/// Error returned by every fallible cipher operation.
///
/// No variant ever carries plaintext or key bytes. Every failure is final:
/// the codec performs no retries and returns no partial results.
#[derive(Debug, Error)]
pub enum CipherError {
    /// The caller-supplied key is not [`KEY_LEN`] bytes long.
    #[error("invalid key length: expected {KEY_LEN} bytes, got {0}")]
    InvalidKeyLength(usize),

    /// The random source could not supply nonce bytes.
    #[error("random source unavailable: {0}")]
    RandomSource(String),

    /// The ciphertext string is not a well-formed `ENC[...]` envelope.
    #[error("invalid encrypted value format: {0}")]
    InvalidFormat(String),

    /// The AEAD refused to seal the plaintext (input beyond GCM's length limit).
    #[error("aead seal failed")]
    SealFailure,

    /// Tag verification failed.
    ///
    /// Wrong key, wrong associated data and tampered ciphertext all land here
    /// and are deliberately indistinguishable.
    #[error("authentication failed: wrong key, wrong associated data, or tampered ciphertext")]
    AuthenticationFailed,

    /// Authenticated plaintext bytes could not be decoded as the tagged kind.
    #[error("cannot decode {kind} plaintext: {reason}")]
    TypeDecode {
        /// The kind named by the envelope's type tag.
        kind: Kind,
        /// Why decoding failed.
        reason: String,
    },

    /// The value kind or type tag is outside the supported set.
    #[error("unsupported value type: {0}")]
    UnsupportedType(String),
}

impl CipherError {
    /// Returns `true` if this error is an AEAD tag verification failure.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, CipherError::AuthenticationFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_failure_flag() {
        assert!(CipherError::AuthenticationFailed.is_authentication_failure());
        assert!(!CipherError::InvalidFormat("x".into()).is_authentication_failure());
    }

    #[test]
    fn display_includes_details() {
        let e = CipherError::InvalidKeyLength(16);
        assert_eq!(
            e.to_string(),
            "invalid key length: expected 32 bytes, got 16"
        );

        let e = CipherError::TypeDecode {
            kind: Kind::Int,
            reason: "invalid digit found in string".into(),
        };
        assert_eq!(
            e.to_string(),
            "cannot decode int plaintext: invalid digit found in string"
        );
    }

    #[test]
    fn authentication_message_carries_no_detail() {
        let msg = CipherError::AuthenticationFailed.to_string();
        assert!(msg.starts_with("authentication failed"));
    }
}
