//! Value-level AES-256-GCM encryption for structured configuration files.
//!
//! Each scalar leaf of a document is encrypted on its own into a
//! self-describing string:
//!
//! ```text
//! ENC[AES256_GCM,data:<b64>,iv:<b64>,tag:<b64>,type:<kind>]
//! ```
//!
//! The value's location in the document is bound in as associated data
//! (see [`path::additional_data_for`]), so an envelope moved to another key
//! fails to decrypt. A [`Cipher`] remembers the nonce it drew for each
//! (value, location) pair and reuses it when the same pair is encrypted
//! again, which keeps re-encrypted documents diff-minimal.
//!
//! ```no_run
//! use valuecrypt::{path::additional_data_for, Cipher, Plaintext};
//!
//! # fn main() -> Result<(), valuecrypt::CipherError> {
//! let key = [0x42u8; valuecrypt::KEY_LEN];
//! let cipher = Cipher::new();
//! let aad = additional_data_for(["db", "password"]);
//!
//! let encrypted = cipher.encrypt(&Plaintext::from("hunter2"), &key, &aad)?;
//! assert_eq!(cipher.decrypt(&encrypted, &key, &aad)?, Plaintext::from("hunter2"));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod crypto;
pub mod path;
pub mod stash;
pub mod telemetry;

pub use common::{CipherError, Kind, Plaintext};
pub use config::Config;
pub use crypto::{Cipher, EncryptedEnvelope, KEY_LEN, NONCE_LEN, TAG_LEN};
pub use stash::{NonceSource, NonceStash, OsNonceSource};
