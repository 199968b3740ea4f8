//! Common types and errors shared across `valuecrypt` crates.

pub mod error;
pub mod plaintext;

pub use error::CipherError;
pub use plaintext::{Kind, Plaintext};
