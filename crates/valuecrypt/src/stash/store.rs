//! [`NonceStash`]: thread-safe memo of nonces issued per plaintext and context.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use common::{CipherError, Kind};
use tracing::debug;

use super::NonceSource;
use crate::crypto::NONCE_LEN;

/// Identity of one encrypted value: its kind, its canonical bytes, and the
/// associated data it was bound to.
///
/// The fields are kept apart rather than concatenated, so no two distinct
/// pairs can collide through a shared prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct StashKey {
    kind: Kind,
    plaintext: Vec<u8>,
    additional_data: Vec<u8>,
}

/// Nonce memo owned by one cipher.
///
/// Wraps a `Mutex<HashMap<..>>` so that:
/// - One cipher can be shared across threads encrypting leaves in parallel.
/// - Lookup and insert happen under a single lock acquisition, so each key
///   receives at most one fresh nonce.
///
/// Entries are never overwritten or removed.
pub struct NonceStash<S> {
    source: S,
    entries: Mutex<HashMap<StashKey, [u8; NONCE_LEN]>>,
}

impl<S: NonceSource> NonceStash<S> {
    /// Create an empty stash drawing fresh nonces from `source`.
    pub fn new(source: S) -> Self {
        Self {
            source,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the nonce for this pair, drawing and recording a fresh one on
    /// first sight.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::RandomSource`] if a fresh nonce was needed and
    /// the source failed. Nothing is recorded in that case.
    pub fn obtain(
        &self,
        kind: Kind,
        plaintext: &[u8],
        additional_data: &[u8],
    ) -> Result<[u8; NONCE_LEN], CipherError> {
        let key = StashKey {
            kind,
            plaintext: plaintext.to_vec(),
            additional_data: additional_data.to_vec(),
        };

        let mut entries = self.lock();
        if let Some(nonce) = entries.get(&key) {
            debug!(%kind, "reusing stashed nonce");
            return Ok(*nonce);
        }

        let nonce = self.fresh()?;
        entries.insert(key, nonce);
        debug!(%kind, stashed = entries.len(), "stashed fresh nonce");
        Ok(nonce)
    }

    /// Draw a fresh nonce without consulting or updating the stash.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::RandomSource`] if the source failed.
    pub fn fresh(&self) -> Result<[u8; NONCE_LEN], CipherError> {
        let mut nonce = [0u8; NONCE_LEN];
        self.source.fill_nonce(&mut nonce)?;
        Ok(nonce)
    }

    /// Number of recorded pairs.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<StashKey, [u8; NONCE_LEN]>> {
        // Entries are only inserted once complete, so a panic elsewhere
        // cannot leave the map inconsistent.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S> std::fmt::Debug for NonceStash<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print plaintexts or nonces.
        f.write_str("NonceStash([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stash::MockNonceSource;

    /// A source that hands out 1, 2, 3, ... as the nonce fill byte.
    fn counting_source() -> MockNonceSource {
        let mut source = MockNonceSource::new();
        let mut next = 0u8;
        source.expect_fill_nonce().returning(move |nonce| {
            next += 1;
            nonce.fill(next);
            Ok(())
        });
        source
    }

    #[test]
    fn initially_empty() {
        let stash = NonceStash::new(counting_source());
        assert!(stash.is_empty());
        assert_eq!(stash.len(), 0);
    }

    #[test]
    fn same_pair_reuses_nonce() {
        let stash = NonceStash::new(counting_source());
        let first = stash.obtain(Kind::Str, b"value", b"path:").unwrap();
        let second = stash.obtain(Kind::Str, b"value", b"path:").unwrap();
        assert_eq!(first, second);
        assert_eq!(stash.len(), 1);
    }

    #[test]
    fn different_context_gets_fresh_nonce() {
        let stash = NonceStash::new(counting_source());
        let a = stash.obtain(Kind::Str, b"value", b"a:").unwrap();
        let b = stash.obtain(Kind::Str, b"value", b"b:").unwrap();
        assert_ne!(a, b);
        assert_eq!(stash.len(), 2);
    }

    #[test]
    fn shared_prefix_does_not_collide() {
        let stash = NonceStash::new(counting_source());
        let a = stash.obtain(Kind::Str, b"ab", b"c").unwrap();
        let b = stash.obtain(Kind::Str, b"a", b"bc").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn kind_is_part_of_identity() {
        let stash = NonceStash::new(counting_source());
        let as_str = stash.obtain(Kind::Str, b"1", b"n:").unwrap();
        let as_int = stash.obtain(Kind::Int, b"1", b"n:").unwrap();
        assert_ne!(as_str, as_int);
    }

    #[test]
    fn fresh_bypasses_stash() {
        let stash = NonceStash::new(counting_source());
        let a = stash.fresh().unwrap();
        let b = stash.fresh().unwrap();
        assert_ne!(a, b);
        assert!(stash.is_empty());
    }

    #[test]
    fn source_failure_records_nothing() {
        let mut source = MockNonceSource::new();
        source
            .expect_fill_nonce()
            .times(1)
            .returning(|_| Err(CipherError::RandomSource("entropy exhausted".into())));
        let stash = NonceStash::new(source);

        let err = stash.obtain(Kind::Str, b"value", b"path:").unwrap_err();
        assert!(matches!(err, CipherError::RandomSource(_)));
        assert!(stash.is_empty());
    }

    #[test]
    fn stash_redacted_in_debug() {
        let stash = NonceStash::new(counting_source());
        stash.obtain(Kind::Str, b"secret", b"path:").unwrap();
        let shown = format!("{stash:?}");
        assert!(shown.contains("REDACTED"));
        assert!(!shown.contains("secret"));
    }
}
