//! Content hash of a source row
//!
//! The hash is SHA-256 over a length-prefixed encoding of the ordered values,
//! rendered as lowercase hex. Each value contributes a marker byte (`0` for
//! NULL, `1` for text) and, for text, its byte length as a little-endian `u64`
//! followed by the UTF-8 bytes. The encoding is unambiguous, so `("ab", "c")`,
//! `("a", "bc")` and `("abc", NULL)` all hash differently. The result is stable
//! across processes and releases; it is the durable identity of a row in the
//! target table.

use crate::domain::Value;
use sha2::{Digest, Sha256};

/// Hash the full ordered tuple of source values
pub fn row_hash(values: &[Value]) -> String {
    let mut hasher = Sha256::new();

    for value in values {
        match value {
            None => hasher.update([0u8]),
            Some(text) => {
                hasher.update([1u8]);
                hasher.update((text.len() as u64).to_le_bytes());
                hasher.update(text.as_bytes());
            }
        }
    }

    format!("{:x}", hasher.finalize())
}
