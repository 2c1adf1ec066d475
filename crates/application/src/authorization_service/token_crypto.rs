use std::fmt::Write;

use sha2::{Digest, Sha256};

/// Computes the SHA-256 hash under which an access token is stored.
#[must_use]
pub fn hash_access_token(raw_token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw_token.as_bytes());
    let result = hasher.finalize();

    result
        .iter()
        .fold(String::with_capacity(64), |mut acc, byte| {
            let _ = write!(acc, "{byte:02x}");
            acc
        })
}
