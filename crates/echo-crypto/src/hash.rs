//! SHA-256 hashing

use echo_primitives::H256;
use sha2::{Digest, Sha256};

/// Compute the SHA-256 hash of the input data
pub fn sha256(data: &[u8]) -> H256 {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    H256::from_bytes(result.into())
}
