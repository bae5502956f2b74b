//! The single hash function used across SSZ Merkleization and the
//! consensus helpers: SHA-256. Kept as its own crate (rather than calling
//! `ring` directly everywhere) so the hash function is a single swappable
//! choke point, per the "no global hashing singletons" design note — each
//! call constructs its own digest context, there is no process-wide state.

#[cfg(not(target_arch = "wasm32"))]
use ring::digest::{digest, SHA256};

#[cfg(target_arch = "wasm32")]
use sha2::{Digest, Sha256};

#[cfg(feature = "zero_hash_cache")]
use lazy_static::lazy_static;

/// Length in bytes of a SHA-256 digest.
pub const HASH_LEN: usize = 32;

/// Hash `input` with SHA-256, returning the 32-byte digest.
#[cfg(not(target_arch = "wasm32"))]
pub fn hash(input: &[u8]) -> Vec<u8> {
    digest(&SHA256, input).as_ref().to_vec()
}

#[cfg(target_arch = "wasm32")]
pub fn hash(input: &[u8]) -> Vec<u8> {
    Sha256::digest(input).as_slice().to_vec()
}

/// Hash `input`, writing the digest into a fixed-size array. Avoids an
/// allocation on the hot Merkleization path.
pub fn hash32_concat(h1: &[u8], h2: &[u8]) -> [u8; HASH_LEN] {
    let mut buf = [0u8; HASH_LEN * 2];
    buf[0..HASH_LEN].copy_from_slice(h1);
    buf[HASH_LEN..].copy_from_slice(h2);
    let mut out = [0u8; HASH_LEN];
    out.copy_from_slice(&hash(&buf));
    out
}

#[cfg(feature = "zero_hash_cache")]
lazy_static! {
    /// Precomputed zero hashes for each Merkle tree depth, used to pad
    /// trees whose leaf count is not a power of two without re-hashing
    /// all-zero subtrees on every call.
    pub static ref ZERO_HASHES: Vec<Vec<u8>> = {
        let mut hashes = vec![vec![0; HASH_LEN]; 1];
        for i in 1..64 {
            let prev = &hashes[i - 1];
            hashes.push(hash32_concat(prev, prev).to_vec());
        }
        hashes
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_length() {
        assert_eq!(hash(b"hello").len(), HASH_LEN);
    }

    #[test]
    fn deterministic() {
        assert_eq!(hash(b"abc"), hash(b"abc"));
        assert_ne!(hash(b"abc"), hash(b"abd"));
    }

    #[cfg(feature = "zero_hash_cache")]
    #[test]
    fn zero_hashes_grow() {
        assert_eq!(ZERO_HASHES[0], vec![0; HASH_LEN]);
        assert_eq!(ZERO_HASHES[1], hash32_concat(&ZERO_HASHES[0], &ZERO_HASHES[0]).to_vec());
    }
}
