//! Deterministic validator keypairs for local testnets and genesis-determinism tests:
//! `interop_keys(i)` must produce the same `BLS12-381` secret key on every machine so a
//! hand-rolled genesis state's `hash_tree_root` is reproducible.
//!
//! Derivation: `secret_key = SHA-256(b"" || i.to_le_bytes()) mod curve_order`, repeated with an
//! incrementing salt until the digest is less than the curve order (rejection sampling, as the
//! interop mnemonic in the original test vectors requires).

use lazy_static::lazy_static;
use num_bigint::BigUint;

const CURVE_ORDER_HEX: &str =
    "73eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff00000001";

lazy_static! {
    static ref CURVE_ORDER: BigUint = BigUint::parse_bytes(CURVE_ORDER_HEX.as_bytes(), 16)
        .expect("curve order is valid hex");
}

/// Returns the 32-byte big-endian secret key scalar for interop validator index `index`.
pub fn keypair_sk_bytes(index: usize) -> [u8; 32] {
    let mut preimage = index.to_le_bytes().to_vec();
    loop {
        let digest = eth2_hashing::hash(&preimage);
        let candidate = BigUint::from_bytes_le(&digest);
        if candidate < *CURVE_ORDER {
            let mut out = [0u8; 32];
            let be = candidate.to_bytes_be();
            out[32 - be.len()..].copy_from_slice(&be);
            return out;
        }
        // Extremely unlikely (candidate >= order happens for a negligible fraction of digests);
        // perturb the preimage and resample.
        preimage.push(0);
    }
}

/// Hex-encodes `keypair_sk_bytes`, matching the format used by interop testnet config files.
pub fn keypairs_sk_hex(index: usize) -> String {
    hex::encode(keypair_sk_bytes(index))
}

/// Derives the full `(secret, public)` interop keypair for validator `index`.
pub fn keypair(index: usize) -> (milagro_bls::SecretKey, milagro_bls::PublicKey) {
    let sk = milagro_bls::SecretKey::from_bytes(&keypair_sk_bytes(index))
        .expect("rejection sampling guarantees a scalar below the curve order");
    let pk = milagro_bls::PublicKey::from_secret_key(&sk);
    (sk, pk)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_across_calls() {
        assert_eq!(keypair_sk_bytes(0), keypair_sk_bytes(0));
        assert_ne!(keypair_sk_bytes(0), keypair_sk_bytes(1));
    }

    #[test]
    fn sk_is_below_curve_order() {
        for i in 0..8 {
            let sk = BigUint::from_bytes_be(&keypair_sk_bytes(i));
            assert!(sk < *CURVE_ORDER);
        }
    }
}
