//! `BLS12-381` signatures: wraps `milagro_bls` behind the small surface the rest
//! of the workspace needs (`sign`, `verify`, `aggregate_verify`, `fast_aggregate_verify`,
//! aggregate pubkeys), plus `Encode`/`Decode`/`TreeHash` for every type so they drop straight
//! into SSZ containers.
//!
//! The `fake_crypto` feature swaps every verification for a constant `true` and skips real point
//! arithmetic entirely. It exists solely for large deterministic test harnesses (e.g. replaying
//! thousands of blocks without the pairing cost) and must never be enabled in a production
//! build — there is no runtime switch, only a compile-time one, so a `fake_crypto` binary can
//! never be mistaken for a verifying one.

mod aggregate_public_key;
mod aggregate_signature;
mod keypair;
mod public_key;
mod secret_key;
mod signature;

pub use aggregate_public_key::AggregatePublicKey;
pub use aggregate_signature::AggregateSignature;
pub use keypair::Keypair;
pub use public_key::PublicKey;
pub use secret_key::SecretKey;
pub use signature::Signature;

pub const BLS_SECRET_KEY_BYTE_SIZE: usize = 32;
pub const BLS_PUBLIC_KEY_BYTE_SIZE: usize = 48;
pub const BLS_SIGNATURE_BYTE_SIZE: usize = 96;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    InvalidSecretKey,
    InvalidPublicKey,
    InvalidSignature,
    EmptyAggregate,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::InvalidSecretKey => write!(f, "invalid BLS secret key bytes"),
            Error::InvalidPublicKey => write!(f, "invalid BLS public key bytes"),
            Error::InvalidSignature => write!(f, "invalid BLS signature bytes"),
            Error::EmptyAggregate => write!(f, "cannot aggregate zero public keys"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(all(test, feature = "fake_crypto"))]
mod fake_tests {
    use super::*;

    #[test]
    fn fake_signatures_always_verify() {
        let sk = SecretKey::random();
        let pk = sk.public_key();
        let sig = sk.sign(b"message");
        assert!(sig.verify(b"a completely different message", &pk));
    }
}

#[cfg(all(test, not(feature = "fake_crypto")))]
mod real_tests {
    use super::*;

    #[test]
    fn sign_and_verify_round_trip() {
        let sk = SecretKey::random();
        let pk = sk.public_key();
        let sig = sk.sign(b"attestation root");
        assert!(sig.verify(b"attestation root", &pk));
        assert!(!sig.verify(b"a different root", &pk));
    }

    #[test]
    fn aggregate_signature_verifies_distinct_messages() {
        let sk1 = SecretKey::random();
        let sk2 = SecretKey::random();
        let pk1 = sk1.public_key();
        let pk2 = sk2.public_key();

        let sig1 = sk1.sign(b"message one");
        let sig2 = sk2.sign(b"message two");

        let mut agg = AggregateSignature::infinity();
        agg.add_assign(&sig1);
        agg.add_assign(&sig2);

        assert!(agg.aggregate_verify(
            &[b"message one", b"message two"],
            &[&pk1, &pk2],
        ));
    }

    #[test]
    fn fast_aggregate_verify_same_message() {
        let sk1 = SecretKey::random();
        let sk2 = SecretKey::random();
        let pk1 = sk1.public_key();
        let pk2 = sk2.public_key();

        let sig1 = sk1.sign(b"shared root");
        let sig2 = sk2.sign(b"shared root");

        let mut agg = AggregateSignature::infinity();
        agg.add_assign(&sig1);
        agg.add_assign(&sig2);

        assert!(agg.fast_aggregate_verify(b"shared root", &[&pk1, &pk2]));
    }
}
