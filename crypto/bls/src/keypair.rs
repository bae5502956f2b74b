use crate::{PublicKey, SecretKey};

/// A convenience bundle of a `SecretKey` and its corresponding `PublicKey`, as produced by a
/// validator's key generation or derived from an interop mnemonic.
#[derive(Clone, Debug)]
pub struct Keypair {
    pub sk: SecretKey,
    pub pk: PublicKey,
}

impl Keypair {
    pub fn from_components(sk: SecretKey, pk: PublicKey) -> Self {
        Self { sk, pk }
    }

    pub fn random() -> Self {
        let sk = SecretKey::random();
        let pk = sk.public_key();
        Self { sk, pk }
    }
}
