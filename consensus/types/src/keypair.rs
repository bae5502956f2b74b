use crate::{BlsPubkey, SecretKey};

/// A secret/public keypair, bundled for test fixtures that need to both sign and assert on the
/// pubkey side.
#[derive(Clone, Debug)]
pub struct Keypair {
    pub sk: SecretKey,
    pub pk: BlsPubkey,
}

impl Keypair {
    pub fn from_secret(sk: SecretKey) -> Self {
        let pk = sk.public_key();
        Keypair { sk, pk }
    }
}
