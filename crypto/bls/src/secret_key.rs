use crate::{PublicKey, Signature, BLS_SECRET_KEY_BYTE_SIZE};
use serde_hex::{encode as hex_encode, HexVisitor};
use std::fmt;

/// A `BLS12-381` secret key.
#[derive(Clone)]
pub struct SecretKey(
    #[cfg(not(feature = "fake_crypto"))] milagro_bls::SecretKey,
    #[cfg(feature = "fake_crypto")] [u8; BLS_SECRET_KEY_BYTE_SIZE],
);

impl Drop for SecretKey {
    /// Best-effort: zero the exported byte copy so a scalar doesn't linger in freed memory any
    /// longer than necessary. Does not reach into `milagro_bls`'s own internal representation.
    fn drop(&mut self) {
        let mut bytes = self.as_bytes();
        zeroize::Zeroize::zeroize(&mut bytes);
    }
}

impl SecretKey {
    #[cfg(not(feature = "fake_crypto"))]
    pub fn random() -> Self {
        Self(milagro_bls::SecretKey::random(&mut rand::thread_rng()))
    }

    #[cfg(feature = "fake_crypto")]
    pub fn random() -> Self {
        Self([42; BLS_SECRET_KEY_BYTE_SIZE])
    }

    #[cfg(not(feature = "fake_crypto"))]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, crate::Error> {
        milagro_bls::SecretKey::from_bytes(bytes)
            .map(Self)
            .map_err(|_| crate::Error::InvalidSecretKey)
    }

    #[cfg(feature = "fake_crypto")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, crate::Error> {
        if bytes.len() != BLS_SECRET_KEY_BYTE_SIZE {
            return Err(crate::Error::InvalidSecretKey);
        }
        let mut arr = [0; BLS_SECRET_KEY_BYTE_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }

    #[cfg(not(feature = "fake_crypto"))]
    pub fn as_bytes(&self) -> Vec<u8> {
        self.0.as_bytes()
    }

    #[cfg(feature = "fake_crypto")]
    pub fn as_bytes(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    #[cfg(not(feature = "fake_crypto"))]
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_raw(milagro_bls::PublicKey::from_secret_key(&self.0))
    }

    #[cfg(feature = "fake_crypto")]
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_raw(self.0)
    }

    /// Signs `message`, which the caller must already have domain-separated (see
    /// `compute_signing_root` in `state_processing`).
    #[cfg(not(feature = "fake_crypto"))]
    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature::from_raw(milagro_bls::Signature::new(message, &self.0))
    }

    #[cfg(feature = "fake_crypto")]
    pub fn sign(&self, _message: &[u8]) -> Signature {
        Signature::empty_signature()
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SecretKey(..)")
    }
}

impl serde::Serialize for SecretKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex_encode(&self.as_bytes()))
    }
}

impl<'de> serde::Deserialize<'de> for SecretKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = deserializer.deserialize_str(HexVisitor)?;
        Self::from_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}
