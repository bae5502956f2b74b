use crate::BLS_PUBLIC_KEY_BYTE_SIZE;
use serde_hex::{encode as hex_encode, HexVisitor};
use std::fmt;

#[cfg(not(feature = "fake_crypto"))]
type Inner = milagro_bls::PublicKey;
#[cfg(feature = "fake_crypto")]
type Inner = [u8; BLS_PUBLIC_KEY_BYTE_SIZE];

/// A `BLS12-381` public key, always carried as its 48-byte compressed point encoding.
#[derive(Clone)]
pub struct PublicKey(Inner);

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}
impl Eq for PublicKey {}

impl std::hash::Hash for PublicKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state)
    }
}

impl PublicKey {
    pub(crate) fn from_raw(inner: Inner) -> Self {
        Self(inner)
    }

    #[cfg(not(feature = "fake_crypto"))]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, crate::Error> {
        milagro_bls::PublicKey::from_bytes(bytes)
            .map(Self)
            .map_err(|_| crate::Error::InvalidPublicKey)
    }

    #[cfg(feature = "fake_crypto")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, crate::Error> {
        if bytes.len() != BLS_PUBLIC_KEY_BYTE_SIZE {
            return Err(crate::Error::InvalidPublicKey);
        }
        let mut arr = [0; BLS_PUBLIC_KEY_BYTE_SIZE];
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

    pub(crate) fn raw(&self) -> &Inner {
        &self.0
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", hex_encode(&self.as_bytes()))
    }
}

impl serde::Serialize for PublicKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex_encode(&self.as_bytes()))
    }
}

impl<'de> serde::Deserialize<'de> for PublicKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = deserializer.deserialize_str(HexVisitor)?;
        Self::from_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}

impl ssz::Encode for PublicKey {
    fn is_ssz_fixed_len() -> bool {
        true
    }
    fn ssz_fixed_len() -> usize {
        BLS_PUBLIC_KEY_BYTE_SIZE
    }
    fn ssz_bytes_len(&self) -> usize {
        BLS_PUBLIC_KEY_BYTE_SIZE
    }
    fn ssz_append(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.as_bytes());
    }
}

impl ssz::Decode for PublicKey {
    fn is_ssz_fixed_len() -> bool {
        true
    }
    fn ssz_fixed_len() -> usize {
        BLS_PUBLIC_KEY_BYTE_SIZE
    }
    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, ssz::DecodeError> {
        Self::from_bytes(bytes).map_err(|e| ssz::DecodeError::BytesInvalid(format!("{:?}", e)))
    }
}

impl tree_hash::TreeHash for PublicKey {
    fn tree_hash_type() -> tree_hash::TreeHashType {
        tree_hash::TreeHashType::Vector
    }
    fn tree_hash_packed_encoding(&self) -> Vec<u8> {
        unreachable!("PublicKey is not packed, only merkleized directly")
    }
    fn tree_hash_packing_factor() -> usize {
        unreachable!("PublicKey is not packed, only merkleized directly")
    }
    fn tree_hash_root(&self) -> ethereum_types::H256 {
        let mut padded = self.as_bytes();
        padded.resize(64, 0);
        ethereum_types::H256::from_slice(&tree_hash::merkleize_padded(&padded, 0))
    }
}
