use crate::{PublicKey, BLS_SIGNATURE_BYTE_SIZE};
use serde_hex::{encode as hex_encode, HexVisitor};
use std::fmt;

#[cfg(not(feature = "fake_crypto"))]
type Inner = milagro_bls::Signature;
#[cfg(feature = "fake_crypto")]
type Inner = [u8; BLS_SIGNATURE_BYTE_SIZE];

/// A `BLS12-381` signature, carried as its 96-byte compressed `G2` point encoding.
#[derive(Clone)]
pub struct Signature(Inner);

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}
impl Eq for Signature {}

impl Signature {
    pub(crate) fn from_raw(inner: Inner) -> Self {
        Self(inner)
    }

    /// The all-zero (point-at-infinity) signature used before a block/attestation has been
    /// signed. Never verifies against a real message/key pair.
    #[cfg(not(feature = "fake_crypto"))]
    pub fn empty_signature() -> Self {
        Self(
            milagro_bls::Signature::from_bytes(&[0; BLS_SIGNATURE_BYTE_SIZE])
                .expect("the zero compressed point decodes to the identity element"),
        )
    }

    #[cfg(feature = "fake_crypto")]
    pub fn empty_signature() -> Self {
        Self([0; BLS_SIGNATURE_BYTE_SIZE])
    }

    #[cfg(not(feature = "fake_crypto"))]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, crate::Error> {
        milagro_bls::Signature::from_bytes(bytes)
            .map(Self)
            .map_err(|_| crate::Error::InvalidSignature)
    }

    #[cfg(feature = "fake_crypto")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, crate::Error> {
        if bytes.len() != BLS_SIGNATURE_BYTE_SIZE {
            return Err(crate::Error::InvalidSignature);
        }
        let mut arr = [0; BLS_SIGNATURE_BYTE_SIZE];
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
    pub fn verify(&self, message: &[u8], public_key: &PublicKey) -> bool {
        self.0.verify(message, public_key.raw())
    }

    /// Signature verification always succeeds under `fake_crypto`: the feature exists only to
    /// let large-scale test harnesses skip the (expensive) real pairing check, never for
    /// production use.
    #[cfg(feature = "fake_crypto")]
    pub fn verify(&self, _message: &[u8], _public_key: &PublicKey) -> bool {
        true
    }

    pub(crate) fn raw(&self) -> &Inner {
        &self.0
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", hex_encode(&self.as_bytes()))
    }
}

impl serde::Serialize for Signature {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex_encode(&self.as_bytes()))
    }
}

impl<'de> serde::Deserialize<'de> for Signature {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = deserializer.deserialize_str(HexVisitor)?;
        Self::from_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}

impl ssz::Encode for Signature {
    fn is_ssz_fixed_len() -> bool {
        true
    }
    fn ssz_fixed_len() -> usize {
        BLS_SIGNATURE_BYTE_SIZE
    }
    fn ssz_bytes_len(&self) -> usize {
        BLS_SIGNATURE_BYTE_SIZE
    }
    fn ssz_append(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.as_bytes());
    }
}

impl ssz::Decode for Signature {
    fn is_ssz_fixed_len() -> bool {
        true
    }
    fn ssz_fixed_len() -> usize {
        BLS_SIGNATURE_BYTE_SIZE
    }
    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, ssz::DecodeError> {
        Self::from_bytes(bytes).map_err(|e| ssz::DecodeError::BytesInvalid(format!("{:?}", e)))
    }
}

impl tree_hash::TreeHash for Signature {
    fn tree_hash_type() -> tree_hash::TreeHashType {
        tree_hash::TreeHashType::Vector
    }
    fn tree_hash_packed_encoding(&self) -> Vec<u8> {
        unreachable!("Signature is not packed, only merkleized directly")
    }
    fn tree_hash_packing_factor() -> usize {
        unreachable!("Signature is not packed, only merkleized directly")
    }
    fn tree_hash_root(&self) -> ethereum_types::H256 {
        let mut padded = self.as_bytes();
        padded.resize(128, 0);
        ethereum_types::H256::from_slice(&tree_hash::merkleize_padded(&padded, 0))
    }
}
