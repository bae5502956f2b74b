use crate::{PublicKey, Signature, BLS_SIGNATURE_BYTE_SIZE};
use serde_hex::{encode as hex_encode, HexVisitor};
use std::fmt;

#[cfg(not(feature = "fake_crypto"))]
type Inner = milagro_bls::AggregateSignature;
#[cfg(feature = "fake_crypto")]
type Inner = [u8; BLS_SIGNATURE_BYTE_SIZE];

/// The pointwise sum of several `Signature`s. Used to compress an attestation committee's
/// signatures down to one signature covering every signer's attested data.
#[derive(Clone)]
pub struct AggregateSignature(Inner);

impl PartialEq for AggregateSignature {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl AggregateSignature {
    #[cfg(not(feature = "fake_crypto"))]
    pub fn infinity() -> Self {
        Self(milagro_bls::AggregateSignature::new())
    }

    #[cfg(feature = "fake_crypto")]
    pub fn infinity() -> Self {
        Self([0; BLS_SIGNATURE_BYTE_SIZE])
    }

    #[cfg(not(feature = "fake_crypto"))]
    pub fn add_assign(&mut self, signature: &Signature) {
        self.0.add(signature.raw());
    }

    #[cfg(feature = "fake_crypto")]
    pub fn add_assign(&mut self, _signature: &Signature) {}

    /// Folds another aggregate into this one. Sound only when the two aggregates were built over
    /// disjoint signer sets for the same message — the caller (the attestation pool) is
    /// responsible for checking that before merging.
    #[cfg(not(feature = "fake_crypto"))]
    pub fn add_assign_aggregate(&mut self, agg: &AggregateSignature) {
        self.0.add_aggregate(&agg.0);
    }

    #[cfg(feature = "fake_crypto")]
    pub fn add_assign_aggregate(&mut self, _agg: &AggregateSignature) {}

    #[cfg(not(feature = "fake_crypto"))]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, crate::Error> {
        milagro_bls::AggregateSignature::from_bytes(bytes)
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

    /// Verifies that every `(message, public_key)` pair was individually signed (distinct
    /// messages) and summed into this aggregate. Used for a block's `AttesterSlashing` evidence
    /// and cross-committee aggregation.
    #[cfg(not(feature = "fake_crypto"))]
    pub fn aggregate_verify(&self, messages: &[&[u8]], public_keys: &[&PublicKey]) -> bool {
        let raw_keys: Vec<_> = public_keys.iter().map(|pk| pk.raw().clone()).collect();
        self.0.aggregate_verify(messages, &raw_keys)
    }

    #[cfg(feature = "fake_crypto")]
    pub fn aggregate_verify(&self, _messages: &[&[u8]], _public_keys: &[&PublicKey]) -> bool {
        true
    }

    /// Verifies that every `public_key` signed the *same* `message`. Used for an attestation's
    /// `aggregation_bits`-selected signer set, all attesting to identical `AttestationData`.
    #[cfg(not(feature = "fake_crypto"))]
    pub fn fast_aggregate_verify(&self, message: &[u8], public_keys: &[&PublicKey]) -> bool {
        let raw_keys: Vec<_> = public_keys.iter().map(|pk| pk.raw().clone()).collect();
        self.0.fast_aggregate_verify(message, &raw_keys)
    }

    #[cfg(feature = "fake_crypto")]
    pub fn fast_aggregate_verify(&self, _message: &[u8], _public_keys: &[&PublicKey]) -> bool {
        true
    }
}

impl fmt::Debug for AggregateSignature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", hex_encode(&self.as_bytes()))
    }
}

impl serde::Serialize for AggregateSignature {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex_encode(&self.as_bytes()))
    }
}

impl<'de> serde::Deserialize<'de> for AggregateSignature {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = deserializer.deserialize_str(HexVisitor)?;
        Self::from_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}

impl ssz::Encode for AggregateSignature {
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

impl ssz::Decode for AggregateSignature {
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

impl tree_hash::TreeHash for AggregateSignature {
    fn tree_hash_type() -> tree_hash::TreeHashType {
        tree_hash::TreeHashType::Vector
    }
    fn tree_hash_packed_encoding(&self) -> Vec<u8> {
        unreachable!("AggregateSignature is not packed, only merkleized directly")
    }
    fn tree_hash_packing_factor() -> usize {
        unreachable!("AggregateSignature is not packed, only merkleized directly")
    }
    fn tree_hash_root(&self) -> ethereum_types::H256 {
        let mut padded = self.as_bytes();
        padded.resize(128, 0);
        ethereum_types::H256::from_slice(&tree_hash::merkleize_padded(&padded, 0))
    }
}
