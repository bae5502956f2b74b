use crate::bounds::MaxValidatorsPerCommittee;
use crate::{AttestationData, BitList, BlsAggregateSignature, Hash256, SignedRoot};
use serde_derive::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash::TreeHash;
use tree_hash_derive::TreeHash;

#[derive(Debug, Clone, PartialEq, Encode, Decode, TreeHash, Serialize, Deserialize)]
pub struct Attestation {
    pub aggregation_bits: BitList<MaxValidatorsPerCommittee>,
    pub data: AttestationData,
    pub custody_bits: BitList<MaxValidatorsPerCommittee>,
    pub signature: BlsAggregateSignature,
}

impl SignedRoot for Attestation {
    fn signed_root(&self) -> Hash256 {
        let mut unsigned = self.clone();
        unsigned.signature = BlsAggregateSignature::infinity();
        unsigned.tree_hash_root()
    }
}
