use crate::bounds::MaxValidatorsPerCommittee;
use crate::{AttestationData, BlsAggregateSignature, ValidatorIndex, VariableList};
use serde_derive::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

/// An attestation expanded into its explicit list of attesting validator indices, the form
/// slashing proofs are built from.
#[derive(Debug, Clone, PartialEq, Encode, Decode, TreeHash, Serialize, Deserialize)]
pub struct IndexedAttestation {
    pub attesting_indices: VariableList<ValidatorIndex, MaxValidatorsPerCommittee>,
    pub data: AttestationData,
    pub signature: BlsAggregateSignature,
}

impl IndexedAttestation {
    /// `is_double_vote`: same target epoch, different data.
    pub fn is_double_vote(&self, other: &Self) -> bool {
        self.data.target.epoch == other.data.target.epoch && self.data != other.data
    }

    /// `is_surround_vote`: one attestation's source/target interval strictly contains the
    /// other's.
    pub fn is_surround_vote(&self, other: &Self) -> bool {
        let source_1 = self.data.source.epoch;
        let source_2 = other.data.source.epoch;
        let target_1 = self.data.target.epoch;
        let target_2 = other.data.target.epoch;

        source_1 < source_2 && target_2 < target_1
    }
}
