use crate::bounds::MaxValidatorsPerCommittee;
use crate::{AttestationData, BitList, ValidatorIndex};
use serde_derive::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

/// An attestation already included in a block, plus the bookkeeping needed to compute its
/// inclusion-delay reward.
#[derive(Debug, Clone, PartialEq, Encode, Decode, TreeHash, Serialize, Deserialize)]
pub struct PendingAttestation {
    pub aggregation_bits: BitList<MaxValidatorsPerCommittee>,
    pub data: AttestationData,
    pub inclusion_delay: u64,
    pub proposer_index: ValidatorIndex,
}
