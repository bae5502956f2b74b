use crate::{BeaconBlockHeader, ValidatorIndex};
use serde_derive::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

/// Two distinct signed headers by the same proposer at the same slot.
#[derive(Debug, Clone, PartialEq, Encode, Decode, TreeHash, Serialize, Deserialize)]
pub struct ProposerSlashing {
    pub proposer_index: ValidatorIndex,
    pub header_1: BeaconBlockHeader,
    pub header_2: BeaconBlockHeader,
}
