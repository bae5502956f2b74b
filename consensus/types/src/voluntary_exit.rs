use crate::{BlsSignature, Epoch, Hash256, SignedRoot, ValidatorIndex};
use serde_derive::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash::TreeHash;
use tree_hash_derive::TreeHash;

#[derive(Debug, Clone, PartialEq, Encode, Decode, TreeHash, Serialize, Deserialize)]
pub struct VoluntaryExit {
    pub epoch: Epoch,
    pub validator_index: ValidatorIndex,
    pub signature: BlsSignature,
}

impl SignedRoot for VoluntaryExit {
    fn signed_root(&self) -> Hash256 {
        let mut unsigned = self.clone();
        unsigned.signature = BlsSignature::empty_signature();
        unsigned.tree_hash_root()
    }
}
