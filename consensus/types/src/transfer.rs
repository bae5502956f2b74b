use crate::{BlsPubkey, BlsSignature, Gwei, Hash256, SignedRoot, Slot, ValidatorIndex};
use serde_derive::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash::TreeHash;
use tree_hash_derive::TreeHash;

#[derive(Debug, Clone, PartialEq, Encode, Decode, TreeHash, Serialize, Deserialize)]
pub struct Transfer {
    pub sender: ValidatorIndex,
    pub recipient: ValidatorIndex,
    pub amount: Gwei,
    pub fee: Gwei,
    pub slot: Slot,
    pub pubkey: BlsPubkey,
    pub signature: BlsSignature,
}

impl SignedRoot for Transfer {
    fn signed_root(&self) -> Hash256 {
        let mut unsigned = self.clone();
        unsigned.signature = BlsSignature::empty_signature();
        unsigned.tree_hash_root()
    }
}
