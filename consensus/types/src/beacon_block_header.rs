use crate::{BlsSignature, Hash256, SignedRoot, Slot};
use serde_derive::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash::TreeHash;
use tree_hash_derive::TreeHash;

#[derive(Debug, Clone, PartialEq, Encode, Decode, TreeHash, Serialize, Deserialize)]
pub struct BeaconBlockHeader {
    pub slot: Slot,
    pub parent_root: Hash256,
    pub state_root: Hash256,
    pub body_root: Hash256,
    pub signature: BlsSignature,
}

impl SignedRoot for BeaconBlockHeader {
    fn signed_root(&self) -> Hash256 {
        let mut unsigned = self.clone();
        unsigned.signature = BlsSignature::empty_signature();
        unsigned.tree_hash_root()
    }
}

impl BeaconBlockHeader {
    /// A header with a zeroed `state_root`, the form stored as `latest_block_header` until the
    /// following slot fills it in.
    pub fn canonical_root(&self) -> Hash256 {
        self.tree_hash_root().into()
    }
}
