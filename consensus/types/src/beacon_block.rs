use crate::{BeaconBlockBody, BeaconBlockHeader, BlsSignature, Hash256, SignedRoot, Slot};
use serde_derive::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash::TreeHash;
use tree_hash_derive::TreeHash;

#[derive(Debug, Clone, PartialEq, Encode, Decode, TreeHash, Serialize, Deserialize)]
pub struct BeaconBlock {
    pub slot: Slot,
    pub parent_root: Hash256,
    pub state_root: Hash256,
    pub body: BeaconBlockBody,
    pub signature: BlsSignature,
}

impl SignedRoot for BeaconBlock {
    fn signed_root(&self) -> Hash256 {
        let mut unsigned = self.clone();
        unsigned.signature = BlsSignature::empty_signature();
        unsigned.tree_hash_root()
    }
}

impl BeaconBlock {
    pub fn empty(slot: Slot, parent_root: Hash256) -> Self {
        BeaconBlock {
            slot,
            parent_root,
            state_root: Hash256::zero(),
            body: BeaconBlockBody::empty(),
            signature: BlsSignature::empty_signature(),
        }
    }

    pub fn canonical_root(&self) -> Hash256 {
        self.tree_hash_root()
    }

    /// The header form of this block: body replaced by its root, `state_root` carried through.
    pub fn block_header(&self) -> BeaconBlockHeader {
        BeaconBlockHeader {
            slot: self.slot,
            parent_root: self.parent_root,
            state_root: self.state_root,
            body_root: self.body.tree_hash_root(),
            signature: self.signature.clone(),
        }
    }

    /// `temporary_block_header`: the header used by `process_block_header` before
    /// `state_root` is known, with `state_root` zeroed.
    pub fn temporary_block_header(&self) -> BeaconBlockHeader {
        let mut header = self.block_header();
        header.state_root = Hash256::zero();
        header
    }
}
