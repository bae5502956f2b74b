use crate::{Epoch, Hash256};
use serde_derive::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

/// The FFG vote unit: `(epoch, block-root-at-epoch-boundary)`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Encode, Decode, TreeHash, Serialize, Deserialize,
)]
pub struct Checkpoint {
    pub epoch: Epoch,
    pub root: Hash256,
}

impl Checkpoint {
    pub fn new(epoch: Epoch, root: Hash256) -> Self {
        Checkpoint { epoch, root }
    }
}
