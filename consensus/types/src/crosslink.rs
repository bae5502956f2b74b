use crate::{Epoch, Hash256, ShardNumber};
use serde_derive::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

/// Shard-to-beacon commitment summary. In phase 0 this is a placeholder with deterministic
/// fields rather than real shard data.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Encode, Decode, TreeHash, Serialize, Deserialize,
)]
pub struct Crosslink {
    pub shard: ShardNumber,
    pub parent_root: Hash256,
    pub start_epoch: Epoch,
    pub end_epoch: Epoch,
    pub data_root: Hash256,
}

impl Crosslink {
    /// The genesis crosslink for `shard`: zero root, `start_epoch == end_epoch == genesis_epoch`.
    pub fn genesis(shard: ShardNumber, genesis_epoch: Epoch) -> Self {
        Crosslink {
            shard,
            parent_root: Hash256::zero(),
            start_epoch: genesis_epoch,
            end_epoch: genesis_epoch,
            data_root: Hash256::zero(),
        }
    }
}
