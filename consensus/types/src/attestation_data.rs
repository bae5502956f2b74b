use crate::{Checkpoint, Crosslink, Hash256, Slot};
use serde_derive::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

/// `(slot, beacon_block_root, source: Checkpoint, target: Checkpoint, crosslink: Crosslink)`.
/// `slot` is carried explicitly (rather than recovered from the crosslink) because inclusion-delay
/// accounting compares it directly against `current_slot`.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Encode, Decode, TreeHash, Serialize, Deserialize,
)]
pub struct AttestationData {
    pub slot: Slot,
    pub beacon_block_root: Hash256,
    pub source: Checkpoint,
    pub target: Checkpoint,
    pub crosslink: Crosslink,
}
