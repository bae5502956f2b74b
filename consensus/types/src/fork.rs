use crate::ForkVersion;
use serde_derive::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

/// `Fork = (previous_version, current_version, epoch)`.
#[derive(Debug, Clone, PartialEq, Default, Encode, Decode, TreeHash, Serialize, Deserialize)]
pub struct Fork {
    pub previous_version: ForkVersion,
    pub current_version: ForkVersion,
    pub epoch: crate::Epoch,
}
