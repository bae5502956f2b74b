use crate::{DepositData, Hash256};
use serde_derive::{Deserialize, Serialize};
use ssz_types::typenum::U33;
use ssz_types::FixedVector;
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

/// A single deposit with its Merkle branch against `state.eth1_data.deposit_root`.
/// `DEPOSIT_CONTRACT_TREE_DEPTH + 1 == 33`: one sibling per tree level, plus one more mixing in
/// the eth1 deposit count.
#[derive(Debug, Clone, PartialEq, Encode, Decode, TreeHash, Serialize, Deserialize)]
pub struct Deposit {
    pub proof: FixedVector<Hash256, U33>,
    pub data: DepositData,
}
