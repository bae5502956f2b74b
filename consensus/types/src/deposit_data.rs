use crate::{BlsPubkey, BlsSignature, Gwei, Hash256, SignedRoot};
use serde_derive::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash::TreeHash;
use tree_hash_derive::TreeHash;

#[derive(Debug, Clone, PartialEq, Encode, Decode, TreeHash, Serialize, Deserialize)]
pub struct DepositData {
    pub pubkey: BlsPubkey,
    pub withdrawal_credentials: Hash256,
    pub amount: Gwei,
    pub signature: BlsSignature,
}

impl SignedRoot for DepositData {
    fn signed_root(&self) -> Hash256 {
        let mut unsigned = self.clone();
        unsigned.signature = BlsSignature::empty_signature();
        unsigned.tree_hash_root()
    }
}
