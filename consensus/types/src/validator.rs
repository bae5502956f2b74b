use crate::{BlsPubkey, Epoch, Gwei, Hash256};
use serde_derive::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

/// `FAR_FUTURE_EPOCH`: the sentinel for "not yet scheduled".
pub const FAR_FUTURE_EPOCH: Epoch = Epoch::max_value();

#[derive(Debug, Clone, PartialEq, Encode, Decode, TreeHash, Serialize, Deserialize)]
pub struct Validator {
    pub pubkey: BlsPubkey,
    pub withdrawal_credentials: Hash256,
    pub effective_balance: Gwei,
    pub slashed: bool,
    pub activation_eligibility_epoch: Epoch,
    pub activation_epoch: Epoch,
    pub exit_epoch: Epoch,
    pub withdrawable_epoch: Epoch,
}

impl Validator {
    pub fn is_active_at(&self, epoch: Epoch) -> bool {
        self.activation_epoch <= epoch && epoch < self.exit_epoch
    }

    pub fn is_exited_at(&self, epoch: Epoch) -> bool {
        self.exit_epoch <= epoch
    }

    pub fn is_withdrawable_at(&self, epoch: Epoch) -> bool {
        self.withdrawable_epoch <= epoch
    }

    pub fn is_eligible_for_activation_queue(&self, spec: &crate::ChainSpec) -> bool {
        self.activation_eligibility_epoch == FAR_FUTURE_EPOCH
            && self.effective_balance == spec.max_effective_balance
    }
}
