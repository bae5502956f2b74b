mod committee;
mod genesis;

use crate::bounds::{
    EpochsPerHistoricalVector, EpochsPerSlashingsVector, HistoricalRootsLimit,
    JustificationBitsLength, MaxPendingAttestations, ShardCount, SlotsPerEth1VotingPeriod,
    SlotsPerHistoricalRoot, ValidatorRegistryLimit,
};
use crate::*;
use serde_derive::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash::TreeHash;
use tree_hash_derive::TreeHash;

pub use committee::BeaconCommittee;
pub use genesis::GenesisError;

/// Which of the two justified-checkpoint epochs a computation is relative to. Mirrors the
/// `current_epoch`/`previous_epoch` split threaded through every helper that reads committees
/// or attestations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeEpoch {
    Previous,
    Current,
}

#[derive(Debug, PartialEq, Clone)]
pub enum BeaconStateError {
    SlotOutOfBounds,
    ShardOutOfBounds,
    UnknownValidator(ValidatorIndex),
    EpochOutOfBounds { requested: Epoch, current: Epoch },
    InsufficientValidators,
    NoCommitteeFound,
    ArithError(safe_arith::ArithError),
    SszTypesError(ssz_types::Error),
    ShuffleError(swap_or_not_shuffle::Error),
}

impl From<safe_arith::ArithError> for BeaconStateError {
    fn from(e: safe_arith::ArithError) -> Self {
        BeaconStateError::ArithError(e)
    }
}

impl From<ssz_types::Error> for BeaconStateError {
    fn from(e: ssz_types::Error) -> Self {
        BeaconStateError::SszTypesError(e)
    }
}

impl From<swap_or_not_shuffle::Error> for BeaconStateError {
    fn from(e: swap_or_not_shuffle::Error) -> Self {
        BeaconStateError::ShuffleError(e)
    }
}

/// `BeaconState` (data model, field order normative for `hash_tree_root`).
#[derive(Debug, Clone, PartialEq, Encode, Decode, TreeHash, Serialize, Deserialize)]
pub struct BeaconState {
    pub genesis_time: u64,
    pub slot: Slot,
    pub fork: Fork,
    pub latest_block_header: BeaconBlockHeader,
    pub block_roots: FixedVector<Hash256, SlotsPerHistoricalRoot>,
    pub state_roots: FixedVector<Hash256, SlotsPerHistoricalRoot>,
    pub historical_roots: VariableList<Hash256, HistoricalRootsLimit>,

    pub eth1_data: Eth1Data,
    pub eth1_data_votes: VariableList<Eth1Data, SlotsPerEth1VotingPeriod>,
    pub eth1_deposit_index: u64,

    pub validators: VariableList<Validator, ValidatorRegistryLimit>,
    pub balances: VariableList<Gwei, ValidatorRegistryLimit>,

    pub randao_mixes: FixedVector<Hash256, EpochsPerHistoricalVector>,
    pub start_shard: ShardNumber,

    pub previous_epoch_attestations: VariableList<PendingAttestation, MaxPendingAttestations>,
    pub current_epoch_attestations: VariableList<PendingAttestation, MaxPendingAttestations>,

    pub previous_crosslinks: FixedVector<Crosslink, ShardCount>,
    pub current_crosslinks: FixedVector<Crosslink, ShardCount>,

    pub justification_bits: BitVector<JustificationBitsLength>,
    pub previous_justified_checkpoint: Checkpoint,
    pub current_justified_checkpoint: Checkpoint,
    pub finalized_checkpoint: Checkpoint,

    pub slashings: FixedVector<Gwei, EpochsPerSlashingsVector>,

    pub active_index_roots: FixedVector<Hash256, EpochsPerHistoricalVector>,
    pub compact_committees_roots: FixedVector<Hash256, EpochsPerHistoricalVector>,
}

impl BeaconState {
    pub fn canonical_root(&self) -> Hash256 {
        self.tree_hash_root()
    }

    /// `compute_epoch_of_slot`.
    pub fn current_epoch(&self, spec: &ChainSpec) -> Epoch {
        compute_epoch_of_slot(self.slot, spec)
    }

    pub fn previous_epoch(&self, spec: &ChainSpec) -> Epoch {
        let current = self.current_epoch(spec);
        if current > Epoch::new(0) {
            current - 1
        } else {
            current
        }
    }

    pub fn next_epoch(&self, spec: &ChainSpec) -> Epoch {
        self.current_epoch(spec) + 1
    }

    /// `epoch` resolved against `RelativeEpoch`, matching whichever justified-vote window a
    /// caller is working in.
    pub fn epoch_for(&self, relative: RelativeEpoch, spec: &ChainSpec) -> Epoch {
        match relative {
            RelativeEpoch::Previous => self.previous_epoch(spec),
            RelativeEpoch::Current => self.current_epoch(spec),
        }
    }

    pub fn get_validator(&self, index: ValidatorIndex) -> Result<&Validator, BeaconStateError> {
        self.validators
            .get(index as usize)
            .ok_or(BeaconStateError::UnknownValidator(index))
    }

    pub fn get_validator_mut(
        &mut self,
        index: ValidatorIndex,
    ) -> Result<&mut Validator, BeaconStateError> {
        self.validators
            .get_mut(index as usize)
            .ok_or(BeaconStateError::UnknownValidator(index))
    }

    pub fn get_balance(&self, index: ValidatorIndex) -> Result<Gwei, BeaconStateError> {
        self.balances
            .get(index as usize)
            .copied()
            .ok_or(BeaconStateError::UnknownValidator(index))
    }

    /// `get_block_root_at_slot`: cached block root for any slot within the historical window.
    pub fn get_block_root_at_slot(&self, slot: Slot) -> Result<Hash256, BeaconStateError> {
        if slot >= self.slot || self.slot > slot + self.block_roots.len() as u64 {
            return Err(BeaconStateError::SlotOutOfBounds);
        }
        Ok(self.block_roots[slot.as_usize() % self.block_roots.len()])
    }

    pub fn get_state_root_at_slot(&self, slot: Slot) -> Result<Hash256, BeaconStateError> {
        if slot >= self.slot || self.slot > slot + self.state_roots.len() as u64 {
            return Err(BeaconStateError::SlotOutOfBounds);
        }
        Ok(self.state_roots[slot.as_usize() % self.state_roots.len()])
    }

    pub fn set_block_root(&mut self, slot: Slot, root: Hash256) -> Result<(), BeaconStateError> {
        let len = self.block_roots.len();
        self.block_roots[slot.as_usize() % len] = root;
        Ok(())
    }

    pub fn set_state_root(&mut self, slot: Slot, root: Hash256) -> Result<(), BeaconStateError> {
        let len = self.state_roots.len();
        self.state_roots[slot.as_usize() % len] = root;
        Ok(())
    }

    /// `get_domain(state, domain_type, epoch)`: the fork-versioned signature domain, using the
    /// fork that was active at `epoch` (defaulting to the current epoch).
    pub fn get_domain(&self, epoch: Epoch, domain_type: DomainType) -> Domain {
        let fork_version = if epoch < self.fork.epoch {
            self.fork.previous_version
        } else {
            self.fork.current_version
        };
        compute_domain(domain_type, fork_version)
    }
}

/// `compute_epoch_of_slot`.
pub fn compute_epoch_of_slot(slot: Slot, spec: &ChainSpec) -> Epoch {
    slot.epoch(spec.slots_per_epoch)
}

/// `compute_start_slot_of_epoch`.
pub fn compute_start_slot_of_epoch(epoch: Epoch, spec: &ChainSpec) -> Slot {
    epoch.start_slot(spec.slots_per_epoch)
}
