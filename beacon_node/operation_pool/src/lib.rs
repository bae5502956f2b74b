//! Pending-operation mempools: attestations (aggregated by `AttestationData`), proposer
//! slashings, attester slashings, voluntary exits and transfers. Each pool is populated from
//! gossip/RPC and drained by the block-production path.

mod attestation_pool;
mod simple_pool;

pub use attestation_pool::{AttestationPool, InsertOutcome};
pub use simple_pool::SimplePool;

use tree_hash::TreeHash;
use types::{AttesterSlashing, Hash256, ProposerSlashing, Transfer, ValidatorIndex, VoluntaryExit};

const MAX_PROPOSER_SLASHINGS: usize = 16;
const MAX_ATTESTER_SLASHINGS: usize = 1;
const MAX_VOLUNTARY_EXITS: usize = 16;
const MAX_TRANSFERS: usize = 16;

/// Every mempool a block-production step draws from, bundled so `beacon_chain` holds a single
/// handle.
pub struct OperationPool {
    pub attestations: AttestationPool,
    proposer_slashings: SimplePool<ValidatorIndex, ProposerSlashing>,
    attester_slashings: SimplePool<Hash256, AttesterSlashing>,
    voluntary_exits: SimplePool<ValidatorIndex, VoluntaryExit>,
    transfers: SimplePool<Hash256, Transfer>,
}

impl Default for OperationPool {
    fn default() -> Self {
        OperationPool {
            attestations: AttestationPool::new(),
            proposer_slashings: SimplePool::new(MAX_PROPOSER_SLASHINGS),
            attester_slashings: SimplePool::new(MAX_ATTESTER_SLASHINGS),
            voluntary_exits: SimplePool::new(MAX_VOLUNTARY_EXITS),
            transfers: SimplePool::new(MAX_TRANSFERS),
        }
    }
}

impl OperationPool {
    pub fn new() -> Self {
        OperationPool::default()
    }

    /// One entry per accused proposer; a second report against the same proposer is redundant
    /// once the first is included.
    pub fn insert_proposer_slashing(&self, slashing: ProposerSlashing) -> bool {
        self.proposer_slashings.insert(slashing.proposer_index, slashing)
    }

    pub fn insert_attester_slashing(&self, slashing: AttesterSlashing) -> bool {
        let id = slashing.tree_hash_root();
        self.attester_slashings.insert(id, slashing)
    }

    /// One outstanding exit per validator.
    pub fn insert_voluntary_exit(&self, exit: VoluntaryExit) -> bool {
        self.voluntary_exits.insert(exit.validator_index, exit)
    }

    pub fn insert_transfer(&self, transfer: Transfer) -> bool {
        let id = transfer.tree_hash_root();
        self.transfers.insert(id, transfer)
    }

    pub fn get_proposer_slashings(&self, max: usize) -> Vec<ProposerSlashing> {
        let mut items = self.proposer_slashings.values();
        items.truncate(max);
        items
    }

    pub fn get_attester_slashings(&self, max: usize) -> Vec<AttesterSlashing> {
        let mut items = self.attester_slashings.values();
        items.truncate(max);
        items
    }

    pub fn get_voluntary_exits(&self, max: usize) -> Vec<VoluntaryExit> {
        let mut items = self.voluntary_exits.values();
        items.truncate(max);
        items
    }

    pub fn get_transfers(&self, max: usize) -> Vec<Transfer> {
        let mut items = self.transfers.values();
        items.truncate(max);
        items
    }

    /// Drops operations that named a now-slashed/exited validator, called after including a
    /// block that processed them.
    pub fn prune_validator(&self, index: ValidatorIndex) {
        self.proposer_slashings.remove(&index);
        self.voluntary_exits.remove(&index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::{BeaconBlockHeader, BlsSignature};

    fn header(slot: u64) -> BeaconBlockHeader {
        BeaconBlockHeader {
            slot: types::Slot::new(slot),
            parent_root: Hash256::zero(),
            state_root: Hash256::zero(),
            body_root: Hash256::zero(),
            signature: BlsSignature::empty_signature(),
        }
    }

    #[test]
    fn duplicate_proposer_slashing_for_same_proposer_is_dropped() {
        let pool = OperationPool::new();
        let slashing = ProposerSlashing {
            proposer_index: 5,
            header_1: header(1),
            header_2: header(2),
        };
        assert!(pool.insert_proposer_slashing(slashing.clone()));
        assert!(!pool.insert_proposer_slashing(slashing));
        assert_eq!(pool.get_proposer_slashings(10).len(), 1);
    }

    #[test]
    fn voluntary_exit_is_keyed_by_validator() {
        let pool = OperationPool::new();
        let exit = VoluntaryExit {
            epoch: types::Epoch::new(1),
            validator_index: 3,
            signature: BlsSignature::empty_signature(),
        };
        assert!(pool.insert_voluntary_exit(exit.clone()));
        assert!(!pool.insert_voluntary_exit(exit));
    }
}
