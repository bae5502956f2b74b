use crate::checkpoint::CheckPoint;
use crate::errors::BeaconChainError as Error;
use crate::observation::{Observation, ObservationBus, SubscriptionPolicy};
use fork_choice::ForkChoice;
use operation_pool::OperationPool;
use parking_lot::RwLock;
use slog::{debug, error, info, warn, Logger};
use slot_clock::SlotClock;
use state_processing::{per_block_processing, process_slots, state_transition, BlockSignatureStrategy};
use std::collections::HashMap;
use store::{BeaconStore, KeyValueStore};
use tree_hash::TreeHash;
use types::{
    BeaconBlock, BeaconState, BlsSignature, ChainSpec, Checkpoint, Hash256, Slot,
};

/// How many buffered write-behind entries `store` is allowed to accumulate before `commit` is
/// forced. Matches the default used by `store::memory_store`.
const STORE_COMMIT_THRESHOLD: usize = 16;
/// Capacity of the observation bus's internal ring buffer (per-subscriber overflow is handled by
/// `SubscriptionPolicy`, this just bounds memory if nobody is listening at all).
const OBSERVATION_BUS_CAPACITY: usize = 16;

/// `BeaconChain`: the single-writer owner of `(store, fork_choice, op_pool)` described in
/// `spec.md` §5. Every public mutating method (`process_block`, `process_attestation`,
/// `on_tick`) is expected to be called from one logical writer (a `parking_lot::RwLock` makes
/// that explicit rather than assumed); reads of `canonical_head` proceed against whatever
/// snapshot was current when the lock was taken.
pub struct BeaconChain<T: SlotClock, E: KeyValueStore> {
    pub spec: ChainSpec,
    pub store: BeaconStore<E>,
    pub op_pool: OperationPool,
    pub slot_clock: T,
    fork_choice: RwLock<ForkChoice>,
    canonical_head: RwLock<CheckPoint>,
    /// Every root `store` has accepted a block for; used by `delete_below` to know what it may
    /// need to prune and by `ancestors_of`-style orphan resolution.
    known_roots: RwLock<Vec<Hash256>>,
    /// Blocks whose parent hasn't been seen yet, keyed by `parent_root`. Released (and retried)
    /// as soon as that parent is accepted, per the short-sync "buffer by parent_root" rule in
    /// `spec.md` §4.9.
    pending_blocks: RwLock<HashMap<Hash256, Vec<BeaconBlock>>>,
    observations: ObservationBus,
    log: Logger,
}

impl<T: SlotClock, E: KeyValueStore> BeaconChain<T, E> {
    /// Builds a fresh chain rooted at `genesis_state`. The genesis block is the canonical
    /// `BeaconBlock::empty` at `spec.genesis_slot` whose `state_root` is `genesis_state`'s root
    /// and whose `parent_root` is the zero hash (there is nothing before genesis).
    pub fn from_genesis(
        genesis_state: BeaconState,
        backend: E,
        slot_clock: T,
        spec: ChainSpec,
        log: Logger,
    ) -> Result<Self, Error> {
        let mut genesis_block = BeaconBlock::empty(spec.genesis_slot, Hash256::zero());
        genesis_block.state_root = genesis_state.canonical_root();
        let genesis_root = genesis_block.canonical_root();

        let store = BeaconStore::new(backend, STORE_COMMIT_THRESHOLD, log.clone());
        store.put_block(genesis_root, genesis_block.clone());
        store.put_state(genesis_root, genesis_state.clone());
        store.commit();

        let genesis_checkpoint = Checkpoint::new(spec.genesis_epoch, genesis_root);
        let fork_choice = ForkChoice::new(
            genesis_root,
            spec.genesis_slot,
            genesis_checkpoint,
            genesis_checkpoint,
        );

        info!(log, "beacon chain initialized from genesis"; "genesis_root" => ?genesis_root);

        Ok(BeaconChain {
            spec,
            store,
            op_pool: OperationPool::new(),
            slot_clock,
            fork_choice: RwLock::new(fork_choice),
            canonical_head: RwLock::new(CheckPoint::new(
                genesis_block,
                genesis_root,
                genesis_state,
                genesis_root, // placeholder; overwritten below to the real state root
            )),
            known_roots: RwLock::new(vec![genesis_root]),
            pending_blocks: RwLock::new(HashMap::new()),
            observations: ObservationBus::new(OBSERVATION_BUS_CAPACITY),
            log,
        })
    }

    pub fn canonical_head(&self) -> CheckPoint {
        self.canonical_head.read().clone()
    }

    pub fn head_root(&self) -> Hash256 {
        self.canonical_head.read().beacon_block_root
    }

    pub fn subscribe(&self, policy: SubscriptionPolicy) -> crate::observation::Subscription {
        self.observations.subscribe(policy)
    }

    /// `process_block`: validates `block` against its parent's stored post-state via the full
    /// state-transition function, commits the result, updates fork-choice and the canonical
    /// head, prunes below the new finalized checkpoint, then retries any blocks that were
    /// buffered waiting on this one as their parent. Idempotent: re-submitting an already-known
    /// block is a no-op success.
    pub fn process_block(&self, block: BeaconBlock) -> Result<Hash256, Error> {
        let root = block.canonical_root();

        if self.store.has_block(&root) {
            return Ok(root);
        }

        let finalized_slot = self
            .fork_choice
            .read()
            .finalized_checkpoint()
            .epoch
            .start_slot(self.spec.slots_per_epoch);
        if block.slot <= finalized_slot {
            return Err(Error::BelowFinalized);
        }

        if !self.store.has_block(&block.parent_root) {
            debug!(self.log, "buffering block with unknown parent"; "root" => ?root, "parent" => ?block.parent_root);
            self.pending_blocks
                .write()
                .entry(block.parent_root)
                .or_default()
                .push(block);
            return Err(Error::UnknownParent(root));
        }

        self.import_block(block, root)?;
        self.process_pending_children(root);
        Ok(root)
    }

    fn import_block(&self, block: BeaconBlock, root: Hash256) -> Result<(), Error> {
        let parent_state = self.store.get_state(&block.parent_root)?;
        let post_state = state_transition(&parent_state, &block, &self.spec)?;
        let post_state_root = block.state_root;

        self.store.put_block(root, block.clone());
        self.store.put_state(root, post_state.clone());
        self.known_roots.write().push(root);

        {
            let mut fork_choice = self.fork_choice.write();
            fork_choice.on_block(
                root,
                block.parent_root,
                block.slot,
                post_state.current_justified_checkpoint,
                post_state.finalized_checkpoint,
            )?;

            for attestation in block.body.attestations.iter() {
                if let Ok(indexed) =
                    state_processing::get_indexed_attestation(&post_state, attestation, &self.spec)
                {
                    for &validator_index in indexed.attesting_indices.iter() {
                        fork_choice.on_attestation(
                            validator_index,
                            attestation.data.beacon_block_root,
                            attestation.data.target.epoch,
                        );
                    }
                }
            }
        }

        self.update_head(&post_state)?;

        let finalized_epoch = self.fork_choice.read().finalized_checkpoint().epoch;
        if finalized_epoch > self.spec.genesis_epoch {
            let keep_root = self.canonical_head.read().beacon_block_root;
            let finalized_slot = finalized_epoch.start_slot(self.spec.slots_per_epoch);
            let known_roots = self.known_roots.read().clone();
            if let Err(e) = self.store.delete_below(finalized_slot, keep_root, &known_roots) {
                error!(self.log, "failed to prune store below finality"; "error" => ?e);
            }
        }

        self.publish_observation(&post_state, root, &block);

        info!(
            self.log, "block imported";
            "root" => ?root, "slot" => block.slot.as_u64(), "state_root" => ?post_state_root,
        );

        Ok(())
    }

    /// Recomputes the head via LMD-GHOST and, if it moved, swaps `canonical_head` to the new
    /// tip's stored `(block, state)` pair.
    fn update_head(&self, reference_state: &BeaconState) -> Result<(), Error> {
        let balances: Vec<u64> = reference_state.balances.iter().copied().collect();
        let new_head_root = self.fork_choice.write().get_head(&balances)?;

        if new_head_root == self.canonical_head.read().beacon_block_root {
            return Ok(());
        }

        let head_block = self.store.get_block(&new_head_root)?;
        let head_state = self.store.get_state(&new_head_root)?;
        let head_state_root = head_block.state_root;

        *self.canonical_head.write() =
            CheckPoint::new(head_block, new_head_root, head_state, head_state_root);

        info!(self.log, "canonical head updated"; "root" => ?new_head_root);
        Ok(())
    }

    fn process_pending_children(&self, parent_root: Hash256) {
        let children = self.pending_blocks.write().remove(&parent_root);
        if let Some(children) = children {
            for child in children {
                let _ = self.process_block(child);
            }
        }
    }

    /// `process_attestation`: verifies the attestation against the state at its target block
    /// (falling back to the current head state if the exact target isn't locally stored, e.g. a
    /// gossiped attestation for a block still in flight), then records every attesting
    /// validator's vote in fork-choice and inserts the attestation into the pool for future
    /// block production.
    pub fn process_attestation(&self, attestation: types::Attestation) -> Result<(), Error> {
        let state = self
            .store
            .get_state(&attestation.data.beacon_block_root)
            .unwrap_or_else(|_| self.canonical_head.read().beacon_state.clone());

        let indexed =
            state_processing::get_indexed_attestation(&state, &attestation, &self.spec)?;

        {
            let mut fork_choice = self.fork_choice.write();
            for &validator_index in indexed.attesting_indices.iter() {
                fork_choice.on_attestation(
                    validator_index,
                    attestation.data.beacon_block_root,
                    attestation.data.target.epoch,
                );
            }
        }

        self.op_pool.attestations.insert(attestation);
        Ok(())
    }

    /// `on_tick`: advances fork-choice's clock and, if the wall-clock slot has moved past the
    /// head state's slot, publishes a fresh `Observation` with the head state advanced by empty
    /// slots (never mutating the stored head itself — `spec.md` §4.7's `latest_slot_state` is a
    /// derived view, not a new canonical state).
    pub fn on_tick(&self, slot: Slot) {
        self.fork_choice.write().on_tick(slot);

        let head = self.canonical_head.read().clone();
        let mut latest = head.beacon_state.clone();
        if latest.slot < slot {
            if let Err(e) = process_slots(&mut latest, slot, &self.spec) {
                warn!(self.log, "failed to advance observable state to wall clock"; "error" => ?e);
                return;
            }
        }
        self.publish_observation(&latest, head.beacon_block_root, &head.beacon_block);
    }

    fn publish_observation(&self, state: &BeaconState, head_root: Hash256, head_block: &BeaconBlock) {
        self.observations.publish(Observation {
            head_block: head_block.clone(),
            head_block_root: head_root,
            latest_slot_state: state.clone(),
            finalized_epoch: state.finalized_checkpoint.epoch,
            pending_attestation_count: self.op_pool.attestations.len(),
        });
    }

    /// The head state advanced (via empty-slot transitions only) to `slot`, for callers that
    /// need a trial state without going through the observation bus (e.g. computing duties or a
    /// candidate block's `state_root`).
    pub fn state_at_slot(&self, slot: Slot) -> Result<BeaconState, Error> {
        let head = self.canonical_head.read();
        let mut state = head.beacon_state.clone();
        if state.slot < slot {
            process_slots(&mut state, slot, &self.spec)?;
        }
        Ok(state)
    }

    /// `produce_block`: builds a fully-formed, *unsigned* `BeaconBlock` — `state_root` is the
    /// real root a trial `per_block_processing` run produced, but `signature` is left empty for
    /// the caller (the validator duties engine, via its abstract signer) to fill in. Matches
    /// `spec.md` §4.10: "compute `state_root` via a trial STF over the current head state, sign
    /// via the abstract signer".
    pub fn produce_block(
        &self,
        slot: Slot,
        randao_reveal: BlsSignature,
        graffiti: [u8; 32],
    ) -> Result<BeaconBlock, Error> {
        let mut state = self.state_at_slot(slot)?;
        if state.slot != slot {
            process_slots(&mut state, slot, &self.spec)?;
        }

        let parent_root = state.latest_block_header.canonical_root();

        let mut block = BeaconBlock::empty(slot, parent_root);
        block.body.randao_reveal = randao_reveal;
        block.body.graffiti = graffiti;
        block.body.eth1_data = state.eth1_data.clone();
        block.body.proposer_slashings = self.op_pool.get_proposer_slashings(
            self.spec.max_proposer_slashings as usize,
        ).into();
        block.body.attester_slashings = self.op_pool.get_attester_slashings(
            self.spec.max_attester_slashings as usize,
        ).into();
        block.body.attestations = self
            .op_pool
            .attestations
            .peek_aggregated_attestations(self.spec.max_attestations as usize, slot)
            .into();
        block.body.voluntary_exits = self.op_pool.get_voluntary_exits(
            self.spec.max_voluntary_exits as usize,
        ).into();
        block.body.transfers = self.op_pool.get_transfers(self.spec.max_transfers as usize).into();

        let mut trial_state = state.clone();
        per_block_processing(
            &mut trial_state,
            &block,
            BlockSignatureStrategy::NoVerification,
            &self.spec,
        )?;
        block.state_root = trial_state.canonical_root();

        Ok(block)
    }

    /// `produce_attestation_data`: the `AttestationData` a local attester at `(slot, committee_index)`
    /// should sign, built from the head state advanced to `slot`. Per `spec.md` §3, the crosslink
    /// is the phase-0 placeholder that simply continues the still-canonical one for its shard.
    pub fn produce_attestation_data(
        &self,
        slot: Slot,
        committee_index: u64,
    ) -> Result<types::AttestationData, Error> {
        let state = self.state_at_slot(slot)?;
        let epoch = slot.epoch(self.spec.slots_per_epoch);
        let current_epoch = state.current_epoch(&self.spec);

        let beacon_block_root = if state.slot == slot {
            state.latest_block_header.canonical_root()
        } else {
            self.get_ancestor(self.head_root(), slot)?
        };

        let source = if epoch == current_epoch {
            state.current_justified_checkpoint
        } else {
            state.previous_justified_checkpoint
        };

        let target_root = if epoch == current_epoch {
            beacon_block_root
        } else {
            self.get_ancestor(beacon_block_root, epoch.start_slot(self.spec.slots_per_epoch))?
        };

        let committees_per_slot = state.get_committee_count(epoch, &self.spec)?;
        let shard = (state.start_shard
            + (slot.as_u64() % self.spec.slots_per_epoch) * committees_per_slot
            + committee_index)
            % self.spec.shard_count;

        let parent_crosslink = if epoch == current_epoch {
            state.current_crosslinks[shard as usize].clone()
        } else {
            state.previous_crosslinks[shard as usize].clone()
        };
        let crosslink = types::Crosslink {
            shard,
            parent_root: parent_crosslink.tree_hash_root(),
            start_epoch: parent_crosslink.end_epoch,
            end_epoch: parent_crosslink.end_epoch,
            data_root: Hash256::zero(),
        };

        Ok(types::AttestationData {
            slot,
            beacon_block_root,
            source,
            target: Checkpoint::new(epoch, target_root),
            crosslink,
        })
    }

    pub fn get_ancestor(&self, root: Hash256, slot: Slot) -> Result<Hash256, Error> {
        Ok(self.fork_choice.read().get_ancestor(root, slot)?)
    }

    pub fn justified_checkpoint(&self) -> Checkpoint {
        self.fork_choice.read().justified_checkpoint()
    }

    pub fn finalized_checkpoint(&self) -> Checkpoint {
        self.fork_choice.read().finalized_checkpoint()
    }
}

/// Convenience alias for the common case: a real-time clock over the in-memory store.
pub type MemoryBeaconChain<T> = BeaconChain<T, store::MemoryStore>;

pub fn from_genesis_memory<T: SlotClock>(
    genesis_state: BeaconState,
    slot_clock: T,
    spec: ChainSpec,
    log: Logger,
) -> Result<MemoryBeaconChain<T>, Error> {
    BeaconChain::from_genesis(genesis_state, store::MemoryStore::open(), slot_clock, spec, log)
}
