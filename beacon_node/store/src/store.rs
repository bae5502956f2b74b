use crate::errors::Error;
use crate::memory_store::KeyValueStore;
use parking_lot::Mutex;
use slog::{debug, Logger};
use ssz::{Decode, Encode};
use std::collections::HashMap;
use types::{BeaconBlock, BeaconState, Hash256, Slot};

const BLOCKS_COLUMN: &str = "blocks";
const STATES_COLUMN: &str = "states";

/// A pending write not yet flushed to the backend. Buffered so a burst of blocks within one
/// slot (block + its post-state, often several in a row during sync) hits the backend once per
/// `commit` rather than once per `put`.
enum PendingWrite {
    Block(BeaconBlock),
    State(BeaconState),
}

/// The content-addressed `root -> (block, state_after_block)` map `spec.md` §4.5 describes,
/// layered over any [`KeyValueStore`] backend.
pub struct BeaconStore<E> {
    backend: E,
    write_buffer: Mutex<HashMap<Hash256, PendingWrite>>,
    commit_threshold: usize,
    log: Logger,
}

impl<E: KeyValueStore> BeaconStore<E> {
    pub fn new(backend: E, commit_threshold: usize, log: Logger) -> Self {
        BeaconStore {
            backend,
            write_buffer: Mutex::new(HashMap::new()),
            commit_threshold,
            log,
        }
    }

    pub fn put_block(&self, root: Hash256, block: BeaconBlock) {
        self.write_buffer.lock().insert(root, PendingWrite::Block(block));
        self.commit_if_full();
    }

    pub fn put_state(&self, root: Hash256, state: BeaconState) {
        self.write_buffer.lock().insert(root, PendingWrite::State(state));
        self.commit_if_full();
    }

    pub fn get_block(&self, root: &Hash256) -> Result<BeaconBlock, Error> {
        if let Some(PendingWrite::Block(block)) = self.write_buffer.lock().get(root) {
            return Ok(block.clone());
        }
        let bytes = self
            .backend
            .get_bytes(BLOCKS_COLUMN, root.as_bytes())
            .ok_or(Error::BlockNotFound(*root))?;
        Ok(BeaconBlock::from_ssz_bytes(&bytes)?)
    }

    pub fn get_state(&self, root: &Hash256) -> Result<BeaconState, Error> {
        if let Some(PendingWrite::State(state)) = self.write_buffer.lock().get(root) {
            return Ok(state.clone());
        }
        let bytes = self
            .backend
            .get_bytes(STATES_COLUMN, root.as_bytes())
            .ok_or(Error::StateNotFound(*root))?;
        Ok(BeaconState::from_ssz_bytes(&bytes)?)
    }

    pub fn has_block(&self, root: &Hash256) -> bool {
        self.write_buffer
            .lock()
            .get(root)
            .map_or(false, |w| matches!(w, PendingWrite::Block(_)))
            || self.backend.key_exists(BLOCKS_COLUMN, root.as_bytes())
    }

    /// Flushes every buffered write to the backend. Idempotent and cheap to call unconditionally
    /// on every writer step, per `spec.md` §5's "write buffer ... `commit` is idempotent".
    pub fn commit(&self) {
        let mut buffer = self.write_buffer.lock();
        if buffer.is_empty() {
            return;
        }
        for (root, write) in buffer.drain() {
            match write {
                PendingWrite::Block(block) => {
                    self.backend.put_bytes(BLOCKS_COLUMN, root.as_bytes(), &block.as_ssz_bytes())
                }
                PendingWrite::State(state) => {
                    self.backend.put_bytes(STATES_COLUMN, root.as_bytes(), &state.as_ssz_bytes())
                }
            }
        }
    }

    fn commit_if_full(&self) {
        if self.write_buffer.lock().len() >= self.commit_threshold {
            self.commit();
        }
    }

    /// `delete_below(finalized_slot, keep_root)`: removes every known block (and its state)
    /// below `finalized_slot`, except `keep_root` and any of its ancestors — those stay
    /// reachable regardless of slot, since a finalized chain must still resolve its own history.
    pub fn delete_below(&self, finalized_slot: Slot, keep_root: Hash256, known_roots: &[Hash256]) -> Result<(), Error> {
        self.commit();

        let protected = self.ancestors_of(keep_root)?;

        for root in known_roots {
            if protected.contains(root) {
                continue;
            }
            let Ok(block) = self.get_block(root) else {
                continue;
            };
            if block.slot < finalized_slot {
                debug!(self.log, "pruning block below finality"; "root" => ?root, "slot" => block.slot.as_u64());
                self.backend.delete(BLOCKS_COLUMN, root.as_bytes());
                self.backend.delete(STATES_COLUMN, root.as_bytes());
            }
        }

        Ok(())
    }

    fn ancestors_of(&self, root: Hash256) -> Result<std::collections::HashSet<Hash256>, Error> {
        let mut set = std::collections::HashSet::new();
        let mut current = root;
        set.insert(current);
        while let Ok(block) = self.get_block(&current) {
            if block.parent_root == current || set.contains(&block.parent_root) {
                break;
            }
            set.insert(block.parent_root);
            current = block.parent_root;
        }
        Ok(set)
    }
}

pub fn memory_store(log: Logger) -> BeaconStore<crate::memory_store::MemoryStore> {
    BeaconStore::new(crate::memory_store::MemoryStore::open(), 16, log)
}

pub type MemoryBeaconStore = BeaconStore<crate::memory_store::MemoryStore>;
