use crate::error::Error;
use proto_array::ProtoArray;
use types::{Checkpoint, Epoch, Gwei, Hash256, Slot, ValidatorIndex};

/// The most recent target a validator has attested to. Per `spec.md` §4.6, a replacement only
/// takes effect at a strictly greater target epoch — an equivocating or stale vote can never
/// pull weight backwards.
#[derive(Debug, Clone, Copy, PartialEq)]
struct VoteTracker {
    current_root: Hash256,
    next_root: Hash256,
    next_epoch: Option<Epoch>,
}

impl Default for VoteTracker {
    fn default() -> Self {
        VoteTracker {
            current_root: Hash256::zero(),
            next_root: Hash256::zero(),
            next_epoch: None,
        }
    }
}

/// Wraps [`ProtoArray`] with the validator-latest-vote bookkeeping and justified/finalized
/// checkpoint tracking `spec.md` §4.6 describes; `proto_array` itself only knows about weights
/// and DAG structure, not attestations.
pub struct ForkChoice {
    proto_array: ProtoArray,
    votes: Vec<VoteTracker>,
    balances: Vec<Gwei>,
    justified_checkpoint: Checkpoint,
    finalized_checkpoint: Checkpoint,
    current_slot: Slot,
}

impl ForkChoice {
    pub fn new(
        finalized_block_root: Hash256,
        finalized_block_slot: Slot,
        justified_checkpoint: Checkpoint,
        finalized_checkpoint: Checkpoint,
    ) -> Self {
        ForkChoice {
            proto_array: ProtoArray::new(
                justified_checkpoint.epoch,
                finalized_checkpoint.epoch,
                finalized_block_root,
                finalized_block_slot,
            ),
            votes: Vec::new(),
            balances: Vec::new(),
            justified_checkpoint,
            finalized_checkpoint,
            current_slot: finalized_block_slot,
        }
    }

    /// `on_block`: adds a node, then advances the fork-choice-visible justified/finalized
    /// checkpoints (and prunes to the new finalized root) if the block's post-state checkpoints
    /// are ahead of what fork-choice already knew.
    pub fn on_block(
        &mut self,
        root: Hash256,
        parent_root: Hash256,
        slot: Slot,
        state_justified_checkpoint: Checkpoint,
        state_finalized_checkpoint: Checkpoint,
    ) -> Result<(), Error> {
        self.proto_array.on_block(
            root,
            parent_root,
            slot,
            state_justified_checkpoint.epoch,
            state_finalized_checkpoint.epoch,
        )?;

        if state_justified_checkpoint.epoch > self.justified_checkpoint.epoch {
            self.justified_checkpoint = state_justified_checkpoint;
        }

        if state_finalized_checkpoint.epoch > self.finalized_checkpoint.epoch {
            self.finalized_checkpoint = state_finalized_checkpoint;
            self.proto_array
                .update_justified_and_finalized(self.justified_checkpoint.epoch, self.finalized_checkpoint.epoch);
            self.proto_array.prune(self.finalized_checkpoint.root)?;
        }

        Ok(())
    }

    /// `on_attestation`: records `validator_index`'s vote if `target_epoch` is newer than
    /// anything already seen from it. The weight isn't applied to `proto_array` until the next
    /// `get_head` call, which diffs every tracker's `current_root`/`next_root` at once.
    pub fn on_attestation(&mut self, validator_index: ValidatorIndex, block_root: Hash256, target_epoch: Epoch) {
        let index = validator_index as usize;
        if self.votes.len() <= index {
            self.votes.resize(index + 1, VoteTracker::default());
        }

        let tracker = &mut self.votes[index];
        if tracker.next_epoch.map_or(true, |e| target_epoch > e) {
            tracker.next_root = block_root;
            tracker.next_epoch = Some(target_epoch);
        }
    }

    pub fn on_tick(&mut self, slot: Slot) {
        self.current_slot = slot;
    }

    /// `get_head`: applies every outstanding vote-tracker diff as a proto_array weight delta,
    /// then runs LMD-GHOST from the current justified root. `balances` is the caller's
    /// up-to-date `effective_balance` per validator index (from the justified checkpoint's
    /// state), consulted only for validators whose vote just moved.
    pub fn get_head(&mut self, balances: &[Gwei]) -> Result<Hash256, Error> {
        for index in 0..self.votes.len() {
            let tracker = self.votes[index];
            if tracker.current_root == tracker.next_root {
                continue;
            }

            let balance = *balances.get(index).unwrap_or(&0);

            if tracker.current_root != Hash256::zero() {
                let _ = self.proto_array.apply_weight_delta(&tracker.current_root, -(balance as i64));
            }
            if tracker.next_root != Hash256::zero() {
                self.proto_array.apply_weight_delta(&tracker.next_root, balance as i64)?;
            }

            self.votes[index].current_root = tracker.next_root;
        }
        self.balances = balances.to_vec();

        Ok(self.proto_array.find_head(self.justified_checkpoint.root)?)
    }

    pub fn get_ancestor(&self, root: Hash256, slot: Slot) -> Result<Hash256, Error> {
        Ok(self.proto_array.get_ancestor(root, slot)?)
    }

    pub fn justified_checkpoint(&self) -> Checkpoint {
        self.justified_checkpoint
    }

    pub fn finalized_checkpoint(&self) -> Checkpoint {
        self.finalized_checkpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(byte: u8) -> Hash256 {
        Hash256::repeat_byte(byte)
    }

    #[test]
    fn head_follows_the_heavier_branch() {
        let genesis = hash(0);
        let checkpoint = Checkpoint::new(Epoch::new(0), genesis);
        let mut fc = ForkChoice::new(genesis, Slot::new(0), checkpoint, checkpoint);

        fc.on_block(hash(1), genesis, Slot::new(1), checkpoint, checkpoint).unwrap();
        fc.on_block(hash(2), genesis, Slot::new(1), checkpoint, checkpoint).unwrap();

        fc.on_attestation(0, hash(1), Epoch::new(1));
        fc.on_attestation(1, hash(2), Epoch::new(1));
        fc.on_attestation(2, hash(2), Epoch::new(1));

        let balances = vec![10, 10, 10];
        assert_eq!(fc.get_head(&balances).unwrap(), hash(2));
    }

    #[test]
    fn stale_vote_does_not_move_weight() {
        let genesis = hash(0);
        let checkpoint = Checkpoint::new(Epoch::new(0), genesis);
        let mut fc = ForkChoice::new(genesis, Slot::new(0), checkpoint, checkpoint);

        fc.on_block(hash(1), genesis, Slot::new(1), checkpoint, checkpoint).unwrap();
        fc.on_block(hash(2), genesis, Slot::new(1), checkpoint, checkpoint).unwrap();

        fc.on_attestation(0, hash(1), Epoch::new(2));
        fc.on_attestation(0, hash(2), Epoch::new(1)); // older epoch, ignored

        let balances = vec![10];
        assert_eq!(fc.get_head(&balances).unwrap(), hash(1));
    }
}
