//! The slot-advance loop and the top-level `state_transition` entry point that composes it with
//! block processing.

use crate::errors::{BlockProcessingError, SlotProcessingError};
use crate::per_block_processing::{per_block_processing, BlockSignatureStrategy};
use crate::per_epoch_processing::per_epoch_processing;
use types::{BeaconBlock, BeaconState, ChainSpec, Hash256};

/// Advances `state` by exactly one slot: caches the pre-advance state and block roots, fills in
/// `latest_block_header.state_root` if it was left zeroed by `process_block_header`, then runs
/// `per_epoch_processing` if the slot about to be entered starts a new epoch.
pub fn per_slot_processing(
    state: &mut BeaconState,
    spec: &ChainSpec,
) -> Result<(), SlotProcessingError> {
    let previous_state_root = state.canonical_root();
    state.set_state_root(state.slot, previous_state_root)?;

    if state.latest_block_header.state_root == Hash256::zero() {
        state.latest_block_header.state_root = previous_state_root;
    }

    let previous_block_root = state.latest_block_header.canonical_root();
    state.set_block_root(state.slot, previous_block_root)?;

    state.slot += 1;

    if state.slot.as_u64() % spec.slots_per_epoch == 0 {
        per_epoch_processing(state, spec)?;
    }

    Ok(())
}

/// Repeatedly calls [`per_slot_processing`] until `state.slot == target_slot`. A no-op if the
/// state is already at `target_slot`; an error if `target_slot` is behind the state.
pub fn process_slots(
    state: &mut BeaconState,
    target_slot: types::Slot,
    spec: &ChainSpec,
) -> Result<(), SlotProcessingError> {
    if target_slot < state.slot {
        return Err(SlotProcessingError::SlotIsInThePast {
            state_slot: state.slot.as_u64(),
            target_slot: target_slot.as_u64(),
        });
    }

    while state.slot < target_slot {
        per_slot_processing(state, spec)?;
    }

    Ok(())
}

/// `(pre_state, signed_block, spec) -> post_state`: the total state-transition function. Advances
/// `pre_state` to `signed_block.slot` (running every intervening epoch transition), applies the
/// block, and returns the resulting state. The original `pre_state` is never mutated; callers
/// that want to avoid the clone should advance their own copy with [`process_slots`] and call
/// [`per_block_processing`] directly.
pub fn state_transition(
    pre_state: &BeaconState,
    signed_block: &BeaconBlock,
    spec: &ChainSpec,
) -> Result<BeaconState, BlockProcessingError> {
    let mut state = pre_state.clone();

    process_slots(&mut state, signed_block.slot, spec)?;
    per_block_processing(
        &mut state,
        signed_block,
        BlockSignatureStrategy::VerifyIndividual,
        spec,
    )?;

    let computed = state.canonical_root();
    if computed != signed_block.state_root {
        return Err(BlockProcessingError::StateRootMismatch {
            block: signed_block.state_root,
            computed,
        });
    }

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::test_utils::interop_genesis_state;

    #[test]
    fn empty_slot_advance_is_deterministic() {
        let spec = ChainSpec::minimal();
        let mut state = interop_genesis_state(16, &spec);
        let pre_root = state.canonical_root();

        per_slot_processing(&mut state, &spec).unwrap();

        assert_eq!(state.slot.as_u64(), 1);
        assert_ne!(state.canonical_root(), pre_root);
        assert_eq!(state.get_state_root_at_slot(types::Slot::new(0)).unwrap(), pre_root);
    }

    #[test]
    fn process_slots_rejects_the_past() {
        let spec = ChainSpec::minimal();
        let mut state = interop_genesis_state(16, &spec);
        state.slot = types::Slot::new(5);

        let err = process_slots(&mut state, types::Slot::new(4), &spec).unwrap_err();
        assert!(matches!(err, SlotProcessingError::SlotIsInThePast { .. }));
    }

    #[test]
    fn crosses_an_epoch_boundary() {
        let spec = ChainSpec::minimal();
        let mut state = interop_genesis_state(16, &spec);

        process_slots(&mut state, types::Slot::new(spec.slots_per_epoch + 1), &spec).unwrap();
        assert_eq!(state.slot.as_u64(), spec.slots_per_epoch + 1);
    }
}
