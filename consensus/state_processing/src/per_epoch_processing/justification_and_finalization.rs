use super::util::{get_attesting_balance, get_matching_target_attestations};
use crate::errors::EpochProcessingError as Error;
use types::{BeaconState, ChainSpec, Checkpoint};

/// `process_justification_and_finalization`: Casper FFG's rolling 4-bit justification window.
/// No-op before epoch 2 — there isn't yet a previous epoch to justify.
pub fn process_justification_and_finalization(
    state: &mut BeaconState,
    spec: &ChainSpec,
) -> Result<(), Error> {
    let current_epoch = state.current_epoch(spec);
    if current_epoch <= spec.genesis_epoch + 1 {
        return Ok(());
    }

    let previous_epoch = state.previous_epoch(spec);
    let old_previous_justified_checkpoint = state.previous_justified_checkpoint;
    let old_current_justified_checkpoint = state.current_justified_checkpoint;

    state.previous_justified_checkpoint = state.current_justified_checkpoint;
    shift_justification_bits(state)?;

    let total_active_balance = state.get_total_active_balance(spec)?;

    let previous_target_attestations = get_matching_target_attestations(state, previous_epoch, spec)?;
    let previous_attesting_balance = get_attesting_balance(state, &previous_target_attestations, spec)?;
    if previous_attesting_balance.saturating_mul(3) >= total_active_balance.saturating_mul(2) {
        state.current_justified_checkpoint = Checkpoint::new(
            previous_epoch,
            super::util::get_block_root(state, previous_epoch, spec)?,
        );
        state.justification_bits.set(1, true)?;
    }

    let current_target_attestations = get_matching_target_attestations(state, current_epoch, spec)?;
    let current_attesting_balance = get_attesting_balance(state, &current_target_attestations, spec)?;
    if current_attesting_balance.saturating_mul(3) >= total_active_balance.saturating_mul(2) {
        state.current_justified_checkpoint = Checkpoint::new(
            current_epoch,
            super::util::get_block_root(state, current_epoch, spec)?,
        );
        state.justification_bits.set(0, true)?;
    }

    let bits = [
        state.justification_bits.get(0)?,
        state.justification_bits.get(1)?,
        state.justification_bits.get(2)?,
        state.justification_bits.get(3)?,
    ];

    // The 2nd/3rd/4th most recent epochs are justified, the 2nd using the 3rd as source.
    if bits[1] && bits[2] && bits[3] && old_previous_justified_checkpoint.epoch + 3 == current_epoch {
        state.finalized_checkpoint = old_previous_justified_checkpoint;
    }
    // The 2nd/3rd most recent epochs are justified, the 2nd using the 3rd as source.
    if bits[1] && bits[2] && old_previous_justified_checkpoint.epoch + 2 == current_epoch {
        state.finalized_checkpoint = old_previous_justified_checkpoint;
    }
    // The 1st/2nd/3rd most recent epochs are justified, the 1st using the 2nd as source.
    if bits[0] && bits[1] && bits[2] && old_current_justified_checkpoint.epoch + 2 == current_epoch {
        state.finalized_checkpoint = old_current_justified_checkpoint;
    }
    // The 1st/2nd most recent epochs are justified, the 1st using the 2nd as source.
    if bits[0] && bits[1] && old_current_justified_checkpoint.epoch + 1 == current_epoch {
        state.finalized_checkpoint = old_current_justified_checkpoint;
    }

    Ok(())
}

/// Rolls the 4-bit justification window forward one epoch: bit 3 (oldest) is dropped, every
/// other bit moves up one slot, and the freshly-opened bit 0 starts unset.
fn shift_justification_bits(state: &mut BeaconState) -> Result<(), Error> {
    let previous = [
        state.justification_bits.get(0)?,
        state.justification_bits.get(1)?,
        state.justification_bits.get(2)?,
    ];
    state.justification_bits.set(3, previous[2])?;
    state.justification_bits.set(2, previous[1])?;
    state.justification_bits.set(1, previous[0])?;
    state.justification_bits.set(0, false)?;
    Ok(())
}
