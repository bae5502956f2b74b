//! Helpers shared by more than one epoch-processing step: resolving an epoch's attestations,
//! and the attesting-balance sums the FFG/reward calculations are built from.

use crate::errors::EpochProcessingError as Error;
use std::collections::BTreeSet;
use types::{BeaconState, ChainSpec, Epoch, Gwei, PendingAttestation, ValidatorIndex};

/// The attestations this epoch processing pass has available for `epoch`, which must be either
/// the state's current or previous epoch.
pub(super) fn get_matching_source_attestations<'a>(
    state: &'a BeaconState,
    epoch: Epoch,
    spec: &ChainSpec,
) -> Result<&'a [PendingAttestation], Error> {
    if epoch == state.current_epoch(spec) {
        Ok(&state.current_epoch_attestations)
    } else if epoch == state.previous_epoch(spec) {
        Ok(&state.previous_epoch_attestations)
    } else {
        Err(Error::InsufficientValidators)
    }
}

/// `get_block_root(state, epoch)`: the block root at `epoch`'s first slot, the checkpoint root
/// attestations must match to be "target-matching".
pub(super) fn get_block_root(
    state: &BeaconState,
    epoch: Epoch,
    spec: &ChainSpec,
) -> Result<types::Hash256, Error> {
    Ok(state.get_block_root_at_slot(epoch.start_slot(spec.slots_per_epoch))?)
}

pub(super) fn get_matching_target_attestations<'a>(
    state: &'a BeaconState,
    epoch: Epoch,
    spec: &ChainSpec,
) -> Result<Vec<&'a PendingAttestation>, Error> {
    let target_root = get_block_root(state, epoch, spec)?;
    Ok(get_matching_source_attestations(state, epoch, spec)?
        .iter()
        .filter(|a| a.data.target.root == target_root)
        .collect())
}

pub(super) fn get_matching_head_attestations<'a>(
    state: &'a BeaconState,
    epoch: Epoch,
    spec: &ChainSpec,
) -> Result<Vec<&'a PendingAttestation>, Error> {
    let mut out = Vec::new();
    for attestation in get_matching_target_attestations(state, epoch, spec)? {
        let head_root = state.get_block_root_at_slot(attestation.data.slot)?;
        if attestation.data.beacon_block_root == head_root {
            out.push(attestation);
        }
    }
    Ok(out)
}

/// The committee an individual `PendingAttestation` drew its `aggregation_bits` from: the
/// crosslink committee for its `(target.epoch, crosslink.shard)`.
fn attesting_indices(
    state: &BeaconState,
    attestation: &PendingAttestation,
    spec: &ChainSpec,
) -> Result<Vec<ValidatorIndex>, Error> {
    let committee =
        state.get_crosslink_committee(attestation.data.target.epoch, attestation.data.crosslink.shard, spec)?;

    let mut indices = Vec::with_capacity(committee.len());
    for (i, &validator_index) in committee.iter().enumerate() {
        if attestation
            .aggregation_bits
            .get(i)
            .map_err(|_| types::BeaconStateError::NoCommitteeFound)?
        {
            indices.push(validator_index);
        }
    }
    Ok(indices)
}

/// The sorted, deduplicated, unslashed set of validators attesting in `attestations`.
pub(super) fn get_unslashed_attesting_indices(
    state: &BeaconState,
    attestations: &[&PendingAttestation],
    spec: &ChainSpec,
) -> Result<Vec<ValidatorIndex>, Error> {
    let mut set = BTreeSet::new();
    for attestation in attestations {
        for index in attesting_indices(state, attestation, spec)? {
            if !state.get_validator(index)?.slashed {
                set.insert(index);
            }
        }
    }
    Ok(set.into_iter().collect())
}

pub(super) fn get_attesting_balance(
    state: &BeaconState,
    attestations: &[&PendingAttestation],
    spec: &ChainSpec,
) -> Result<Gwei, Error> {
    Ok(state.get_total_balance(&get_unslashed_attesting_indices(state, attestations, spec)?)?)
}
