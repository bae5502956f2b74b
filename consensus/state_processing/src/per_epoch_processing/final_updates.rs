use crate::errors::EpochProcessingError as Error;
use tree_hash::TreeHash;
use types::bounds::ValidatorRegistryLimit;
use types::{BeaconState, ChainSpec, VariableList};

/// `process_final_updates`: the epoch's remaining bookkeeping — effective-balance hysteresis,
/// clearing the next epoch's eth1-vote/randao/crosslink/slashings/active-index slots, rotating
/// historical roots, and resetting the attestation accumulators.
pub fn process_final_updates(state: &mut BeaconState, spec: &ChainSpec) -> Result<(), Error> {
    let current_epoch = state.current_epoch(spec);
    let next_epoch = state.next_epoch(spec);

    // Reset the eth1 vote window every `SLOTS_PER_ETH1_VOTING_PERIOD`.
    if next_epoch
        .start_slot(spec.slots_per_epoch)
        .as_u64()
        % spec.slots_per_eth1_voting_period
        == 0
    {
        state.eth1_data_votes = Default::default();
    }

    // Effective-balance hysteresis: only move when drift exceeds one increment's worth of
    // quarter, so small balance jitter doesn't force a new effective-balance every epoch.
    let increment = spec.effective_balance_increment;
    for index in 0..state.validators.len() {
        let balance = state.balances[index];
        let validator = &mut state.validators[index];
        if balance < validator.effective_balance
            || validator.effective_balance.saturating_add(3 * increment) < balance
        {
            let new_effective = std::cmp::min(
                balance - (balance % increment),
                spec.max_effective_balance,
            );
            validator.effective_balance = new_effective;
        }
    }

    // Carry the randao mix and active-index/compact-committees roots forward into the freshly
    // opened historical-vector slot for `next_epoch`.
    let vector_len = spec.epochs_per_historical_vector as u64;
    let next_index = (next_epoch.as_u64() % vector_len) as usize;
    state.randao_mixes[next_index] = state.get_randao_mix(current_epoch);
    let active_indices: VariableList<types::ValidatorIndex, ValidatorRegistryLimit> =
        state.get_active_validator_indices(next_epoch).into();
    state.active_index_roots[next_index] = active_indices.tree_hash_root();
    state.compact_committees_roots[next_index] = state.compact_committees_roots
        [(current_epoch.as_u64() % vector_len) as usize];

    // Reset the slashings bucket this epoch's window is about to reuse.
    let slashings_len = state.slashings.len() as u64;
    state.slashings[(next_epoch.as_u64() % slashings_len) as usize] = 0;

    // Roll historical roots forward once per `SLOTS_PER_HISTORICAL_ROOT`.
    if next_epoch.start_slot(spec.slots_per_epoch).as_u64() % spec.slots_per_historical_root as u64 == 0 {
        let period_root = types::Hash256::from_slice(&tree_hash::merkleize_padded(
            &[state.block_roots.tree_hash_root(), state.state_roots.tree_hash_root()]
                .iter()
                .flat_map(|root| root.as_bytes().to_vec())
                .collect::<Vec<u8>>(),
            2,
        ));
        state.historical_roots.push(period_root)?;
    }

    state.previous_epoch_attestations = std::mem::take(&mut state.current_epoch_attestations);
    state.current_epoch_attestations = Default::default();

    Ok(())
}
