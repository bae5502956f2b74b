use crate::common::decrease_balance;
use crate::errors::EpochProcessingError as Error;
use types::{BeaconState, ChainSpec, Gwei};

/// `process_slashings`: applies a pro-rated penalty to every validator whose slashing's
/// `EPOCHS_PER_SLASHINGS_VECTOR // 2`-epoch exposure window closes this epoch, sized by how
/// large a share of total active balance was slashed alongside it.
pub fn process_slashings(state: &mut BeaconState, spec: &ChainSpec) -> Result<(), Error> {
    let current_epoch = state.current_epoch(spec);
    let total_balance = state.get_total_active_balance(spec)?;
    let sum_slashings: Gwei = state.slashings.iter().copied().fold(0u64, |a, b| a.saturating_add(b));

    let half_vector = spec.epochs_per_slashings_vector as u64 / 2;

    let to_penalize: Vec<(usize, Gwei)> = state
        .validators
        .iter()
        .enumerate()
        .filter(|(_, v)| {
            v.slashed && current_epoch.as_u64() + half_vector == v.withdrawable_epoch.as_u64()
        })
        .map(|(i, v)| {
            let increment = spec.effective_balance_increment;
            let penalty_numerator = (v.effective_balance / increment)
                .saturating_mul(sum_slashings.saturating_mul(3).min(total_balance.saturating_mul(3)));
            let penalty = (penalty_numerator / total_balance).saturating_mul(increment);
            (i, penalty)
        })
        .collect();

    for (index, penalty) in to_penalize {
        decrease_balance(state, index as u64, penalty)?;
    }

    Ok(())
}
