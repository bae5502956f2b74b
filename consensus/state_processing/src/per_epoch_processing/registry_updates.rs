use crate::common::{get_churn_limit, initiate_validator_exit};
use crate::errors::EpochProcessingError as Error;
use types::{BeaconState, ChainSpec, Epoch, FAR_FUTURE_EPOCH};

/// `process_registry_updates`: advances the activation-eligibility and activation queues, and
/// ejects any validator whose effective balance has fallen to `EJECTION_BALANCE`.
pub fn process_registry_updates(state: &mut BeaconState, spec: &ChainSpec) -> Result<(), Error> {
    let current_epoch = state.current_epoch(spec);

    // Queue validators whose deposit has been fully processed for the activation queue.
    let newly_eligible: Vec<usize> = state
        .validators
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_eligible_for_activation_queue(spec))
        .map(|(i, _)| i)
        .collect();
    for index in newly_eligible {
        state.validators[index].activation_eligibility_epoch = state.next_epoch(spec);
    }

    // Eject any active validator that has dropped to or below `ejection_balance`.
    let to_eject: Vec<usize> = state
        .validators
        .iter()
        .enumerate()
        .filter(|(_, v)| {
            v.is_active_at(current_epoch)
                && v.effective_balance <= spec.ejection_balance
                && v.exit_epoch == FAR_FUTURE_EPOCH
        })
        .map(|(i, _)| i)
        .collect();
    for index in to_eject {
        initiate_validator_exit(state, index as u64, spec)?;
    }

    // Activate every eligible, finalized-enough queued validator, oldest `activation_eligibility`
    // first, up to this epoch's churn limit.
    let delayed_activation_epoch = compute_activation_exit_epoch(current_epoch, spec);
    let mut queue: Vec<usize> = state
        .validators
        .iter()
        .enumerate()
        .filter(|(_, v)| {
            v.activation_eligibility_epoch != FAR_FUTURE_EPOCH
                && v.activation_epoch == FAR_FUTURE_EPOCH
                && v.activation_eligibility_epoch <= state.finalized_checkpoint.epoch
        })
        .map(|(i, _)| i)
        .collect();
    queue.sort_by_key(|&i| state.validators[i].activation_eligibility_epoch);

    let churn_limit = get_churn_limit(state, spec)? as usize;
    for &index in queue.iter().take(churn_limit) {
        state.validators[index].activation_epoch = delayed_activation_epoch;
    }

    Ok(())
}

/// `compute_activation_exit_epoch`: the earliest epoch an activation/exit scheduled this epoch
/// can take effect, `ACTIVATION_EXIT_DELAY` epochs out so committees can be computed in advance.
fn compute_activation_exit_epoch(epoch: Epoch, spec: &ChainSpec) -> Epoch {
    Epoch::new(epoch.as_u64().saturating_add(1).saturating_add(spec.activation_exit_delay))
}
