use super::util::{
    get_attesting_balance, get_matching_head_attestations, get_matching_source_attestations,
    get_matching_target_attestations, get_unslashed_attesting_indices,
};
use crate::common::get_base_reward;
use crate::errors::EpochProcessingError as Error;
use safe_arith::{SafeArith, SaturatingGweiArith};
use types::{BeaconState, ChainSpec, Gwei, ValidatorIndex};

/// Per-validator reward/penalty deltas for one epoch, summed from the four FFG/inclusion
/// components before being applied to `state.balances` all at once.
#[derive(Default, Clone)]
struct Deltas {
    rewards: Vec<Gwei>,
    penalties: Vec<Gwei>,
}

impl Deltas {
    fn zeroed(len: usize) -> Self {
        Deltas {
            rewards: vec![0; len],
            penalties: vec![0; len],
        }
    }
}

/// `process_rewards_and_penalties`: credits/debits every validator for attestation
/// source/target/head agreement and inclusion delay, applying an inactivity leak once finality
/// has been missed for too long. A no-op in the all-genesis first epoch, which has no previous
/// epoch to score.
pub fn process_rewards_and_penalties(state: &mut BeaconState, spec: &ChainSpec) -> Result<(), Error> {
    if state.current_epoch(spec) == spec.genesis_epoch {
        return Ok(());
    }

    let deltas = attestation_deltas(state, spec)?;
    let len = state.balances.len();
    for index in 0..len {
        crate::common::increase_balance(state, index as ValidatorIndex, deltas.rewards[index])?;
        crate::common::decrease_balance(state, index as ValidatorIndex, deltas.penalties[index])?;
    }

    Ok(())
}

/// `get_attestation_deltas`: the reward/penalty pair for every validator active at any point
/// during the previous epoch.
fn attestation_deltas(state: &BeaconState, spec: &ChainSpec) -> Result<Deltas, Error> {
    let previous_epoch = state.previous_epoch(spec);
    let total_balance = state.get_total_active_balance(spec)?;

    let mut deltas = Deltas::zeroed(state.validators.len());

    let source_attestations = get_matching_source_attestations(state, previous_epoch, spec)?;
    let source_attestations: Vec<_> = source_attestations.iter().collect();
    let target_attestations = get_matching_target_attestations(state, previous_epoch, spec)?;
    let head_attestations = get_matching_head_attestations(state, previous_epoch, spec)?;

    let source_attesting_indices = get_unslashed_attesting_indices(state, &source_attestations, spec)?;
    let target_attesting_indices = get_unslashed_attesting_indices(state, &target_attestations, spec)?;
    let head_attesting_indices = get_unslashed_attesting_indices(state, &head_attestations, spec)?;

    let source_balance = get_attesting_balance(state, &source_attestations, spec)?;
    let target_balance = get_attesting_balance(state, &target_attestations, spec)?;
    let head_balance = get_attesting_balance(state, &head_attestations, spec)?;

    // `finality_delay`: epochs elapsed since the last finalized checkpoint. Long delays trigger
    // the inactivity leak, which lets offline validators' stake shrink until the online
    // supermajority can finalize again.
    let finality_delay = previous_epoch
        .as_u64()
        .saturating_sub(state.finalized_checkpoint.epoch.as_u64());
    let in_inactivity_leak = finality_delay > spec.min_epochs_to_inactivity_penalty;

    let eligible_indices: Vec<ValidatorIndex> = state
        .validators
        .iter()
        .enumerate()
        .filter(|(_, v)| {
            v.is_active_at(previous_epoch)
                || (v.slashed && previous_epoch + 1 < v.withdrawable_epoch)
        })
        .map(|(i, _)| i as ValidatorIndex)
        .collect();

    for &index in &eligible_indices {
        let base_reward = get_base_reward(state, index, total_balance, spec)?;

        if source_attesting_indices.contains(&index) {
            if in_inactivity_leak {
                deltas.rewards[index as usize] = deltas.rewards[index as usize].saturating_add_gwei(base_reward);
            } else {
                let reward = base_reward
                    .safe_mul(source_balance)?
                    .safe_div(total_balance)?;
                deltas.rewards[index as usize] = deltas.rewards[index as usize].saturating_add_gwei(reward);
            }
        } else {
            deltas.penalties[index as usize] =
                deltas.penalties[index as usize].saturating_add_gwei(base_reward);
        }

        if target_attesting_indices.contains(&index) {
            if in_inactivity_leak {
                deltas.rewards[index as usize] = deltas.rewards[index as usize].saturating_add_gwei(base_reward);
            } else {
                let reward = base_reward
                    .safe_mul(target_balance)?
                    .safe_div(total_balance)?;
                deltas.rewards[index as usize] = deltas.rewards[index as usize].saturating_add_gwei(reward);
            }
        } else {
            deltas.penalties[index as usize] =
                deltas.penalties[index as usize].saturating_add_gwei(base_reward);
        }

        if head_attesting_indices.contains(&index) {
            if in_inactivity_leak {
                deltas.rewards[index as usize] = deltas.rewards[index as usize].saturating_add_gwei(base_reward);
            } else {
                let reward = base_reward
                    .safe_mul(head_balance)?
                    .safe_div(total_balance)?;
                deltas.rewards[index as usize] = deltas.rewards[index as usize].saturating_add_gwei(reward);
            }
        } else {
            deltas.penalties[index as usize] =
                deltas.penalties[index as usize].saturating_add_gwei(base_reward);
        }

        // Inactivity-leak penalty: an additional, unbounded-over-time penalty proportional to
        // effective balance, so chronically offline stake keeps shrinking until it no longer
        // blocks finality.
        if in_inactivity_leak {
            let effective_balance = state.get_validator(index)?.effective_balance;
            let base_rewards_per_epoch = 4u64;
            let inactivity_penalty = base_reward
                .safe_mul(base_rewards_per_epoch)?
                .saturating_sub(base_reward)
                .saturating_add_gwei(
                    effective_balance
                        .safe_mul(finality_delay)?
                        .safe_div(spec.inactivity_penalty_quotient)?,
                );
            deltas.penalties[index as usize] =
                deltas.penalties[index as usize].saturating_add_gwei(inactivity_penalty);
        }
    }

    // Proposer/inclusion-delay reward: the block proposer who included a source-matching
    // attestation, and the attester itself, both earn a share inversely proportional to how
    // long inclusion took.
    for attestation in source_attestations {
        let attesting_indices = get_unslashed_attesting_indices(state, std::slice::from_ref(&attestation), spec)?;
        for index in attesting_indices {
            let base_reward = get_base_reward(state, index, total_balance, spec)?;
            let proposer_reward = base_reward.safe_div(spec.proposer_reward_quotient)?;
            deltas.rewards[attestation.proposer_index as usize] =
                deltas.rewards[attestation.proposer_index as usize].saturating_add_gwei(proposer_reward);

            let max_attester_reward = base_reward.safe_sub(proposer_reward)?;
            let delay_reward = max_attester_reward.safe_div(attestation.inclusion_delay.max(1))?;
            deltas.rewards[index as usize] = deltas.rewards[index as usize].saturating_add_gwei(delay_reward);
        }
    }

    Ok(deltas)
}
