//! Helpers shared by more than one phase of the state transition: attesting-index resolution,
//! the exit queue's churn limit, and slashing (used by both the block-level
//! `ProposerSlashing`/`AttesterSlashing` operations and epoch processing's slashings sweep).

use integer_sqrt::IntegerSquareRoot;
use safe_arith::{SafeArith, SaturatingGweiArith};
use types::{
    Attestation, BeaconState, BeaconStateError as Error, ChainSpec, Domain, Epoch, Gwei, Hash256,
    IndexedAttestation, ValidatorIndex, FAR_FUTURE_EPOCH,
};

/// `compute_signing_root(object_root, domain)`: the message every BLS signature in the state
/// transition signs, the `hash_tree_root` of the two-field `SigningData` container
/// `(object_root, domain)` — both 32-byte leaves, merkleized without a derive since the
/// container itself isn't named in the data model.
pub fn compute_signing_root(object_root: Hash256, domain: Domain) -> Hash256 {
    let mut packed = Vec::with_capacity(64);
    packed.extend_from_slice(object_root.as_bytes());
    packed.extend_from_slice(&domain);
    Hash256::from_slice(&tree_hash::merkleize_padded(&packed, 2))
}

/// XORs two 32-byte roots, used to mix a `randao_reveal` into `randao_mixes`.
pub fn xor(a: Hash256, b: Hash256) -> Hash256 {
    let mut out = [0u8; 32];
    for i in 0..32 {
        out[i] = a.as_bytes()[i] ^ b.as_bytes()[i];
    }
    Hash256::from(out)
}

/// `BASE_REWARDS_PER_EPOCH`: the number of distinct reward components (source, target, head,
/// proposer-inclusion) a fully-attesting validator earns per epoch. Fixed by the protocol, not a
/// `ChainSpec` field.
const BASE_REWARDS_PER_EPOCH: u64 = 4;

/// `get_attesting_indices`: the sorted set of validator indices in `attestation.data`'s
/// committee whose `aggregation_bits` bit is set.
pub fn get_attesting_indices(
    state: &BeaconState,
    attestation: &Attestation,
    spec: &ChainSpec,
) -> Result<Vec<ValidatorIndex>, Error> {
    let committee = state.get_crosslink_committee(
        attestation.data.target.epoch,
        attestation.data.crosslink.shard,
        spec,
    )?;

    let mut indices = Vec::with_capacity(committee.len());
    for (i, &validator_index) in committee.iter().enumerate() {
        if attestation
            .aggregation_bits
            .get(i)
            .map_err(|_| Error::NoCommitteeFound)?
        {
            indices.push(validator_index);
        }
    }
    indices.sort_unstable();
    Ok(indices)
}

/// `get_indexed_attestation`: expand an `Attestation`'s bitfield into its explicit
/// `attesting_indices`, sorted ascending (the form slashing proofs and signature verification
/// operate on).
pub fn get_indexed_attestation(
    state: &BeaconState,
    attestation: &Attestation,
    spec: &ChainSpec,
) -> Result<IndexedAttestation, Error> {
    let attesting_indices = get_attesting_indices(state, attestation, spec)?;

    Ok(IndexedAttestation {
        attesting_indices: attesting_indices.into(),
        data: attestation.data.clone(),
        signature: attestation.signature.clone(),
    })
}

/// `get_validator_churn_limit`: the per-epoch cap on activations/exits, floored at
/// `MIN_PER_EPOCH_CHURN_LIMIT` so a small validator set can still make progress.
pub fn get_churn_limit(state: &BeaconState, spec: &ChainSpec) -> Result<u64, Error> {
    let active_count =
        state.get_active_validator_indices(state.current_epoch(spec)).len() as u64;
    Ok(std::cmp::max(
        spec.min_per_epoch_churn_limit,
        active_count.safe_div(spec.churn_limit_quotient)?,
    ))
}

/// `initiate_validator_exit`: schedules `index` to exit at the next churn-limited epoch slot,
/// idempotent if the validator already has an exit epoch scheduled.
pub fn initiate_validator_exit(
    state: &mut BeaconState,
    index: ValidatorIndex,
    spec: &ChainSpec,
) -> Result<(), Error> {
    if state.get_validator(index)?.exit_epoch != FAR_FUTURE_EPOCH {
        return Ok(());
    }

    let churn_limit = get_churn_limit(state, spec)?;
    let delayed_epoch = Epoch::new(
        state
            .current_epoch(spec)
            .as_u64()
            .safe_add(spec.activation_exit_delay)?,
    );

    let mut exit_queue_epoch = state
        .validators
        .iter()
        .map(|v| v.exit_epoch)
        .filter(|&epoch| epoch != FAR_FUTURE_EPOCH)
        .max()
        .map(|epoch| std::cmp::max(epoch, delayed_epoch))
        .unwrap_or(delayed_epoch);

    let exit_queue_churn = state
        .validators
        .iter()
        .filter(|v| v.exit_epoch == exit_queue_epoch)
        .count() as u64;

    if exit_queue_churn >= churn_limit {
        exit_queue_epoch = Epoch::new(exit_queue_epoch.as_u64().safe_add(1)?);
    }

    let withdrawable_epoch = Epoch::new(
        exit_queue_epoch
            .as_u64()
            .safe_add(spec.min_validator_withdrawability_delay.as_u64())?,
    );

    let validator = state.get_validator_mut(index)?;
    validator.exit_epoch = exit_queue_epoch;
    validator.withdrawable_epoch = withdrawable_epoch;

    Ok(())
}

/// `slash_validator`: marks `index` slashed, ejects it, burns its `MIN_SLASHING_PENALTY_QUOTIENT`
/// share immediately, and rewards the proposer (and an optional whistleblower) out of the rest.
pub fn slash_validator(
    state: &mut BeaconState,
    slashed_index: ValidatorIndex,
    whistleblower_index: Option<ValidatorIndex>,
    spec: &ChainSpec,
) -> Result<(), Error> {
    let epoch = state.current_epoch(spec);
    initiate_validator_exit(state, slashed_index, spec)?;

    let effective_balance = state.get_validator(slashed_index)?.effective_balance;

    let slashed_withdrawable_epoch = Epoch::new(
        epoch
            .as_u64()
            .safe_add(spec.epochs_per_slashings_vector as u64)?,
    );
    {
        let validator = state.get_validator_mut(slashed_index)?;
        validator.slashed = true;
        validator.withdrawable_epoch =
            std::cmp::max(validator.withdrawable_epoch, slashed_withdrawable_epoch);
    }

    let slashings_index = (epoch.as_usize()) % state.slashings.len();
    state.slashings[slashings_index] =
        state.slashings[slashings_index].saturating_add_gwei(effective_balance);

    let penalty = effective_balance.safe_div(spec.min_slashing_penalty_quotient)?;
    decrease_balance(state, slashed_index, penalty)?;

    let proposer_index = state.get_beacon_proposer_index(spec)?;
    let whistleblower_index = whistleblower_index.unwrap_or(proposer_index);
    let whistleblower_reward = effective_balance.safe_div(spec.whistleblower_reward_quotient)?;
    let proposer_reward = whistleblower_reward.safe_div(spec.proposer_reward_quotient)?;

    increase_balance(state, proposer_index, proposer_reward)?;
    increase_balance(
        state,
        whistleblower_index,
        whistleblower_reward.safe_sub(proposer_reward)?,
    )?;

    Ok(())
}

/// `increase_balance`: saturating add, never panics on an adversarially large deposit/reward.
pub fn increase_balance(
    state: &mut BeaconState,
    index: ValidatorIndex,
    delta: Gwei,
) -> Result<(), Error> {
    let balance = state
        .balances
        .get_mut(index as usize)
        .ok_or(Error::UnknownValidator(index))?;
    *balance = balance.saturating_add_gwei(delta);
    Ok(())
}

/// `decrease_balance`: saturating sub, so a penalty can never drive a balance negative/panic.
pub fn decrease_balance(
    state: &mut BeaconState,
    index: ValidatorIndex,
    delta: Gwei,
) -> Result<(), Error> {
    let balance = state
        .balances
        .get_mut(index as usize)
        .ok_or(Error::UnknownValidator(index))?;
    *balance = balance.saturating_sub_gwei(delta);
    Ok(())
}

/// `get_base_reward`: the unit of account every attestation/proposer reward is a fraction of,
/// proportional to `sqrt(total_active_balance)` so individual rewards shrink as the validator
/// set grows.
pub fn get_base_reward(
    state: &BeaconState,
    index: ValidatorIndex,
    total_balance: Gwei,
    spec: &ChainSpec,
) -> Result<Gwei, Error> {
    let effective_balance = state.get_validator(index)?.effective_balance;
    let sqrt_total_balance = total_balance.integer_sqrt();
    Ok(effective_balance
        .safe_mul(spec.base_reward_factor)?
        .safe_div(sqrt_total_balance)?
        .safe_div(BASE_REWARDS_PER_EPOCH)?)
}

/// Epoch at which the `EPOCHS_PER_SLASHINGS_VECTOR` window wraps; used when reading back the
/// slashings bucket written `EPOCHS_PER_SLASHINGS_VECTOR // 2` epochs ago.
pub fn epoch_to_slashings_index(epoch: Epoch, spec: &ChainSpec) -> usize {
    epoch.as_usize() % spec.epochs_per_slashings_vector
}

/// `is_slashable_validator`: not already slashed, and `epoch` falls within its
/// `[activation_epoch, withdrawable_epoch)` window.
pub fn is_slashable_validator(validator: &types::Validator, epoch: Epoch) -> bool {
    !validator.slashed
        && validator.activation_epoch <= epoch
        && epoch < validator.withdrawable_epoch
}
