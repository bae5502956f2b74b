use super::BlockSignatureStrategy;
use crate::common::{compute_signing_root, initiate_validator_exit};
use crate::errors::{BlockProcessingError as Error, OperationError};
use types::{BeaconState, ChainSpec, SignedRoot, VoluntaryExit};

/// `process_voluntary_exits`: checks each exit names an active, not-already-exiting validator
/// past both its activation delay and the requested epoch, verifies its signature, then
/// schedules the exit.
pub fn process_voluntary_exits(
    state: &mut BeaconState,
    exits: &[VoluntaryExit],
    signature_strategy: BlockSignatureStrategy,
    spec: &ChainSpec,
) -> Result<(), Error> {
    for (index, exit) in exits.iter().enumerate() {
        verify_voluntary_exit(state, exit, signature_strategy, spec).map_err(|error| {
            Error::BadOperation {
                index,
                kind: "voluntary_exits",
                error,
            }
        })?;

        initiate_validator_exit(state, exit.validator_index, spec)?;
    }

    Ok(())
}

fn verify_voluntary_exit(
    state: &BeaconState,
    exit: &VoluntaryExit,
    signature_strategy: BlockSignatureStrategy,
    spec: &ChainSpec,
) -> Result<(), OperationError> {
    let validator = state
        .get_validator(exit.validator_index)
        .map_err(|_| OperationError::ExitInvalid("unknown validator_index"))?;

    let current_epoch = state.current_epoch(spec);
    if !validator.is_active_at(current_epoch) {
        return Err(OperationError::ExitInvalid("validator not active"));
    }
    if validator.exit_epoch != types::FAR_FUTURE_EPOCH {
        return Err(OperationError::ExitInvalid("validator already exiting"));
    }
    if current_epoch < exit.epoch {
        return Err(OperationError::ExitInvalid("exit epoch is in the future"));
    }
    let eligible_epoch = validator
        .activation_epoch
        .as_u64()
        .saturating_add(spec.persistent_committee_period);
    if current_epoch.as_u64() < eligible_epoch {
        return Err(OperationError::ExitInvalid("validator too recently activated"));
    }

    if signature_strategy.verify() {
        let domain = state.get_domain(exit.epoch, spec.domain_voluntary_exit);
        let signing_root = compute_signing_root(exit.signed_root(), domain);
        if !exit.signature.verify(signing_root.as_bytes(), &validator.pubkey) {
            return Err(OperationError::ExitInvalid("bad signature"));
        }
    }

    Ok(())
}
