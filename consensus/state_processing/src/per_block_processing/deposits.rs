use crate::errors::{BlockProcessingError as Error, OperationError};
use merkle_proof::verify_merkle_proof;
use safe_arith::SafeArith;
use tree_hash::TreeHash;
use types::{Deposit, Validator, FAR_FUTURE_EPOCH};
use types::{BeaconState, ChainSpec};

const DEPOSIT_PROOF_DEPTH: usize = 33;

/// `process_deposits`: verifies each deposit's Merkle branch against `state.eth1_data`, then
/// either tops up an existing validator's balance or registers a new one, advancing
/// `eth1_deposit_index` either way.
pub fn process_deposits(
    state: &mut BeaconState,
    deposits: &[Deposit],
    spec: &ChainSpec,
) -> Result<(), Error> {
    for (index, deposit) in deposits.iter().enumerate() {
        verify_deposit(state, deposit, spec).map_err(|error| Error::BadOperation {
            index,
            kind: "deposits",
            error,
        })?;

        apply_deposit(state, deposit, spec)?;
        state.eth1_deposit_index = state.eth1_deposit_index.safe_add(1)?;
    }

    Ok(())
}

fn verify_deposit(
    state: &BeaconState,
    deposit: &Deposit,
    _spec: &ChainSpec,
) -> Result<(), OperationError> {
    let leaf = deposit.data.tree_hash_root();
    if !verify_merkle_proof(
        leaf,
        &deposit.proof,
        DEPOSIT_PROOF_DEPTH,
        state.eth1_deposit_index as usize,
        state.eth1_data.deposit_root,
    ) {
        return Err(OperationError::DepositInvalid("bad Merkle proof"));
    }

    Ok(())
}

fn apply_deposit(
    state: &mut BeaconState,
    deposit: &Deposit,
    spec: &ChainSpec,
) -> Result<(), Error> {
    let amount = deposit.data.amount;
    let existing = state
        .validators
        .iter()
        .position(|v| v.pubkey == deposit.data.pubkey);

    match existing {
        Some(index) => {
            crate::common::increase_balance(state, index as u64, amount)?;
        }
        None => {
            // An invalid deposit signature is not a consensus failure in phase 0: an
            // unclaimable deposit is simply dropped rather than rejecting the whole block.
            if !verify_deposit_signature(&deposit.data, spec) {
                return Ok(());
            }

            let effective_balance = std::cmp::min(
                amount - (amount % spec.effective_balance_increment),
                spec.max_effective_balance,
            );
            state.validators.push(Validator {
                pubkey: deposit.data.pubkey.clone(),
                withdrawal_credentials: deposit.data.withdrawal_credentials,
                effective_balance,
                slashed: false,
                activation_eligibility_epoch: FAR_FUTURE_EPOCH,
                activation_epoch: FAR_FUTURE_EPOCH,
                exit_epoch: FAR_FUTURE_EPOCH,
                withdrawable_epoch: FAR_FUTURE_EPOCH,
            })?;
            state.balances.push(amount)?;
        }
    }

    Ok(())
}

/// Deposit signatures are always checked against the genesis fork version: unlike every other
/// operation, a deposit must remain valid no matter which fork the chain has since moved to.
fn verify_deposit_signature(deposit_data: &types::DepositData, spec: &ChainSpec) -> bool {
    use crate::common::compute_signing_root;
    use types::{compute_domain, SignedRoot};

    let domain = compute_domain(spec.domain_deposit, spec.genesis_fork_version);
    let signing_root = compute_signing_root(deposit_data.signed_root(), domain);
    deposit_data
        .signature
        .verify(signing_root.as_bytes(), &deposit_data.pubkey)
}
