use super::BlockSignatureStrategy;
use crate::common::{compute_signing_root, decrease_balance, increase_balance};
use crate::errors::{BlockProcessingError as Error, OperationError};
use safe_arith::SafeArith;
use types::{BeaconState, ChainSpec, SignedRoot, Transfer};

/// `process_transfers`: a balance move between two validator records, distinct from a deposit or
/// a withdrawal — funded from an already-active validator's excess (above
/// `MAX_EFFECTIVE_BALANCE`) balance rather than the eth1 deposit contract.
pub fn process_transfers(
    state: &mut BeaconState,
    transfers: &[Transfer],
    signature_strategy: BlockSignatureStrategy,
    spec: &ChainSpec,
) -> Result<(), Error> {
    for (index, transfer) in transfers.iter().enumerate() {
        verify_transfer(state, transfer, signature_strategy, spec).map_err(|error| {
            Error::BadOperation {
                index,
                kind: "transfers",
                error,
            }
        })?;

        let total = transfer.amount.safe_add(transfer.fee)?;
        decrease_balance(state, transfer.sender, total)?;
        increase_balance(state, transfer.recipient, transfer.amount)?;

        let proposer_index = state.get_beacon_proposer_index(spec)?;
        increase_balance(state, proposer_index, transfer.fee)?;
    }

    Ok(())
}

fn verify_transfer(
    state: &BeaconState,
    transfer: &Transfer,
    signature_strategy: BlockSignatureStrategy,
    spec: &ChainSpec,
) -> Result<(), OperationError> {
    let total = transfer
        .amount
        .checked_add(transfer.fee)
        .ok_or(OperationError::TransferInvalid("amount + fee overflows"))?;

    let sender_balance = state
        .get_balance(transfer.sender)
        .map_err(|_| OperationError::TransferInvalid("unknown sender"))?;
    if sender_balance < total {
        return Err(OperationError::TransferInvalid("insufficient balance"));
    }

    let sender = state
        .get_validator(transfer.sender)
        .map_err(|_| OperationError::TransferInvalid("unknown sender"))?;

    let remaining = sender_balance - total;
    let leaves_enough = remaining == 0 || remaining >= spec.min_deposit_amount;
    if !leaves_enough {
        return Err(OperationError::TransferInvalid("dust remainder below minimum deposit"));
    }

    if transfer.slot != state.slot {
        return Err(OperationError::TransferInvalid("not scheduled for the current slot"));
    }

    let current_epoch = state.current_epoch(spec);
    let sender_inactive_long_enough = sender.activation_eligibility_epoch == types::FAR_FUTURE_EPOCH
        || current_epoch.as_u64()
            >= sender
                .activation_eligibility_epoch
                .as_u64()
                .saturating_add(spec.persistent_committee_period);
    if sender_balance > spec.max_effective_balance && !sender_inactive_long_enough {
        return Err(OperationError::TransferInvalid(
            "sender above max effective balance too recently to transfer freely",
        ));
    }

    let expected_credentials = withdrawal_credentials(&transfer.pubkey, spec);
    if sender.withdrawal_credentials != expected_credentials {
        return Err(OperationError::TransferInvalid("withdrawal_credentials do not match pubkey"));
    }

    if signature_strategy.verify() {
        let domain = state.get_domain(current_epoch, spec.domain_transfer);
        let signing_root = compute_signing_root(transfer.signed_root(), domain);
        if !transfer
            .signature
            .verify(signing_root.as_bytes(), &transfer.pubkey)
        {
            return Err(OperationError::TransferInvalid("bad signature"));
        }
    }

    Ok(())
}

/// The BLS withdrawal credentials a `pubkey` must present to authorize a transfer:
/// `BLS_WITHDRAWAL_PREFIX_BYTE ++ hash(pubkey)[1:]`.
fn withdrawal_credentials(pubkey: &types::BlsPubkey, spec: &ChainSpec) -> types::Hash256 {
    let mut hashed = eth2_hashing::hash(&pubkey.as_bytes());
    hashed[0] = spec.bls_withdrawal_prefix_byte;
    types::Hash256::from_slice(&hashed)
}
