use super::BlockSignatureStrategy;
use crate::common::{compute_signing_root, is_slashable_validator, slash_validator};
use crate::errors::{BlockProcessingError as Error, OperationError};
use types::{BeaconState, ChainSpec, ProposerSlashing, SignedRoot};

/// `process_proposer_slashings`: for each slashing, checks both headers name the same slot and
/// proposer and genuinely differ, that the proposer is still slashable, verifies both headers'
/// signatures, then slashes.
pub fn process_proposer_slashings(
    state: &mut BeaconState,
    slashings: &[ProposerSlashing],
    signature_strategy: BlockSignatureStrategy,
    spec: &ChainSpec,
) -> Result<(), Error> {
    for (index, slashing) in slashings.iter().enumerate() {
        verify_proposer_slashing(state, slashing, signature_strategy, spec).map_err(|error| {
            Error::BadOperation {
                index,
                kind: "proposer_slashings",
                error,
            }
        })?;

        slash_validator(state, slashing.proposer_index, None, spec)?;
    }

    Ok(())
}

fn verify_proposer_slashing(
    state: &BeaconState,
    slashing: &ProposerSlashing,
    signature_strategy: BlockSignatureStrategy,
    spec: &ChainSpec,
) -> Result<(), OperationError> {
    if slashing.header_1.slot != slashing.header_2.slot {
        return Err(OperationError::ProposerSlashingInvalid("headers at different slots"));
    }
    if slashing.header_1 == slashing.header_2 {
        return Err(OperationError::ProposerSlashingInvalid("headers are identical"));
    }

    let proposer = state
        .get_validator(slashing.proposer_index)
        .map_err(|_| OperationError::ProposerSlashingInvalid("unknown proposer_index"))?;

    let epoch = slashing.header_1.slot.epoch(spec.slots_per_epoch);
    if !is_slashable_validator(proposer, epoch) {
        return Err(OperationError::ProposerSlashingInvalid("proposer not slashable"));
    }

    if signature_strategy.verify() {
        for header in [&slashing.header_1, &slashing.header_2] {
            let domain = state.get_domain(header.slot.epoch(spec.slots_per_epoch), spec.domain_beacon_proposer);
            let signing_root = compute_signing_root(header.signed_root(), domain);
            if !header.signature.verify(signing_root.as_bytes(), &proposer.pubkey) {
                return Err(OperationError::ProposerSlashingInvalid("bad header signature"));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::test_utils::interop_genesis_state;
    use types::{BeaconBlockHeader, BlsSignature, Hash256, Slot};

    fn two_headers_same_slot(proposer_index: u64) -> ProposerSlashing {
        let header_1 = BeaconBlockHeader {
            slot: Slot::new(0),
            parent_root: Hash256::zero(),
            state_root: Hash256::repeat_byte(1),
            body_root: Hash256::repeat_byte(0xaa),
            signature: BlsSignature::empty_signature(),
        };
        let mut header_2 = header_1.clone();
        header_2.state_root = Hash256::repeat_byte(2);

        ProposerSlashing {
            proposer_index,
            header_1,
            header_2,
        }
    }

    #[test]
    fn double_proposal_slashes_and_pays_whistleblower() {
        let spec = ChainSpec::minimal();
        let mut state = interop_genesis_state(16, &spec);
        let proposer_index = state.get_beacon_proposer_index(&spec).unwrap();
        let slashing = two_headers_same_slot(proposer_index);
        let effective_balance = state.get_validator(proposer_index).unwrap().effective_balance;
        let pre_proposer_balance = state.balances[proposer_index as usize];

        process_proposer_slashings(
            &mut state,
            &[slashing],
            BlockSignatureStrategy::NoVerification,
            &spec,
        )
        .unwrap();

        assert!(state.get_validator(proposer_index).unwrap().slashed);
        let whistleblower_reward = effective_balance / spec.whistleblower_reward_quotient;
        let penalty = effective_balance / spec.min_slashing_penalty_quotient;

        // The slashed validator is its own proposer here, so the proposer-reward and
        // whistleblower-reward splits both land back on the same balance.
        let expected = pre_proposer_balance - penalty + whistleblower_reward;
        assert_eq!(state.balances[proposer_index as usize], expected);
    }

    #[test]
    fn rejects_identical_headers() {
        let spec = ChainSpec::minimal();
        let state = interop_genesis_state(16, &spec);
        let mut slashing = two_headers_same_slot(0);
        slashing.header_2 = slashing.header_1.clone();

        let err = verify_proposer_slashing(&state, &slashing, BlockSignatureStrategy::NoVerification, &spec)
            .unwrap_err();
        assert!(matches!(err, OperationError::ProposerSlashingInvalid("headers are identical")));
    }

    #[test]
    fn rejects_different_slots() {
        let spec = ChainSpec::minimal();
        let state = interop_genesis_state(16, &spec);
        let mut slashing = two_headers_same_slot(0);
        slashing.header_2.slot = Slot::new(1);

        let err = verify_proposer_slashing(&state, &slashing, BlockSignatureStrategy::NoVerification, &spec)
            .unwrap_err();
        assert!(matches!(
            err,
            OperationError::ProposerSlashingInvalid("headers at different slots")
        ));
    }
}
