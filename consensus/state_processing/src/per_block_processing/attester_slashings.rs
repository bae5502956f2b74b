use super::BlockSignatureStrategy;
use crate::common::{compute_signing_root, is_slashable_validator, slash_validator};
use crate::errors::{BlockProcessingError as Error, OperationError};
use bls::{AggregatePublicKey, PublicKey};
use tree_hash::TreeHash;
use types::{AttesterSlashing, BeaconState, ChainSpec, IndexedAttestation};

/// `process_attester_slashings`: for each slashing, checks the two indexed attestations form a
/// double or surround vote and both verify, then slashes every validator index attested to by
/// both.
pub fn process_attester_slashings(
    state: &mut BeaconState,
    slashings: &[AttesterSlashing],
    signature_strategy: BlockSignatureStrategy,
    spec: &ChainSpec,
) -> Result<(), Error> {
    for (index, slashing) in slashings.iter().enumerate() {
        let slashable_indices =
            verify_attester_slashing(state, slashing, signature_strategy, spec).map_err(
                |error| Error::BadOperation {
                    index,
                    kind: "attester_slashings",
                    error,
                },
            )?;

        let epoch = state.current_epoch(spec);
        let mut slashed_any = false;
        for validator_index in slashable_indices {
            let validator = state.get_validator(validator_index)?;
            if is_slashable_validator(validator, epoch) {
                slash_validator(state, validator_index, None, spec)?;
                slashed_any = true;
            }
        }

        if !slashed_any {
            return Err(Error::BadOperation {
                index,
                kind: "attester_slashings",
                error: OperationError::AttesterSlashingInvalid("no slashable indices"),
            });
        }
    }

    Ok(())
}

fn verify_attester_slashing(
    state: &BeaconState,
    slashing: &AttesterSlashing,
    signature_strategy: BlockSignatureStrategy,
    spec: &ChainSpec,
) -> Result<Vec<u64>, OperationError> {
    let att1 = &slashing.attestation_1;
    let att2 = &slashing.attestation_2;

    if !(att1.is_double_vote(att2) || att1.is_surround_vote(att2) || att2.is_surround_vote(att1)) {
        return Err(OperationError::AttesterSlashingInvalid(
            "neither a double nor a surround vote",
        ));
    }

    if signature_strategy.verify() {
        verify_indexed_attestation(state, att1, spec)?;
        verify_indexed_attestation(state, att2, spec)?;
    }

    let indices_1: std::collections::BTreeSet<u64> =
        att1.attesting_indices.iter().copied().collect();
    let indices_2: std::collections::BTreeSet<u64> =
        att2.attesting_indices.iter().copied().collect();

    Ok(indices_1.intersection(&indices_2).copied().collect())
}

/// Verifies an `IndexedAttestation`'s aggregate signature against the public keys of
/// `attesting_indices`, over the shared `AttestationData` signing root.
pub(super) fn verify_indexed_attestation(
    state: &BeaconState,
    attestation: &IndexedAttestation,
    spec: &ChainSpec,
) -> Result<(), OperationError> {
    if attestation.attesting_indices.is_empty() {
        return Err(OperationError::AttesterSlashingInvalid("empty attesting_indices"));
    }

    let pubkeys: Vec<&PublicKey> = attestation
        .attesting_indices
        .iter()
        .map(|&i| {
            state
                .get_validator(i)
                .map(|v| &v.pubkey)
                .map_err(|_| OperationError::AttesterSlashingInvalid("unknown attesting index"))
        })
        .collect::<Result<_, _>>()?;

    let aggregate = AggregatePublicKey::aggregate(&pubkeys)
        .map_err(|_| OperationError::AttesterSlashingInvalid("empty pubkey aggregate"))?
        .into_public_key();

    let domain = state.get_domain(attestation.data.target.epoch, spec.domain_beacon_attester);
    let signing_root = compute_signing_root(attestation.data.tree_hash_root(), domain);

    if !attestation
        .signature
        .fast_aggregate_verify(signing_root.as_bytes(), &[&aggregate])
    {
        return Err(OperationError::AttesterSlashingInvalid("bad aggregate signature"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::test_utils::interop_genesis_state;
    use types::{AttestationData, AttesterSlashing, BlsAggregateSignature, Checkpoint, Epoch};

    fn indexed(indices: &[u64], source: u64, target: u64) -> IndexedAttestation {
        let mut data = AttestationData::default();
        data.source = Checkpoint::new(Epoch::new(source), Default::default());
        data.target = Checkpoint::new(Epoch::new(target), Default::default());
        IndexedAttestation {
            attesting_indices: indices.to_vec().into(),
            data,
            signature: BlsAggregateSignature::infinity(),
        }
    }

    #[test]
    fn surround_vote_slashes_the_intersection() {
        let spec = ChainSpec::minimal();
        let mut state = interop_genesis_state(16, &spec);

        let slashing = AttesterSlashing {
            attestation_1: indexed(&[1, 2, 3], 0, 4),
            attestation_2: indexed(&[2, 3, 4], 1, 3),
        };

        process_attester_slashings(
            &mut state,
            &[slashing],
            BlockSignatureStrategy::NoVerification,
            &spec,
        )
        .unwrap();

        for i in [2, 3] {
            assert!(state.get_validator(i).unwrap().slashed, "validator {} should be slashed", i);
        }
        for i in [0, 1, 4] {
            assert!(!state.get_validator(i).unwrap().slashed, "validator {} should not be slashed", i);
        }
    }

    #[test]
    fn rejects_unrelated_votes() {
        let spec = ChainSpec::minimal();
        let state = interop_genesis_state(16, &spec);

        let slashing = AttesterSlashing {
            attestation_1: indexed(&[1, 2], 0, 1),
            attestation_2: indexed(&[1, 2], 1, 2),
        };

        let err = verify_attester_slashing(&state, &slashing, BlockSignatureStrategy::NoVerification, &spec)
            .unwrap_err();
        assert!(matches!(
            err,
            OperationError::AttesterSlashingInvalid("neither a double nor a surround vote")
        ));
    }
}
