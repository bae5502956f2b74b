use super::attester_slashings::verify_indexed_attestation;
use super::BlockSignatureStrategy;
use crate::common::get_indexed_attestation;
use crate::errors::{BlockProcessingError as Error, OperationError};
use tree_hash::TreeHash;
use types::{Attestation, BeaconState, ChainSpec, PendingAttestation};

/// `process_attestations`: validates each attestation's slot/committee bounds and crosslink
/// continuity, verifies its aggregate signature, then records it as a `PendingAttestation`
/// against whichever of `current_epoch_attestations`/`previous_epoch_attestations` its target
/// epoch belongs to.
pub fn process_attestations(
    state: &mut BeaconState,
    attestations: &[Attestation],
    signature_strategy: BlockSignatureStrategy,
    spec: &ChainSpec,
) -> Result<(), Error> {
    for (index, attestation) in attestations.iter().enumerate() {
        verify_attestation(state, attestation, signature_strategy, spec).map_err(|error| {
            Error::BadOperation {
                index,
                kind: "attestations",
                error,
            }
        })?;

        let proposer_index = state.get_beacon_proposer_index(spec)?;
        let pending = PendingAttestation {
            aggregation_bits: attestation.aggregation_bits.clone(),
            data: attestation.data.clone(),
            inclusion_delay: state
                .slot
                .as_u64()
                .saturating_sub(attestation.data.slot.as_u64()),
            proposer_index,
        };

        let current_epoch = state.current_epoch(spec);
        if attestation.data.target.epoch == current_epoch {
            state.current_epoch_attestations.push(pending)?;
        } else {
            state.previous_epoch_attestations.push(pending)?;
        }
    }

    Ok(())
}

fn verify_attestation(
    state: &BeaconState,
    attestation: &Attestation,
    signature_strategy: BlockSignatureStrategy,
    spec: &ChainSpec,
) -> Result<(), OperationError> {
    let data = &attestation.data;

    if data.slot.as_u64().saturating_add(spec.min_attestation_inclusion_delay) > state.slot.as_u64()
    {
        return Err(OperationError::AttestationInvalid("included before minimum delay"));
    }
    if state.slot.as_u64() > data.slot.as_u64() + spec.slots_per_epoch {
        return Err(OperationError::AttestationInvalid("included after its epoch's window"));
    }

    let current_epoch = state.current_epoch(spec);
    let previous_epoch = state.previous_epoch(spec);
    if data.target.epoch != current_epoch && data.target.epoch != previous_epoch {
        return Err(OperationError::AttestationInvalid("target epoch not current or previous"));
    }

    let expected_source = if data.target.epoch == current_epoch {
        state.current_justified_checkpoint
    } else {
        state.previous_justified_checkpoint
    };
    if data.source != expected_source {
        return Err(OperationError::AttestationInvalid("source checkpoint mismatch"));
    }

    let committee = state
        .get_crosslink_committee(data.target.epoch, data.crosslink.shard, spec)
        .map_err(|_| OperationError::AttestationInvalid("no committee for crosslink shard"))?;
    if attestation.aggregation_bits.len() != committee.len() {
        return Err(OperationError::AttestationInvalid("aggregation_bits length mismatch"));
    }

    let parent_crosslink = if data.target.epoch == current_epoch {
        &state.current_crosslinks[data.crosslink.shard as usize]
    } else {
        &state.previous_crosslinks[data.crosslink.shard as usize]
    };
    if data.crosslink.parent_root != parent_crosslink.tree_hash_root() {
        return Err(OperationError::AttestationInvalid("crosslink does not extend the parent"));
    }
    if data.crosslink.start_epoch != parent_crosslink.end_epoch {
        return Err(OperationError::AttestationInvalid("crosslink start_epoch discontinuous"));
    }
    if data.crosslink.data_root != types::Hash256::zero() {
        return Err(OperationError::AttestationInvalid("non-empty crosslink data_root"));
    }

    if signature_strategy.verify() {
        let indexed = get_indexed_attestation(state, attestation, spec)
            .map_err(|_| OperationError::AttestationInvalid("could not build indexed attestation"))?;
        verify_indexed_attestation(state, &indexed, spec)
            .map_err(|_| OperationError::AttestationInvalid("bad aggregate signature"))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::per_slot_processing;
    use types::bounds::MaxValidatorsPerCommittee;
    use types::test_utils::interop_genesis_state;
    use types::{BitList, BlsAggregateSignature, Checkpoint, Crosslink, Epoch, Hash256, Slot};

    /// A structurally-valid attestation for genesis-state slot 0, shard 0: the one committee
    /// `ChainSpec::minimal()` assigns to that slot/shard pair at 16 active validators.
    fn genesis_attestation(state: &BeaconState, spec: &ChainSpec) -> Attestation {
        let committee = state.get_crosslink_committee(Epoch::new(0), 0, spec).unwrap();
        let parent_crosslink = state.current_crosslinks[0].clone();

        Attestation {
            aggregation_bits: BitList::<MaxValidatorsPerCommittee>::with_capacity(committee.len())
                .unwrap(),
            data: types::AttestationData {
                slot: Slot::new(0),
                beacon_block_root: Hash256::zero(),
                source: state.current_justified_checkpoint,
                target: Checkpoint::new(Epoch::new(0), Hash256::zero()),
                crosslink: Crosslink {
                    shard: 0,
                    parent_root: parent_crosslink.tree_hash_root(),
                    start_epoch: parent_crosslink.end_epoch,
                    end_epoch: Epoch::new(0),
                    data_root: Hash256::zero(),
                },
            },
            custody_bits: BitList::<MaxValidatorsPerCommittee>::with_capacity(committee.len())
                .unwrap(),
            signature: BlsAggregateSignature::infinity(),
        }
    }

    #[test]
    fn included_at_minimum_delay_records_inclusion_delay() {
        let spec = ChainSpec::minimal();
        let mut state = interop_genesis_state(16, &spec);
        let attestation = genesis_attestation(&state, &spec);

        per_slot_processing(&mut state, &spec).unwrap();
        assert_eq!(state.slot.as_u64(), spec.min_attestation_inclusion_delay);

        process_attestations(
            &mut state,
            &[attestation.clone()],
            BlockSignatureStrategy::NoVerification,
            &spec,
        )
        .unwrap();

        assert_eq!(state.current_epoch_attestations.len(), 1);
        let recorded = &state.current_epoch_attestations[0];
        assert_eq!(recorded.inclusion_delay, spec.min_attestation_inclusion_delay);
        assert_eq!(recorded.data, attestation.data);
    }

    #[test]
    fn rejects_inclusion_before_minimum_delay() {
        let spec = ChainSpec::minimal();
        let state = interop_genesis_state(16, &spec);
        let attestation = genesis_attestation(&state, &spec);

        let err = verify_attestation(&state, &attestation, BlockSignatureStrategy::NoVerification, &spec)
            .unwrap_err();
        assert!(matches!(
            err,
            OperationError::AttestationInvalid("included before minimum delay")
        ));
    }
}
