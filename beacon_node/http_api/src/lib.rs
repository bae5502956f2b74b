//! The validator REST contract (`spec.md` §6): handler trait plus request/response types only.
//! No `hyper` server lives here — wiring these handlers to an actual HTTP listener is an
//! external-collaborator concern explicitly out of scope per `spec.md` §1.

mod error;
mod handler;
mod types;

pub use crate::error::ApiError;
pub use crate::handler::ApiHandler;
pub use crate::types::{
    AttestationProductionRequest, BlockProductionRequest, BlockPublishOutcome, DutiesRequest,
    GenesisTimeResponse, SyncStatus, SyncingResponse, ValidatorDuty, VersionResponse,
};

use beacon_chain::BeaconChain;
use slot_clock::SlotClock;
use store::KeyValueStore;
use types::ChainSpec;

/// The reference `ApiHandler`: a thin wrapper around a live `BeaconChain`, the way the teacher's
/// `rest_api` crate wraps its `Arc<BeaconChain<T>>` "node state". `syncing` is supplied by the
/// caller (the sync orchestrator is the source of truth for that) rather than derived here.
pub struct BeaconChainHandler<'a, T: SlotClock, E: KeyValueStore> {
    pub chain: &'a BeaconChain<T, E>,
    pub syncing: bool,
    pub genesis_time: u64,
    pub version: String,
}

const EPOCH_LOOKAHEAD: u64 = 1;

impl<'a, T: SlotClock, E: KeyValueStore> ApiHandler for BeaconChainHandler<'a, T, E> {
    fn node_version(&self) -> VersionResponse {
        VersionResponse {
            version: self.version.clone(),
        }
    }

    fn genesis_time(&self) -> GenesisTimeResponse {
        GenesisTimeResponse {
            time: self.genesis_time,
        }
    }

    fn syncing_status(&self) -> SyncingResponse {
        let current_slot = self.chain.canonical_head().beacon_block.slot;
        SyncingResponse {
            syncing: self.syncing,
            sync_status: if self.syncing {
                Some(SyncStatus {
                    starting_slot: self.chain.spec.genesis_slot,
                    current_slot,
                    highest_slot: current_slot,
                })
            } else {
                None
            },
        }
    }

    fn validator_duties(&self, request: DutiesRequest) -> Result<Vec<ValidatorDuty>, ApiError> {
        if self.syncing {
            return Err(ApiError::NotSynced);
        }
        if request.pubkeys.is_empty() {
            return Err(ApiError::BadRequest("pubkeys must not be empty".into()));
        }

        let spec = &self.chain.spec;
        let head_epoch = self.chain.canonical_head().beacon_state.current_epoch(spec);
        if request.epoch.as_u64() > head_epoch.as_u64() + EPOCH_LOOKAHEAD {
            return Err(ApiError::EpochOutOfRange);
        }

        let epoch_start = request.epoch.start_slot(spec.slots_per_epoch);
        let state = self
            .chain
            .state_at_slot(epoch_start)
            .map_err(|e| ApiError::BadRequest(format!("{:?}", e)))?;

        let mut proposer_slots: std::collections::HashMap<types::ValidatorIndex, types::Slot> =
            std::collections::HashMap::new();
        for slot_offset in 0..spec.slots_per_epoch {
            let mut slot_state = state.clone();
            let slot = epoch_start + slot_offset;
            if slot_state.slot < slot {
                state_processing::process_slots(&mut slot_state, slot, spec)
                    .map_err(|e| ApiError::BadRequest(format!("{:?}", e)))?;
            }
            if let Ok(proposer) = slot_state.get_beacon_proposer_index(spec) {
                proposer_slots.entry(proposer).or_insert(slot);
            }
        }

        let committees_per_slot = state
            .get_committee_count(request.epoch, spec)
            .map_err(|e| ApiError::BadRequest(format!("{:?}", e)))?;

        let mut duties = Vec::with_capacity(request.pubkeys.len());
        for pubkey in &request.pubkeys {
            let validator_index = state
                .validators
                .iter()
                .position(|v| &v.pubkey == pubkey)
                .ok_or_else(|| ApiError::BadRequest(format!("unknown pubkey {:?}", pubkey)))?;

            let mut found = None;
            'search: for slot_offset in 0..spec.slots_per_epoch {
                let slot = epoch_start + slot_offset;
                for committee_index in 0..committees_per_slot {
                    let committee = state
                        .get_beacon_committee(slot, committee_index, spec)
                        .map_err(|e| ApiError::BadRequest(format!("{:?}", e)))?;
                    if let Some(position) = committee.committee.iter().position(|&i| i == validator_index) {
                        found = Some((
                            slot,
                            committee_index,
                            committee.committee.len() as u64,
                            position as u64,
                        ));
                        break 'search;
                    }
                }
            }

            let (attestation_slot, committee_index, committee_length, position_in_committee) =
                found.ok_or_else(|| {
                    ApiError::BadRequest("validator has no duty this epoch".into())
                })?;

            duties.push(ValidatorDuty {
                pubkey: pubkey.clone(),
                proposal_slot: proposer_slots.get(&validator_index).copied(),
                attestation_slot,
                committee_index,
                committee_length,
                position_in_committee,
            });
        }

        Ok(duties)
    }

    fn produce_block(&self, request: BlockProductionRequest) -> Result<types::BeaconBlock, ApiError> {
        if self.syncing {
            return Err(ApiError::NotSynced);
        }
        self.chain
            .produce_block(request.slot, request.randao_reveal, [0; 32])
            .map_err(|e| ApiError::InvalidBlock(format!("{:?}", e)))
    }

    fn publish_block(&self, block: types::BeaconBlock) -> Result<BlockPublishOutcome, ApiError> {
        if self.syncing {
            return Err(ApiError::NotSynced);
        }
        match self.chain.process_block(block) {
            Ok(_) => Ok(BlockPublishOutcome::ImportedLocally),
            Err(beacon_chain::BeaconChainError::UnknownParent(_)) => Ok(BlockPublishOutcome::BroadcastOnly),
            Err(e) => Err(ApiError::InvalidBlock(format!("{:?}", e))),
        }
    }

    fn produce_attestation_data(
        &self,
        request: crate::types::AttestationProductionRequest,
    ) -> Result<types::AttestationData, ApiError> {
        if self.syncing {
            return Err(ApiError::NotSynced);
        }
        self.chain
            .produce_attestation_data(request.slot, request.committee_index)
            .map_err(|e| ApiError::BadRequest(format!("{:?}", e)))
    }

    fn publish_attestation(&self, attestation: types::Attestation) -> Result<(), ApiError> {
        if self.syncing {
            return Err(ApiError::NotSynced);
        }
        self.chain
            .process_attestation(attestation)
            .map_err(|e| ApiError::InvalidBlock(format!("{:?}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slot_clock::TestingSlotClock;
    use std::time::Duration;
    use types::test_utils::{generate_deterministic_keypairs, interop_genesis_state};

    fn chain() -> beacon_chain::MemoryBeaconChain<TestingSlotClock> {
        let spec = ChainSpec::minimal();
        let state = interop_genesis_state(8, &spec);
        let clock = TestingSlotClock::new(spec.genesis_slot, Duration::from_secs(0), Duration::from_secs(6));
        beacon_chain::from_genesis_memory(state, clock, spec, logging::test_logger()).unwrap()
    }

    #[test]
    fn node_version_and_genesis_time_are_passthrough() {
        let c = chain();
        let handler = BeaconChainHandler {
            chain: &c,
            syncing: false,
            genesis_time: 1_600_000_000,
            version: "test/v0".to_string(),
        };
        assert_eq!(handler.node_version().version, "test/v0");
        assert_eq!(handler.genesis_time().time, 1_600_000_000);
    }

    #[test]
    fn duties_are_refused_while_syncing() {
        let c = chain();
        let handler = BeaconChainHandler {
            chain: &c,
            syncing: true,
            genesis_time: 0,
            version: "test".to_string(),
        };
        let keypairs = generate_deterministic_keypairs(1);
        let request = DutiesRequest {
            epoch: types::Epoch::new(0),
            pubkeys: vec![keypairs[0].pk.clone()],
        };
        assert_eq!(handler.validator_duties(request), Err(ApiError::NotSynced));
    }

    #[test]
    fn duties_report_a_committee_assignment_for_every_active_validator() {
        let c = chain();
        let handler = BeaconChainHandler {
            chain: &c,
            syncing: false,
            genesis_time: 0,
            version: "test".to_string(),
        };
        let keypairs = generate_deterministic_keypairs(8);
        let request = DutiesRequest {
            epoch: types::Epoch::new(0),
            pubkeys: keypairs.iter().map(|kp| kp.pk.clone()).collect(),
        };
        let duties = handler.validator_duties(request).expect("duties should resolve");
        assert_eq!(duties.len(), 8);
    }

    #[test]
    fn attestation_data_is_refused_while_syncing_but_available_once_synced() {
        let c = chain();
        let synced = BeaconChainHandler {
            chain: &c,
            syncing: false,
            genesis_time: 0,
            version: "test".to_string(),
        };
        let syncing = BeaconChainHandler {
            chain: &c,
            syncing: true,
            genesis_time: 0,
            version: "test".to_string(),
        };
        let request = AttestationProductionRequest {
            slot: c.spec.genesis_slot,
            committee_index: 0,
        };
        assert_eq!(
            syncing.produce_attestation_data(request),
            Err(ApiError::NotSynced)
        );
        assert!(synced.produce_attestation_data(request).is_ok());
    }
}
