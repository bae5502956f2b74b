//! The seam between the duties engine and "whatever beacon node we're paired with" — mirrors the
//! teacher's `duties::traits::BeaconNode` trait, generalized from a single `request_shuffling`
//! call to the full validator REST contract (`spec.md` §6). A real binary implements this over
//! `remote_beacon_node`-style HTTP calls against `http_api`'s handlers; tests implement it
//! in-process.

use http_api::{
    ApiError, AttestationProductionRequest, BlockProductionRequest, DutiesRequest, ValidatorDuty,
};
use types::{Attestation, AttestationData, BeaconBlock, BlsSignature, CommitteeIndex, Epoch, PublicKey, Slot};

#[derive(Debug, Clone, PartialEq)]
pub enum BeaconNodeError {
    NotSynced,
    EpochOutOfRange,
    Request(String),
}

impl From<ApiError> for BeaconNodeError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::NotSynced => BeaconNodeError::NotSynced,
            ApiError::EpochOutOfRange => BeaconNodeError::EpochOutOfRange,
            ApiError::BadRequest(msg) | ApiError::InvalidBlock(msg) => {
                BeaconNodeError::Request(msg)
            }
        }
    }
}

pub trait BeaconNodeDuties: Send + Sync {
    fn validator_duties(
        &self,
        epoch: Epoch,
        pubkeys: Vec<PublicKey>,
    ) -> Result<Vec<ValidatorDuty>, BeaconNodeError>;

    fn produce_block(
        &self,
        slot: Slot,
        randao_reveal: BlsSignature,
    ) -> Result<BeaconBlock, BeaconNodeError>;

    fn publish_block(&self, block: BeaconBlock) -> Result<(), BeaconNodeError>;

    fn produce_attestation_data(
        &self,
        slot: Slot,
        committee_index: CommitteeIndex,
    ) -> Result<AttestationData, BeaconNodeError>;

    fn publish_attestation(&self, attestation: Attestation) -> Result<(), BeaconNodeError>;
}

/// Any in-process `ApiHandler` (e.g. `http_api::BeaconChainHandler` wrapping a local
/// `BeaconChain`) is trivially a `BeaconNodeDuties` — useful for single-process integration
/// tests and demos that skip the wire entirely.
impl<T: http_api::ApiHandler + Send + Sync> BeaconNodeDuties for T {
    fn validator_duties(
        &self,
        epoch: Epoch,
        pubkeys: Vec<PublicKey>,
    ) -> Result<Vec<ValidatorDuty>, BeaconNodeError> {
        // Fully-qualified to disambiguate from this very trait method of the same name.
        Ok(http_api::ApiHandler::validator_duties(
            self,
            DutiesRequest { epoch, pubkeys },
        )?)
    }

    fn produce_block(
        &self,
        slot: Slot,
        randao_reveal: BlsSignature,
    ) -> Result<BeaconBlock, BeaconNodeError> {
        Ok(http_api::ApiHandler::produce_block(
            self,
            BlockProductionRequest { slot, randao_reveal },
        )?)
    }

    fn publish_block(&self, block: BeaconBlock) -> Result<(), BeaconNodeError> {
        http_api::ApiHandler::publish_block(self, block)?;
        Ok(())
    }

    fn produce_attestation_data(
        &self,
        slot: Slot,
        committee_index: CommitteeIndex,
    ) -> Result<AttestationData, BeaconNodeError> {
        Ok(http_api::ApiHandler::produce_attestation_data(
            self,
            AttestationProductionRequest { slot, committee_index },
        )?)
    }

    fn publish_attestation(&self, attestation: Attestation) -> Result<(), BeaconNodeError> {
        http_api::ApiHandler::publish_attestation(self, attestation)?;
        Ok(())
    }
}
