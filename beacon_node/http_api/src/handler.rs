use crate::error::ApiError;
use crate::types::{
    AttestationProductionRequest, BlockProductionRequest, BlockPublishOutcome, DutiesRequest,
    GenesisTimeResponse, SyncingResponse, ValidatorDuty, VersionResponse,
};
use types::{Attestation, AttestationData, BeaconBlock};

/// The validator REST contract (`spec.md` §6): one method per endpoint, each returning a plain
/// `Result` a real HTTP layer maps onto status codes via `ApiError::status_code`. No method here
/// performs I/O or touches a socket — that's the out-of-scope transport's job.
pub trait ApiHandler {
    fn node_version(&self) -> VersionResponse;

    fn genesis_time(&self) -> GenesisTimeResponse;

    fn syncing_status(&self) -> SyncingResponse;

    /// `503` while syncing, `400` on malformed input, `406` if `epoch` isn't locally computable
    /// — callers construct `DutiesRequest` after validating the query string, so `BadRequest`
    /// here is reserved for semantic issues (e.g. an empty pubkey list).
    fn validator_duties(&self, request: DutiesRequest) -> Result<Vec<ValidatorDuty>, ApiError>;

    /// Produces an unsigned block via a trial state transition over the current head.
    fn produce_block(&self, request: BlockProductionRequest) -> Result<BeaconBlock, ApiError>;

    /// Accepts a signed block. `ImportedLocally` maps to `200`, `BroadcastOnly` to `202`.
    fn publish_block(&self, block: BeaconBlock) -> Result<BlockPublishOutcome, ApiError>;

    /// Unsigned `AttestationData` for the given slot/committee, computed from the current head.
    /// **[ADDED]** — `spec.md` §4.10 names `attester_duties` and attestation signing explicitly,
    /// but its §6 REST enumeration only lists the block endpoints; this fills that gap the way
    /// the teacher's `rest_api` exposes a `validator/attestation` pair alongside `validator/block`.
    fn produce_attestation_data(
        &self,
        request: AttestationProductionRequest,
    ) -> Result<AttestationData, ApiError>;

    /// Accepts a signed (single-validator) attestation for local aggregation/inclusion.
    fn publish_attestation(&self, attestation: Attestation) -> Result<(), ApiError>;
}
