//! Request/response shapes for the validator REST contract, `spec.md` §6. These are plain,
//! transport-agnostic structs; serializing them onto HTTP (headers, query-string parsing, the
//! `hyper` server itself) is explicitly out of scope per `spec.md` §1 and left to a real binary.

use serde_derive::{Deserialize, Serialize};
use types::{BlsSignature, CommitteeIndex, Epoch, PublicKey, Slot};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionResponse {
    pub version: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisTimeResponse {
    pub time: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStatus {
    pub starting_slot: Slot,
    pub current_slot: Slot,
    pub highest_slot: Slot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncingResponse {
    pub syncing: bool,
    pub sync_status: Option<SyncStatus>,
}

/// `GET /validator/duties?epoch&pubkeys[]` query, already parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct DutiesRequest {
    pub epoch: Epoch,
    pub pubkeys: Vec<PublicKey>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatorDuty {
    pub pubkey: PublicKey,
    /// `None` unless this validator is the proposer for some slot in the requested epoch.
    pub proposal_slot: Option<Slot>,
    pub attestation_slot: Slot,
    pub committee_index: CommitteeIndex,
    /// Size of the committee at `(attestation_slot, committee_index)` — needed to size the
    /// `aggregation_bits` bitfield when the validator signs.
    pub committee_length: u64,
    /// This validator's bit position within that committee.
    pub position_in_committee: u64,
}

/// `GET /validator/attestation?slot&committee_index` query, already parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestationProductionRequest {
    pub slot: Slot,
    pub committee_index: CommitteeIndex,
}

/// `GET /validator/block?slot&randao_reveal` query, already parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockProductionRequest {
    pub slot: Slot,
    pub randao_reveal: BlsSignature,
}

/// What happened to a block submitted via `POST /validator/block`: `200` vs `202` in `spec.md`
/// §6 — the block was imported into our own chain, or merely accepted and handed off for
/// broadcast without local import (e.g. it's already known).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockPublishOutcome {
    ImportedLocally,
    BroadcastOnly,
}
