//! Container types and pure helper functions over beacon-chain state: the chain spec, the
//! committee/shuffling/reward math, and every SSZ container the state-transition function reads
//! or writes. Nothing in this crate performs I/O; `ChainSpec` is built in-process rather than
//! loaded from a config file.

mod attestation;
mod attestation_data;
mod attester_slashing;
mod beacon_block;
mod beacon_block_body;
mod beacon_block_header;
mod beacon_state;
mod chain_spec;
mod checkpoint;
mod crosslink;
mod deposit;
mod deposit_data;
mod eth1_data;
mod fork;
mod indexed_attestation;
mod keypair;
mod pending_attestation;
mod primitives;
mod proposer_slashing;
mod signing_root;
mod slot_epoch;
mod transfer;
mod validator;
mod voluntary_exit;

pub mod test_utils;

pub use attestation::Attestation;
pub use attestation_data::AttestationData;
pub use attester_slashing::AttesterSlashing;
pub use beacon_block::BeaconBlock;
pub use beacon_block_body::BeaconBlockBody;
pub use beacon_block_header::BeaconBlockHeader;
pub use beacon_state::{BeaconCommittee, BeaconState, BeaconStateError, RelativeEpoch};
pub use chain_spec::ChainSpec;
pub use checkpoint::Checkpoint;
pub use crosslink::Crosslink;
pub use deposit::Deposit;
pub use deposit_data::DepositData;
pub use eth1_data::Eth1Data;
pub use fork::Fork;
pub use indexed_attestation::IndexedAttestation;
pub use keypair::Keypair;
pub use pending_attestation::PendingAttestation;
pub use primitives::*;
pub use proposer_slashing::ProposerSlashing;
pub use signing_root::SignedRoot;
pub use slot_epoch::{Epoch, Slot};
pub use transfer::Transfer;
pub use validator::{Validator, FAR_FUTURE_EPOCH};
pub use voluntary_exit::VoluntaryExit;

pub use bls::{AggregateSignature, PublicKey, SecretKey, Signature};
pub use ethereum_types::H256;

pub use ssz_types::typenum::{self, Unsigned};
pub use ssz_types::{BitList, BitVector, FixedVector, VariableList};

/// Bound types for the SSZ collections in [`BeaconState`] and friends. Every bound named in the
/// data model is a power of two, so each has a named `typenum` constant.
pub mod bounds {
    use ssz_types::typenum::*;

    pub type SlotsPerHistoricalRoot = U8192;
    pub type EpochsPerHistoricalVector = U65536;
    pub type EpochsPerSlashingsVector = U8192;
    pub type ShardCount = U64;
    pub type HistoricalRootsLimit = U16777216;
    pub type ValidatorRegistryLimit = U1099511627776;
    pub type MaxValidatorsPerCommittee = U2048;
    pub type MaxProposerSlashings = U16;
    pub type MaxAttesterSlashings = U1;
    pub type MaxAttestations = U128;
    pub type MaxDeposits = U16;
    pub type MaxVoluntaryExits = U16;
    pub type MaxTransfers = U16;
    /// `SLOTS_PER_EPOCH * MAX_ATTESTATIONS`, the per-epoch pending-attestation cap.
    pub type MaxPendingAttestations = U8192;
    pub type SlotsPerEth1VotingPeriod = U1024;
    pub type JustificationBitsLength = U4;
    pub type DepositContractTreeDepth = U32;
}
