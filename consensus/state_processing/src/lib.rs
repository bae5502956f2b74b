//! The state-transition function: `process_slots` / `per_block_processing` /
//! `per_epoch_processing`, composed by [`per_slot_processing::state_transition`] into the total,
//! deterministic `(pre_state, signed_block) -> post_state` map the rest of the workspace treats
//! as ground truth.
//!
//! Nothing here performs I/O. Every fallible step returns a `Result` describing exactly which
//! predicate failed; the pre-state is never mutated observably on an `Err` path because callers
//! always operate on a scratch clone (see `beacon_chain`'s use of `BeaconState::clone()`).

mod common;
mod errors;
mod per_block_processing;
mod per_epoch_processing;
mod per_slot_processing;

pub use common::{
    compute_signing_root, get_attesting_indices, get_indexed_attestation, initiate_validator_exit,
    is_slashable_validator, slash_validator, xor,
};
pub use errors::{BlockProcessingError, EpochProcessingError, SlotProcessingError};
pub use per_block_processing::{
    per_block_processing, process_attestations, process_attester_slashings, process_block_header,
    process_deposits, process_eth1_data, process_proposer_slashings, process_randao,
    process_transfers, process_voluntary_exits, BlockSignatureStrategy,
};
pub use per_epoch_processing::per_epoch_processing;
pub use per_slot_processing::{per_slot_processing, process_slots, state_transition};
