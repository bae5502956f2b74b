//! Per-block processing: the header/RANDAO/eth1-data steps plus the six operation lists in
//! `BeaconBlockBody`, applied in data-model order.

mod attestations;
mod attester_slashings;
mod block_header;
mod deposits;
mod eth1_data;
mod proposer_slashings;
mod randao;
mod transfers;
mod voluntary_exits;

pub use attestations::process_attestations;
pub use attester_slashings::process_attester_slashings;
pub use block_header::process_block_header;
pub use deposits::process_deposits;
pub use eth1_data::process_eth1_data;
pub use proposer_slashings::process_proposer_slashings;
pub use randao::process_randao;
pub use transfers::process_transfers;
pub use voluntary_exits::process_voluntary_exits;

use crate::errors::BlockProcessingError as Error;
use types::{BeaconBlock, BeaconState, ChainSpec};

/// How much BLS verification `per_block_processing` performs. `VerifyIndividual` and `VerifyBulk`
/// both check every signature and differ only in strategy (one-at-a-time vs a single batched
/// aggregate check) — callers pick `VerifyBulk` when processing a range of already-canonical
/// blocks where batching pays for itself. `NoVerification` skips every BLS check outright and is
/// only ever used together with `bls`'s `fake_crypto` feature, for large-scale test harnesses that
/// cannot afford real pairings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockSignatureStrategy {
    VerifyIndividual,
    VerifyBulk,
    NoVerification,
}

impl BlockSignatureStrategy {
    fn verify(self) -> bool {
        !matches!(self, BlockSignatureStrategy::NoVerification)
    }
}

/// Applies one block to `state`, which must already be at `block.slot` (the caller is expected to
/// have run [`crate::process_slots`] first). Mutates `state` in place; on `Err` the caller's scratch
/// clone should be discarded rather than reused, since individual operations may have partially
/// applied before the failing one was reached.
pub fn per_block_processing(
    state: &mut BeaconState,
    block: &BeaconBlock,
    signature_strategy: BlockSignatureStrategy,
    spec: &ChainSpec,
) -> Result<(), Error> {
    process_block_header(state, block, signature_strategy, spec)?;
    process_randao(state, block, signature_strategy, spec)?;
    process_eth1_data(state, &block.body.eth1_data, spec)?;
    process_operations(state, block, signature_strategy, spec)?;
    Ok(())
}

fn process_operations(
    state: &mut BeaconState,
    block: &BeaconBlock,
    signature_strategy: BlockSignatureStrategy,
    spec: &ChainSpec,
) -> Result<(), Error> {
    let body = &block.body;

    if body.proposer_slashings.len() > spec.max_proposer_slashings as usize {
        return Err(Error::TooManyOperations("proposer_slashings"));
    }
    if body.attester_slashings.len() > spec.max_attester_slashings as usize {
        return Err(Error::TooManyOperations("attester_slashings"));
    }
    if body.attestations.len() > spec.max_attestations as usize {
        return Err(Error::TooManyOperations("attestations"));
    }
    if body.deposits.len() > spec.max_deposits as usize {
        return Err(Error::TooManyOperations("deposits"));
    }
    if body.voluntary_exits.len() > spec.max_voluntary_exits as usize {
        return Err(Error::TooManyOperations("voluntary_exits"));
    }
    if body.transfers.len() > spec.max_transfers as usize {
        return Err(Error::TooManyOperations("transfers"));
    }

    process_proposer_slashings(state, &body.proposer_slashings, signature_strategy, spec)?;
    process_attester_slashings(state, &body.attester_slashings, signature_strategy, spec)?;
    process_attestations(state, &body.attestations, signature_strategy, spec)?;
    process_deposits(state, &body.deposits, spec)?;
    process_voluntary_exits(state, &body.voluntary_exits, signature_strategy, spec)?;
    process_transfers(state, &body.transfers, signature_strategy, spec)?;

    Ok(())
}
