use super::BlockSignatureStrategy;
use crate::common::compute_signing_root;
use crate::errors::BlockProcessingError as Error;
use tree_hash::TreeHash;
use types::{BeaconBlock, BeaconState, ChainSpec, SignedRoot};

/// `process_block_header`: checks `block.slot`/`parent_root` against the pre-state, records the
/// block's (state-root-zeroed) header as `state.latest_block_header`, and verifies the proposer
/// hasn't been slashed and signed the block.
pub fn process_block_header(
    state: &mut BeaconState,
    block: &BeaconBlock,
    signature_strategy: BlockSignatureStrategy,
    spec: &ChainSpec,
) -> Result<(), Error> {
    if block.slot != state.slot {
        return Err(Error::InvalidSlot {
            block: block.slot.as_u64(),
            state: state.slot.as_u64(),
        });
    }

    if block.parent_root != state.latest_block_header.canonical_root() {
        return Err(Error::InvalidParentRoot);
    }

    state.latest_block_header = block.temporary_block_header();

    let proposer_index = state.get_beacon_proposer_index(spec)?;
    let proposer = state.get_validator(proposer_index)?;
    if proposer.slashed {
        return Err(Error::ProposerSlashed(proposer_index));
    }

    if signature_strategy.verify() {
        let domain = state.get_domain(state.current_epoch(spec), spec.domain_beacon_proposer);
        let signing_root = compute_signing_root(block.signed_root(), domain);
        if !block.signature.verify(signing_root.as_bytes(), &proposer.pubkey) {
            return Err(Error::InvalidProposerSignature);
        }
    }

    Ok(())
}
