use super::BlockSignatureStrategy;
use crate::common::{compute_signing_root, xor};
use crate::errors::BlockProcessingError as Error;
use tree_hash::TreeHash;
use types::{BeaconBlock, BeaconState, ChainSpec};

/// `process_randao`: verifies `randao_reveal` signs the current epoch, then mixes it into
/// `randao_mixes` via XOR with the still-unrevealed mix it displaces.
pub fn process_randao(
    state: &mut BeaconState,
    block: &BeaconBlock,
    signature_strategy: BlockSignatureStrategy,
    spec: &ChainSpec,
) -> Result<(), Error> {
    let epoch = state.current_epoch(spec);

    if signature_strategy.verify() {
        let proposer_index = state.get_beacon_proposer_index(spec)?;
        let proposer = state.get_validator(proposer_index)?;

        let domain = state.get_domain(epoch, spec.domain_randao);
        let signing_root = compute_signing_root(epoch.tree_hash_root(), domain);
        if !block
            .body
            .randao_reveal
            .verify(signing_root.as_bytes(), &proposer.pubkey)
        {
            return Err(Error::BadRandaoSignature);
        }
    }

    let mix = xor(
        state.get_randao_mix(epoch),
        types::Hash256::from_slice(&eth2_hashing::hash(&block.body.randao_reveal.as_bytes())),
    );
    let len = state.randao_mixes.len() as u64;
    state.randao_mixes[(epoch.as_u64() % len) as usize] = mix;

    Ok(())
}
