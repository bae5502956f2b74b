use crate::errors::BlockProcessingError as Error;
use types::{BeaconState, ChainSpec, Eth1Data};

/// `process_eth1_data`: records the block's eth1 vote, and adopts it as `state.eth1_data` once a
/// majority of the voting period has voted for the same value.
pub fn process_eth1_data(
    state: &mut BeaconState,
    eth1_data: &Eth1Data,
    spec: &ChainSpec,
) -> Result<(), Error> {
    state.eth1_data_votes.push(eth1_data.clone())?;

    let matching_votes = state
        .eth1_data_votes
        .iter()
        .filter(|vote| *vote == eth1_data)
        .count();

    if (matching_votes as u64).saturating_mul(2) > spec.slots_per_eth1_voting_period {
        state.eth1_data = eth1_data.clone();
    }

    Ok(())
}
