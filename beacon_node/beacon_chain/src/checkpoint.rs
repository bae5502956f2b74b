use types::{BeaconBlock, BeaconState, Hash256};

/// A block paired with the state it produced, addressed by both roots. Lighthouse calls this a
/// `CheckPoint`; it is the unit `BeaconChain` swaps atomically whenever the canonical head moves.
#[derive(Debug, Clone)]
pub struct CheckPoint {
    pub beacon_block: BeaconBlock,
    pub beacon_block_root: Hash256,
    pub beacon_state: BeaconState,
    pub beacon_state_root: Hash256,
}

impl CheckPoint {
    pub fn new(
        beacon_block: BeaconBlock,
        beacon_block_root: Hash256,
        beacon_state: BeaconState,
        beacon_state_root: Hash256,
    ) -> Self {
        CheckPoint {
            beacon_block,
            beacon_block_root,
            beacon_state,
            beacon_state_root,
        }
    }
}
