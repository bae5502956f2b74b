//! The beacon chain: single-writer owner of the block/state store, fork-choice, operation pools
//! and the observable state processor (`spec.md` §4.5-§4.7, §5).

mod beacon_chain;
mod checkpoint;
mod errors;
mod observation;

pub use crate::beacon_chain::{from_genesis_memory, BeaconChain, MemoryBeaconChain};
pub use checkpoint::CheckPoint;
pub use errors::BeaconChainError;
pub use observation::{Observation, ObservationBus, SubscriptionPolicy, Subscription};

#[cfg(test)]
mod tests {
    use super::*;
    use slot_clock::{SlotClock, TestingSlotClock};
    use std::time::Duration;
    use types::{test_utils::interop_genesis_state, ChainSpec};

    fn chain() -> MemoryBeaconChain<TestingSlotClock> {
        let spec = ChainSpec::minimal();
        let state = interop_genesis_state(8, &spec);
        let clock = TestingSlotClock::new(
            spec.genesis_slot,
            Duration::from_secs(0),
            Duration::from_secs(6),
        );
        from_genesis_memory(state, clock, spec, logging::test_logger()).unwrap()
    }

    #[test]
    fn genesis_chain_has_itself_as_head() {
        let chain = chain();
        let head = chain.canonical_head();
        assert_eq!(head.beacon_block_root, chain.head_root());
        assert_eq!(head.beacon_block.slot, chain.spec.genesis_slot);
    }

    #[test]
    fn produced_block_is_importable() {
        let chain = chain();
        let next_slot = chain.spec.genesis_slot + 1;
        let block = chain
            .produce_block(next_slot, types::BlsSignature::empty_signature(), [0; 32])
            .expect("block production should succeed");

        let root = chain.process_block(block).expect("produced block should import");
        assert_eq!(chain.head_root(), root);
    }

    #[test]
    fn block_with_unknown_parent_is_buffered_not_rejected_permanently() {
        let chain = chain();
        let next_slot = chain.spec.genesis_slot + 2;
        let mut orphan = chain
            .produce_block(next_slot, types::BlsSignature::empty_signature(), [0; 32])
            .unwrap();
        orphan.parent_root = types::Hash256::repeat_byte(0xff);

        match chain.process_block(orphan) {
            Err(BeaconChainError::UnknownParent(_)) => {}
            other => panic!("expected UnknownParent, got {:?}", other),
        }
    }
}
