//! The observable state processor (`spec.md` §4.7): on every accepted block or slot tick,
//! `BeaconChain` derives `(head block, latest slot state, pending operation pool summary)` and
//! publishes it here. `bus::Bus` gives every subscriber its own bounded queue so a slow reader
//! never blocks the writer.

use bus::{Bus, BusReader};
use parking_lot::Mutex;
use types::{BeaconBlock, BeaconState, Hash256, Slot};

/// A published snapshot. `pending_attestation_count`/`pending_proposer_slashing_count` stand in
/// for the full operation pool — subscribers that need the operations themselves go back to
/// `BeaconChain::op_pool` directly; the bus only needs to be comparable for the monotonicity
/// property (`spec.md` §8: "non-decreasing in `(finalized_epoch, slot, head_root)`").
#[derive(Debug, Clone)]
pub struct Observation {
    pub head_block: BeaconBlock,
    pub head_block_root: Hash256,
    pub latest_slot_state: BeaconState,
    pub finalized_epoch: types::Epoch,
    pub pending_attestation_count: usize,
}

impl Observation {
    fn key(&self) -> (types::Epoch, Slot, Hash256) {
        (self.finalized_epoch, self.latest_slot_state.slot, self.head_block_root)
    }
}

/// Per-subscriber behaviour when its queue is full. `Coalesce` drops the oldest queued
/// observation to make room for the newest (the subscriber only ever cares about the latest
/// state); `DropWhenFull` discards the new observation instead, so a subscriber that must see
/// every transition notices gaps rather than silently skipping to the newest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionPolicy {
    Coalesce,
    DropWhenFull,
}

/// One subscriber's queue plus its overflow policy.
pub struct Subscription {
    reader: BusReader<Observation>,
    policy: SubscriptionPolicy,
}

impl Subscription {
    /// The most recent observation available, applying this subscription's overflow policy:
    /// `Coalesce` drains the queue and returns only the newest; `DropWhenFull` returns the oldest
    /// still-queued entry (the bus itself already dropped anything that overflowed its capacity).
    pub fn poll(&mut self) -> Option<Observation> {
        let mut latest = None;
        loop {
            match self.reader.try_recv() {
                Ok(observation) => {
                    latest = Some(observation);
                    if self.policy == SubscriptionPolicy::DropWhenFull {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
        latest
    }
}

/// Publisher side: owned by `BeaconChain`, fed one `Observation` per accepted block or slot tick.
pub struct ObservationBus {
    bus: Mutex<Bus<Observation>>,
    last: Mutex<Option<(types::Epoch, Slot, Hash256)>>,
}

impl ObservationBus {
    pub fn new(capacity: usize) -> Self {
        ObservationBus {
            bus: Mutex::new(Bus::new(capacity)),
            last: Mutex::new(None),
        }
    }

    pub fn subscribe(&self, policy: SubscriptionPolicy) -> Subscription {
        Subscription {
            reader: self.bus.lock().add_rx(),
            policy,
        }
    }

    /// Publishes `observation` if it is not older, in `(finalized_epoch, slot, head_root)` order,
    /// than the last one published — the monotonicity property `spec.md` §8 requires.
    pub fn publish(&self, observation: Observation) {
        let key = observation.key();
        let mut last = self.last.lock();
        if last.map_or(false, |l| key < l) {
            return;
        }
        *last = Some(key);
        let _ = self.bus.lock().try_broadcast(observation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::{BeaconBlock, ChainSpec};

    fn observation(finalized_epoch: u64, slot: u64) -> Observation {
        let spec = ChainSpec::minimal();
        let state = types::test_utils::interop_genesis_state(4, &spec);
        Observation {
            head_block: BeaconBlock::empty(Slot::new(slot), Hash256::zero()),
            head_block_root: Hash256::repeat_byte(slot as u8),
            latest_slot_state: state,
            finalized_epoch: types::Epoch::new(finalized_epoch),
            pending_attestation_count: 0,
        }
    }

    #[test]
    fn coalescing_subscriber_sees_only_latest() {
        let bus = ObservationBus::new(8);
        let mut sub = bus.subscribe(SubscriptionPolicy::Coalesce);

        bus.publish(observation(0, 1));
        bus.publish(observation(0, 2));
        bus.publish(observation(0, 3));

        let latest = sub.poll().unwrap();
        assert_eq!(latest.latest_slot_state.slot, Slot::new(3));
        assert!(sub.poll().is_none());
    }

    #[test]
    fn regressing_observation_is_dropped() {
        let bus = ObservationBus::new(8);
        let mut sub = bus.subscribe(SubscriptionPolicy::DropWhenFull);

        bus.publish(observation(1, 10));
        bus.publish(observation(0, 20)); // lower finalized_epoch, must not publish

        let seen = sub.poll().unwrap();
        assert_eq!(seen.finalized_epoch, types::Epoch::new(1));
        assert!(sub.poll().is_none());
    }
}
