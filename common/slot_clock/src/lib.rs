//! Wall-clock-to-slot conversion (`compute_slots_since_genesis` and friends), factored out of
//! the state-transition so it can be mocked in tests without faking
//! `SystemTime`.

use parking_lot::RwLock;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use types::Slot;

pub trait SlotClock: Send + Sync + Sized {
    /// Creates a clock anchored at `genesis_slot`/`genesis_duration` (time since the unix epoch),
    /// ticking every `slot_duration`.
    fn new(genesis_slot: Slot, genesis_duration: Duration, slot_duration: Duration) -> Self;

    /// The current slot, or `None` if called before genesis.
    fn now(&self) -> Option<Slot>;

    /// Duration since the start of `now()`'s slot.
    fn now_duration(&self) -> Option<Duration>;

    /// Wall-clock duration until the start of `slot`. `None` if `slot` has already started.
    fn duration_to_slot(&self, slot: Slot) -> Option<Duration>;

    fn slot_duration(&self) -> Duration;

    fn genesis_duration(&self) -> Duration;

    /// The slot at `duration` since the unix epoch, or `None` if `duration` precedes genesis.
    fn slot_of(&self, duration: Duration) -> Option<Slot>;
}

/// A `SlotClock` backed by `SystemTime`. Used by every long-running process; `TestingSlotClock`
/// is used wherever tests need to move the clock without sleeping.
pub struct SystemTimeSlotClock {
    genesis_slot: Slot,
    genesis_duration: Duration,
    slot_duration: Duration,
}

impl SlotClock for SystemTimeSlotClock {
    fn new(genesis_slot: Slot, genesis_duration: Duration, slot_duration: Duration) -> Self {
        Self {
            genesis_slot,
            genesis_duration,
            slot_duration,
        }
    }

    fn now(&self) -> Option<Slot> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH).ok()?;
        self.slot_of(now)
    }

    fn now_duration(&self) -> Option<Duration> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH).ok()?;
        let slot = self.slot_of(now)?;
        let slot_start = self.start_of(slot)?;
        now.checked_sub(slot_start)
    }

    fn duration_to_slot(&self, slot: Slot) -> Option<Duration> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH).ok()?;
        let start = self.start_of(slot)?;
        start.checked_sub(now)
    }

    fn slot_duration(&self) -> Duration {
        self.slot_duration
    }

    fn genesis_duration(&self) -> Duration {
        self.genesis_duration
    }

    fn slot_of(&self, duration: Duration) -> Option<Slot> {
        let since_genesis = duration.checked_sub(self.genesis_duration)?;
        let slots_since_genesis = since_genesis.as_millis() / self.slot_duration.as_millis();
        Some(self.genesis_slot + slots_since_genesis as u64)
    }
}

impl SystemTimeSlotClock {
    fn start_of(&self, slot: Slot) -> Option<Duration> {
        let slots_since_genesis = slot.as_u64().checked_sub(self.genesis_slot.as_u64())?;
        self.genesis_duration
            .checked_add(self.slot_duration * slots_since_genesis as u32)
    }
}

/// A clock whose "current slot" can be set directly. Every method otherwise behaves as if wall
/// time were frozen at that slot, so deterministic tests never race a real clock tick.
pub struct TestingSlotClock {
    current_slot: RwLock<Slot>,
    genesis_duration: Duration,
    slot_duration: Duration,
}

impl TestingSlotClock {
    pub fn set_slot(&self, slot: u64) {
        *self.current_slot.write() = Slot::new(slot);
    }
}

impl SlotClock for TestingSlotClock {
    fn new(genesis_slot: Slot, genesis_duration: Duration, slot_duration: Duration) -> Self {
        Self {
            current_slot: RwLock::new(genesis_slot),
            genesis_duration,
            slot_duration,
        }
    }

    fn now(&self) -> Option<Slot> {
        Some(*self.current_slot.read())
    }

    fn now_duration(&self) -> Option<Duration> {
        Some(Duration::from_secs(0))
    }

    fn duration_to_slot(&self, slot: Slot) -> Option<Duration> {
        let current = *self.current_slot.read();
        if slot > current {
            Some(self.slot_duration * (slot - current).as_u64() as u32)
        } else {
            None
        }
    }

    fn slot_duration(&self) -> Duration {
        self.slot_duration
    }

    fn genesis_duration(&self) -> Duration {
        self.genesis_duration
    }

    fn slot_of(&self, _duration: Duration) -> Option<Slot> {
        Some(*self.current_slot.read())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_of_before_genesis_is_none() {
        let clock = SystemTimeSlotClock::new(
            Slot::new(0),
            Duration::from_secs(1_000_000),
            Duration::from_secs(12),
        );
        assert_eq!(clock.slot_of(Duration::from_secs(0)), None);
    }

    #[test]
    fn slot_of_advances_with_time() {
        let clock = SystemTimeSlotClock::new(Slot::new(0), Duration::from_secs(0), Duration::from_secs(12));
        assert_eq!(clock.slot_of(Duration::from_secs(0)), Some(Slot::new(0)));
        assert_eq!(clock.slot_of(Duration::from_secs(11)), Some(Slot::new(0)));
        assert_eq!(clock.slot_of(Duration::from_secs(12)), Some(Slot::new(1)));
        assert_eq!(clock.slot_of(Duration::from_secs(100)), Some(Slot::new(8)));
    }

    #[test]
    fn testing_clock_set_slot() {
        let clock = TestingSlotClock::new(Slot::new(0), Duration::from_secs(0), Duration::from_secs(12));
        clock.set_slot(42);
        assert_eq!(clock.now(), Some(Slot::new(42)));
    }
}
