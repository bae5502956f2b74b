//! The validator duties engine, `spec.md` §4.10: given the observable state (reached through
//! `traits::BeaconNodeDuties`, an abstraction over the paired beacon node's REST contract), track
//! each local validator's per-epoch duties and drive block/attestation production against them at
//! the right tick, signing via an abstract `Signer` that enforces slashing protection.

pub mod attestation_service;
pub mod block_service;
pub mod config;
pub mod duties;
pub mod signer;
pub mod traits;

pub use attestation_service::AttestationService;
pub use block_service::BlockService;
pub use config::Config;
pub use duties::{DutiesManager, PollOutcome};
pub use signer::{LocalSigner, Signer};
pub use traits::{BeaconNodeDuties, BeaconNodeError};

use slog::Logger;
use slot_clock::SlotClock;
use std::sync::Arc;
use types::{ChainSpec, PublicKey, Slot};

/// Wires a `DutiesManager`, `BlockService` and `AttestationService` together against one paired
/// beacon node and one local `Signer`. A real binary owns one of these per validator set and
/// drives `on_slot_tick`/`on_attestation_tick` from its own slot clock timer; this struct performs
/// no scheduling itself.
pub struct Validator<T: SlotClock, N: BeaconNodeDuties, S: Signer> {
    duties: Arc<DutiesManager<T, N>>,
    block_service: BlockService<T, N, S>,
    attestation_service: AttestationService<T, N, S>,
}

impl<T: SlotClock, N: BeaconNodeDuties, S: Signer> Validator<T, N, S> {
    pub fn new(
        pubkeys: Vec<PublicKey>,
        spec: Arc<ChainSpec>,
        slot_clock: Arc<T>,
        beacon_node: Arc<N>,
        signer: Arc<S>,
        log: Logger,
    ) -> Self {
        let duties = Arc::new(DutiesManager::new(
            pubkeys,
            spec.clone(),
            slot_clock,
            beacon_node.clone(),
        ));
        let block_service = BlockService::new(
            duties.clone(),
            beacon_node.clone(),
            signer.clone(),
            spec.clone(),
            log.clone(),
        );
        let attestation_service =
            AttestationService::new(duties.clone(), beacon_node, signer, spec, log);
        Self {
            duties,
            block_service,
            attestation_service,
        }
    }

    /// Refreshes `duties` for the current epoch. Call once per epoch (or more often — a poll
    /// that returns `NoChange` for every tracked pubkey is a no-op).
    pub fn poll_duties(&self) -> Result<Vec<(PublicKey, PollOutcome)>, duties::Error> {
        self.duties.poll()
    }

    pub fn on_slot_tick(&self, slot: Slot) -> Vec<(PublicKey, Result<(), block_service::Error>)> {
        self.block_service.on_slot_tick(slot)
    }

    pub fn on_attestation_tick(
        &self,
        slot: Slot,
    ) -> Vec<(PublicKey, Result<(), attestation_service::Error>)> {
        self.attestation_service.on_attestation_tick(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_chain::MemoryBeaconChain;
    use http_api::BeaconChainHandler;
    use slashing_protection::SlashingProtection;
    use slot_clock::TestingSlotClock;
    use std::time::Duration;
    use types::test_utils::{generate_deterministic_keypairs, interop_genesis_state};

    fn chain_and_keys() -> (MemoryBeaconChain<TestingSlotClock>, Vec<types::Keypair>) {
        let spec = ChainSpec::minimal();
        let keypairs = generate_deterministic_keypairs(8);
        let state = interop_genesis_state(8, &spec);
        let clock = TestingSlotClock::new(
            spec.genesis_slot,
            Duration::from_secs(0),
            Duration::from_secs(6),
        );
        let chain = beacon_chain::from_genesis_memory(state, clock, spec, logging::test_logger())
            .unwrap();
        (chain, keypairs)
    }

    #[test]
    fn proposer_for_genesis_slot_publishes_an_importable_block() {
        let (chain, keypairs) = chain_and_keys();
        let handler = BeaconChainHandler {
            chain: &chain,
            syncing: false,
            genesis_time: 0,
            version: "test".to_string(),
        };

        let mut signer = LocalSigner::new(SlashingProtection::open_in_memory().unwrap());
        for kp in &keypairs {
            signer.add_keypair(kp.clone()).unwrap();
        }

        let pubkeys: Vec<_> = keypairs.iter().map(|kp| kp.pk.clone()).collect();
        let spec = Arc::new(chain.spec.clone());
        let slot_clock = Arc::new(TestingSlotClock::new(
            spec.genesis_slot,
            Duration::from_secs(0),
            Duration::from_secs(6),
        ));
        let validator = Validator::new(
            pubkeys,
            spec.clone(),
            slot_clock,
            Arc::new(handler),
            Arc::new(signer),
            logging::test_logger(),
        );

        validator.poll_duties().expect("poll should succeed");
        let next_slot = chain.spec.genesis_slot + 1;
        let outcomes = validator.on_slot_tick(next_slot);
        assert!(
            outcomes.iter().any(|(_, r)| r.is_ok()),
            "expected exactly one local validator to be proposer for slot 1: {:?}",
            outcomes
        );
    }
}
