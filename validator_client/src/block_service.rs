//! Block production, `spec.md` §4.10: "At slot tick `s`: if any local validator is proposer at
//! `s`, build a block ..., sign via the abstract signer with domain `BEACON_PROPOSER`, then
//! publish." Driven by an external tick (a real binary wires this to its slot clock's timer);
//! nothing in this module schedules itself.

use crate::duties::DutiesManager;
use crate::signer::{Signer, SignerError};
use crate::traits::{BeaconNodeDuties, BeaconNodeError};
use slog::{error, info, Logger};
use slot_clock::SlotClock;
use std::sync::Arc;
use types::{ChainSpec, PublicKey, Slot};

#[derive(Debug, PartialEq)]
pub enum Error {
    BeaconNode(BeaconNodeError),
    Signer(SignerError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for Error {}

impl From<BeaconNodeError> for Error {
    fn from(e: BeaconNodeError) -> Self {
        Error::BeaconNode(e)
    }
}

impl From<SignerError> for Error {
    fn from(e: SignerError) -> Self {
        Error::Signer(e)
    }
}

pub struct BlockService<T: SlotClock, N: BeaconNodeDuties, S: Signer> {
    duties: Arc<DutiesManager<T, N>>,
    beacon_node: Arc<N>,
    signer: Arc<S>,
    spec: Arc<ChainSpec>,
    log: Logger,
}

impl<T: SlotClock, N: BeaconNodeDuties, S: Signer> BlockService<T, N, S> {
    pub fn new(
        duties: Arc<DutiesManager<T, N>>,
        beacon_node: Arc<N>,
        signer: Arc<S>,
        spec: Arc<ChainSpec>,
        log: Logger,
    ) -> Self {
        Self {
            duties,
            beacon_node,
            signer,
            spec,
            log,
        }
    }

    /// Called once per slot. Produces, signs and publishes a block for every local validator
    /// whose recorded proposer duty is `slot` — in practice at most one, since only one proposer
    /// exists per slot, but we don't assume the caller deduplicated `pubkeys`.
    pub fn on_slot_tick(&self, slot: Slot) -> Vec<(PublicKey, Result<(), Error>)> {
        let epoch = slot.epoch(self.spec.slots_per_epoch);
        let mut results = Vec::new();

        for pubkey in self.duties.pubkeys() {
            let duty = match self.duties.duty(pubkey, epoch) {
                Some(d) if d.proposal_slot == Some(slot) => d,
                _ => continue,
            };
            let _ = duty;
            let outcome = self.produce_and_publish(pubkey, slot);
            if let Err(ref e) = outcome {
                error!(self.log, "block production failed"; "pubkey" => ?pubkey, "slot" => slot.as_u64(), "error" => ?e);
            } else {
                info!(self.log, "published block"; "pubkey" => ?pubkey, "slot" => slot.as_u64());
            }
            results.push((pubkey.clone(), outcome));
        }
        results
    }

    fn produce_and_publish(&self, pubkey: &PublicKey, slot: Slot) -> Result<(), Error> {
        let epoch = slot.epoch(self.spec.slots_per_epoch);
        let randao_reveal = self.signer.sign_randao_reveal(pubkey, epoch, &self.spec)?;
        let mut block = self.beacon_node.produce_block(slot, randao_reveal)?;
        self.signer.sign_block(pubkey, &mut block, &self.spec)?;
        self.beacon_node.publish_block(block)?;
        Ok(())
    }
}
