//! Attestation production, `spec.md` §4.10: "for each local attester whose duty slot is `s`,
//! build the `AttestationData` from the head, sign with domain `ATTESTATION`, publish." The spec
//! schedules this at "`s + SLOTS_PER_EPOCH/2` (mid-slot)" — read literally that's many slots
//! late, which contradicts the parenthetical; we take the parenthetical as authoritative and
//! fire this at the wall-clock midpoint of slot `s` itself (see `DESIGN.md`), so a real binary
//! schedules `on_attestation_tick` half a slot duration after each slot starts rather than at a
//! slot offset.

use crate::duties::DutiesManager;
use crate::signer::{Signer, SignerError};
use crate::traits::{BeaconNodeDuties, BeaconNodeError};
use slog::{error, info, Logger};
use slot_clock::SlotClock;
use std::sync::Arc;
use types::{BitList, ChainSpec, PublicKey, Slot};

#[derive(Debug, PartialEq)]
pub enum Error {
    BeaconNode(BeaconNodeError),
    Signer(SignerError),
    CommitteeTooSmall,
}

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

pub struct AttestationService<T: SlotClock, N: BeaconNodeDuties, S: Signer> {
    duties: Arc<DutiesManager<T, N>>,
    beacon_node: Arc<N>,
    signer: Arc<S>,
    spec: Arc<ChainSpec>,
    log: Logger,
}

impl<T: SlotClock, N: BeaconNodeDuties, S: Signer> AttestationService<T, N, S> {
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

    /// Called once per slot, at the wall-clock midpoint of that slot. Produces, signs and
    /// publishes an attestation for every local validator whose recorded attester duty is `slot`.
    pub fn on_attestation_tick(&self, slot: Slot) -> Vec<(PublicKey, Result<(), Error>)> {
        let epoch = slot.epoch(self.spec.slots_per_epoch);
        let mut results = Vec::new();

        for pubkey in self.duties.pubkeys() {
            let duty = match self.duties.duty(pubkey, epoch) {
                Some(d) if d.attestation_slot == slot => d,
                _ => continue,
            };

            let outcome = self.produce_sign_and_publish(
                pubkey,
                slot,
                duty.committee_index,
                duty.committee_length,
                duty.position_in_committee,
            );
            if let Err(ref e) = outcome {
                error!(self.log, "attestation production failed"; "pubkey" => ?pubkey, "slot" => slot.as_u64(), "error" => ?e);
            } else {
                info!(self.log, "published attestation"; "pubkey" => ?pubkey, "slot" => slot.as_u64());
            }
            results.push((pubkey.clone(), outcome));
        }
        results
    }

    fn produce_sign_and_publish(
        &self,
        pubkey: &PublicKey,
        slot: Slot,
        committee_index: types::CommitteeIndex,
        committee_length: u64,
        position_in_committee: u64,
    ) -> Result<(), Error> {
        if position_in_committee >= committee_length {
            return Err(Error::CommitteeTooSmall);
        }

        let data = self
            .beacon_node
            .produce_attestation_data(slot, committee_index)?;
        let signature = self.signer.sign_attestation(pubkey, &data, &self.spec)?;

        let mut aggregation_bits = BitList::with_capacity(committee_length as usize)
            .map_err(|_| Error::CommitteeTooSmall)?;
        aggregation_bits
            .set(position_in_committee as usize, true)
            .map_err(|_| Error::CommitteeTooSmall)?;
        let custody_bits = BitList::with_capacity(committee_length as usize)
            .map_err(|_| Error::CommitteeTooSmall)?;

        let attestation = types::Attestation {
            aggregation_bits,
            data,
            custody_bits,
            signature,
        };
        self.beacon_node.publish_attestation(attestation)?;
        Ok(())
    }
}
