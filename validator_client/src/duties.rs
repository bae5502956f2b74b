//! Polls the paired beacon node for each local validator's per-epoch duties and tracks what
//! changed, the way the teacher's `duties::DutiesManager` does — generalized from one pubkey
//! polled at a time to the batched `validator_duties` call `http_api` actually exposes.

use crate::traits::{BeaconNodeDuties, BeaconNodeError};
use http_api::ValidatorDuty;
use parking_lot::RwLock;
use slot_clock::SlotClock;
use std::collections::HashMap;
use std::sync::Arc;
use types::{ChainSpec, Epoch, PublicKey};

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum PollOutcome {
    NoChange,
    NewDuties,
    DutiesChanged,
}

#[derive(Debug, PartialEq)]
pub enum Error {
    SlotUnknowable,
    BeaconNode(BeaconNodeError),
}

impl From<BeaconNodeError> for Error {
    fn from(e: BeaconNodeError) -> Self {
        Error::BeaconNode(e)
    }
}

type DutiesMap = HashMap<(PublicKey, Epoch), ValidatorDuty>;

pub struct DutiesManager<T: SlotClock, N: BeaconNodeDuties> {
    duties_map: Arc<RwLock<DutiesMap>>,
    pubkeys: Vec<PublicKey>,
    spec: Arc<ChainSpec>,
    slot_clock: Arc<T>,
    beacon_node: Arc<N>,
}

impl<T: SlotClock, N: BeaconNodeDuties> DutiesManager<T, N> {
    pub fn new(
        pubkeys: Vec<PublicKey>,
        spec: Arc<ChainSpec>,
        slot_clock: Arc<T>,
        beacon_node: Arc<N>,
    ) -> Self {
        Self {
            duties_map: Arc::new(RwLock::new(HashMap::new())),
            pubkeys,
            spec,
            slot_clock,
            beacon_node,
        }
    }

    /// Fetches duties for the current epoch and reports, per pubkey, whether they're new,
    /// changed, or unchanged since the last poll.
    pub fn poll(&self) -> Result<Vec<(PublicKey, PollOutcome)>, Error> {
        let slot = self.slot_clock.now().ok_or(Error::SlotUnknowable)?;
        let epoch = slot.epoch(self.spec.slots_per_epoch);

        let duties = self
            .beacon_node
            .validator_duties(epoch, self.pubkeys.clone())?;

        let mut map = self.duties_map.write();
        let mut outcomes = Vec::with_capacity(duties.len());
        for duty in duties {
            let key = (duty.pubkey.clone(), epoch);
            let outcome = match map.get(&key) {
                Some(known) if *known == duty => PollOutcome::NoChange,
                Some(_) => PollOutcome::DutiesChanged,
                None => PollOutcome::NewDuties,
            };
            outcomes.push((duty.pubkey.clone(), outcome));
            map.insert(key, duty);
        }
        Ok(outcomes)
    }

    /// The duty recorded for `pubkey` at `epoch` by the most recent `poll`, if any.
    pub fn duty(&self, pubkey: &PublicKey, epoch: Epoch) -> Option<ValidatorDuty> {
        self.duties_map.read().get(&(pubkey.clone(), epoch)).cloned()
    }

    pub fn pubkeys(&self) -> &[PublicKey] {
        &self.pubkeys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_api::ApiError;
    use std::time::Duration;
    use types::{BeaconBlock, BlsSignature, Slot};

    struct FixedDuties(Vec<ValidatorDuty>);

    impl BeaconNodeDuties for FixedDuties {
        fn validator_duties(
            &self,
            _epoch: Epoch,
            _pubkeys: Vec<PublicKey>,
        ) -> Result<Vec<ValidatorDuty>, BeaconNodeError> {
            Ok(self.0.clone())
        }
        fn produce_block(
            &self,
            _slot: Slot,
            _randao_reveal: BlsSignature,
        ) -> Result<BeaconBlock, BeaconNodeError> {
            Err(BeaconNodeError::from(ApiError::NotSynced))
        }
        fn publish_block(&self, _block: BeaconBlock) -> Result<(), BeaconNodeError> {
            Err(BeaconNodeError::from(ApiError::NotSynced))
        }
        fn produce_attestation_data(
            &self,
            _slot: Slot,
            _committee_index: types::CommitteeIndex,
        ) -> Result<types::AttestationData, BeaconNodeError> {
            Err(BeaconNodeError::from(ApiError::NotSynced))
        }
        fn publish_attestation(&self, _attestation: types::Attestation) -> Result<(), BeaconNodeError> {
            Err(BeaconNodeError::from(ApiError::NotSynced))
        }
    }

    fn manager(duties: Vec<ValidatorDuty>) -> DutiesManager<slot_clock::TestingSlotClock, FixedDuties> {
        use slot_clock::SlotClock;
        let spec = Arc::new(ChainSpec::minimal());
        let clock = Arc::new(slot_clock::TestingSlotClock::new(
            spec.genesis_slot,
            Duration::from_secs(0),
            Duration::from_secs(6),
        ));
        let pubkeys = duties.iter().map(|d| d.pubkey.clone()).collect();
        DutiesManager::new(pubkeys, spec, clock, Arc::new(FixedDuties(duties)))
    }

    fn duty(
        pubkey: PublicKey,
        attestation_slot: Slot,
        committee_length: u64,
        position_in_committee: u64,
    ) -> ValidatorDuty {
        ValidatorDuty {
            pubkey,
            proposal_slot: None,
            attestation_slot,
            committee_index: 0,
            committee_length,
            position_in_committee,
        }
    }

    #[test]
    fn first_poll_reports_new_duties_then_no_change() {
        let pubkey = types::Keypair::from_secret(types::SecretKey::random()).pk;
        let m = manager(vec![duty(pubkey, Slot::new(3), 128, 0)]);

        let first = m.poll().unwrap();
        assert_eq!(first[0].1, PollOutcome::NewDuties);

        let second = m.poll().unwrap();
        assert_eq!(second[0].1, PollOutcome::NoChange);
    }
}
