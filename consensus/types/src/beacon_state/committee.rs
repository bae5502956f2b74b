use super::{BeaconState, BeaconStateError as Error};
use crate::{ChainSpec, Domain, DomainType, Epoch, Gwei, Hash256, Slot, ValidatorIndex};
use safe_arith::{SafeArith, SaturatingGweiArith};
use swap_or_not_shuffle::compute_shuffled_index;

/// The committee assigned to `(slot, index)`: its member indices plus enough context to check an
/// attestation's committee-index bound and to derive its crosslink shard.
#[derive(Debug, Clone, PartialEq)]
pub struct BeaconCommittee {
    pub slot: Slot,
    pub index: u64,
    pub committee: Vec<ValidatorIndex>,
}

impl BeaconState {
    /// `get_active_validator_indices(state, epoch)`.
    pub fn get_active_validator_indices(&self, epoch: Epoch) -> Vec<ValidatorIndex> {
        self.validators
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_active_at(epoch))
            .map(|(i, _)| i as ValidatorIndex)
            .collect()
    }

    /// `get_total_balance(indices)`: saturating sum of effective balances, never below 1 Gwei
    /// so downstream divisions never hit `DivisionByZero`.
    pub fn get_total_balance(&self, indices: &[ValidatorIndex]) -> Result<Gwei, Error> {
        let mut total: Gwei = 0;
        for &i in indices {
            let validator = self.get_validator(i)?;
            total = total.saturating_add_gwei(validator.effective_balance);
        }
        Ok(total.max(1))
    }

    /// `get_total_active_balance(state)`.
    pub fn get_total_active_balance(&self, spec: &ChainSpec) -> Result<Gwei, Error> {
        let epoch = self.current_epoch(spec);
        let active = self.get_active_validator_indices(epoch);
        self.get_total_balance(&active)
    }

    /// `get_randao_mix(state, epoch)`.
    pub fn get_randao_mix(&self, epoch: Epoch) -> Hash256 {
        let len = self.randao_mixes.len() as u64;
        self.randao_mixes[(epoch.as_u64() % len) as usize]
    }

    /// `get_seed(state, epoch, domain_type)`: mixes the domain type, epoch and a randao mix
    /// sampled `MIN_SEED_LOOKAHEAD` epochs in the past (via the historical-vector wraparound) so
    /// the seed is unknown far enough ahead to resist proposer manipulation.
    pub fn get_seed(
        &self,
        epoch: Epoch,
        domain_type: DomainType,
        spec: &ChainSpec,
    ) -> Result<Hash256, Error> {
        let vector_len = spec.epochs_per_historical_vector as u64;
        let lookback = epoch
            .as_u64()
            .safe_add(vector_len)?
            .safe_sub(spec.min_seed_lookahead.as_u64())?
            .safe_sub(1)?;
        let mix = self.get_randao_mix(Epoch::new(lookback % vector_len));

        let mut input = Vec::with_capacity(4 + 8 + 32);
        input.extend_from_slice(&int_to_bytes::int_to_bytes4(domain_type));
        input.extend_from_slice(&int_to_bytes::int_to_bytes8(epoch.as_u64()));
        input.extend_from_slice(mix.as_bytes());

        Ok(Hash256::from_slice(&eth2_hashing::hash(&input)))
    }

    /// `get_domain(state, domain_type, epoch)` with an explicit epoch rather than current.
    pub fn get_domain_for_epoch(&self, domain_type: DomainType, epoch: Epoch) -> Domain {
        self.get_domain(epoch, domain_type)
    }

    /// `compute_committee(indices, seed, index, count)`: shuffle the full index list once, then
    /// slice the `index`-th of `count` equal partitions.
    pub fn compute_committee(
        indices: &[ValidatorIndex],
        seed: Hash256,
        index: u64,
        count: u64,
        spec: &ChainSpec,
    ) -> Result<Vec<ValidatorIndex>, Error> {
        let len = indices.len();
        if len == 0 || count == 0 {
            return Ok(vec![]);
        }
        let start = (len as u64).safe_mul(index)?.safe_div(count)? as usize;
        let end = (len as u64).safe_mul(index.safe_add(1)?)?.safe_div(count)? as usize;

        let mut committee = Vec::with_capacity(end.saturating_sub(start));
        for i in start..end {
            let shuffled = compute_shuffled_index(i, len, seed.as_bytes(), spec.shuffle_round_count)?;
            committee.push(indices[shuffled]);
        }
        Ok(committee)
    }

    /// `get_committee_count_at_slot`: committees active in `epoch`, clamped to `[1,
    /// shard_count]` so every shard gets at most one committee per slot.
    pub fn get_committee_count(&self, epoch: Epoch, spec: &ChainSpec) -> Result<u64, Error> {
        let active_count = self.get_active_validator_indices(epoch).len() as u64;
        let per_slot = active_count
            .safe_div(spec.slots_per_epoch)?
            .safe_div(spec.max_validators_per_committee)?;
        Ok(per_slot.max(1).min(spec.shard_count))
    }

    /// `get_beacon_committee(state, slot, index)`.
    pub fn get_beacon_committee(
        &self,
        slot: Slot,
        index: u64,
        spec: &ChainSpec,
    ) -> Result<BeaconCommittee, Error> {
        let epoch = slot.epoch(spec.slots_per_epoch);
        let committees_per_slot = self.get_committee_count(epoch, spec)?;
        if index >= committees_per_slot {
            return Err(Error::ShardOutOfBounds);
        }

        let indices = self.get_active_validator_indices(epoch);
        let seed = self.get_seed(epoch, spec.domain_beacon_attester, spec)?;

        let slots_per_epoch = spec.slots_per_epoch;
        let slot_in_epoch = slot.as_u64() % slots_per_epoch;
        let committee_index = slot_in_epoch
            .safe_mul(committees_per_slot)?
            .safe_add(index)?;
        let count = committees_per_slot.safe_mul(slots_per_epoch)?;

        let committee = Self::compute_committee(&indices, seed, committee_index, count, spec)?;
        Ok(BeaconCommittee {
            slot,
            index,
            committee,
        })
    }

    /// `get_crosslink_committee(state, epoch, shard)`: the one committee (if any, among this
    /// epoch's committees) assigned to `shard`.
    pub fn get_crosslink_committee(
        &self,
        epoch: Epoch,
        shard: u64,
        spec: &ChainSpec,
    ) -> Result<Vec<ValidatorIndex>, Error> {
        let start_slot = epoch.start_slot(spec.slots_per_epoch);
        for slot_offset in 0..spec.slots_per_epoch {
            let slot = start_slot + slot_offset;
            let committees_per_slot = self.get_committee_count(epoch, spec)?;
            for index in 0..committees_per_slot {
                let committee = self.get_beacon_committee(slot, index, spec)?;
                let assigned_shard =
                    (self.start_shard + slot_offset * committees_per_slot + index) % spec.shard_count;
                if assigned_shard == shard {
                    return Ok(committee.committee);
                }
            }
        }
        Err(Error::ShardOutOfBounds)
    }

    /// `get_beacon_proposer_index(state)`: effective-balance-weighted rejection sampling over
    /// the current slot's shuffled active set.
    pub fn get_beacon_proposer_index(&self, spec: &ChainSpec) -> Result<ValidatorIndex, Error> {
        let epoch = self.current_epoch(spec);
        let indices = self.get_active_validator_indices(epoch);
        if indices.is_empty() {
            return Err(Error::InsufficientValidators);
        }

        let seed_base = self.get_seed(epoch, spec.domain_beacon_proposer, spec)?;
        let mut input = seed_base.as_bytes().to_vec();
        input.extend_from_slice(&int_to_bytes::int_to_bytes8(self.slot.as_u64()));
        let seed = eth2_hashing::hash(&input);

        let total = indices.len();
        let mut i = 0u64;
        loop {
            let shuffled_index =
                compute_shuffled_index((i % total as u64) as usize, total, &seed, spec.shuffle_round_count)?;
            let candidate = indices[shuffled_index];
            let validator = self.get_validator(candidate)?;

            let mut random_input = seed.clone();
            random_input.extend_from_slice(&int_to_bytes::int_to_bytes8(i.safe_div(32)?));
            let random_byte = eth2_hashing::hash(&random_input)[(i % 32) as usize];

            if validator
                .effective_balance
                .safe_mul(255)?
                >= spec.max_effective_balance.safe_mul(random_byte as u64)?
            {
                return Ok(candidate);
            }
            i = i.safe_add(1)?;
        }
    }
}
