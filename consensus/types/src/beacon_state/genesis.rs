use super::BeaconState;
use crate::*;

#[derive(Debug, PartialEq, Clone)]
pub enum GenesisError {
    NoDeposits,
    State(BeaconStateError),
}

impl From<BeaconStateError> for GenesisError {
    fn from(e: BeaconStateError) -> Self {
        GenesisError::State(e)
    }
}

impl BeaconState {
    /// `initialize_beacon_state_from_eth1`: builds a genesis state by replaying `deposits`
    /// against an otherwise-empty state, then immediately activating every validator funded at
    /// `MAX_EFFECTIVE_BALANCE` (the real deposit-contract crawl is out of scope; callers hand us
    /// the deposit list directly).
    pub fn genesis(
        genesis_time: u64,
        eth1_data: Eth1Data,
        deposits: &[DepositData],
        spec: &ChainSpec,
    ) -> Result<Self, GenesisError> {
        if deposits.is_empty() {
            return Err(GenesisError::NoDeposits);
        }

        let fork = Fork {
            previous_version: spec.genesis_fork_version,
            current_version: spec.genesis_fork_version,
            epoch: spec.genesis_epoch,
        };

        let mut state = BeaconState {
            genesis_time,
            slot: spec.genesis_slot,
            fork,
            latest_block_header: BeaconBlockHeader {
                slot: spec.genesis_slot,
                parent_root: Hash256::zero(),
                state_root: Hash256::zero(),
                body_root: BeaconBlockBody::empty().tree_hash_root(),
                signature: Signature::empty_signature(),
            },
            block_roots: FixedVector::from_elem(Hash256::zero()),
            state_roots: FixedVector::from_elem(Hash256::zero()),
            historical_roots: VariableList::empty(),

            eth1_data: eth1_data.clone(),
            eth1_data_votes: VariableList::empty(),
            eth1_deposit_index: 0,

            validators: VariableList::empty(),
            balances: VariableList::empty(),

            randao_mixes: FixedVector::from_elem(eth1_data.block_hash),
            start_shard: 0,

            previous_epoch_attestations: VariableList::empty(),
            current_epoch_attestations: VariableList::empty(),

            previous_crosslinks: FixedVector::from_elem(Crosslink::genesis(0, spec.genesis_epoch)),
            current_crosslinks: FixedVector::from_elem(Crosslink::genesis(0, spec.genesis_epoch)),

            justification_bits: BitVector::new(),
            previous_justified_checkpoint: Checkpoint::default(),
            current_justified_checkpoint: Checkpoint::default(),
            finalized_checkpoint: Checkpoint::default(),

            slashings: FixedVector::from_elem(0),

            active_index_roots: FixedVector::from_elem(Hash256::zero()),
            compact_committees_roots: FixedVector::from_elem(Hash256::zero()),
        };

        // Fix up per-shard genesis crosslinks: `FixedVector::from_elem` above shares the shard-0
        // value across every slot, so rewrite each entry with its own shard number.
        for (shard, crosslink) in state.previous_crosslinks.iter_mut().enumerate() {
            *crosslink = Crosslink::genesis(shard as u64, spec.genesis_epoch);
        }
        for (shard, crosslink) in state.current_crosslinks.iter_mut().enumerate() {
            *crosslink = Crosslink::genesis(shard as u64, spec.genesis_epoch);
        }

        for deposit in deposits {
            state.process_genesis_deposit(deposit, spec)?;
        }

        for index in 0..state.validators.len() {
            let effective_balance = state.validators[index].effective_balance;
            if effective_balance >= spec.max_effective_balance {
                let v = &mut state.validators[index];
                v.activation_eligibility_epoch = spec.genesis_epoch;
                v.activation_epoch = spec.genesis_epoch;
            }
        }

        Ok(state)
    }

    /// Applies one genesis deposit: push a new validator, or top up an existing one's balance
    /// if the pubkey has already deposited.
    fn process_genesis_deposit(
        &mut self,
        deposit: &DepositData,
        spec: &ChainSpec,
    ) -> Result<(), GenesisError> {
        let existing = self
            .validators
            .iter()
            .position(|v| v.pubkey == deposit.pubkey);

        match existing {
            Some(index) => {
                self.balances[index] = self.balances[index].saturating_add(deposit.amount);
            }
            None => {
                let effective_balance = std::cmp::min(
                    deposit.amount - (deposit.amount % spec.effective_balance_increment),
                    spec.max_effective_balance,
                );
                self.validators
                    .push(Validator {
                        pubkey: deposit.pubkey.clone(),
                        withdrawal_credentials: deposit.withdrawal_credentials,
                        effective_balance,
                        slashed: false,
                        activation_eligibility_epoch: FAR_FUTURE_EPOCH,
                        activation_epoch: FAR_FUTURE_EPOCH,
                        exit_epoch: FAR_FUTURE_EPOCH,
                        withdrawable_epoch: FAR_FUTURE_EPOCH,
                    })
                    .map_err(BeaconStateError::from)?;
                self.balances
                    .push(deposit.amount)
                    .map_err(BeaconStateError::from)?;
            }
        }
        Ok(())
    }
}
