use crate::{DomainType, Epoch, ForkVersion, Gwei, Slot};
use crate::{
    DOMAIN_BEACON_ATTESTER, DOMAIN_BEACON_PROPOSER, DOMAIN_DEPOSIT, DOMAIN_RANDAO,
    DOMAIN_TRANSFER, DOMAIN_VOLUNTARY_EXIT,
};

/// Every consensus constant the state-transition function and its helpers consult. Built
/// in-process rather than parsed from YAML; `mainnet()` matches the data model's normative
/// constants, `minimal()` shrinks the slow-to-test ones for unit tests.
#[derive(Debug, PartialEq, Clone)]
pub struct ChainSpec {
    /*
     * Misc
     */
    pub shard_count: u64,
    pub max_validators_per_committee: u64,
    pub min_per_epoch_churn_limit: u64,
    pub churn_limit_quotient: u64,
    pub shuffle_round_count: u8,

    /*
     * Gwei values
     */
    pub min_deposit_amount: u64,
    pub max_effective_balance: Gwei,
    pub ejection_balance: Gwei,
    pub effective_balance_increment: Gwei,

    /*
     * Initial values
     */
    pub genesis_slot: Slot,
    pub genesis_epoch: Epoch,
    pub bls_withdrawal_prefix_byte: u8,

    /*
     * Time parameters
     */
    pub min_attestation_inclusion_delay: u64,
    pub slots_per_epoch: u64,
    pub min_seed_lookahead: Epoch,
    pub activation_exit_delay: u64,
    pub slots_per_eth1_voting_period: u64,
    pub slots_per_historical_root: usize,
    pub min_validator_withdrawability_delay: Epoch,
    pub persistent_committee_period: u64,
    pub min_epochs_to_inactivity_penalty: u64,

    /*
     * State list lengths
     */
    pub epochs_per_historical_vector: usize,
    pub epochs_per_slashings_vector: usize,
    pub historical_roots_limit: u64,
    pub validator_registry_limit: u64,

    /*
     * Reward and penalty quotients
     */
    pub base_reward_factor: u64,
    pub whistleblower_reward_quotient: u64,
    pub proposer_reward_quotient: u64,
    pub inactivity_penalty_quotient: u64,
    pub min_slashing_penalty_quotient: u64,

    /*
     * Max operations per block
     */
    pub max_proposer_slashings: u32,
    pub max_attester_slashings: u32,
    pub max_attestations: u32,
    pub max_deposits: u32,
    pub max_voluntary_exits: u32,
    pub max_transfers: u32,

    /*
     * Fork choice / sync
     */
    pub backfill_threshold: u64,
    pub sync_batch_size: u64,

    /*
     * Signature domains
     */
    pub domain_beacon_proposer: u32,
    pub domain_beacon_attester: u32,
    pub domain_randao: u32,
    pub domain_deposit: u32,
    pub domain_voluntary_exit: u32,
    pub domain_transfer: u32,

    /*
     * Fork
     */
    pub genesis_fork_version: ForkVersion,
}

impl ChainSpec {
    /// Phase-0 mainnet constants as listed in the data model.
    pub fn mainnet() -> Self {
        Self {
            shard_count: 64,
            max_validators_per_committee: 2048,
            min_per_epoch_churn_limit: 4,
            churn_limit_quotient: 65536,
            shuffle_round_count: 90,

            min_deposit_amount: 1_000_000_000,
            max_effective_balance: 32_000_000_000,
            ejection_balance: 16_000_000_000,
            effective_balance_increment: 1_000_000_000,

            genesis_slot: Slot::new(0),
            genesis_epoch: Epoch::new(0),
            bls_withdrawal_prefix_byte: 0,

            min_attestation_inclusion_delay: 1,
            slots_per_epoch: 64,
            min_seed_lookahead: Epoch::new(1),
            activation_exit_delay: 4,
            slots_per_eth1_voting_period: 1024,
            slots_per_historical_root: 8192,
            min_validator_withdrawability_delay: Epoch::new(256),
            persistent_committee_period: 2048,
            min_epochs_to_inactivity_penalty: 4,

            epochs_per_historical_vector: 65536,
            epochs_per_slashings_vector: 8192,
            historical_roots_limit: 16_777_216,
            validator_registry_limit: 1_099_511_627_776,

            base_reward_factor: 64,
            whistleblower_reward_quotient: 512,
            proposer_reward_quotient: 8,
            inactivity_penalty_quotient: 2u64.pow(25),
            min_slashing_penalty_quotient: 32,

            max_proposer_slashings: 16,
            max_attester_slashings: 1,
            max_attestations: 128,
            max_deposits: 16,
            max_voluntary_exits: 16,
            max_transfers: 16,

            backfill_threshold: 64,
            sync_batch_size: 64,

            domain_beacon_proposer: DOMAIN_BEACON_PROPOSER,
            domain_beacon_attester: DOMAIN_BEACON_ATTESTER,
            domain_randao: DOMAIN_RANDAO,
            domain_deposit: DOMAIN_DEPOSIT,
            domain_voluntary_exit: DOMAIN_VOLUNTARY_EXIT,
            domain_transfer: DOMAIN_TRANSFER,

            genesis_fork_version: [0; 4],
        }
    }

    /// Shrinks the constants that make mainnet slow to exercise in tests (epoch length,
    /// committee size, historical vector lengths); everything else matches `mainnet()`.
    pub fn minimal() -> Self {
        let mut spec = Self::mainnet();

        spec.shard_count = 8;
        spec.max_validators_per_committee = 2048;
        spec.slots_per_epoch = 8;
        spec.slots_per_historical_root = 64;
        spec.epochs_per_historical_vector = 64;
        spec.epochs_per_slashings_vector = 64;
        spec.slots_per_eth1_voting_period = 16;
        spec.persistent_committee_period = 128;
        spec.min_validator_withdrawability_delay = Epoch::new(256);

        spec
    }

    /// The correct signature domain for `domain_type`, independent of fork (see
    /// `compute_domain`).
    pub fn get_domain_type(&self, domain_type: DomainType) -> u32 {
        domain_type
    }
}

impl Default for ChainSpec {
    fn default() -> Self {
        ChainSpec::mainnet()
    }
}
