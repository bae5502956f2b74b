use ethereum_types::H256;

/// Shard and validator indices, committee indices and balances are plain `u64`s on the wire;
/// only `Slot`/`Epoch` get a newtype (see `slot_epoch.rs`) because they carry conversion
/// methods that would otherwise be easy to apply to the wrong unit.
pub type ShardNumber = u64;
pub type ValidatorIndex = u64;
pub type CommitteeIndex = u64;
pub type Gwei = u64;

pub type Hash256 = H256;
pub type Root = H256;

pub type BlsPubkey = bls::PublicKey;
pub type BlsSignature = bls::Signature;
/// The aggregate form used by `Attestation`/`IndexedAttestation`: one committee's signatures
/// summed into a single point.
pub type BlsAggregateSignature = bls::AggregateSignature;

/// A 4-byte SSZ fork version.
pub type ForkVersion = [u8; 4];

/// First operand of `compute_domain(domain_type, fork_version)`.
pub type DomainType = u32;
/// The output of `compute_domain`: `domain_type ∥ fork_version`.
pub type Domain = [u8; 32];

pub const DOMAIN_BEACON_PROPOSER: DomainType = 0;
pub const DOMAIN_BEACON_ATTESTER: DomainType = 1;
pub const DOMAIN_RANDAO: DomainType = 2;
pub const DOMAIN_DEPOSIT: DomainType = 3;
pub const DOMAIN_VOLUNTARY_EXIT: DomainType = 4;
pub const DOMAIN_TRANSFER: DomainType = 5;

/// `compute_domain(domain_type, fork_version) = domain_type ∥ fork_version ∥ 0…`, packed into
/// the 32-byte `Domain` used to build a signing root.
pub fn compute_domain(domain_type: DomainType, fork_version: ForkVersion) -> Domain {
    let mut domain = [0u8; 32];
    domain[0..4].copy_from_slice(&domain_type.to_le_bytes());
    domain[4..8].copy_from_slice(&fork_version);
    domain
}
