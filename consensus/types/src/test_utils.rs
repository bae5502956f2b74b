//! Deterministic fixtures for unit and integration tests across the workspace: interop
//! keypairs and a minimal genesis-state builder. Not exposed outside `#[cfg(test)]`-style
//! consumers, but left un-gated so downstream crates' own test modules can depend on it too.

use crate::*;

/// `generate_deterministic_keypairs`: the first `n` interop keypairs, in index order.
pub fn generate_deterministic_keypairs(n: usize) -> Vec<Keypair> {
    (0..n)
        .map(|i| {
            let sk_bytes = eth2_interop_keypairs::keypair_sk_bytes(i);
            let sk = SecretKey::from_bytes(&sk_bytes).expect("interop scalar is below curve order");
            let pk = sk.public_key();
            Keypair { sk, pk }
        })
        .collect()
}

/// Builds a deposit (with a dummy, all-zero Merkle proof — only `genesis()` consumes these, and
/// genesis construction does not verify the eth1 Merkle branch) for each of `keypairs`, each
/// depositing `amount`.
pub fn generate_deposits(keypairs: &[Keypair], amount: Gwei) -> Vec<DepositData> {
    keypairs
        .iter()
        .map(|kp| {
            let mut withdrawal_credentials = Hash256::from_slice(&eth2_hashing::hash(&kp.pk.as_bytes()));
            withdrawal_credentials.as_bytes_mut()[0] = 0; // BLS_WITHDRAWAL_PREFIX_BYTE
            DepositData {
                pubkey: kp.pk.clone(),
                withdrawal_credentials,
                amount,
                signature: Signature::empty_signature(),
            }
        })
        .collect()
}

/// A ready-to-use genesis state over `validator_count` deterministic interop validators, each
/// funded at `MAX_EFFECTIVE_BALANCE` — the fixture used by the genesis-determinism test and by
/// every other crate's state-transition tests.
pub fn interop_genesis_state(validator_count: usize, spec: &ChainSpec) -> BeaconState {
    let keypairs = generate_deterministic_keypairs(validator_count);
    let deposits = generate_deposits(&keypairs, spec.max_effective_balance);
    let eth1_data = Eth1Data {
        deposit_root: Hash256::zero(),
        deposit_count: deposits.len() as u64,
        block_hash: Hash256::zero(),
    };
    BeaconState::genesis(0, eth1_data, &deposits, spec).expect("fixture deposits are non-empty")
}
