//! The abstract signer seam (`spec.md` §4.10: "signs via an abstract signer") plus the one
//! concrete implementation this crate ships: a local, in-memory keystore backed by
//! `slashing_protection`'s persisted history. A hardware/remote-signer integration would be a
//! second `Signer` impl behind the same trait, never touching this module.

use slashing_protection::{NotSafe, SlashingProtection};
use state_processing::compute_signing_root;
use std::collections::HashMap;
use tree_hash::TreeHash;
use types::{
    compute_domain, AttestationData, BeaconBlock, BlsAggregateSignature, BlsSignature, ChainSpec,
    Epoch, Keypair, PublicKey, SecretKey, SignedRoot,
};

#[derive(Debug, Clone, PartialEq)]
pub enum SignerError {
    UnknownPubkey,
    SlashingProtection(NotSafe),
}

impl From<NotSafe> for SignerError {
    fn from(e: NotSafe) -> Self {
        SignerError::SlashingProtection(e)
    }
}

/// Phase-0 scope: this workspace never models a fork transition (`Fork.current_version` never
/// diverges from `genesis_fork_version`), so every domain is computed against
/// `spec.genesis_fork_version` rather than a live `BeaconState`'s `fork` field, which a signer
/// deliberately has no access to.
pub trait Signer: Send + Sync {
    fn sign_randao_reveal(
        &self,
        pubkey: &PublicKey,
        epoch: Epoch,
        spec: &ChainSpec,
    ) -> Result<BlsSignature, SignerError>;

    /// Computes `block.signature` in place after checking slashing protection.
    fn sign_block(
        &self,
        pubkey: &PublicKey,
        block: &mut BeaconBlock,
        spec: &ChainSpec,
    ) -> Result<(), SignerError>;

    fn sign_attestation(
        &self,
        pubkey: &PublicKey,
        data: &AttestationData,
        spec: &ChainSpec,
    ) -> Result<BlsAggregateSignature, SignerError>;
}

pub struct LocalSigner {
    keys: HashMap<PublicKey, SecretKey>,
    protection: SlashingProtection,
}

impl LocalSigner {
    pub fn new(protection: SlashingProtection) -> Self {
        Self {
            keys: HashMap::new(),
            protection,
        }
    }

    /// Registers `keypair` with the slashing-protection database and makes it available to sign.
    /// Must be called before any `sign_*` call for this pubkey succeeds.
    pub fn add_keypair(&mut self, keypair: Keypair) -> Result<(), slashing_protection::Error> {
        self.protection.register_validator(&keypair.pk)?;
        self.keys.insert(keypair.pk, keypair.sk);
        Ok(())
    }

    pub fn pubkeys(&self) -> Vec<PublicKey> {
        self.keys.keys().cloned().collect()
    }

    fn secret_key(&self, pubkey: &PublicKey) -> Result<&SecretKey, SignerError> {
        self.keys.get(pubkey).ok_or(SignerError::UnknownPubkey)
    }
}

impl Signer for LocalSigner {
    fn sign_randao_reveal(
        &self,
        pubkey: &PublicKey,
        epoch: Epoch,
        spec: &ChainSpec,
    ) -> Result<BlsSignature, SignerError> {
        let sk = self.secret_key(pubkey)?;
        let domain = compute_domain(spec.domain_randao, spec.genesis_fork_version);
        let signing_root = compute_signing_root(epoch.tree_hash_root(), domain);
        Ok(sk.sign(signing_root.as_bytes()))
    }

    fn sign_block(
        &self,
        pubkey: &PublicKey,
        block: &mut BeaconBlock,
        spec: &ChainSpec,
    ) -> Result<(), SignerError> {
        let sk = self.secret_key(pubkey)?;
        let unsigned_root = block.signed_root();
        self.protection
            .check_and_insert_block_proposal(pubkey, block.slot, unsigned_root)?;

        let domain = compute_domain(spec.domain_beacon_proposer, spec.genesis_fork_version);
        let signing_root = compute_signing_root(unsigned_root, domain);
        block.signature = sk.sign(signing_root.as_bytes());
        Ok(())
    }

    fn sign_attestation(
        &self,
        pubkey: &PublicKey,
        data: &AttestationData,
        spec: &ChainSpec,
    ) -> Result<BlsAggregateSignature, SignerError> {
        let sk = self.secret_key(pubkey)?;
        self.protection.check_and_insert_attestation(pubkey, data)?;

        let domain = compute_domain(spec.domain_beacon_attester, spec.genesis_fork_version);
        let signing_root = compute_signing_root(data.tree_hash_root(), domain);
        let signature = sk.sign(signing_root.as_bytes());

        let mut aggregate = BlsAggregateSignature::infinity();
        aggregate.add_assign(&signature);
        Ok(aggregate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ChainSpec;

    fn signer_with_one_key() -> (LocalSigner, PublicKey) {
        let mut signer = LocalSigner::new(SlashingProtection::open_in_memory().unwrap());
        let keypair = Keypair::from_secret(SecretKey::random());
        let pubkey = keypair.pk.clone();
        signer.add_keypair(keypair).unwrap();
        (signer, pubkey)
    }

    #[test]
    fn refuses_a_second_different_block_at_the_same_slot() {
        let (signer, pubkey) = signer_with_one_key();
        let spec = ChainSpec::minimal();

        let mut first = BeaconBlock::empty(Epoch::new(0).start_slot(spec.slots_per_epoch), types::Hash256::zero());
        signer.sign_block(&pubkey, &mut first, &spec).unwrap();

        let mut second = first.clone();
        second.state_root = types::Hash256::repeat_byte(1);
        match signer.sign_block(&pubkey, &mut second, &spec) {
            Err(SignerError::SlashingProtection(NotSafe::DoubleBlockProposal { .. })) => {}
            other => panic!("expected DoubleBlockProposal, got {:?}", other),
        }
    }

    #[test]
    fn refuses_a_surrounding_attestation() {
        let (signer, pubkey) = signer_with_one_key();
        let spec = ChainSpec::minimal();

        let mut data = AttestationData::default();
        data.source.epoch = Epoch::new(1);
        data.target.epoch = Epoch::new(2);
        signer.sign_attestation(&pubkey, &data, &spec).unwrap();

        let mut surrounding = AttestationData::default();
        surrounding.source.epoch = Epoch::new(0);
        surrounding.target.epoch = Epoch::new(3);
        match signer.sign_attestation(&pubkey, &surrounding, &spec) {
            Err(SignerError::SlashingProtection(NotSafe::SurroundingVote { .. })) => {}
            other => panic!("expected SurroundingVote, got {:?}", other),
        }
    }
}
