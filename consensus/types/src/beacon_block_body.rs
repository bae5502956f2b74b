use crate::bounds::{
    MaxAttestations, MaxAttesterSlashings, MaxDeposits, MaxProposerSlashings, MaxTransfers,
    MaxVoluntaryExits,
};
use crate::{
    Attestation, AttesterSlashing, BlsSignature, Deposit, Eth1Data, ProposerSlashing, Transfer,
    VariableList, VoluntaryExit,
};
use serde_derive::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

#[derive(Debug, Clone, PartialEq, Encode, Decode, TreeHash, Serialize, Deserialize)]
pub struct BeaconBlockBody {
    pub randao_reveal: BlsSignature,
    pub eth1_data: Eth1Data,
    pub graffiti: [u8; 32],
    pub proposer_slashings: VariableList<ProposerSlashing, MaxProposerSlashings>,
    pub attester_slashings: VariableList<AttesterSlashing, MaxAttesterSlashings>,
    pub attestations: VariableList<Attestation, MaxAttestations>,
    pub deposits: VariableList<Deposit, MaxDeposits>,
    pub voluntary_exits: VariableList<VoluntaryExit, MaxVoluntaryExits>,
    pub transfers: VariableList<Transfer, MaxTransfers>,
}

impl BeaconBlockBody {
    pub fn empty() -> Self {
        BeaconBlockBody {
            randao_reveal: BlsSignature::empty_signature(),
            eth1_data: Eth1Data::default(),
            graffiti: [0; 32],
            proposer_slashings: VariableList::empty(),
            attester_slashings: VariableList::empty(),
            attestations: VariableList::empty(),
            deposits: VariableList::empty(),
            voluntary_exits: VariableList::empty(),
            transfers: VariableList::empty(),
        }
    }
}
