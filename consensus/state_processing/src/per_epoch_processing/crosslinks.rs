use super::util::{get_matching_source_attestations, get_unslashed_attesting_indices};
use crate::errors::EpochProcessingError as Error;
use tree_hash::TreeHash;
use types::{BeaconState, ChainSpec, Crosslink, Epoch, PendingAttestation, ValidatorIndex};

/// `process_crosslinks`: for each shard, finds whichever proposed `Crosslink` the previous and
/// current epoch's attestations most agree on, and promotes it into `current_crosslinks` if it
/// has supermajority support.
pub fn process_crosslinks(state: &mut BeaconState, spec: &ChainSpec) -> Result<(), Error> {
    state.previous_crosslinks = state.current_crosslinks.clone();

    let previous_epoch = state.previous_epoch(spec);
    let current_epoch = state.current_epoch(spec);

    for epoch in [previous_epoch, current_epoch] {
        for shard in 0..spec.shard_count {
            let (winning_crosslink, attesting_indices) =
                winning_crosslink_and_attesting_indices(state, epoch, shard, spec)?;

            let attesting_balance = state.get_total_balance(&attesting_indices)?;
            let total_active_balance = state.get_total_active_balance(spec)?;
            if attesting_balance.saturating_mul(3) >= total_active_balance.saturating_mul(2) {
                state.current_crosslinks[shard as usize] = winning_crosslink;
            }
        }
    }

    Ok(())
}

/// `get_winning_crosslink_and_attesting_indices`: among this epoch's attestations for `shard`
/// that validly extend the still-canonical crosslink, the one with the most attesting balance
/// (ties broken by the lexicographically greatest `data_root`).
fn winning_crosslink_and_attesting_indices(
    state: &BeaconState,
    epoch: Epoch,
    shard: u64,
    spec: &ChainSpec,
) -> Result<(Crosslink, Vec<ValidatorIndex>), Error> {
    let current_root = state.current_crosslinks[shard as usize].tree_hash_root();

    let candidates: Vec<&PendingAttestation> = get_matching_source_attestations(state, epoch, spec)?
        .iter()
        .filter(|a| {
            a.data.crosslink.shard == shard
                && (a.data.crosslink.parent_root == current_root
                    || a.data.crosslink.tree_hash_root() == current_root)
        })
        .collect();

    let mut best: Option<(Crosslink, Vec<&PendingAttestation>)> = None;
    let mut seen = std::collections::BTreeSet::new();
    for attestation in &candidates {
        let crosslink = attestation.data.crosslink.clone();
        let root = crosslink.tree_hash_root();
        if !seen.insert(root) {
            continue;
        }

        let supporters: Vec<&PendingAttestation> = candidates
            .iter()
            .copied()
            .filter(|a| a.data.crosslink == crosslink)
            .collect();
        let balance = get_unslashed_attesting_indices(state, &supporters, spec)?;
        let balance_sum = state.get_total_balance(&balance)?;

        let replace = match &best {
            None => true,
            Some((best_crosslink, best_supporters)) => {
                let best_balance =
                    state.get_total_balance(&get_unslashed_attesting_indices(state, best_supporters, spec)?)?;
                balance_sum > best_balance
                    || (balance_sum == best_balance && root > best_crosslink.tree_hash_root())
            }
        };
        if replace {
            best = Some((crosslink, supporters));
        }
    }

    match best {
        Some((crosslink, supporters)) => {
            Ok((crosslink, get_unslashed_attesting_indices(state, &supporters, spec)?))
        }
        None => Ok((state.current_crosslinks[shard as usize].clone(), vec![])),
    }
}
