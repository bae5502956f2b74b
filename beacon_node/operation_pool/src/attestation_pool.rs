use parking_lot::RwLock;
use std::collections::HashMap;
use tree_hash::TreeHash;
use types::{Attestation, Hash256, Slot};

/// Aggregates `Attestation`s by `AttestationData`. Two attestations covering the same data merge
/// via bitwise-OR of `aggregation_bits` and BLS aggregation of their signatures, as long as their
/// bits are disjoint — an insert whose bits overlap any prior contributor is rejected rather than
/// silently re-aggregating a signer twice.
#[derive(Default)]
pub struct AttestationPool {
    entries: RwLock<HashMap<Hash256, Attestation>>,
}

#[derive(Debug, PartialEq)]
pub enum InsertOutcome {
    New,
    Aggregated,
    Rejected,
}

impl AttestationPool {
    pub fn new() -> Self {
        AttestationPool::default()
    }

    pub fn insert(&self, attestation: Attestation) -> InsertOutcome {
        let key = attestation.data.tree_hash_root();
        let mut entries = self.entries.write();

        match entries.get_mut(&key) {
            Some(existing) => {
                if existing.aggregation_bits.intersects(&attestation.aggregation_bits) {
                    InsertOutcome::Rejected
                } else {
                    existing.aggregation_bits = existing.aggregation_bits.union(&attestation.aggregation_bits);
                    existing.signature.add_assign_aggregate(&attestation.signature);
                    InsertOutcome::Aggregated
                }
            }
            None => {
                entries.insert(key, attestation);
                InsertOutcome::New
            }
        }
    }

    /// Returns at most `max` aggregated attestations with `data.slot <= min_inclusion_slot`,
    /// preferring whichever has more attesters (used as the aggregate-balance proxy; the pool
    /// itself holds no validator-balance state to weigh contributors more precisely).
    pub fn peek_aggregated_attestations(&self, max: usize, min_inclusion_slot: Slot) -> Vec<Attestation> {
        let entries = self.entries.read();
        let mut candidates: Vec<&Attestation> = entries
            .values()
            .filter(|a| a.data.slot <= min_inclusion_slot)
            .collect();

        candidates.sort_by_key(|a| std::cmp::Reverse(a.aggregation_bits.num_set_bits()));
        candidates.into_iter().take(max).cloned().collect()
    }

    /// Drops every aggregate whose slot has fallen out of the current epoch's inclusion window.
    pub fn prune_below(&self, min_slot: Slot) {
        self.entries.write().retain(|_, a| a.data.slot >= min_slot);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::{bounds::MaxValidatorsPerCommittee, AttestationData, BitList, BlsAggregateSignature};

    fn attestation_with_bits(set_bits: &[usize]) -> Attestation {
        let mut bits: BitList<MaxValidatorsPerCommittee> = BitList::with_capacity(8).unwrap();
        for &i in set_bits {
            bits.set(i, true).unwrap();
        }
        Attestation {
            aggregation_bits: bits.clone(),
            data: AttestationData::default(),
            custody_bits: BitList::with_capacity(8).unwrap(),
            signature: BlsAggregateSignature::infinity(),
        }
    }

    #[test]
    fn disjoint_inserts_aggregate_into_one_entry() {
        let pool = AttestationPool::new();
        assert_eq!(pool.insert(attestation_with_bits(&[0, 1])), InsertOutcome::New);
        assert_eq!(pool.insert(attestation_with_bits(&[2, 3])), InsertOutcome::Aggregated);
        assert_eq!(pool.len(), 1);

        let merged = pool.peek_aggregated_attestations(10, Slot::new(0));
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].aggregation_bits.num_set_bits(), 4);
    }

    #[test]
    fn overlapping_insert_is_rejected() {
        let pool = AttestationPool::new();
        pool.insert(attestation_with_bits(&[0, 1]));
        assert_eq!(pool.insert(attestation_with_bits(&[1, 2])), InsertOutcome::Rejected);
        assert_eq!(pool.peek_aggregated_attestations(10, Slot::new(0))[0].aggregation_bits.num_set_bits(), 2);
    }

    #[test]
    fn peek_respects_inclusion_slot_and_max() {
        let pool = AttestationPool::new();
        let mut early = attestation_with_bits(&[0]);
        early.data.slot = Slot::new(1);
        let mut late = attestation_with_bits(&[1]);
        late.data.slot = Slot::new(100);

        pool.insert(early);
        pool.insert(late);

        let peeked = pool.peek_aggregated_attestations(10, Slot::new(5));
        assert_eq!(peeked.len(), 1);
        assert_eq!(peeked[0].data.slot, Slot::new(1));
    }
}
