use crate::error::Error;
use std::collections::HashMap;
use types::{Epoch, Hash256, Slot};

/// One DAG node: a known block plus the bookkeeping LMD-GHOST needs to decide whether it's
/// still a viable head candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtoNode {
    pub root: Hash256,
    pub parent: Option<usize>,
    pub slot: Slot,
    pub justified_epoch: Epoch,
    pub finalized_epoch: Epoch,
    /// Balance attached directly to this block by the latest-message rule (not including
    /// descendants' weight — `subtree_weight` below sums that in).
    pub weight: u64,
    pub children: Vec<usize>,
}

/// The block DAG fork-choice walks: a flat node arena plus a root-to-index lookup, so parent
/// links and weight updates are index operations rather than pointer chasing.
#[derive(Debug, Clone)]
pub struct ProtoArray {
    nodes: Vec<ProtoNode>,
    indices: HashMap<Hash256, usize>,
    pub justified_epoch: Epoch,
    pub finalized_epoch: Epoch,
}

impl ProtoArray {
    /// A fresh array rooted at the finalized block — the only node with no parent.
    pub fn new(justified_epoch: Epoch, finalized_epoch: Epoch, finalized_root: Hash256, finalized_slot: Slot) -> Self {
        let root_node = ProtoNode {
            root: finalized_root,
            parent: None,
            slot: finalized_slot,
            justified_epoch,
            finalized_epoch,
            weight: 0,
            children: vec![],
        };
        let mut indices = HashMap::new();
        indices.insert(finalized_root, 0);

        ProtoArray {
            nodes: vec![root_node],
            indices,
            justified_epoch,
            finalized_epoch,
        }
    }

    pub fn contains_block(&self, root: &Hash256) -> bool {
        self.indices.contains_key(root)
    }

    pub fn node(&self, root: &Hash256) -> Option<&ProtoNode> {
        self.indices.get(root).map(|&i| &self.nodes[i])
    }

    /// `on_block`: links a new node under its already-known parent.
    pub fn on_block(
        &mut self,
        root: Hash256,
        parent_root: Hash256,
        slot: Slot,
        justified_epoch: Epoch,
        finalized_epoch: Epoch,
    ) -> Result<(), Error> {
        if self.indices.contains_key(&root) {
            return Err(Error::BlockAlreadyKnown(root));
        }
        let parent_index = *self
            .indices
            .get(&parent_root)
            .ok_or(Error::ParentUnknown(parent_root))?;

        let index = self.nodes.len();
        self.nodes.push(ProtoNode {
            root,
            parent: Some(parent_index),
            slot,
            justified_epoch,
            finalized_epoch,
            weight: 0,
            children: vec![],
        });
        self.nodes[parent_index].children.push(index);
        self.indices.insert(root, index);

        Ok(())
    }

    /// Adds `delta` (positive or negative) to the balance directly attached to `root`.
    pub fn apply_weight_delta(&mut self, root: &Hash256, delta: i64) -> Result<(), Error> {
        let index = *self.indices.get(root).ok_or(Error::NodeUnknown(*root))?;
        let node = &mut self.nodes[index];
        node.weight = if delta.is_negative() {
            node.weight.saturating_sub(delta.unsigned_abs())
        } else {
            node.weight.saturating_add(delta as u64)
        };
        Ok(())
    }

    pub fn update_justified_and_finalized(&mut self, justified_epoch: Epoch, finalized_epoch: Epoch) {
        self.justified_epoch = justified_epoch;
        self.finalized_epoch = finalized_epoch;
    }

    /// `get_ancestor(root, slot)`: walks parent links from `root` until reaching `slot`
    /// (returning `root` itself if it's already at or before `slot`).
    pub fn get_ancestor(&self, root: Hash256, slot: Slot) -> Result<Hash256, Error> {
        let mut index = *self.indices.get(&root).ok_or(Error::NodeUnknown(root))?;
        loop {
            let node = &self.nodes[index];
            if node.slot <= slot {
                return Ok(node.root);
            }
            match node.parent {
                Some(parent) => index = parent,
                None => return Ok(node.root),
            }
        }
    }

    /// Per `spec.md` §4.6's LMD-GHOST: from `justified_root`, repeatedly descend into the
    /// child with the greatest subtree weight among those still compatible with the current
    /// justified/finalized view, breaking ties by lexicographically greater root.
    pub fn find_head(&self, justified_root: Hash256) -> Result<Hash256, Error> {
        let start = *self
            .indices
            .get(&justified_root)
            .ok_or(Error::JustifiedNodeUnknown(justified_root))?;

        let subtree_weight = self.subtree_weights();

        let mut current = start;
        loop {
            let viable_children: Vec<usize> = self.nodes[current]
                .children
                .iter()
                .copied()
                .filter(|&child| self.is_viable(child))
                .collect();

            if viable_children.is_empty() {
                return Ok(self.nodes[current].root);
            }

            current = *viable_children
                .iter()
                .max_by(|&&a, &&b| {
                    subtree_weight[a]
                        .cmp(&subtree_weight[b])
                        .then_with(|| self.nodes[a].root.cmp(&self.nodes[b].root))
                })
                .expect("viable_children is non-empty");
        }
    }

    /// A node is viable as a head-search hop if it shares the array's current
    /// justified/finalized view, or is the genesis/finalized root itself.
    fn is_viable(&self, index: usize) -> bool {
        let node = &self.nodes[index];
        (node.justified_epoch == self.justified_epoch || self.justified_epoch == Epoch::new(0))
            && (node.finalized_epoch == self.finalized_epoch || self.finalized_epoch == Epoch::new(0))
    }

    /// Post-order sum of each node's own weight plus every descendant's, indexed the same as
    /// `self.nodes`.
    fn subtree_weights(&self) -> Vec<u64> {
        let mut totals = vec![0u64; self.nodes.len()];
        // Children are always pushed after their parent, so a reverse pass visits every child
        // before its parent without explicit recursion.
        for index in (0..self.nodes.len()).rev() {
            let own = self.nodes[index].weight;
            let children_total: u64 = self.nodes[index]
                .children
                .iter()
                .map(|&c| totals[c])
                .sum();
            totals[index] = own.saturating_add(children_total);
        }
        totals
    }

    /// Drops every node that isn't the new finalized root or a descendant of it, reindexing the
    /// arena from scratch. Called once finality advances past a node's `keep_root`.
    pub fn prune(&mut self, finalized_root: Hash256) -> Result<(), Error> {
        let finalized_index = *self
            .indices
            .get(&finalized_root)
            .ok_or(Error::NodeUnknown(finalized_root))?;

        let mut keep = vec![false; self.nodes.len()];
        let mut stack = vec![finalized_index];
        while let Some(index) = stack.pop() {
            keep[index] = true;
            stack.extend(self.nodes[index].children.iter().copied());
        }

        let mut remap = HashMap::new();
        let mut new_nodes = Vec::new();
        for (old_index, node) in self.nodes.iter().enumerate() {
            if keep[old_index] {
                remap.insert(old_index, new_nodes.len());
                new_nodes.push(node.clone());
            }
        }

        for node in &mut new_nodes {
            node.parent = node.parent.and_then(|p| remap.get(&p).copied());
            node.children = node
                .children
                .iter()
                .filter_map(|c| remap.get(c).copied())
                .collect();
        }

        self.indices = new_nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.root, i))
            .collect();
        self.nodes = new_nodes;

        if let Some(root_node) = self.nodes.first_mut() {
            root_node.parent = None;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(byte: u8) -> Hash256 {
        Hash256::repeat_byte(byte)
    }

    #[test]
    fn heaviest_child_wins() {
        let mut array = ProtoArray::new(Epoch::new(0), Epoch::new(0), hash(0), Slot::new(0));
        array
            .on_block(hash(1), hash(0), Slot::new(1), Epoch::new(0), Epoch::new(0))
            .unwrap();
        array
            .on_block(hash(2), hash(0), Slot::new(1), Epoch::new(0), Epoch::new(0))
            .unwrap();

        array.apply_weight_delta(&hash(1), 10).unwrap();
        array.apply_weight_delta(&hash(2), 20).unwrap();

        assert_eq!(array.find_head(hash(0)).unwrap(), hash(2));
    }

    #[test]
    fn ties_break_on_greater_root() {
        let mut array = ProtoArray::new(Epoch::new(0), Epoch::new(0), hash(0), Slot::new(0));
        array
            .on_block(hash(1), hash(0), Slot::new(1), Epoch::new(0), Epoch::new(0))
            .unwrap();
        array
            .on_block(hash(2), hash(0), Slot::new(1), Epoch::new(0), Epoch::new(0))
            .unwrap();

        assert_eq!(array.find_head(hash(0)).unwrap(), hash(2));
    }

    #[test]
    fn prune_drops_other_branches() {
        let mut array = ProtoArray::new(Epoch::new(0), Epoch::new(0), hash(0), Slot::new(0));
        array
            .on_block(hash(1), hash(0), Slot::new(1), Epoch::new(0), Epoch::new(0))
            .unwrap();
        array
            .on_block(hash(2), hash(0), Slot::new(1), Epoch::new(0), Epoch::new(0))
            .unwrap();

        array.prune(hash(1)).unwrap();

        assert!(array.contains_block(&hash(1)));
        assert!(!array.contains_block(&hash(2)));
    }
}
