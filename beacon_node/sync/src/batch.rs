//! Long-range (batch) sync: splits `[local_head_slot+1, peer_head_slot]` into fixed-size ranges,
//! dispatches each to some peer with bounded concurrency, and reassembles completed batches in
//! slot order before anything is handed to the writer — `spec.md` §4.9's "responses are
//! reassembled in slot order before being fed to STF serially".

use crate::messages::RequestId;
use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};
use types::{BeaconBlock, Slot};

/// Blocks requested in one range request. Chosen to match `SYNC_BATCH_SIZE` from `spec.md`'s
/// constants block.
pub const SYNC_BATCH_SIZE: u64 = 64;
/// How many batches may be in flight across all peers at once.
pub const MAX_CONCURRENT_BATCHES: usize = 8;
/// How long a batch may sit unanswered before it's reissued to a different peer.
pub const BATCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BatchId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub enum BatchState<P> {
    AwaitingAssignment,
    Downloading {
        peer: P,
        request_id: RequestId,
        started: Instant,
    },
    Ready(Vec<BeaconBlock>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Batch<P> {
    pub id: BatchId,
    pub start_slot: Slot,
    pub count: u64,
    pub state: BatchState<P>,
    /// Peers already tried for this batch (excluded from reassignment so a slow/bad peer isn't
    /// immediately handed the retry).
    pub tried_peers: Vec<P>,
}

/// Owns every in-flight and completed batch for one long-range sync target, and decides what to
/// dispatch next. Batches are processed strictly in `start_slot` order: `drain_ready_prefix`
/// only releases a contiguous run starting at the lowest still-tracked batch.
pub struct BatchManager<P: Clone + PartialEq> {
    next_id: u64,
    target_slot: Slot,
    next_start_slot: Slot,
    batches: BTreeMap<BatchId, Batch<P>>,
    next_request_id: RequestId,
}

impl<P: Clone + PartialEq> BatchManager<P> {
    pub fn new(local_head_slot: Slot, target_slot: Slot) -> Self {
        BatchManager {
            next_id: 0,
            target_slot,
            next_start_slot: local_head_slot + 1,
            batches: BTreeMap::new(),
            next_request_id: RequestId(0),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.next_start_slot > self.target_slot && self.batches.is_empty()
    }

    /// Creates new `AwaitingAssignment` batches up to `MAX_CONCURRENT_BATCHES` in flight.
    fn top_up(&mut self) {
        while self.batches.len() < MAX_CONCURRENT_BATCHES && self.next_start_slot <= self.target_slot {
            let remaining = self.target_slot.as_u64() - self.next_start_slot.as_u64() + 1;
            let count = remaining.min(SYNC_BATCH_SIZE);
            let id = BatchId(self.next_id);
            self.next_id += 1;
            self.batches.insert(
                id,
                Batch {
                    id,
                    start_slot: self.next_start_slot,
                    count,
                    state: BatchState::AwaitingAssignment,
                    tried_peers: Vec::new(),
                },
            );
            self.next_start_slot = self.next_start_slot + count;
        }
    }

    /// Returns `(batch_id, request_id, start_slot, count)` for every batch that should be
    /// dispatched to `peer` right now: newly created batches, plus any assigned to `peer`
    /// that timed out.
    pub fn assignments_for(&mut self, peer: &P, now: Instant) -> Vec<(BatchId, RequestId, Slot, u64)> {
        self.top_up();
        self.reap_timeouts(now);

        let mut out = Vec::new();
        for batch in self.batches.values_mut() {
            let needs_assignment = match &batch.state {
                BatchState::AwaitingAssignment => true,
                _ => false,
            };
            if needs_assignment && !batch.tried_peers.contains(peer) {
                let request_id = self.next_request_id;
                self.next_request_id = self.next_request_id.next();
                batch.tried_peers.push(peer.clone());
                batch.state = BatchState::Downloading {
                    peer: peer.clone(),
                    request_id,
                    started: now,
                };
                out.push((batch.id, request_id, batch.start_slot, batch.count));
            }
        }
        out
    }

    fn reap_timeouts(&mut self, now: Instant) {
        for batch in self.batches.values_mut() {
            if let BatchState::Downloading { started, .. } = batch.state {
                if now.duration_since(started) > BATCH_TIMEOUT {
                    batch.state = BatchState::AwaitingAssignment;
                }
            }
        }
    }

    /// A response arrived. Ignored if it doesn't match the batch's current outstanding request
    /// (a late response after a timeout reissue).
    pub fn on_response(&mut self, batch_id: BatchId, request_id: RequestId, blocks: Vec<BeaconBlock>) {
        if let Some(batch) = self.batches.get_mut(&batch_id) {
            if let BatchState::Downloading { request_id: expected, .. } = batch.state {
                if expected == request_id {
                    batch.state = BatchState::Ready(blocks);
                }
            }
        }
    }

    /// Every batch assigned to `peer` is kicked back to `AwaitingAssignment` so it can be
    /// redispatched — `spec.md` §4.9: "if a batch's target peer disconnects, its outstanding
    /// requests are re-dispatched".
    pub fn on_peer_disconnected(&mut self, peer: &P) {
        for batch in self.batches.values_mut() {
            if let BatchState::Downloading { peer: assigned, .. } = &batch.state {
                if assigned == peer {
                    batch.state = BatchState::AwaitingAssignment;
                }
            }
        }
    }

    /// Drains the longest contiguous prefix of `Ready` batches (by ascending `start_slot`),
    /// returning their blocks concatenated in slot order. Stops at the first batch that isn't
    /// `Ready` yet, preserving strictly-increasing-slot delivery to the writer.
    pub fn drain_ready_prefix(&mut self) -> Vec<BeaconBlock> {
        let mut out = Vec::new();
        loop {
            let id = match self.batches.keys().next() {
                Some(&id) => id,
                None => break,
            };
            let is_ready = matches!(self.batches.get(&id).unwrap().state, BatchState::Ready(_));
            if !is_ready {
                break;
            }
            let batch = self.batches.remove(&id).unwrap();
            if let BatchState::Ready(blocks) = batch.state {
                out.extend(blocks);
            }
        }
        out
    }
}

/// Per-peer bookkeeping for request/batch bookkeeping lives in [`BatchManager`]; this helper is
/// just the map from outstanding `RequestId` back to the batch it belongs to, so a
/// `NetworkContext` response callback (keyed only by request id) can find its batch.
#[derive(Default)]
pub struct RequestIndex<P> {
    outstanding: HashMap<RequestId, (BatchId, P)>,
}

impl<P: Clone> RequestIndex<P> {
    pub fn track(&mut self, request_id: RequestId, batch_id: BatchId, peer: P) {
        self.outstanding.insert(request_id, (batch_id, peer));
    }

    pub fn resolve(&mut self, request_id: RequestId) -> Option<(BatchId, P)> {
        self.outstanding.remove(&request_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_up_splits_range_into_fixed_size_batches() {
        let mut manager: BatchManager<u32> = BatchManager::new(Slot::new(0), Slot::new(130));
        let now = Instant::now();
        let assigned = manager.assignments_for(&1, now);
        assert_eq!(assigned.len(), 3);
        assert_eq!(assigned[0].2, Slot::new(1));
        assert_eq!(assigned[0].3, SYNC_BATCH_SIZE);
        assert_eq!(assigned[2].3, 130 - 2 * SYNC_BATCH_SIZE);
    }

    #[test]
    fn response_then_drain_returns_blocks_in_order() {
        let mut manager: BatchManager<u32> = BatchManager::new(Slot::new(0), Slot::new(2));
        let now = Instant::now();
        let assigned = manager.assignments_for(&1, now);
        assert_eq!(assigned.len(), 1);
        let (batch_id, request_id, start_slot, _count) = assigned[0];

        let block = BeaconBlock::empty(start_slot, types::Hash256::zero());
        manager.on_response(batch_id, request_id, vec![block.clone()]);

        let drained = manager.drain_ready_prefix();
        assert_eq!(drained, vec![block]);
        assert!(manager.is_complete());
    }

    #[test]
    fn disconnected_peer_batches_are_requeued() {
        let mut manager: BatchManager<u32> = BatchManager::new(Slot::new(0), Slot::new(1));
        let now = Instant::now();
        manager.assignments_for(&1, now);
        manager.on_peer_disconnected(&1);

        let reassigned = manager.assignments_for(&2, now);
        assert_eq!(reassigned.len(), 1);
    }
}
