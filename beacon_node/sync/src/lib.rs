//! The sync orchestrator (`spec.md` §4.9): a per-peer handshake state machine plus long-range
//! (batch) and short-range (gossip) catch-up, feeding accepted blocks into the writer in order.
//! The wire/libp2p transport is out of scope (`spec.md` §1); [`NetworkContext`] is the seam a
//! real transport implements.

mod batch;
mod manager;
mod messages;
mod network_context;
mod peer;

pub use batch::{BatchId, BatchManager, RequestIndex, BATCH_TIMEOUT, MAX_CONCURRENT_BATCHES, SYNC_BATCH_SIZE};
pub use manager::{ChainAccess, ChainError, SyncManager, BACKFILL_THRESHOLD};
pub use messages::{BlocksByRangeRequest, BlocksByRootRequest, GoodbyeReason, HelloMessage, RequestId};
pub use network_context::NetworkContext;
pub use peer::{PeerInfo, PeerRecord, PeerSyncState, DOWNSCORE_PENALTY, DOWNSCORE_THRESHOLD};

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::time::Instant;
    use types::{BeaconBlock, Epoch, Hash256, Slot};

    /// An in-memory `NetworkContext` that just records every call, so tests can assert on what
    /// the manager tried to send without a real transport.
    #[derive(Default)]
    struct FakeNetwork {
        sent_requests: Mutex<Vec<(u32, RequestId, BlocksByRangeRequest)>>,
        disconnects: Mutex<Vec<u32>>,
    }

    impl NetworkContext for FakeNetwork {
        type PeerId = u32;

        fn send_hello(&self, _peer: &u32, _hello: HelloMessage) {}

        fn send_blocks_by_range_request(
            &self,
            peer: &u32,
            request_id: RequestId,
            request: BlocksByRangeRequest,
        ) {
            self.sent_requests.lock().push((*peer, request_id, request));
        }

        fn send_blocks_by_root_request(&self, _peer: &u32, _request_id: RequestId, _request: BlocksByRootRequest) {}

        fn disconnect(&self, peer: &u32, _reason: GoodbyeReason) {
            self.disconnects.lock().push(*peer);
        }
    }

    /// An in-memory `ChainAccess` backed by a simple append-only chain of slots, so tests can
    /// drive `SyncManager` without constructing a real `BeaconChain`.
    struct FakeChain {
        head_slot: Mutex<Slot>,
        imported: Mutex<Vec<Hash256>>,
    }

    impl FakeChain {
        fn new() -> Self {
            FakeChain {
                head_slot: Mutex::new(Slot::new(0)),
                imported: Mutex::new(Vec::new()),
            }
        }
    }

    impl ChainAccess for FakeChain {
        fn process_block(&self, block: BeaconBlock) -> Result<Hash256, ChainError> {
            let root = block.canonical_root();
            *self.head_slot.lock() = block.slot;
            self.imported.lock().push(root);
            Ok(root)
        }

        fn head_slot(&self) -> Slot {
            *self.head_slot.lock()
        }

        fn head_root(&self) -> Hash256 {
            Hash256::zero()
        }

        fn finalized_epoch(&self) -> Epoch {
            Epoch::new(0)
        }

        fn finalized_root(&self) -> Hash256 {
            Hash256::zero()
        }
    }

    fn hello(head_slot: u64) -> HelloMessage {
        HelloMessage {
            network_id: 1,
            chain_id: 1,
            finalized_root: Hash256::zero(),
            finalized_epoch: Epoch::new(0),
            head_root: Hash256::zero(),
            head_slot: Slot::new(head_slot),
        }
    }

    #[test]
    fn far_ahead_peer_triggers_long_sync_request() {
        let net = FakeNetwork::default();
        let chain = FakeChain::new();
        let mut manager = SyncManager::new(net, chain, 1, 1, logging::test_logger());

        manager.on_peer_connected(7);
        manager.on_hello(7, hello(200));
        manager.poll(Instant::now());

        assert!(!manager.ctx_ref().sent_requests.lock().is_empty());
    }

    #[test]
    fn wrong_network_peer_is_disconnected() {
        let net = FakeNetwork::default();
        let chain = FakeChain::new();
        let mut manager = SyncManager::new(net, chain, 1, 1, logging::test_logger());

        manager.on_peer_connected(7);
        let mut bad_hello = hello(10);
        bad_hello.network_id = 2;
        manager.on_hello(7, bad_hello);

        assert_eq!(manager.ctx_ref().disconnects.lock().as_slice(), &[7]);
    }

    #[test]
    fn close_peer_does_not_trigger_long_sync() {
        let net = FakeNetwork::default();
        let chain = FakeChain::new();
        let mut manager = SyncManager::new(net, chain, 1, 1, logging::test_logger());

        manager.on_peer_connected(3);
        manager.on_hello(3, hello(10));
        manager.poll(Instant::now());

        assert!(manager.ctx_ref().sent_requests.lock().is_empty());
    }
}
