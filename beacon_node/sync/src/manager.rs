use crate::batch::{BatchId, BatchManager};
use crate::messages::{BlocksByRangeRequest, HelloMessage, RequestId};
use crate::network_context::NetworkContext;
use crate::peer::{PeerInfo, PeerRecord, PeerSyncState};
use slog::{debug, info, warn, Logger};
use std::collections::HashMap;
use std::time::Instant;
use types::{BeaconBlock, Epoch, Hash256, Slot};

/// A peer whose head is more than this many slots ahead of ours triggers long (batch) sync
/// against it rather than relying on gossip alone.
pub const BACKFILL_THRESHOLD: u64 = 64;

/// Everything the sync manager needs from the writer. Kept minimal and local to this crate (the
/// same external-collaborator-seam pattern as [`NetworkContext`]) so `sync` never has to name
/// `beacon_chain`'s `SlotClock`/`KeyValueStore` type parameters.
pub trait ChainAccess: Send + Sync {
    fn process_block(&self, block: BeaconBlock) -> Result<Hash256, ChainError>;
    fn head_slot(&self) -> Slot;
    fn head_root(&self) -> Hash256;
    fn finalized_epoch(&self) -> Epoch;
    fn finalized_root(&self) -> Hash256;
}

/// The subset of `beacon_chain::BeaconChainError` this crate distinguishes: whether the block
/// was rejected outright (downscore the sender) or merely buffered/already known (no penalty).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainError {
    Invalid,
    UnknownParent,
    BelowFinalized,
    Fatal,
}

impl<T: slot_clock::SlotClock, E: store::KeyValueStore> ChainAccess for beacon_chain::BeaconChain<T, E> {
    fn process_block(&self, block: BeaconBlock) -> Result<Hash256, ChainError> {
        self.process_block(block).map_err(|e| match e {
            beacon_chain::BeaconChainError::UnknownParent(_) => ChainError::UnknownParent,
            beacon_chain::BeaconChainError::BelowFinalized => ChainError::BelowFinalized,
            beacon_chain::BeaconChainError::StoreError(_) => ChainError::Fatal,
            _ => ChainError::Invalid,
        })
    }

    fn head_slot(&self) -> Slot {
        self.canonical_head().beacon_block.slot
    }

    fn head_root(&self) -> Hash256 {
        self.head_root()
    }

    fn finalized_epoch(&self) -> Epoch {
        self.finalized_checkpoint().epoch
    }

    fn finalized_root(&self) -> Hash256 {
        self.finalized_checkpoint().root
    }
}

/// Drives per-peer handshakes, long-range batch sync, and gossip ingestion. One `SyncManager`
/// per node; single logical writer into `chain`, matching `spec.md` §5's ordering guarantee
/// that blocks from a given peer are applied in strictly increasing slot order (long-sync
/// batches are drained in slot order; gossip blocks are applied as they arrive and rely on
/// `ChainAccess::process_block`'s own unknown-parent buffering for out-of-order arrivals).
pub struct SyncManager<N: NetworkContext, C: ChainAccess> {
    ctx: N,
    chain: C,
    peers: HashMap<N::PeerId, PeerRecord>,
    long_sync: Option<(N::PeerId, BatchManager<N::PeerId>)>,
    network_id: u8,
    chain_id: u64,
    log: Logger,
}

impl<N: NetworkContext, C: ChainAccess> SyncManager<N, C> {
    pub fn new(ctx: N, chain: C, network_id: u8, chain_id: u64, log: Logger) -> Self {
        SyncManager {
            ctx,
            chain,
            peers: HashMap::new(),
            long_sync: None,
            network_id,
            chain_id,
            log,
        }
    }

    #[cfg(test)]
    pub fn ctx_ref(&self) -> &N {
        &self.ctx
    }

    fn local_hello(&self) -> HelloMessage {
        HelloMessage {
            network_id: self.network_id,
            chain_id: self.chain_id,
            finalized_root: self.chain.finalized_root(),
            finalized_epoch: self.chain.finalized_epoch(),
            head_root: self.chain.head_root(),
            head_slot: self.chain.head_slot(),
        }
    }

    /// A new transport-level connection exists; move it into `Handshaking` and send our own
    /// `HelloMessage`.
    pub fn on_peer_connected(&mut self, peer: N::PeerId) {
        self.peers.entry(peer.clone()).or_default().state = PeerSyncState::Handshaking;
        self.ctx.send_hello(&peer, self.local_hello());
    }

    /// The peer's `HelloMessage` arrived. A mismatched `chain_id` is an immediate disconnect
    /// (`spec.md` §4.9: "mismatched fork_version ⇒ drop" — generalised here to the whole
    /// network/chain identity tuple `HelloMessage` carries).
    pub fn on_hello(&mut self, peer: N::PeerId, hello: HelloMessage) {
        if hello.network_id != self.network_id || hello.chain_id != self.chain_id {
            warn!(self.log, "peer on wrong network, disconnecting"; "peer" => ?peer);
            self.ctx.disconnect(&peer, crate::messages::GoodbyeReason::IRRELEVANT_NETWORK);
            self.peers.remove(&peer);
            return;
        }

        let info = PeerInfo::from(&hello);
        self.peers.entry(peer.clone()).or_default().state = PeerSyncState::Active(info);
        info!(self.log, "peer handshake complete"; "peer" => ?peer, "head_slot" => info.head_slot.as_u64());

        self.maybe_start_long_sync(peer, info);
    }

    pub fn on_peer_disconnected(&mut self, peer: &N::PeerId) {
        self.peers.remove(peer);
        let target_disconnected = matches!(&self.long_sync, Some((target, _)) if target == peer);
        if target_disconnected {
            self.long_sync = None;
        } else if let Some((_, batches)) = &mut self.long_sync {
            batches.on_peer_disconnected(peer);
        }
    }

    fn maybe_start_long_sync(&mut self, peer: N::PeerId, info: PeerInfo) {
        if self.long_sync.is_some() {
            return;
        }
        let local_head = self.chain.head_slot();
        if info.head_slot.as_u64() > local_head.as_u64() + BACKFILL_THRESHOLD {
            info!(self.log, "starting long-range sync"; "peer" => ?peer, "target_slot" => info.head_slot.as_u64());
            self.long_sync = Some((peer, BatchManager::new(local_head, info.head_slot)));
        }
    }

    /// Dispatches any outstanding batch-sync work. Call periodically (each slot tick is a
    /// reasonable cadence); purely a function of current state and `now`, no hidden timers.
    pub fn poll(&mut self, now: Instant) {
        let target_peer = match &self.long_sync {
            Some((peer, _)) => peer.clone(),
            None => return,
        };

        if self.peers.get(&target_peer).map_or(false, PeerRecord::is_active) {
            let assignments = match &mut self.long_sync {
                Some((_, batches)) => batches.assignments_for(&target_peer, now),
                None => Vec::new(),
            };
            for (_batch_id, request_id, start_slot, count) in assignments {
                self.ctx.send_blocks_by_range_request(
                    &target_peer,
                    request_id,
                    BlocksByRangeRequest { start_slot, count, step: 1 },
                );
            }
        }

        let ready = match &mut self.long_sync {
            Some((_, batches)) => batches.drain_ready_prefix(),
            None => Vec::new(),
        };
        for block in ready {
            self.import_synced_block(block, &target_peer);
        }

        let complete = match &self.long_sync {
            Some((_, batches)) => batches.is_complete(),
            None => false,
        };
        if complete {
            info!(self.log, "long-range sync complete");
            self.long_sync = None;
        }
    }

    pub fn on_blocks_by_range_response(
        &mut self,
        _peer: &N::PeerId,
        batch_id: BatchId,
        request_id: RequestId,
        blocks: Vec<BeaconBlock>,
    ) {
        if let Some((_, batches)) = &mut self.long_sync {
            batches.on_response(batch_id, request_id, blocks);
        }
    }

    /// A block arrived via gossip (short sync). Applied immediately; `ChainAccess` handles
    /// buffering if its parent hasn't arrived yet.
    pub fn on_gossip_block(&mut self, peer: &N::PeerId, block: BeaconBlock) {
        self.import_synced_block(block, peer);
    }

    fn import_synced_block(&mut self, block: BeaconBlock, peer: &N::PeerId) {
        match self.chain.process_block(block) {
            Ok(root) => {
                debug!(self.log, "block imported from sync"; "root" => ?root);
            }
            Err(ChainError::UnknownParent) | Err(ChainError::BelowFinalized) => {}
            Err(ChainError::Fatal) => {
                warn!(self.log, "store error while importing synced block; shutting down writer");
            }
            Err(ChainError::Invalid) => {
                if let Some(record) = self.peers.get_mut(peer) {
                    if record.downscore() {
                        warn!(self.log, "peer sent invalid block, disconnecting"; "peer" => ?peer);
                        self.ctx.disconnect(peer, crate::messages::GoodbyeReason::FAULT_OR_ERROR);
                        self.peers.remove(peer);
                    }
                }
            }
        }
    }
}
