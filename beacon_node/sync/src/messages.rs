//! Wire types for the sync RPC (`spec.md` §6). These are plain SSZ-encodable structs; framing
//! (the 4-byte big-endian length prefix) and the actual transport are the `NetworkContext`
//! implementor's problem, not this crate's.

use ssz_derive::{Decode, Encode};
use types::{Epoch, Hash256, Slot};

/// `status` handshake payload, exchanged once per connection and again on finality changes.
#[derive(Debug, Clone, PartialEq, Encode, Decode)]
pub struct HelloMessage {
    pub network_id: u8,
    pub chain_id: u64,
    pub finalized_root: Hash256,
    pub finalized_epoch: Epoch,
    pub head_root: Hash256,
    pub head_slot: Slot,
}

/// `goodbye(reason)` — one-shot, no response expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub struct GoodbyeReason {
    pub code: u64,
}

impl GoodbyeReason {
    pub const CLIENT_SHUTDOWN: GoodbyeReason = GoodbyeReason { code: 1 };
    pub const IRRELEVANT_NETWORK: GoodbyeReason = GoodbyeReason { code: 2 };
    pub const FAULT_OR_ERROR: GoodbyeReason = GoodbyeReason { code: 3 };
}

/// `beacon_blocks_by_range(start_slot, count, step)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub struct BlocksByRangeRequest {
    pub start_slot: Slot,
    pub count: u64,
    pub step: u64,
}

/// `beacon_blocks_by_root(roots[])`.
#[derive(Debug, Clone, PartialEq, Encode, Decode)]
pub struct BlocksByRootRequest {
    pub roots: Vec<Hash256>,
}

/// Identifies one outstanding request against one peer, so a late or duplicate response can be
/// matched (or dropped if it no longer matches the outstanding request).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

impl RequestId {
    pub fn next(self) -> RequestId {
        RequestId(self.0 + 1)
    }
}
