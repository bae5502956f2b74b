use crate::messages::{BlocksByRangeRequest, BlocksByRootRequest, GoodbyeReason, HelloMessage, RequestId};
use std::fmt::Debug;
use std::hash::Hash;

/// The transport seam `spec.md` §4.9's design notes call for: everything the sync manager needs
/// to actually talk to a peer, with the real wire/libp2p layer (out of scope per `spec.md` §1)
/// implementing it. Tests use an in-memory fake; a production binary would back this with a
/// real RPC client.
pub trait NetworkContext {
    type PeerId: Clone + Eq + Hash + Debug + Send + Sync;

    fn send_hello(&self, peer: &Self::PeerId, hello: HelloMessage);
    fn send_blocks_by_range_request(
        &self,
        peer: &Self::PeerId,
        request_id: RequestId,
        request: BlocksByRangeRequest,
    );
    fn send_blocks_by_root_request(
        &self,
        peer: &Self::PeerId,
        request_id: RequestId,
        request: BlocksByRootRequest,
    );
    fn disconnect(&self, peer: &Self::PeerId, reason: GoodbyeReason);
}
