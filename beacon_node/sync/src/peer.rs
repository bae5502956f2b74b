use crate::messages::HelloMessage;
use types::{Epoch, Hash256, Slot};

/// Per-peer connection state, `spec.md` §4.9: `Disconnected -> Handshaking -> Active`, back to
/// `Disconnected` on close. There is no direct `Active -> Handshaking` edge; a fresh handshake
/// starts a fresh connection.
#[derive(Debug, Clone, PartialEq)]
pub enum PeerSyncState {
    Disconnected,
    Handshaking,
    Active(PeerInfo),
}

/// The last `HelloMessage` a peer sent, unpacked into the fields the sync manager actually
/// compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeerInfo {
    pub finalized_root: Hash256,
    pub finalized_epoch: Epoch,
    pub head_root: Hash256,
    pub head_slot: Slot,
}

impl From<&HelloMessage> for PeerInfo {
    fn from(hello: &HelloMessage) -> Self {
        PeerInfo {
            finalized_root: hello.finalized_root,
            finalized_epoch: hello.finalized_epoch,
            head_root: hello.head_root,
            head_slot: hello.head_slot,
        }
    }
}

/// One entry in the sync manager's peer database.
#[derive(Debug, Clone, PartialEq)]
pub struct PeerRecord {
    pub state: PeerSyncState,
    /// Strikes accrued from invalid responses/timeouts; disconnected at `DOWNSCORE_THRESHOLD`.
    pub score: i32,
}

impl Default for PeerRecord {
    fn default() -> Self {
        PeerRecord {
            state: PeerSyncState::Disconnected,
            score: 0,
        }
    }
}

pub const DOWNSCORE_THRESHOLD: i32 = -20;
/// Penalty for a batch response that fails STF, is malformed, or simply times out.
pub const DOWNSCORE_PENALTY: i32 = 5;

impl PeerRecord {
    pub fn is_active(&self) -> bool {
        matches!(self.state, PeerSyncState::Active(_))
    }

    pub fn info(&self) -> Option<PeerInfo> {
        match self.state {
            PeerSyncState::Active(info) => Some(info),
            _ => None,
        }
    }

    /// Applies a downscore strike, returning `true` if the peer crossed the disconnect
    /// threshold and should be dropped by the caller.
    pub fn downscore(&mut self) -> bool {
        self.score -= DOWNSCORE_PENALTY;
        self.score <= DOWNSCORE_THRESHOLD
    }
}
