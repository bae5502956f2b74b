use state_processing::BlockProcessingError;
use types::Hash256;

/// Every way `BeaconChain::process_block`/`process_attestation` can fail. Mirrors the taxonomy in
/// `spec.md` §7: schema/signature errors are folded into `Invalid` (drop+downscore at the caller),
/// `UnknownParent` buffers the block rather than rejecting it outright, and `StoreError` is the
/// only class the writer treats as fatal.
#[derive(Debug)]
pub enum BeaconChainError {
    /// The block's parent has not been seen yet; it has been buffered and will be retried once
    /// the parent is accepted.
    UnknownParent(Hash256),
    /// The block's slot is at or below the finalized checkpoint's slot; permanently unreachable.
    BelowFinalized,
    /// `state_transition` rejected the block.
    Invalid(BlockProcessingError),
    StoreError(store::Error),
    ForkChoiceError(fork_choice::Error),
    BeaconStateError(types::BeaconStateError),
}

impl From<BlockProcessingError> for BeaconChainError {
    fn from(e: BlockProcessingError) -> Self {
        BeaconChainError::Invalid(e)
    }
}

impl From<store::Error> for BeaconChainError {
    fn from(e: store::Error) -> Self {
        BeaconChainError::StoreError(e)
    }
}

impl From<fork_choice::Error> for BeaconChainError {
    fn from(e: fork_choice::Error) -> Self {
        BeaconChainError::ForkChoiceError(e)
    }
}

impl From<types::BeaconStateError> for BeaconChainError {
    fn from(e: types::BeaconStateError) -> Self {
        BeaconChainError::BeaconStateError(e)
    }
}

impl From<state_processing::SlotProcessingError> for BeaconChainError {
    fn from(e: state_processing::SlotProcessingError) -> Self {
        BeaconChainError::Invalid(e.into())
    }
}
