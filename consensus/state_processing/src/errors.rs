use types::BeaconStateError;

/// Why a single operation (the contents of one `VariableList` field in `BeaconBlockBody`) was
/// rejected. Wrapped by `BlockProcessingError::BadOperation` so the block-level caller always
/// knows which operation kind and index caused the failure.
#[derive(Debug, PartialEq, Clone)]
pub enum OperationError {
    ProposerSlashingInvalid(&'static str),
    AttesterSlashingInvalid(&'static str),
    AttestationInvalid(&'static str),
    DepositInvalid(&'static str),
    ExitInvalid(&'static str),
    TransferInvalid(&'static str),
}

/// Every way `per_block_processing` can reject a block. The pre-state is never mutated
/// observably when this is returned — callers operate on a scratch clone.
#[derive(Debug, PartialEq, Clone)]
pub enum BlockProcessingError {
    /// `block.slot != state.slot`.
    InvalidSlot { block: u64, state: u64 },
    /// `block.parent_root` did not match `hash_tree_root(state.latest_block_header)`.
    InvalidParentRoot,
    /// The proposer for `state.slot` has already been slashed.
    ProposerSlashed(u64),
    /// `randao_reveal` did not verify against the proposer's pubkey.
    BadRandaoSignature,
    /// `block.signature` did not verify against the proposer's pubkey.
    InvalidProposerSignature,
    /// One operation (named by index within its list) failed its predicate.
    BadOperation {
        index: usize,
        kind: &'static str,
        error: OperationError,
    },
    /// A per-type operation cap (`MAX_ATTESTATIONS`, etc) was exceeded in the block body.
    TooManyOperations(&'static str),
    /// `hash_tree_root(post_state) != block.state_root`.
    StateRootMismatch { block: types::Hash256, computed: types::Hash256 },
    BeaconStateError(BeaconStateError),
    ArithError(safe_arith::ArithError),
    SszTypesError(ssz_types::Error),
    SlotProcessingError(Box<SlotProcessingError>),
}

impl From<BeaconStateError> for BlockProcessingError {
    fn from(e: BeaconStateError) -> Self {
        BlockProcessingError::BeaconStateError(e)
    }
}

impl From<safe_arith::ArithError> for BlockProcessingError {
    fn from(e: safe_arith::ArithError) -> Self {
        BlockProcessingError::ArithError(e)
    }
}

impl From<ssz_types::Error> for BlockProcessingError {
    fn from(e: ssz_types::Error) -> Self {
        BlockProcessingError::SszTypesError(e)
    }
}

impl From<SlotProcessingError> for BlockProcessingError {
    fn from(e: SlotProcessingError) -> Self {
        BlockProcessingError::SlotProcessingError(Box::new(e))
    }
}

/// Errors from the slot-advance loop (`process_slots`), which only ever fails if an epoch
/// boundary's `per_epoch_processing` fails, or the target slot is behind the state.
#[derive(Debug, PartialEq, Clone)]
pub enum SlotProcessingError {
    /// The requested target slot was not ahead of `state.slot`.
    SlotIsInThePast { state_slot: u64, target_slot: u64 },
    EpochProcessingError(EpochProcessingError),
    BeaconStateError(BeaconStateError),
}

impl From<EpochProcessingError> for SlotProcessingError {
    fn from(e: EpochProcessingError) -> Self {
        SlotProcessingError::EpochProcessingError(e)
    }
}

impl From<BeaconStateError> for SlotProcessingError {
    fn from(e: BeaconStateError) -> Self {
        SlotProcessingError::BeaconStateError(e)
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum EpochProcessingError {
    BeaconStateError(BeaconStateError),
    ArithError(safe_arith::ArithError),
    SszTypesError(ssz_types::Error),
    /// `get_total_active_balance` or similar returned zero with no validators present.
    InsufficientValidators,
}

impl From<BeaconStateError> for EpochProcessingError {
    fn from(e: BeaconStateError) -> Self {
        EpochProcessingError::BeaconStateError(e)
    }
}

impl From<safe_arith::ArithError> for EpochProcessingError {
    fn from(e: safe_arith::ArithError) -> Self {
        EpochProcessingError::ArithError(e)
    }
}

impl From<ssz_types::Error> for EpochProcessingError {
    fn from(e: ssz_types::Error) -> Self {
        EpochProcessingError::SszTypesError(e)
    }
}
