/// Every failure a handler can return, mapped onto the status codes `spec.md` §6 specifies.
/// Transport-level errors (connection drops, malformed HTTP itself) are a real server's
/// problem, not this crate's — this only covers handler-level outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Malformed query/body (`400`).
    BadRequest(String),
    /// The node has not finished syncing and cannot answer (`503`).
    NotSynced,
    /// The requested epoch is outside the range the local state can answer for (`406`).
    EpochOutOfRange,
    /// A submitted block failed the state-transition function (`400`).
    InvalidBlock(String),
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::NotSynced => 503,
            ApiError::EpochOutOfRange => 406,
            ApiError::InvalidBlock(_) => 400,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "bad request: {}", msg),
            ApiError::NotSynced => write!(f, "node is syncing"),
            ApiError::EpochOutOfRange => write!(f, "epoch unavailable"),
            ApiError::InvalidBlock(msg) => write!(f, "invalid block: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}
