use types::Hash256;

#[derive(Debug, PartialEq, Clone)]
pub enum Error {
    BlockNotFound(Hash256),
    StateNotFound(Hash256),
    SszDecodeError(ssz::DecodeError),
}

impl From<ssz::DecodeError> for Error {
    fn from(e: ssz::DecodeError) -> Self {
        Error::SszDecodeError(e)
    }
}
