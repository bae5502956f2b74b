#[derive(Debug, PartialEq, Clone)]
pub enum Error {
    ProtoArrayError(proto_array::Error),
    /// `on_attestation` named a validator index with no corresponding balance entry yet.
    UnknownValidator(u64),
}

impl From<proto_array::Error> for Error {
    fn from(e: proto_array::Error) -> Self {
        Error::ProtoArrayError(e)
    }
}
