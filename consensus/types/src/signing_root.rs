use crate::Hash256;

/// Implemented by every signed container. `signed_root` is `htr` of the container with its
/// trailing signature field zeroed — the message `signing_root(container)` feeds into
/// `bls_verify` alongside the domain.
pub trait SignedRoot {
    fn signed_root(&self) -> Hash256;
}
