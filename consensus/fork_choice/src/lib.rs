//! LMD-GHOST fork choice: validator latest-vote tracking layered over [`proto_array::ProtoArray`].

mod error;
mod fork_choice;

pub use error::Error;
pub use fork_choice::ForkChoice;
