//! The block DAG LMD-GHOST walks: a flat node arena (`ProtoArray`) with weight deltas applied
//! by the caller (`fork_choice`) and head/ancestor queries answered by tree walks over it.

mod error;
mod proto_array;

pub use crate::proto_array::{ProtoArray, ProtoNode};
pub use error::Error;
