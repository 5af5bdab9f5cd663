//! Outer save container: path resolution and `slcb` payload decoding

pub mod codec;
pub mod source;

pub use codec::{ContainerHeader, decode, encode};
pub use source::{PayloadKind, SaveSource};
