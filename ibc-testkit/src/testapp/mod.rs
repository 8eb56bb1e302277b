//! Mock implementations of the collaborators the bridge consumes.
mod channel;
mod engine;
mod genesis;
mod port;

pub use channel::*;
pub use engine::*;
pub use genesis::*;
pub use port::*;
