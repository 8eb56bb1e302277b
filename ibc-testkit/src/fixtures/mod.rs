mod address;
mod channel;
mod genesis;

pub use address::*;
pub use channel::*;
pub use genesis::*;
