//! Data structures of the IBC contract bridge: the bech32 address codec and
//! its gas schedule, the envelopes handed to contracts on channel and packet
//! events, acknowledgements, and the genesis document.
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(
    warnings,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications,
    rust_2018_idioms
)]

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod prelude;
pub mod serializers;

mod address;
mod config;
mod gas;

pub use address::*;
pub use config::*;
pub use gas::*;

pub mod acknowledgement;
pub mod channel;
pub mod envelope;
pub mod error;
pub mod genesis;
pub mod identifiers;
pub mod module;
pub mod msgs;
pub mod packet;
pub mod params;

/// Module identifier of the contract bridge.
pub const MODULE_ID_STR: &str = "wasm";

/// Prefix of every port bound on behalf of a contract; the bech32 contract
/// address follows it.
pub const PORT_ID_PREFIX: &str = "wasm.";

/// Human-readable part of account addresses on the home chain.
pub const DEFAULT_BECH32_PREFIX: &str = "meme";

/// Highest channel sequence a contract may open a channel on.
///
/// Escrow addresses are derived from the channel identifier, so the number of
/// channels is capped at 2^32 to keep their entropy.
pub const MAX_CHANNEL_SEQUENCE: u64 = u32::MAX as u64;

/// Sequence key holding the next code identifier.
pub const KEY_LAST_CODE_ID: &[u8] = b"lastCodeId";

/// Sequence key holding the next contract instance identifier.
pub const KEY_LAST_INSTANCE_ID: &[u8] = b"lastContractId";
