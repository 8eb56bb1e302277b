//! Bridges IBC channel and packet callbacks to a gas-metered contract host.
//!
//! Every contract that wants to speak IBC owns the port `wasm.<address>`.
//! Channel handshake steps and packet events arriving on such a port are
//! turned into JSON envelopes and handed to the contract's `ibc_*` entry
//! points through a [`WasmEngine`](context::WasmEngine). The [`keeper`] holds
//! code, contract and sequence state, and [`genesis`] bulk-loads and dumps it.
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

pub mod adapter;
pub mod api;
pub mod context;
pub mod genesis;
pub mod handler;
pub mod keeper;
pub mod module;
pub mod port;
pub mod router;

/// Re-exports the data structures of the contract bridge.
pub mod types {
    #[doc(inline)]
    pub use ibc_app_wasm_types::*;
}
