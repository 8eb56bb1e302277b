//! Implements the IBC messages a contract may emit from its own port.
mod close_channel;
mod send_packet;

pub use close_channel::*;
pub use send_packet::*;

use ibc_app_wasm_types::error::WasmError;
use ibc_app_wasm_types::identifiers::PortId;
use ibc_app_wasm_types::prelude::*;
use ibc_app_wasm_types::CanonicalAddress;

use crate::context::IbcContractKeeper;

/// The port bound by `contract`. A contract without one cannot use IBC.
fn contract_port(
    keeper: &impl IbcContractKeeper,
    contract: &CanonicalAddress,
) -> Result<PortId, WasmError> {
    keeper
        .contract_port_id(contract)
        .ok_or_else(|| WasmError::NotIbcContract {
            contract: keeper
                .address_codec()
                .humanize(contract.as_slice())
                .unwrap_or_else(|_| contract.to_string()),
        })
}
