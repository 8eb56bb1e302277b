use ibc_app_wasm_types::error::WasmError;
use ibc_app_wasm_types::identifiers::ChannelId;
use ibc_app_wasm_types::prelude::*;
use ibc_app_wasm_types::CanonicalAddress;
use tracing::debug;

use super::contract_port;
use crate::context::{ChannelCloser, IbcContractKeeper};

/// Starts closing `channel_id` on the contract's own port.
pub fn close_channel_from_contract(
    keeper: &impl IbcContractKeeper,
    closer: &mut impl ChannelCloser,
    contract: &CanonicalAddress,
    channel_id: &ChannelId,
) -> Result<(), WasmError> {
    let port_id = contract_port(keeper, contract)?;
    closer.chan_close_init(&port_id, channel_id)?;
    debug!("contract closing channel {channel_id} on {port_id}");
    Ok(())
}
