use ibc_app_wasm_types::envelope::IbcTimeout;
use ibc_app_wasm_types::error::WasmError;
use ibc_app_wasm_types::identifiers::{ChannelId, Sequence};
use ibc_app_wasm_types::packet::{Height, TimeoutHeight};
use ibc_app_wasm_types::prelude::*;
use ibc_app_wasm_types::CanonicalAddress;
use tracing::debug;

use super::contract_port;
use crate::context::{IbcContractKeeper, PacketSender};

/// Sends `data` on `channel_id` of the contract's own port and returns the
/// packet sequence.
pub fn send_packet_from_contract(
    keeper: &impl IbcContractKeeper,
    sender: &mut impl PacketSender,
    contract: &CanonicalAddress,
    channel_id: &ChannelId,
    timeout: IbcTimeout,
    data: Vec<u8>,
) -> Result<Sequence, WasmError> {
    if timeout.is_empty() {
        return Err(WasmError::EmptyTimeout);
    }
    let port_id = contract_port(keeper, contract)?;

    let timeout_height = timeout
        .block
        .map(|block| TimeoutHeight::from(Height::new(block.revision, block.height)))
        .unwrap_or_else(TimeoutHeight::no_timeout);
    let timeout_timestamp = timeout.timestamp.map(|ts| ts.0).unwrap_or_default();

    let sequence = sender.send_packet(
        &port_id,
        channel_id,
        timeout_height,
        timeout_timestamp,
        data,
    )?;
    debug!("contract sent packet {sequence} on {port_id}/{channel_id}");

    Ok(sequence)
}
