use ibc_app_wasm_types::acknowledgement::{
    AcknowledgementStatus, ContractConfirmStateAck, PacketAcknowledgement,
};
use ibc_app_wasm_types::channel::{single_hop, ChannelEnd, Counterparty, Order, Version};
use ibc_app_wasm_types::envelope::{
    IbcAcknowledgement, IbcChannel, IbcChannelCloseMsg, IbcChannelConnectMsg, IbcChannelOpenMsg,
    IbcPacket, IbcPacketAckMsg, IbcPacketReceiveMsg, IbcPacketTimeoutMsg,
};
use ibc_app_wasm_types::error::WasmError;
use ibc_app_wasm_types::identifiers::{ChannelId, ConnectionId, PortId};
use ibc_app_wasm_types::module::ModuleExtras;
use ibc_app_wasm_types::packet::Packet;
use ibc_app_wasm_types::prelude::*;
use ibc_app_wasm_types::serializers::Binary;
use ibc_app_wasm_types::CanonicalAddress;
use tracing::debug;

use crate::context::{ChannelReader, IbcContractKeeper};
use crate::port::{contract_from_port_id, validate_channel_sequence};

fn resolve_contract(
    keeper: &impl IbcContractKeeper,
    port_id: &PortId,
) -> Result<CanonicalAddress, WasmError> {
    contract_from_port_id(keeper.address_codec(), port_id).map_err(WasmError::contract_port_id)
}

fn channel_end(
    channels: &impl ChannelReader,
    port_id: &PortId,
    channel_id: &ChannelId,
) -> Result<ChannelEnd, WasmError> {
    channels
        .channel_end(port_id, channel_id)
        .ok_or_else(|| WasmError::ChannelNotFound {
            port_id: port_id.clone(),
            channel_id: channel_id.clone(),
        })
}

fn stored_channel(
    channels: &impl ChannelReader,
    port_id: &PortId,
    channel_id: &ChannelId,
) -> Result<IbcChannel, WasmError> {
    let channel_end = channel_end(channels, port_id, channel_id)?;
    IbcChannel::from_channel_end(port_id, channel_id, &channel_end)
}

fn validate_open(
    keeper: &impl IbcContractKeeper,
    connection_hops: &[ConnectionId],
    port_id: &PortId,
    channel_id: &ChannelId,
) -> Result<CanonicalAddress, WasmError> {
    validate_channel_sequence(channel_id)?;
    let contract = resolve_contract(keeper, port_id)?;
    single_hop(connection_hops)?;
    Ok(contract)
}

pub fn on_chan_open_init_validate(
    keeper: &impl IbcContractKeeper,
    _order: Order,
    connection_hops: &[ConnectionId],
    port_id: &PortId,
    channel_id: &ChannelId,
    _counterparty: &Counterparty,
    _version: &Version,
) -> Result<(), WasmError> {
    validate_open(keeper, connection_hops, port_id, channel_id).map(|_| ())
}

pub fn on_chan_open_init_execute(
    keeper: &mut impl IbcContractKeeper,
    order: Order,
    connection_hops: &[ConnectionId],
    port_id: &PortId,
    channel_id: &ChannelId,
    counterparty: &Counterparty,
    version: &Version,
) -> Result<(ModuleExtras, Version), WasmError> {
    let contract = validate_open(keeper, connection_hops, port_id, channel_id)?;
    let channel = IbcChannel::new(
        order,
        single_hop(connection_hops)?,
        port_id,
        channel_id,
        counterparty,
        version.as_str(),
    )?;

    let (extras, picked) =
        keeper.on_open_channel(&contract, IbcChannelOpenMsg::OpenInit { channel })?;

    let version = match picked {
        Some(picked) if !picked.is_empty() => Version::new(picked),
        _ => version.clone(),
    };
    debug!("channel {channel_id} on {port_id} opening with version {version}");

    Ok((extras, version))
}

pub fn on_chan_open_try_validate(
    keeper: &impl IbcContractKeeper,
    _order: Order,
    connection_hops: &[ConnectionId],
    port_id: &PortId,
    channel_id: &ChannelId,
    _counterparty: &Counterparty,
    _counterparty_version: &Version,
) -> Result<(), WasmError> {
    validate_open(keeper, connection_hops, port_id, channel_id).map(|_| ())
}

/// The counterparty version is adopted whatever the contract answers.
pub fn on_chan_open_try_execute(
    keeper: &mut impl IbcContractKeeper,
    order: Order,
    connection_hops: &[ConnectionId],
    port_id: &PortId,
    channel_id: &ChannelId,
    counterparty: &Counterparty,
    counterparty_version: &Version,
) -> Result<(ModuleExtras, Version), WasmError> {
    let contract = validate_open(keeper, connection_hops, port_id, channel_id)?;
    let channel = IbcChannel::new(
        order,
        single_hop(connection_hops)?,
        port_id,
        channel_id,
        counterparty,
        counterparty_version.as_str(),
    )?;
    let msg = IbcChannelOpenMsg::OpenTry {
        channel,
        counterparty_version: counterparty_version.to_string(),
    };

    let (extras, _) = keeper.on_open_channel(&contract, msg)?;

    Ok((extras, counterparty_version.clone()))
}

pub fn on_chan_open_ack_validate(
    keeper: &impl IbcContractKeeper,
    channels: &impl ChannelReader,
    port_id: &PortId,
    channel_id: &ChannelId,
    _counterparty_version: &Version,
) -> Result<(), WasmError> {
    resolve_contract(keeper, port_id)?;
    channel_end(channels, port_id, channel_id).map(|_| ())
}

pub fn on_chan_open_ack_execute(
    keeper: &mut impl IbcContractKeeper,
    channels: &impl ChannelReader,
    port_id: &PortId,
    channel_id: &ChannelId,
    counterparty_version: &Version,
) -> Result<ModuleExtras, WasmError> {
    let contract = resolve_contract(keeper, port_id)?;
    let msg = IbcChannelConnectMsg::OpenAck {
        channel: stored_channel(channels, port_id, channel_id)?,
        counterparty_version: counterparty_version.to_string(),
    };
    keeper.on_connect_channel(&contract, msg)
}

pub fn on_chan_open_confirm_validate(
    keeper: &impl IbcContractKeeper,
    channels: &impl ChannelReader,
    port_id: &PortId,
    channel_id: &ChannelId,
) -> Result<(), WasmError> {
    resolve_contract(keeper, port_id)?;
    channel_end(channels, port_id, channel_id).map(|_| ())
}

pub fn on_chan_open_confirm_execute(
    keeper: &mut impl IbcContractKeeper,
    channels: &impl ChannelReader,
    port_id: &PortId,
    channel_id: &ChannelId,
) -> Result<ModuleExtras, WasmError> {
    let contract = resolve_contract(keeper, port_id)?;
    let msg = IbcChannelConnectMsg::OpenConfirm {
        channel: stored_channel(channels, port_id, channel_id)?,
    };
    keeper.on_connect_channel(&contract, msg)
}

pub fn on_chan_close_init_validate(
    keeper: &impl IbcContractKeeper,
    channels: &impl ChannelReader,
    port_id: &PortId,
    channel_id: &ChannelId,
) -> Result<(), WasmError> {
    resolve_contract(keeper, port_id)?;
    channel_end(channels, port_id, channel_id).map(|_| ())
}

/// A contract error aborts the close.
pub fn on_chan_close_init_execute(
    keeper: &mut impl IbcContractKeeper,
    channels: &impl ChannelReader,
    port_id: &PortId,
    channel_id: &ChannelId,
) -> Result<ModuleExtras, WasmError> {
    let contract = resolve_contract(keeper, port_id)?;
    let msg = IbcChannelCloseMsg::CloseInit {
        channel: stored_channel(channels, port_id, channel_id)?,
    };
    keeper.on_close_channel(&contract, msg)
}

pub fn on_chan_close_confirm_validate(
    keeper: &impl IbcContractKeeper,
    channels: &impl ChannelReader,
    port_id: &PortId,
    channel_id: &ChannelId,
) -> Result<(), WasmError> {
    resolve_contract(keeper, port_id)?;
    channel_end(channels, port_id, channel_id).map(|_| ())
}

pub fn on_chan_close_confirm_execute(
    keeper: &mut impl IbcContractKeeper,
    channels: &impl ChannelReader,
    port_id: &PortId,
    channel_id: &ChannelId,
) -> Result<ModuleExtras, WasmError> {
    let contract = resolve_contract(keeper, port_id)?;
    let msg = IbcChannelCloseMsg::CloseConfirm {
        channel: stored_channel(channels, port_id, channel_id)?,
    };
    keeper.on_close_channel(&contract, msg)
}

/// Never fails: every error turns into an error acknowledgement.
pub fn on_recv_packet_execute(
    keeper: &mut impl IbcContractKeeper,
    packet: &Packet,
    relayer: &str,
) -> (ModuleExtras, Box<dyn PacketAcknowledgement>) {
    let contract = match resolve_contract(keeper, &packet.port_id_on_b) {
        Ok(contract) => contract,
        Err(e) => {
            return (
                ModuleExtras::empty(),
                Box::new(AcknowledgementStatus::error(e.into())),
            )
        }
    };

    let msg = IbcPacketReceiveMsg {
        packet: IbcPacket::from(packet),
        relayer: relayer.to_string(),
    };

    match keeper.on_recv_packet(&contract, msg) {
        Ok((extras, ack)) => (extras, Box::new(ContractConfirmStateAck::new(ack))),
        Err(e) => {
            debug!("contract failed to receive packet {}: {e}", packet.seq_on_a);
            (
                ModuleExtras::empty(),
                Box::new(AcknowledgementStatus::error(e.into())),
            )
        }
    }
}

pub fn on_acknowledgement_packet_validate(
    keeper: &impl IbcContractKeeper,
    packet: &Packet,
    _acknowledgement: &[u8],
    _relayer: &str,
) -> Result<(), WasmError> {
    resolve_contract(keeper, &packet.port_id_on_a).map(|_| ())
}

pub fn on_acknowledgement_packet_execute(
    keeper: &mut impl IbcContractKeeper,
    packet: &Packet,
    acknowledgement: &[u8],
    relayer: &str,
) -> (ModuleExtras, Result<(), WasmError>) {
    let contract = match resolve_contract(keeper, &packet.port_id_on_a) {
        Ok(contract) => contract,
        Err(e) => return (ModuleExtras::empty(), Err(e)),
    };

    let msg = IbcPacketAckMsg {
        acknowledgement: IbcAcknowledgement {
            data: Binary::from(acknowledgement),
        },
        original_packet: IbcPacket::from(packet),
        relayer: relayer.to_string(),
    };

    match keeper.on_ack_packet(&contract, msg) {
        Ok(extras) => (extras, Ok(())),
        Err(e) => (ModuleExtras::empty(), Err(e.in_callback("on ack"))),
    }
}

pub fn on_timeout_packet_validate(
    keeper: &impl IbcContractKeeper,
    packet: &Packet,
    _relayer: &str,
) -> Result<(), WasmError> {
    resolve_contract(keeper, &packet.port_id_on_a).map(|_| ())
}

pub fn on_timeout_packet_execute(
    keeper: &mut impl IbcContractKeeper,
    packet: &Packet,
    relayer: &str,
) -> (ModuleExtras, Result<(), WasmError>) {
    let contract = match resolve_contract(keeper, &packet.port_id_on_a) {
        Ok(contract) => contract,
        Err(e) => return (ModuleExtras::empty(), Err(e)),
    };

    let msg = IbcPacketTimeoutMsg {
        packet: IbcPacket::from(packet),
        relayer: relayer.to_string(),
    };

    match keeper.on_timeout_packet(&contract, msg) {
        Ok(extras) => (extras, Ok(())),
        Err(e) => (ModuleExtras::empty(), Err(e.in_callback("on timeout"))),
    }
}

/// Every proposed version is accepted.
pub fn negotiate_app_version(
    _order: Order,
    _connection_id: &ConnectionId,
    _port_id: &PortId,
    _counterparty: &Counterparty,
    proposed_version: &Version,
) -> Result<Version, WasmError> {
    Ok(proposed_version.clone())
}
