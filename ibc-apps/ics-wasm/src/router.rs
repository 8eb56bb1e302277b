//! The callback surface the IBC protocol layer routes `wasm.` ports to.
use core::fmt::Debug;

use ibc_app_wasm_types::acknowledgement::PacketAcknowledgement;
use ibc_app_wasm_types::channel::{Counterparty, Order, Version};
use ibc_app_wasm_types::error::WasmError;
use ibc_app_wasm_types::identifiers::{ChannelId, ConnectionId, PortId};
use ibc_app_wasm_types::module::{ModuleExtras, ModuleId};
use ibc_app_wasm_types::packet::Packet;
use ibc_app_wasm_types::prelude::*;

use crate::context::{ChannelReader, IbcContractKeeper};
use crate::module::*;

/// ICS-26 style module callbacks, split into a validation step that never
/// mutates and an execution step that may.
pub trait IbcModule: Debug {
    fn module_id(&self) -> ModuleId;

    fn on_chan_open_init_validate(
        &self,
        order: Order,
        connection_hops: &[ConnectionId],
        port_id: &PortId,
        channel_id: &ChannelId,
        counterparty: &Counterparty,
        version: &Version,
    ) -> Result<Version, WasmError>;

    fn on_chan_open_init_execute(
        &mut self,
        order: Order,
        connection_hops: &[ConnectionId],
        port_id: &PortId,
        channel_id: &ChannelId,
        counterparty: &Counterparty,
        version: &Version,
    ) -> Result<(ModuleExtras, Version), WasmError>;

    fn on_chan_open_try_validate(
        &self,
        order: Order,
        connection_hops: &[ConnectionId],
        port_id: &PortId,
        channel_id: &ChannelId,
        counterparty: &Counterparty,
        counterparty_version: &Version,
    ) -> Result<Version, WasmError>;

    fn on_chan_open_try_execute(
        &mut self,
        order: Order,
        connection_hops: &[ConnectionId],
        port_id: &PortId,
        channel_id: &ChannelId,
        counterparty: &Counterparty,
        counterparty_version: &Version,
    ) -> Result<(ModuleExtras, Version), WasmError>;

    fn on_chan_open_ack_validate(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        counterparty_version: &Version,
    ) -> Result<(), WasmError>;

    fn on_chan_open_ack_execute(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        counterparty_version: &Version,
    ) -> Result<ModuleExtras, WasmError>;

    fn on_chan_open_confirm_validate(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<(), WasmError>;

    fn on_chan_open_confirm_execute(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<ModuleExtras, WasmError>;

    fn on_chan_close_init_validate(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<(), WasmError>;

    fn on_chan_close_init_execute(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<ModuleExtras, WasmError>;

    fn on_chan_close_confirm_validate(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<(), WasmError>;

    fn on_chan_close_confirm_execute(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<ModuleExtras, WasmError>;

    // Note: no `on_recv_packet_validate()`
    // the `onRecvPacket` callback always succeeds
    // if any error occurs, than an "error acknowledgement"
    // must be returned

    fn on_recv_packet_execute(
        &mut self,
        packet: &Packet,
        relayer: &str,
    ) -> (ModuleExtras, Box<dyn PacketAcknowledgement>);

    fn on_acknowledgement_packet_validate(
        &self,
        packet: &Packet,
        acknowledgement: &[u8],
        relayer: &str,
    ) -> Result<(), WasmError>;

    fn on_acknowledgement_packet_execute(
        &mut self,
        packet: &Packet,
        acknowledgement: &[u8],
        relayer: &str,
    ) -> (ModuleExtras, Result<(), WasmError>);

    /// Note: `MsgTimeout` and `MsgTimeoutOnClose` use the same callback

    fn on_timeout_packet_validate(&self, packet: &Packet, relayer: &str) -> Result<(), WasmError>;

    fn on_timeout_packet_execute(
        &mut self,
        packet: &Packet,
        relayer: &str,
    ) -> (ModuleExtras, Result<(), WasmError>);

    fn negotiate_app_version(
        &self,
        order: Order,
        connection_id: &ConnectionId,
        port_id: &PortId,
        counterparty: &Counterparty,
        proposed_version: &Version,
    ) -> Result<Version, WasmError>;
}

/// Routes the callbacks of every `wasm.` port to the contract owning it.
///
/// The handler keeps no state of its own.
#[derive(Debug)]
pub struct IbcHandler<K, C> {
    keeper: K,
    channels: C,
}

impl<K, C> IbcHandler<K, C>
where
    K: IbcContractKeeper,
    C: ChannelReader,
{
    pub fn new(keeper: K, channels: C) -> Self {
        Self { keeper, channels }
    }

    pub fn keeper(&self) -> &K {
        &self.keeper
    }

    pub fn keeper_mut(&mut self) -> &mut K {
        &mut self.keeper
    }

    pub fn channels(&self) -> &C {
        &self.channels
    }

    pub fn into_parts(self) -> (K, C) {
        (self.keeper, self.channels)
    }
}

impl<K, C> IbcModule for IbcHandler<K, C>
where
    K: IbcContractKeeper + Debug,
    C: ChannelReader + Debug,
{
    fn module_id(&self) -> ModuleId {
        ModuleId::wasm()
    }

    fn on_chan_open_init_validate(
        &self,
        order: Order,
        connection_hops: &[ConnectionId],
        port_id: &PortId,
        channel_id: &ChannelId,
        counterparty: &Counterparty,
        version: &Version,
    ) -> Result<Version, WasmError> {
        on_chan_open_init_validate(
            &self.keeper,
            order,
            connection_hops,
            port_id,
            channel_id,
            counterparty,
            version,
        )?;
        Ok(version.clone())
    }

    fn on_chan_open_init_execute(
        &mut self,
        order: Order,
        connection_hops: &[ConnectionId],
        port_id: &PortId,
        channel_id: &ChannelId,
        counterparty: &Counterparty,
        version: &Version,
    ) -> Result<(ModuleExtras, Version), WasmError> {
        on_chan_open_init_execute(
            &mut self.keeper,
            order,
            connection_hops,
            port_id,
            channel_id,
            counterparty,
            version,
        )
    }

    fn on_chan_open_try_validate(
        &self,
        order: Order,
        connection_hops: &[ConnectionId],
        port_id: &PortId,
        channel_id: &ChannelId,
        counterparty: &Counterparty,
        counterparty_version: &Version,
    ) -> Result<Version, WasmError> {
        on_chan_open_try_validate(
            &self.keeper,
            order,
            connection_hops,
            port_id,
            channel_id,
            counterparty,
            counterparty_version,
        )?;
        Ok(counterparty_version.clone())
    }

    fn on_chan_open_try_execute(
        &mut self,
        order: Order,
        connection_hops: &[ConnectionId],
        port_id: &PortId,
        channel_id: &ChannelId,
        counterparty: &Counterparty,
        counterparty_version: &Version,
    ) -> Result<(ModuleExtras, Version), WasmError> {
        on_chan_open_try_execute(
            &mut self.keeper,
            order,
            connection_hops,
            port_id,
            channel_id,
            counterparty,
            counterparty_version,
        )
    }

    fn on_chan_open_ack_validate(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        counterparty_version: &Version,
    ) -> Result<(), WasmError> {
        on_chan_open_ack_validate(
            &self.keeper,
            &self.channels,
            port_id,
            channel_id,
            counterparty_version,
        )
    }

    fn on_chan_open_ack_execute(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        counterparty_version: &Version,
    ) -> Result<ModuleExtras, WasmError> {
        on_chan_open_ack_execute(
            &mut self.keeper,
            &self.channels,
            port_id,
            channel_id,
            counterparty_version,
        )
    }

    fn on_chan_open_confirm_validate(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<(), WasmError> {
        on_chan_open_confirm_validate(&self.keeper, &self.channels, port_id, channel_id)
    }

    fn on_chan_open_confirm_execute(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<ModuleExtras, WasmError> {
        on_chan_open_confirm_execute(&mut self.keeper, &self.channels, port_id, channel_id)
    }

    fn on_chan_close_init_validate(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<(), WasmError> {
        on_chan_close_init_validate(&self.keeper, &self.channels, port_id, channel_id)
    }

    fn on_chan_close_init_execute(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<ModuleExtras, WasmError> {
        on_chan_close_init_execute(&mut self.keeper, &self.channels, port_id, channel_id)
    }

    fn on_chan_close_confirm_validate(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<(), WasmError> {
        on_chan_close_confirm_validate(&self.keeper, &self.channels, port_id, channel_id)
    }

    fn on_chan_close_confirm_execute(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<ModuleExtras, WasmError> {
        on_chan_close_confirm_execute(&mut self.keeper, &self.channels, port_id, channel_id)
    }

    fn on_recv_packet_execute(
        &mut self,
        packet: &Packet,
        relayer: &str,
    ) -> (ModuleExtras, Box<dyn PacketAcknowledgement>) {
        on_recv_packet_execute(&mut self.keeper, packet, relayer)
    }

    fn on_acknowledgement_packet_validate(
        &self,
        packet: &Packet,
        acknowledgement: &[u8],
        relayer: &str,
    ) -> Result<(), WasmError> {
        on_acknowledgement_packet_validate(&self.keeper, packet, acknowledgement, relayer)
    }

    fn on_acknowledgement_packet_execute(
        &mut self,
        packet: &Packet,
        acknowledgement: &[u8],
        relayer: &str,
    ) -> (ModuleExtras, Result<(), WasmError>) {
        on_acknowledgement_packet_execute(&mut self.keeper, packet, acknowledgement, relayer)
    }

    fn on_timeout_packet_validate(&self, packet: &Packet, relayer: &str) -> Result<(), WasmError> {
        on_timeout_packet_validate(&self.keeper, packet, relayer)
    }

    fn on_timeout_packet_execute(
        &mut self,
        packet: &Packet,
        relayer: &str,
    ) -> (ModuleExtras, Result<(), WasmError>) {
        on_timeout_packet_execute(&mut self.keeper, packet, relayer)
    }

    fn negotiate_app_version(
        &self,
        order: Order,
        connection_id: &ConnectionId,
        port_id: &PortId,
        counterparty: &Counterparty,
        proposed_version: &Version,
    ) -> Result<Version, WasmError> {
        negotiate_app_version(order, connection_id, port_id, counterparty, proposed_version)
    }
}
