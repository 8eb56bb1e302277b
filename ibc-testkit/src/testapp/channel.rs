use alloc::collections::BTreeMap;

use ibc_app_wasm::context::{ChannelCloser, ChannelReader, PacketSender};
use ibc_app_wasm::types::channel::{ChannelEnd, State};
use ibc_app_wasm::types::error::WasmError;
use ibc_app_wasm::types::identifiers::{ChannelId, PortId, Sequence};
use ibc_app_wasm::types::packet::TimeoutHeight;
use ibc_app_wasm::types::prelude::*;

/// A packet handed to [`MockChannelKeeper::send_packet`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentPacket {
    pub port_id: PortId,
    pub channel_id: ChannelId,
    pub sequence: Sequence,
    pub timeout_height: TimeoutHeight,
    pub timeout_timestamp: u64,
    pub data: Vec<u8>,
}

/// Channel ends keyed by port and channel, with a send sequence per channel.
#[derive(Clone, Debug, Default)]
pub struct MockChannelKeeper {
    channels: BTreeMap<(PortId, ChannelId), ChannelEnd>,
    next_sequence_send: BTreeMap<(PortId, ChannelId), u64>,
    pub sent_packets: Vec<SentPacket>,
}

impl MockChannelKeeper {
    pub fn with_channel(
        mut self,
        port_id: PortId,
        channel_id: ChannelId,
        channel_end: ChannelEnd,
    ) -> Self {
        self.channels.insert((port_id, channel_id), channel_end);
        self
    }

    pub fn insert_channel(
        &mut self,
        port_id: PortId,
        channel_id: ChannelId,
        channel_end: ChannelEnd,
    ) {
        self.channels.insert((port_id, channel_id), channel_end);
    }

    fn channel_or_not_found(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<&ChannelEnd, WasmError> {
        self.channels
            .get(&(port_id.clone(), channel_id.clone()))
            .ok_or_else(|| WasmError::ChannelNotFound {
                port_id: port_id.clone(),
                channel_id: channel_id.clone(),
            })
    }
}

impl ChannelReader for MockChannelKeeper {
    fn channel_end(&self, port_id: &PortId, channel_id: &ChannelId) -> Option<ChannelEnd> {
        self.channels
            .get(&(port_id.clone(), channel_id.clone()))
            .cloned()
    }
}

impl PacketSender for MockChannelKeeper {
    fn send_packet(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        timeout_height: TimeoutHeight,
        timeout_timestamp: u64,
        data: Vec<u8>,
    ) -> Result<Sequence, WasmError> {
        self.channel_or_not_found(port_id, channel_id)?;
        let next = self
            .next_sequence_send
            .entry((port_id.clone(), channel_id.clone()))
            .or_insert(1);
        let sequence = Sequence::from(*next);
        *next += 1;
        self.sent_packets.push(SentPacket {
            port_id: port_id.clone(),
            channel_id: channel_id.clone(),
            sequence,
            timeout_height,
            timeout_timestamp,
            data,
        });
        Ok(sequence)
    }
}

impl ChannelCloser for MockChannelKeeper {
    fn chan_close_init(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<(), WasmError> {
        self.channel_or_not_found(port_id, channel_id)?;
        if let Some(channel_end) = self
            .channels
            .get_mut(&(port_id.clone(), channel_id.clone()))
        {
            channel_end.state = State::Closed;
        }
        Ok(())
    }
}
