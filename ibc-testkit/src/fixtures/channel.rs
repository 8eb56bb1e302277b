use ibc_app_wasm::types::channel::{ChannelEnd, Counterparty, Order, State, Version};
use ibc_app_wasm::types::identifiers::{ChannelId, ConnectionId, PortId, Sequence};
use ibc_app_wasm::types::packet::{Packet, TimeoutHeight};
use ibc_app_wasm::types::prelude::*;
use typed_builder::TypedBuilder;

/// Configuration of a channel end as the protocol layer stores it.
#[derive(TypedBuilder, Debug)]
#[builder(build_method(into = ChannelEnd))]
pub struct ChannelEndConfig {
    #[builder(default = State::Open)]
    pub state: State,
    #[builder(default = Order::Unordered)]
    pub ordering: Order,
    #[builder(default = PortId::new_unchecked("transfer".to_string()))]
    pub counterparty_port_id: PortId,
    #[builder(default = Some(ChannelId::zero()))]
    pub counterparty_channel_id: Option<ChannelId>,
    #[builder(default = vec![ConnectionId::zero()])]
    pub connection_hops: Vec<ConnectionId>,
    #[builder(default = Version::from("ics20-1"))]
    pub version: Version,
}

impl From<ChannelEndConfig> for ChannelEnd {
    fn from(config: ChannelEndConfig) -> Self {
        ChannelEnd {
            state: config.state,
            ordering: config.ordering,
            remote: Counterparty::new(
                config.counterparty_port_id,
                config.counterparty_channel_id,
            ),
            connection_hops: config.connection_hops,
            version: config.version,
        }
    }
}

/// Configuration of the `Packet` type for building dummy packets.
#[derive(TypedBuilder, Debug)]
#[builder(build_method(into = Packet))]
pub struct PacketConfig {
    #[builder(default = Sequence::from(1))]
    pub seq_on_a: Sequence,
    #[builder(default = PortId::new_unchecked("transfer".to_string()))]
    pub port_id_on_a: PortId,
    #[builder(default = ChannelId::zero())]
    pub chan_id_on_a: ChannelId,
    pub port_id_on_b: PortId,
    #[builder(default = ChannelId::new(1))]
    pub chan_id_on_b: ChannelId,
    #[builder(default = b"{}".to_vec())]
    pub data: Vec<u8>,
    #[builder(default = TimeoutHeight::Never)]
    pub timeout_height_on_b: TimeoutHeight,
    #[builder(default = 0)]
    pub timeout_timestamp_on_b: u64,
}

impl From<PacketConfig> for Packet {
    fn from(config: PacketConfig) -> Self {
        Packet {
            seq_on_a: config.seq_on_a,
            port_id_on_a: config.port_id_on_a,
            chan_id_on_a: config.chan_id_on_a,
            port_id_on_b: config.port_id_on_b,
            chan_id_on_b: config.chan_id_on_b,
            data: config.data,
            timeout_height_on_b: config.timeout_height_on_b,
            timeout_timestamp_on_b: config.timeout_timestamp_on_b,
        }
    }
}
