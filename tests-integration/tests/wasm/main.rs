mod adapter;
mod contract_msgs;
mod genesis;
mod lifecycle;
mod recv_packet;

use ibc_app_wasm::types::channel::{Counterparty, Order, Version};
use ibc_app_wasm::types::identifiers::{ChannelId, ConnectionId, PortId};
use ibc_app_wasm::types::packet::Packet;
use ibc_app_wasm::types::CanonicalAddress;
use ibc_wasm_testkit::context::MockContext;
use ibc_wasm_testkit::fixtures::{
    contract_port_id, dummy_contract_address, ChannelEndConfig, PacketConfig,
};

/// The contract every test talks to.
pub fn contract() -> CanonicalAddress {
    dummy_contract_address(0xAA)
}

pub fn transfer_port() -> PortId {
    "transfer".parse().expect("valid port")
}

pub fn channel_id() -> ChannelId {
    ChannelId::new(1)
}

pub fn counterparty() -> Counterparty {
    Counterparty::new(transfer_port(), None)
}

/// A context holding an IBC-enabled contract with an open channel on its port.
pub fn ibc_context() -> MockContext {
    MockContext::default()
        .with_code(1)
        .with_ibc_contract(&contract(), 1)
        .with_channel(
            contract_port_id(&contract()),
            channel_id(),
            ChannelEndConfig::builder()
                .version(Version::from("v1"))
                .build(),
        )
}

/// A packet the contract sent earlier.
pub fn outbound_packet() -> Packet {
    PacketConfig::builder()
        .port_id_on_a(contract_port_id(&contract()))
        .chan_id_on_a(channel_id())
        .port_id_on_b(transfer_port())
        .chan_id_on_b(ChannelId::zero())
        .build()
}

/// A packet addressed to the contract.
pub fn inbound_packet() -> Packet {
    PacketConfig::builder()
        .port_id_on_b(contract_port_id(&contract()))
        .chan_id_on_b(channel_id())
        .build()
}

pub fn open_args() -> (Order, Vec<ConnectionId>) {
    (Order::Unordered, vec![ConnectionId::zero()])
}
