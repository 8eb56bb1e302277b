//! The messages a contract receives on IBC channel and packet events.
//!
//! Each envelope is built fresh from protocol data for a single call and is
//! never persisted. The JSON layout follows what contracts expect from their
//! `ibc_*` entry points.
use core::fmt::{Display, Error as FmtError, Formatter};

use serde::{Deserialize, Serialize};

use crate::channel::{ChannelEnd, Counterparty, Order};
use crate::error::WasmError;
use crate::identifiers::{ChannelId, ConnectionId, PortId};
use crate::module::{ModuleEvent, ModuleEventAttribute};
use crate::packet::{Packet, TimeoutHeight};
use crate::prelude::*;
use crate::serializers::Binary;

/// Contract entry points invoked for IBC events.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EntryPoint {
    IbcChannelOpen,
    IbcChannelConnect,
    IbcChannelClose,
    IbcPacketReceive,
    IbcPacketAck,
    IbcPacketTimeout,
}

impl EntryPoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IbcChannelOpen => "ibc_channel_open",
            Self::IbcChannelConnect => "ibc_channel_connect",
            Self::IbcChannelClose => "ibc_channel_close",
            Self::IbcPacketReceive => "ibc_packet_receive",
            Self::IbcPacketAck => "ibc_packet_ack",
            Self::IbcPacketTimeout => "ibc_packet_timeout",
        }
    }
}

impl Display for EntryPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", self.as_str())
    }
}

#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Serialize, Deserialize)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IbcEndpoint {
    pub port_id: String,
    pub channel_id: String,
}

impl IbcEndpoint {
    pub fn new(port_id: &PortId, channel_id: &ChannelId) -> Self {
        Self {
            port_id: port_id.to_string(),
            channel_id: channel_id.to_string(),
        }
    }

    /// The counterparty end; its channel id is empty until the handshake
    /// assigned one.
    pub fn from_counterparty(counterparty: &Counterparty) -> Self {
        Self {
            port_id: counterparty.port_id().to_string(),
            channel_id: counterparty
                .channel_id()
                .map(ToString::to_string)
                .unwrap_or_default(),
        }
    }
}

#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Serialize, Deserialize)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IbcOrder {
    #[serde(rename = "ORDER_UNORDERED")]
    Unordered,
    #[serde(rename = "ORDER_ORDERED")]
    Ordered,
}

impl TryFrom<Order> for IbcOrder {
    type Error = WasmError;

    fn try_from(order: Order) -> Result<Self, Self::Error> {
        match order {
            Order::Unordered => Ok(Self::Unordered),
            Order::Ordered => Ok(Self::Ordered),
            Order::None => Err(WasmError::UnspecifiedOrder),
        }
    }
}

/// The channel as a contract sees it.
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Serialize, Deserialize)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IbcChannel {
    pub endpoint: IbcEndpoint,
    pub counterparty_endpoint: IbcEndpoint,
    pub order: IbcOrder,
    pub version: String,
    pub connection_id: String,
}

impl IbcChannel {
    /// Builds the channel from handshake arguments, before the protocol
    /// layer stored a channel end.
    pub fn new(
        order: Order,
        connection_id: &ConnectionId,
        port_id: &PortId,
        channel_id: &ChannelId,
        counterparty: &Counterparty,
        version: &str,
    ) -> Result<Self, WasmError> {
        Ok(Self {
            endpoint: IbcEndpoint::new(port_id, channel_id),
            counterparty_endpoint: IbcEndpoint::from_counterparty(counterparty),
            order: order.try_into()?,
            version: version.to_string(),
            connection_id: connection_id.to_string(),
        })
    }

    /// Builds the channel from a stored channel end.
    pub fn from_channel_end(
        port_id: &PortId,
        channel_id: &ChannelId,
        channel_end: &ChannelEnd,
    ) -> Result<Self, WasmError> {
        Self::new(
            channel_end.ordering,
            channel_end.connection_id()?,
            port_id,
            channel_id,
            channel_end.counterparty(),
            channel_end.version().as_str(),
        )
    }
}

#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IbcChannelOpenMsg {
    OpenInit {
        channel: IbcChannel,
    },
    OpenTry {
        channel: IbcChannel,
        counterparty_version: String,
    },
}

impl IbcChannelOpenMsg {
    pub fn channel(&self) -> &IbcChannel {
        match self {
            Self::OpenInit { channel } | Self::OpenTry { channel, .. } => channel,
        }
    }
}

#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IbcChannelConnectMsg {
    OpenAck {
        channel: IbcChannel,
        counterparty_version: String,
    },
    OpenConfirm {
        channel: IbcChannel,
    },
}

impl IbcChannelConnectMsg {
    pub fn channel(&self) -> &IbcChannel {
        match self {
            Self::OpenAck { channel, .. } | Self::OpenConfirm { channel } => channel,
        }
    }
}

#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IbcChannelCloseMsg {
    CloseInit { channel: IbcChannel },
    CloseConfirm { channel: IbcChannel },
}

impl IbcChannelCloseMsg {
    pub fn channel(&self) -> &IbcChannel {
        match self {
            Self::CloseInit { channel } | Self::CloseConfirm { channel } => channel,
        }
    }
}

/// Timestamp in nanoseconds since the Unix epoch, carried as a string.
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Serialize, Deserialize)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct IbcTimestamp(#[serde(with = "crate::serializers")] pub u64);

#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Serialize, Deserialize)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IbcTimeoutBlock {
    pub revision: u64,
    pub height: u64,
}

/// Packet timeout. At least one of block and timestamp is set for a packet
/// that can be sent.
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Serialize, Deserialize)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct IbcTimeout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<IbcTimeoutBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<IbcTimestamp>,
}

impl IbcTimeout {
    /// Protocol-side timeout: a zero height or a zero timestamp means unset.
    pub fn new(timeout_height: TimeoutHeight, timeout_timestamp: u64) -> Self {
        let block = match timeout_height {
            TimeoutHeight::At(height) if !height.is_zero() => Some(IbcTimeoutBlock {
                revision: height.revision_number,
                height: height.revision_height,
            }),
            _ => None,
        };
        let timestamp = (timeout_timestamp != 0).then_some(IbcTimestamp(timeout_timestamp));
        Self { block, timestamp }
    }

    pub fn is_empty(&self) -> bool {
        self.block.is_none() && self.timestamp.is_none()
    }
}

#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Serialize, Deserialize)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IbcPacket {
    pub data: Binary,
    pub src: IbcEndpoint,
    pub dest: IbcEndpoint,
    pub sequence: u64,
    pub timeout: IbcTimeout,
}

impl From<&Packet> for IbcPacket {
    fn from(packet: &Packet) -> Self {
        Self {
            data: Binary::from(packet.data.as_slice()),
            src: IbcEndpoint::new(&packet.port_id_on_a, &packet.chan_id_on_a),
            dest: IbcEndpoint::new(&packet.port_id_on_b, &packet.chan_id_on_b),
            sequence: packet.seq_on_a.value(),
            timeout: IbcTimeout::new(packet.timeout_height_on_b, packet.timeout_timestamp_on_b),
        }
    }
}

#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Serialize, Deserialize)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IbcAcknowledgement {
    pub data: Binary,
}

#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Serialize, Deserialize)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IbcPacketReceiveMsg {
    pub packet: IbcPacket,
    pub relayer: String,
}

#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Serialize, Deserialize)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IbcPacketAckMsg {
    pub acknowledgement: IbcAcknowledgement,
    pub original_packet: IbcPacket,
    pub relayer: String,
}

#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Serialize, Deserialize)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IbcPacketTimeoutMsg {
    pub packet: IbcPacket,
    pub relayer: String,
}

/// Answer of `ibc_channel_open`. A contract may pick a different version
/// than the proposed one.
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Serialize, Deserialize)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IbcChannelOpenResponse {
    pub version: String,
}

/// Key/value pair a contract attaches to its response.
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Serialize, Deserialize)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

/// Response of the connect, close, ack and timeout entry points.
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Serialize, Deserialize)]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IbcBasicResponse {
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

/// Response of `ibc_packet_receive`. A missing acknowledgement is relayed as
/// empty bytes.
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Serialize, Deserialize)]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IbcReceiveResponse {
    #[serde(default)]
    pub acknowledgement: Option<Binary>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

/// Kind of the event emitted for contract responses.
pub const WASM_EVENT_KIND: &str = "wasm";

/// Attribute carrying the emitting contract in [`WASM_EVENT_KIND`] events.
pub const CONTRACT_ADDRESS_ATTRIBUTE: &str = "_contract_address";

/// Builds the `wasm` event for a contract response. No event is emitted for
/// a response without attributes.
pub fn wasm_module_event(contract_address: &str, attributes: &[Attribute]) -> Option<ModuleEvent> {
    if attributes.is_empty() {
        return None;
    }
    let attributes = core::iter::once(ModuleEventAttribute::from((
        CONTRACT_ADDRESS_ATTRIBUTE,
        contract_address,
    )))
    .chain(
        attributes
            .iter()
            .map(|attr| ModuleEventAttribute::from((&attr.key, &attr.value))),
    )
    .collect();

    Some(ModuleEvent {
        kind: WASM_EVENT_KIND.to_string(),
        attributes,
    })
}
