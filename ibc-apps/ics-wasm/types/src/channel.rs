//! Channel metadata as reported by the protocol layer.
use core::fmt::{Display, Error as FmtError, Formatter};

use crate::error::WasmError;
use crate::identifiers::{ChannelId, ConnectionId, PortId};
use crate::prelude::*;

/// Ordering of packet delivery on a channel.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(serde::Serialize, serde::Deserialize)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Order {
    #[default]
    None = 0,
    Unordered = 1,
    Ordered = 2,
}

impl Order {
    /// Yields the Order as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "ORDER_NONE_UNSPECIFIED",
            Self::Unordered => "ORDER_UNORDERED",
            Self::Ordered => "ORDER_ORDERED",
        }
    }
}

impl Display for Order {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", self.as_str())
    }
}

#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(serde::Serialize, serde::Deserialize)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum State {
    #[default]
    Uninitialized,
    Init,
    TryOpen,
    Open,
    Closed,
}

/// The remote end of a channel. The channel id is unknown until the
/// counterparty answered the handshake.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(serde::Serialize, serde::Deserialize)]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Counterparty {
    pub port_id: PortId,
    pub channel_id: Option<ChannelId>,
}

impl Counterparty {
    pub fn new(port_id: PortId, channel_id: Option<ChannelId>) -> Self {
        Self {
            port_id,
            channel_id,
        }
    }

    pub fn port_id(&self) -> &PortId {
        &self.port_id
    }

    pub fn channel_id(&self) -> Option<&ChannelId> {
        self.channel_id.as_ref()
    }
}

/// The version string a channel was opened with.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(serde::Serialize, serde::Deserialize)]
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Version(String);

impl Version {
    pub fn new(v: String) -> Self {
        Self(v)
    }

    pub fn empty() -> Self {
        Self::new(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Version {
    fn from(v: &str) -> Self {
        Self::new(v.to_string())
    }
}

/// A channel end as stored by the protocol layer.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(serde::Serialize, serde::Deserialize)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelEnd {
    pub state: State,
    pub ordering: Order,
    pub remote: Counterparty,
    pub connection_hops: Vec<ConnectionId>,
    pub version: Version,
}

impl ChannelEnd {
    pub fn validate_basic(&self) -> Result<(), WasmError> {
        if self.connection_hops.len() != 1 {
            return Err(WasmError::InvalidConnectionHops {
                actual: self.connection_hops.len(),
            });
        }
        Ok(())
    }

    /// The single connection the channel runs over. Multi-hop channels are
    /// not supported.
    pub fn connection_id(&self) -> Result<&ConnectionId, WasmError> {
        single_hop(&self.connection_hops)
    }

    pub fn counterparty(&self) -> &Counterparty {
        &self.remote
    }

    pub fn version(&self) -> &Version {
        &self.version
    }
}

/// Returns the only hop of a single-hop channel.
pub fn single_hop(connection_hops: &[ConnectionId]) -> Result<&ConnectionId, WasmError> {
    match connection_hops {
        [hop] => Ok(hop),
        _ => Err(WasmError::InvalidConnectionHops {
            actual: connection_hops.len(),
        }),
    }
}
