//! Packets as delivered by the protocol layer.
use core::fmt::{Display, Error as FmtError, Formatter};

use crate::identifiers::{ChannelId, PortId, Sequence};
use crate::prelude::*;

/// A block height on the counterparty chain.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(serde::Serialize, serde::Deserialize)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Height {
    pub revision_number: u64,
    pub revision_height: u64,
}

impl Height {
    pub fn new(revision_number: u64, revision_height: u64) -> Self {
        Self {
            revision_number,
            revision_height,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.revision_number == 0 && self.revision_height == 0
    }
}

impl Display for Height {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}-{}", self.revision_number, self.revision_height)
    }
}

/// Indicates a consensus height on the destination chain after which the
/// packet will no longer be processed, and will instead count as having
/// timed-out.
///
/// On the wire a zero height means "no timeout"; `Never` is its typed form.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(serde::Serialize, serde::Deserialize)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TimeoutHeight {
    #[default]
    Never,
    At(Height),
}

impl TimeoutHeight {
    pub fn no_timeout() -> Self {
        Self::Never
    }

    pub fn is_set(&self) -> bool {
        match self {
            Self::At(height) => !height.is_zero(),
            Self::Never => false,
        }
    }
}

impl From<Height> for TimeoutHeight {
    fn from(height: Height) -> Self {
        if height.is_zero() {
            Self::Never
        } else {
            Self::At(height)
        }
    }
}

/// The packet type; this is what applications send to one another.
///
/// Each application defines the structure of the `data` field. Timestamps
/// are Unix nanoseconds; zero means the packet never times out by time.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(serde::Serialize, serde::Deserialize)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Packet {
    pub seq_on_a: Sequence,
    pub port_id_on_a: PortId,
    pub chan_id_on_a: ChannelId,
    pub port_id_on_b: PortId,
    pub chan_id_on_b: ChannelId,
    pub data: Vec<u8>,
    pub timeout_height_on_b: TimeoutHeight,
    pub timeout_timestamp_on_b: u64,
}
