//! Host identifiers as described by ICS-24, limited to the ones the channel
//! and packet callbacks carry.
use core::fmt::{Display, Error as FmtError, Formatter};
use core::str::FromStr;

use derive_more::{From, Into};

use crate::error::IdentifierError as Error;
use crate::prelude::*;

const VALID_SPECIAL_CHARS: &str = "._+-#[]<>";

const CHANNEL_ID_PREFIX: &str = "channel";

const CONNECTION_ID_PREFIX: &str = "connection";

/// Checks that the identifier only contains alphanumerics or one of
/// `.`, `_`, `+`, `-`, `#`, `[`, `]`, `<`, `>`.
pub fn validate_identifier_chars(id: &str) -> Result<(), Error> {
    if !id
        .chars()
        .all(|c| c.is_alphanumeric() || VALID_SPECIAL_CHARS.contains(c))
    {
        return Err(Error::InvalidCharacter { id: id.into() });
    }

    Ok(())
}

/// Checks that the identifier length lies in `[min, max]`. Empty identifiers
/// are always rejected.
pub fn validate_identifier_length(id: &str, min: u64, max: u64) -> Result<(), Error> {
    let min = min.max(1);
    let length = id.len() as u64;
    if (min..=max).contains(&length) {
        Ok(())
    } else {
        Err(Error::InvalidLength {
            id: id.into(),
            min,
            max,
        })
    }
}

/// Parses a named u64 index of the form `{name}-{u64}` and returns the
/// index. Leading zeros are rejected so that every index has exactly one
/// spelling.
pub fn parse_named_u64_index(id: &str, name: &str) -> Result<u64, Error> {
    let number_s = id
        .strip_prefix(name)
        .and_then(|rest| rest.strip_prefix('-'))
        .ok_or_else(|| Error::InvalidPrefix { prefix: id.into() })?;

    if number_s.starts_with('0') && number_s.len() > 1 {
        return Err(Error::InvalidPrefix { prefix: id.into() });
    }

    number_s
        .parse::<u64>()
        .map_err(|_| Error::InvalidPrefix { prefix: id.into() })
}

/// A valid port identifier must be between 2-128 characters.
pub fn validate_port_identifier(id: &str) -> Result<(), Error> {
    validate_identifier_chars(id)?;
    validate_identifier_length(id, 2, 128)
}

/// A valid channel identifier must be between 8-64 characters and read
/// `channel-{u64}`.
pub fn validate_channel_identifier(id: &str) -> Result<(), Error> {
    validate_identifier_chars(id)?;
    validate_identifier_length(id, 8, 64)?;
    parse_named_u64_index(id, CHANNEL_ID_PREFIX)?;
    Ok(())
}

/// A valid connection identifier must be between 10-64 characters and read
/// `connection-{u64}`.
pub fn validate_connection_identifier(id: &str) -> Result<(), Error> {
    validate_identifier_chars(id)?;
    validate_identifier_length(id, 10, 64)?;
    parse_named_u64_index(id, CONNECTION_ID_PREFIX)?;
    Ok(())
}

#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(serde::Serialize, serde::Deserialize)]
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PortId(String);

impl PortId {
    pub fn new(id: String) -> Result<Self, Error> {
        validate_port_identifier(&id).map(|_| Self(id))
    }

    /// Wraps an identifier derived from already validated parts.
    pub fn new_unchecked(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl Display for PortId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PortId {
    type Err = Error;

    fn from_str(id: &str) -> Result<Self, Self::Err> {
        Self::new(id.to_string())
    }
}

impl AsRef<str> for PortId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(serde::Serialize, serde::Deserialize)]
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChannelId(String);

impl ChannelId {
    /// Builds a new channel identifier. Like client and connection
    /// identifiers, channel ids are deterministically formed from two
    /// elements: a prefix `channel`, and a monotonically increasing
    /// `counter`, separated by a dash "-".
    ///
    /// ```
    /// # use ibc_app_wasm_types::identifiers::ChannelId;
    /// let chan_id = ChannelId::new(27);
    /// assert_eq!(chan_id.to_string(), "channel-27");
    /// ```
    pub fn new(identifier: u64) -> Self {
        Self(format!("{CHANNEL_ID_PREFIX}-{identifier}"))
    }

    pub fn zero() -> Self {
        Self::new(0)
    }

    pub fn prefix() -> &'static str {
        CHANNEL_ID_PREFIX
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the counter embedded in the identifier.
    pub fn sequence(&self) -> Result<u64, Error> {
        parse_named_u64_index(&self.0, CHANNEL_ID_PREFIX)
    }
}

impl Display for ChannelId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ChannelId {
    type Err = Error;

    fn from_str(id: &str) -> Result<Self, Self::Err> {
        validate_channel_identifier(id).map(|_| Self(id.to_string()))
    }
}

impl AsRef<str> for ChannelId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(serde::Serialize, serde::Deserialize)]
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new(identifier: u64) -> Self {
        Self(format!("{CONNECTION_ID_PREFIX}-{identifier}"))
    }

    pub fn zero() -> Self {
        Self::new(0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ConnectionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ConnectionId {
    type Err = Error;

    fn from_str(id: &str) -> Result<Self, Self::Err> {
        validate_connection_identifier(id).map(|_| Self(id.to_string()))
    }
}

/// The sequence number of a packet enforces ordering among packets from the
/// same source.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(serde::Serialize, serde::Deserialize)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, From, Into)]
pub struct Sequence(u64);

impl Sequence {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl Display for Sequence {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", self.0)
    }
}
