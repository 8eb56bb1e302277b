//! Defines the error types of the contract bridge.
use displaydoc::Display;

use crate::acknowledgement::StatusValue;
use crate::envelope::EntryPoint;
use crate::identifiers::{ChannelId, PortId};
use crate::prelude::*;

/// Errors that arise when parsing identifiers.
#[derive(Clone, Debug, Display, PartialEq, Eq)]
pub enum IdentifierError {
    /// id `{id}` has invalid length; must be between [`{min}`,`{max}`]
    InvalidLength { id: String, min: u64, max: u64 },
    /// id `{id}` can only contain alphanumeric characters or `.`, `_`, `+`, `-`, `#`, - `[`, `]`, `<`, `>`
    InvalidCharacter { id: String },
    /// invalid prefix: `{prefix}`
    InvalidPrefix { prefix: String },
}

/// Failure reported by the contract sandbox for a single invocation.
#[derive(Clone, Debug, Display, PartialEq, Eq)]
pub enum HostError {
    /// contract error: `{description}`
    Contract { description: String },
    /// sandbox ran out of gas
    OutOfGas,
    /// sandbox error: `{description}`
    Vm { description: String },
}

/// Errors returned by the port keeper when binding a port.
#[derive(Clone, Debug, Display, PartialEq, Eq)]
pub enum PortError {
    /// port `{port_id}` is already bound
    AlreadyBound { port_id: PortId },
    /// capability for port `{port_id}` is not owned by the caller
    CapabilityNotOwned { port_id: PortId },
    /// port error: `{description}`
    Other { description: String },
}

/// Position of the genesis entry an import step failed on.
#[derive(Clone, Debug, Display, PartialEq, Eq)]
pub enum ImportPosition {
    /// code {index} with id: {code_id}
    Code { index: usize, code_id: u64 },
    /// address in contract number {index}
    ContractAddress { index: usize },
    /// contract number {index}
    Contract { index: usize },
    /// sequence number {index}
    Sequence { index: usize },
}

#[derive(Debug, Display)]
pub enum WasmError {
    /// invalid address format: `{description}`
    InvalidAddressFormat { description: String },
    /// address not normalized: `{address}`
    NotNormalized { address: String },
    /// invalid port `{port_id}`: without `wasm.` prefix
    InvalidPortFormat { port_id: String },
    /// channel sequence `{sequence}` is greater than max allowed channels `{max}`
    ChannelLimitExceeded { sequence: u64, max: u64 },
    /// invalid identifier: `{0}`
    InvalidIdentifier(IdentifierError),
    /// contract port id: {0}
    ContractPortId(Box<WasmError>),
    /// channel not found for port `{port_id}` and channel `{channel_id}`
    ChannelNotFound {
        port_id: PortId,
        channel_id: ChannelId,
    },
    /// channel ordering must be specified
    UnspecifiedOrder,
    /// invalid connection hops: expected exactly 1, got `{actual}`
    InvalidConnectionHops { actual: usize },
    /// port binding failed: `{0}`
    PortBinding(PortError),
    /// `{entry_point}` failed: `{source}`
    HostInvocationFailed {
        entry_point: EntryPoint,
        source: HostError,
    },
    /// wasm engine error: `{0}`
    Engine(HostError),
    /// {callback}: {cause}
    CallbackFailed {
        callback: &'static str,
        cause: Box<WasmError>,
    },
    /// import failed at {position}: `{cause}`
    ImportFailed {
        position: ImportPosition,
        cause: Box<WasmError>,
    },
    /// seq `{key}` with value: `{value}` must be greater than: `{max}`
    SequenceInvariantViolation { key: String, value: u64, max: u64 },
    /// genesis message `{index}` failed: `{cause}`
    GenesisMessageFailed { index: usize, cause: Box<WasmError> },
    /// not found: `{description}`
    NotFound { description: String },
    /// duplicate: `{description}`
    Duplicate { description: String },
    /// invalid genesis: `{description}`
    InvalidGenesis { description: String },
    /// invalid params: `{description}`
    InvalidParams { description: String },
    /// unauthorized: `{description}`
    Unauthorized { description: String },
    /// invalid configuration: `{description}`
    InvalidConfig { description: String },
    /// contract `{contract}` has no IBC port bound
    NotIbcContract { contract: String },
    /// invalid packet timeout: neither timeout height nor timeout timestamp is set
    EmptyTimeout,
    /// empty acknowledgement status not allowed
    EmptyAcknowledgementStatus,
    /// out of gas in `{descriptor}`: limit `{limit}`, wanted `{wanted}`
    OutOfGas {
        descriptor: String,
        limit: u64,
        wanted: u64,
    },
    /// store error: `{description}`
    Store { description: String },
    /// serialization error: `{description}`
    Serialization { description: String },
    /// validator set update failed: `{description}`
    ValidatorSetUpdate { description: String },
}

impl WasmError {
    /// Attaches the position of a failing genesis entry.
    pub fn at(self, position: ImportPosition) -> Self {
        Self::ImportFailed {
            position,
            cause: Box::new(self),
        }
    }

    /// Marks a failure to resolve the contract behind a port.
    pub fn contract_port_id(self) -> Self {
        Self::ContractPortId(Box::new(self))
    }

    /// Names the callback a failure surfaced in.
    pub fn in_callback(self, callback: &'static str) -> Self {
        Self::CallbackFailed {
            callback,
            cause: Box::new(self),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for IdentifierError {}

#[cfg(feature = "std")]
impl std::error::Error for HostError {}

#[cfg(feature = "std")]
impl std::error::Error for PortError {}

#[cfg(feature = "std")]
impl std::error::Error for WasmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::InvalidIdentifier(e) => Some(e),
            Self::PortBinding(e) => Some(e),
            Self::HostInvocationFailed { source: e, .. } | Self::Engine(e) => Some(e),
            Self::ContractPortId(e)
            | Self::CallbackFailed { cause: e, .. }
            | Self::ImportFailed { cause: e, .. }
            | Self::GenesisMessageFailed { cause: e, .. } => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<IdentifierError> for WasmError {
    fn from(err: IdentifierError) -> Self {
        Self::InvalidIdentifier(err)
    }
}

impl From<PortError> for WasmError {
    fn from(err: PortError) -> Self {
        Self::PortBinding(err)
    }
}

impl From<serde_json::ser::Error> for WasmError {
    fn from(err: serde_json::ser::Error) -> Self {
        Self::Serialization {
            description: err.to_string(),
        }
    }
}

impl From<serde_json::de::Error> for WasmError {
    fn from(err: serde_json::de::Error) -> Self {
        Self::Serialization {
            description: err.to_string(),
        }
    }
}

impl From<WasmError> for StatusValue {
    fn from(err: WasmError) -> Self {
        StatusValue::new(err.to_string()).expect("error message must not be empty")
    }
}
