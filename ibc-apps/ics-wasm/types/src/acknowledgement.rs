//! Acknowledgements produced when a contract receives a packet.

use core::fmt::{Debug, Display, Error as FmtError, Formatter};

use derive_more::{From, Into};

use crate::error::WasmError;
use crate::prelude::*;

/// Outcome of a packet receive as the channel layer sees it.
///
/// The success flag decides whether the state changes made while processing
/// the packet are committed; the bytes are what gets relayed back to the
/// sender.
pub trait PacketAcknowledgement: Debug {
    fn success(&self) -> bool;

    fn acknowledgement(&self) -> Vec<u8>;
}

/// Acknowledgement for a packet the contract processed without a host
/// failure.
///
/// It always reports success: once the contract call returned, its state
/// changes are committed, and any application-level failure lives inside
/// the opaque bytes.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[derive(Clone, Debug, Default, PartialEq, Eq, From, Into)]
pub struct ContractConfirmStateAck(Vec<u8>);

impl ContractConfirmStateAck {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl PacketAcknowledgement for ContractConfirmStateAck {
    fn success(&self) -> bool {
        true
    }

    fn acknowledgement(&self) -> Vec<u8> {
        self.0.clone()
    }
}

/// Acknowledgement the bridge writes itself when processing a received
/// packet fails before the contract produced one.
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(serde::Serialize, serde::Deserialize)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AcknowledgementStatus {
    /// Successful Acknowledgement
    /// e.g. `{"result":"AQ=="}`
    #[serde(rename = "result")]
    Success(StatusValue),
    /// Error Acknowledgement
    /// e.g. `{"error":"contract port id: invalid port"}`
    #[serde(rename = "error")]
    Error(StatusValue),
}

/// A wrapper type that guards variants of [`AcknowledgementStatus`] against
/// being constructed with an empty value.
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(serde::Serialize, serde::Deserialize)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusValue(String);

impl StatusValue {
    /// Constructs a new instance of `StatusValue` if the given value is not empty.
    pub fn new(value: impl ToString) -> Result<Self, WasmError> {
        let value = value.to_string();

        if value.is_empty() {
            return Err(WasmError::EmptyAcknowledgementStatus);
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for StatusValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", self.0)
    }
}

impl AcknowledgementStatus {
    pub fn error(value: StatusValue) -> Self {
        Self::Error(value)
    }

    pub fn is_successful(&self) -> bool {
        matches!(self, AcknowledgementStatus::Success(_))
    }
}

impl Display for AcknowledgementStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self {
            AcknowledgementStatus::Success(v) | AcknowledgementStatus::Error(v) => write!(f, "{v}"),
        }
    }
}

/// Converts an acknowledgement status into its JSON bytes. The value is
/// escaped, so error messages may carry quotes.
impl From<AcknowledgementStatus> for Vec<u8> {
    fn from(ack: AcknowledgementStatus) -> Self {
        serde_json::to_vec(&ack).expect("a single-entry string map always serializes")
    }
}

impl PacketAcknowledgement for AcknowledgementStatus {
    fn success(&self) -> bool {
        self.is_successful()
    }

    fn acknowledgement(&self) -> Vec<u8> {
        self.clone().into()
    }
}
