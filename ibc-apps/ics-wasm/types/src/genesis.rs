//! The genesis document: params, code artifacts, contract instances with
//! their raw state, auto-increment sequences and messages to replay.
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::address::AddressCodec;
use crate::error::WasmError;
use crate::msgs::{validate_label, GenMsg};
use crate::params::{AccessConfig, Params};
use crate::prelude::*;
use crate::serializers::{Binary, HexBinary};

#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Serialize, Deserialize)]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenesisState {
    pub params: Params,
    #[serde(default)]
    pub codes: Vec<Code>,
    #[serde(default)]
    pub contracts: Vec<Contract>,
    #[serde(default)]
    pub sequences: Vec<Sequence>,
    #[serde(default)]
    pub gen_msgs: Vec<GenMsg>,
}

impl GenesisState {
    /// Stateless checks of every entry, reporting the position of the first
    /// offending one.
    pub fn validate_basic(&self, codec: &AddressCodec) -> Result<(), WasmError> {
        self.params
            .validate_basic(codec)
            .map_err(|e| invalid(format!("params: {e}")))?;
        for (i, code) in self.codes.iter().enumerate() {
            code.validate_basic(codec, self.params.max_wasm_code_size)
                .map_err(|e| invalid(format!("code: {i}: {e}")))?;
        }
        for (i, contract) in self.contracts.iter().enumerate() {
            contract
                .validate_basic(codec)
                .map_err(|e| invalid(format!("contract: {i}: {e}")))?;
        }
        for (i, sequence) in self.sequences.iter().enumerate() {
            sequence
                .validate_basic()
                .map_err(|e| invalid(format!("sequence: {i}: {e}")))?;
        }
        for (i, msg) in self.gen_msgs.iter().enumerate() {
            msg.validate_basic(codec)
                .map_err(|e| invalid(format!("gen message: {i}: {e}")))?;
        }
        Ok(())
    }
}

/// sha256 checksum identifying a code artifact.
pub fn code_checksum(code: &[u8]) -> Binary {
    Binary::new(Sha256::digest(code).to_vec())
}

/// Metadata of a stored code artifact.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Serialize, Deserialize)]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodeInfo {
    /// sha256 checksum of the bytecode.
    pub code_hash: Binary,
    pub creator: String,
    pub instantiate_config: AccessConfig,
}

impl CodeInfo {
    pub fn validate_basic(&self, codec: &AddressCodec) -> Result<(), WasmError> {
        if self.code_hash.is_empty() {
            return Err(invalid("code hash is empty"));
        }
        codec
            .canonicalize(&self.creator)
            .map_err(|e| invalid(format!("creator: {e}")))?;
        self.instantiate_config
            .validate_basic(codec)
            .map_err(|e| invalid(format!("instantiate config: {e}")))
    }
}

#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Serialize, Deserialize)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Code {
    pub code_id: u64,
    pub code_info: CodeInfo,
    pub code_bytes: Binary,
    #[serde(default)]
    pub pinned: bool,
}

impl Code {
    pub fn validate_basic(
        &self,
        codec: &AddressCodec,
        max_code_size: u64,
    ) -> Result<(), WasmError> {
        if self.code_id == 0 {
            return Err(invalid("code id is empty"));
        }
        self.code_info
            .validate_basic(codec)
            .map_err(|e| invalid(format!("code info: {e}")))?;
        if self.code_bytes.is_empty() {
            return Err(invalid("code bytes are empty"));
        }
        if self.code_bytes.len() as u64 > max_code_size {
            return Err(invalid(format!(
                "code bytes exceed max size {max_code_size}"
            )));
        }
        Ok(())
    }
}

/// Block height and transaction index a contract was created at.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Serialize, Deserialize)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct AbsoluteTxPosition {
    pub block_height: u64,
    pub tx_index: u64,
}

#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Serialize, Deserialize)]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContractInfo {
    pub code_id: u64,
    pub creator: String,
    #[serde(default)]
    pub admin: String,
    pub label: String,
    /// Redacted to `None` on export and required to be `None` on import.
    #[serde(default)]
    pub created: Option<AbsoluteTxPosition>,
    /// Port bound for the contract, empty if it never opened one.
    #[serde(default)]
    pub ibc_port_id: String,
}

impl ContractInfo {
    pub fn validate_basic(&self, codec: &AddressCodec) -> Result<(), WasmError> {
        if self.code_id == 0 {
            return Err(invalid("code id is empty"));
        }
        codec
            .canonicalize(&self.creator)
            .map_err(|e| invalid(format!("creator: {e}")))?;
        if !self.admin.is_empty() {
            codec
                .canonicalize(&self.admin)
                .map_err(|e| invalid(format!("admin: {e}")))?;
        }
        validate_label(&self.label)
    }
}

/// A single raw key-value pair of contract state.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Serialize, Deserialize)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Model {
    pub key: HexBinary,
    pub value: Binary,
}

impl Model {
    pub fn new(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: HexBinary::new(key.into()),
            value: Binary::new(value.into()),
        }
    }

    pub fn validate_basic(&self) -> Result<(), WasmError> {
        if self.key.is_empty() {
            return Err(invalid("key is empty"));
        }
        Ok(())
    }
}

#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Serialize, Deserialize)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Contract {
    pub contract_address: String,
    pub contract_info: ContractInfo,
    #[serde(default)]
    pub contract_state: Vec<Model>,
}

impl Contract {
    pub fn validate_basic(&self, codec: &AddressCodec) -> Result<(), WasmError> {
        codec
            .canonicalize(&self.contract_address)
            .map_err(|e| invalid(format!("contract address: {e}")))?;
        self.contract_info
            .validate_basic(codec)
            .map_err(|e| invalid(format!("contract info: {e}")))?;
        if self.contract_info.created.is_some() {
            return Err(invalid("created must be empty"));
        }
        for (i, model) in self.contract_state.iter().enumerate() {
            model
                .validate_basic()
                .map_err(|e| invalid(format!("contract state {i}: {e}")))?;
        }
        Ok(())
    }
}

/// Persisted value of an auto-increment sequence.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Serialize, Deserialize)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sequence {
    pub id_key: Binary,
    pub value: u64,
}

impl Sequence {
    pub fn new(id_key: &[u8], value: u64) -> Self {
        Self {
            id_key: Binary::from(id_key),
            value,
        }
    }

    pub fn validate_basic(&self) -> Result<(), WasmError> {
        if self.id_key.is_empty() {
            return Err(invalid("id key is empty"));
        }
        Ok(())
    }
}

fn invalid(description: impl ToString) -> WasmError {
    WasmError::InvalidGenesis {
        description: description.to_string(),
    }
}
