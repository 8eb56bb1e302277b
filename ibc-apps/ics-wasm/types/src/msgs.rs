//! Messages replayed at the end of genesis import.
use serde::{Deserialize, Serialize};

use crate::address::AddressCodec;
use crate::error::WasmError;
use crate::params::AccessConfig;
use crate::prelude::*;
use crate::serializers::Binary;

/// Maximum length of a contract label.
pub const MAX_LABEL_SIZE: usize = 128;

#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Serialize, Deserialize)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Coin {
    pub denom: String,
    #[serde(with = "crate::serializers")]
    pub amount: u128,
}

#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Serialize, Deserialize)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgStoreCode {
    pub sender: String,
    pub wasm_byte_code: Binary,
    #[serde(default)]
    pub instantiate_permission: Option<AccessConfig>,
}

impl MsgStoreCode {
    pub fn validate_basic(&self, codec: &AddressCodec) -> Result<(), WasmError> {
        codec.canonicalize(&self.sender)?;
        if self.wasm_byte_code.is_empty() {
            return Err(WasmError::InvalidGenesis {
                description: "empty wasm byte code".to_string(),
            });
        }
        if let Some(permission) = &self.instantiate_permission {
            permission.validate_basic(codec)?;
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
pub struct MsgInstantiateContract {
    pub sender: String,
    #[serde(default)]
    pub admin: String,
    pub code_id: u64,
    pub label: String,
    pub msg: Binary,
    #[serde(default)]
    pub funds: Vec<Coin>,
}

impl MsgInstantiateContract {
    pub fn validate_basic(&self, codec: &AddressCodec) -> Result<(), WasmError> {
        codec.canonicalize(&self.sender)?;
        if !self.admin.is_empty() {
            codec.canonicalize(&self.admin)?;
        }
        if self.code_id == 0 {
            return Err(WasmError::InvalidGenesis {
                description: "code id is required".to_string(),
            });
        }
        validate_label(&self.label)?;
        validate_msg(&self.msg)
    }
}

#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Serialize, Deserialize)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgExecuteContract {
    pub sender: String,
    pub contract: String,
    pub msg: Binary,
    #[serde(default)]
    pub funds: Vec<Coin>,
}

impl MsgExecuteContract {
    pub fn validate_basic(&self, codec: &AddressCodec) -> Result<(), WasmError> {
        codec.canonicalize(&self.sender)?;
        codec.canonicalize(&self.contract)?;
        validate_msg(&self.msg)
    }
}

/// One message of the genesis `gen_msgs` list.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenMsg {
    StoreCode(MsgStoreCode),
    InstantiateContract(MsgInstantiateContract),
    ExecuteContract(MsgExecuteContract),
}

impl GenMsg {
    pub fn validate_basic(&self, codec: &AddressCodec) -> Result<(), WasmError> {
        match self {
            Self::StoreCode(msg) => msg.validate_basic(codec),
            Self::InstantiateContract(msg) => msg.validate_basic(codec),
            Self::ExecuteContract(msg) => msg.validate_basic(codec),
        }
    }

    pub fn sender(&self) -> &str {
        match self {
            Self::StoreCode(msg) => &msg.sender,
            Self::InstantiateContract(msg) => &msg.sender,
            Self::ExecuteContract(msg) => &msg.sender,
        }
    }
}

pub(crate) fn validate_label(label: &str) -> Result<(), WasmError> {
    if label.trim().is_empty() {
        return Err(WasmError::InvalidGenesis {
            description: "label is required".to_string(),
        });
    }
    if label.len() > MAX_LABEL_SIZE {
        return Err(WasmError::InvalidGenesis {
            description: format!("label cannot be longer than {MAX_LABEL_SIZE} characters"),
        });
    }
    Ok(())
}

/// Contract messages are raw JSON objects.
fn validate_msg(msg: &Binary) -> Result<(), WasmError> {
    match msg.as_slice().first() {
        Some(b'{') => Ok(()),
        _ => Err(WasmError::InvalidGenesis {
            description: "msg must be a json object".to_string(),
        }),
    }
}
