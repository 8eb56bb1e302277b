//! Module parameters kept in the store and carried by genesis.
use core::fmt::{Display, Error as FmtError, Formatter};

use serde::{Deserialize, Serialize};

use crate::address::AddressCodec;
use crate::error::WasmError;
use crate::prelude::*;

/// Upper bound on uploaded code, in bytes.
pub const DEFAULT_MAX_WASM_CODE_SIZE: u64 = 600 * 1024 * 2;

#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Serialize, Deserialize)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum AccessType {
    #[default]
    #[serde(rename = "ACCESS_TYPE_UNSPECIFIED")]
    Unspecified,
    #[serde(rename = "ACCESS_TYPE_NOBODY")]
    Nobody,
    #[serde(rename = "ACCESS_TYPE_ONLY_ADDRESS")]
    OnlyAddress,
    #[serde(rename = "ACCESS_TYPE_EVERYBODY")]
    Everybody,
}

impl AccessType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unspecified => "Unspecified",
            Self::Nobody => "Nobody",
            Self::OnlyAddress => "OnlyAddress",
            Self::Everybody => "Everybody",
        }
    }

    pub fn validate_basic(&self) -> Result<(), WasmError> {
        if *self == Self::Unspecified {
            return Err(WasmError::InvalidParams {
                description: "access type is empty".to_string(),
            });
        }
        Ok(())
    }
}

impl Display for AccessType {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", self.as_str())
    }
}

/// Who may perform a permissioned action.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Serialize, Deserialize)]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccessConfig {
    pub permission: AccessType,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub address: String,
}

impl AccessConfig {
    pub fn everybody() -> Self {
        Self {
            permission: AccessType::Everybody,
            address: String::new(),
        }
    }

    pub fn nobody() -> Self {
        Self {
            permission: AccessType::Nobody,
            address: String::new(),
        }
    }

    pub fn only_address(address: impl Into<String>) -> Self {
        Self {
            permission: AccessType::OnlyAddress,
            address: address.into(),
        }
    }

    /// An address is required for `OnlyAddress` and forbidden otherwise.
    pub fn validate_basic(&self, codec: &AddressCodec) -> Result<(), WasmError> {
        match self.permission {
            AccessType::Unspecified => Err(WasmError::InvalidParams {
                description: "access type is empty".to_string(),
            }),
            AccessType::Nobody | AccessType::Everybody if !self.address.is_empty() => {
                Err(WasmError::InvalidParams {
                    description: format!("address not allowed for type {}", self.permission),
                })
            }
            AccessType::Nobody | AccessType::Everybody => Ok(()),
            AccessType::OnlyAddress => codec.canonicalize(&self.address).map(|_| ()),
        }
    }

    pub fn allowed(&self, actor: &str) -> bool {
        match self.permission {
            AccessType::Everybody => true,
            AccessType::OnlyAddress => self.address == actor,
            AccessType::Nobody | AccessType::Unspecified => false,
        }
    }
}

#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Serialize, Deserialize)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Params {
    pub code_upload_access: AccessConfig,
    pub instantiate_default_permission: AccessType,
    pub max_wasm_code_size: u64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            code_upload_access: AccessConfig::everybody(),
            instantiate_default_permission: AccessType::Everybody,
            max_wasm_code_size: DEFAULT_MAX_WASM_CODE_SIZE,
        }
    }
}

impl Params {
    pub fn validate_basic(&self, codec: &AddressCodec) -> Result<(), WasmError> {
        self.instantiate_default_permission
            .validate_basic()
            .map_err(|e| WasmError::InvalidParams {
                description: format!("instantiate default permission: {e}"),
            })?;
        self.code_upload_access
            .validate_basic(codec)
            .map_err(|e| WasmError::InvalidParams {
                description: format!("upload access: {e}"),
            })?;
        if self.max_wasm_code_size == 0 {
            return Err(WasmError::InvalidParams {
                description: "max wasm code size must be greater 0".to_string(),
            });
        }
        Ok(())
    }
}
