use serde::{Deserialize, Serialize};

use crate::address::AddressCodec;
use crate::error::WasmError;
use crate::gas::{ApiCosts, Gas, DEFAULT_GAS_MULTIPLIER};
use crate::prelude::*;
use crate::DEFAULT_BECH32_PREFIX;

/// Process-wide configuration of the contract bridge, fixed when the keeper
/// is constructed.
///
/// Reads from JSON such as
/// `{"bech32Prefix":"meme","apiCosts":{"humanizeCost":1,"canonicalizeCost":2}}`;
/// missing keys take their defaults.
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WasmConfig {
    pub bech32_prefix: String,
    pub gas_multiplier: u64,
    /// Explicit host API costs. When unset they follow `gas_multiplier`.
    pub api_costs: Option<ApiCosts>,
}

impl Default for WasmConfig {
    fn default() -> Self {
        Self {
            bech32_prefix: DEFAULT_BECH32_PREFIX.to_string(),
            gas_multiplier: DEFAULT_GAS_MULTIPLIER,
            api_costs: None,
        }
    }
}

impl WasmConfig {
    pub fn with_api_costs(self, humanize_cost: Gas, canonicalize_cost: Gas) -> Self {
        Self {
            api_costs: Some(ApiCosts::new(humanize_cost, canonicalize_cost)),
            ..self
        }
    }

    pub fn with_gas_multiplier(self, gas_multiplier: u64) -> Self {
        Self {
            gas_multiplier,
            ..self
        }
    }

    pub fn with_bech32_prefix(self, prefix: impl Into<String>) -> Self {
        Self {
            bech32_prefix: prefix.into(),
            ..self
        }
    }

    pub fn api_costs(&self) -> ApiCosts {
        self.api_costs
            .unwrap_or_else(|| ApiCosts::with_multiplier(self.gas_multiplier))
    }

    pub fn address_codec(&self) -> Result<AddressCodec, WasmError> {
        AddressCodec::new(self.bech32_prefix.clone())
    }

    pub fn validate(&self) -> Result<(), WasmError> {
        if self.gas_multiplier == 0 {
            return Err(WasmError::InvalidConfig {
                description: "gas multiplier must be positive".to_string(),
            });
        }
        self.address_codec().map(|_| ())
    }
}
