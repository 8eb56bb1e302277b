use serde::{Deserialize, Serialize};

use crate::error::WasmError;
use crate::prelude::*;

/// Gas units. Whether they are sandbox or SDK units depends on the call site.
pub type Gas = u64;

/// Ratio between sandbox gas and SDK gas.
pub const DEFAULT_GAS_MULTIPLIER: u64 = 140_000_000;

/// SDK gas charged for turning a canonical address into its bech32 form.
pub const DEFAULT_GAS_COST_HUMANIZE: Gas = 5;

/// SDK gas charged for decoding a bech32 address.
pub const DEFAULT_GAS_COST_CANONICALIZE: Gas = 4;

/// SDK gas charged for validating a bech32 address.
pub const DEFAULT_GAS_COST_VALIDATE: Gas =
    DEFAULT_GAS_COST_HUMANIZE + DEFAULT_GAS_COST_CANONICALIZE;

/// SDK gas charged per byte of JSON handed to a contract.
pub const DEFAULT_DESERIALIZATION_COST_PER_BYTE: Gas = 1;

/// Sandbox gas charged by each host address operation.
///
/// Validation costs a humanize plus a canonicalize.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ApiCosts {
    pub humanize_cost: Gas,
    pub canonicalize_cost: Gas,
}

impl ApiCosts {
    pub fn new(humanize_cost: Gas, canonicalize_cost: Gas) -> Self {
        Self {
            humanize_cost,
            canonicalize_cost,
        }
    }

    /// The default schedule scaled by `multiplier`.
    pub fn with_multiplier(multiplier: u64) -> Self {
        Self::new(
            DEFAULT_GAS_COST_HUMANIZE.saturating_mul(multiplier),
            DEFAULT_GAS_COST_CANONICALIZE.saturating_mul(multiplier),
        )
    }

    pub fn humanize(&self) -> Gas {
        self.humanize_cost
    }

    pub fn canonicalize(&self) -> Gas {
        self.canonicalize_cost
    }

    pub fn validate(&self) -> Gas {
        self.humanize_cost.saturating_add(self.canonicalize_cost)
    }
}

impl Default for ApiCosts {
    fn default() -> Self {
        Self::with_multiplier(DEFAULT_GAS_MULTIPLIER)
    }
}

/// Converts SDK gas into sandbox gas.
pub fn to_engine_gas(sdk_gas: Gas, multiplier: u64) -> Gas {
    sdk_gas.saturating_mul(multiplier)
}

/// Converts sandbox gas into SDK gas, rounding down.
pub fn to_sdk_gas(engine_gas: Gas, multiplier: u64) -> Gas {
    engine_gas.checked_div(multiplier).unwrap_or(engine_gas)
}

/// Tracks SDK gas consumed by one top-level call against its limit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GasMeter {
    limit: Gas,
    consumed: Gas,
}

impl GasMeter {
    pub fn new(limit: Gas) -> Self {
        Self { limit, consumed: 0 }
    }

    /// A meter that never runs out. Genesis runs under one.
    pub fn infinite() -> Self {
        Self::new(Gas::MAX)
    }

    pub fn limit(&self) -> Gas {
        self.limit
    }

    pub fn consumed(&self) -> Gas {
        self.consumed
    }

    pub fn remaining(&self) -> Gas {
        self.limit.saturating_sub(self.consumed)
    }

    /// Charges `amount`. Running past the limit pins the meter at the limit
    /// and fails.
    pub fn consume(&mut self, amount: Gas, descriptor: &str) -> Result<(), WasmError> {
        let wanted = self.consumed.saturating_add(amount);
        if wanted > self.limit {
            self.consumed = self.limit;
            return Err(WasmError::OutOfGas {
                descriptor: descriptor.to_string(),
                limit: self.limit,
                wanted,
            });
        }
        self.consumed = wanted;
        Ok(())
    }
}

impl Default for GasMeter {
    fn default() -> Self {
        Self::infinite()
    }
}
