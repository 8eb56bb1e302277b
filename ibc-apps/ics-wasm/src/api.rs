//! The address functions a running contract may call back into.
use ibc_app_wasm_types::error::WasmError;
use ibc_app_wasm_types::prelude::*;
use ibc_app_wasm_types::{AddressCodec, ApiCosts, CanonicalAddress, Gas, WasmConfig};

/// Version of the host function table handed to the sandbox.
pub const HOST_API_VERSION: u32 = 1;

/// Gas-priced address operations exposed to contracts.
///
/// Every call reports its sandbox gas cost next to the result, whether the
/// call succeeded or not. The table is fixed once built and shared by
/// reference with each contract invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostApi {
    codec: AddressCodec,
    costs: ApiCosts,
}

impl HostApi {
    pub fn new(codec: AddressCodec, costs: ApiCosts) -> Self {
        Self { codec, costs }
    }

    pub fn from_config(config: &WasmConfig) -> Result<Self, WasmError> {
        config.validate()?;
        Ok(Self::new(config.address_codec()?, config.api_costs()))
    }

    pub fn version(&self) -> u32 {
        HOST_API_VERSION
    }

    pub fn codec(&self) -> &AddressCodec {
        &self.codec
    }

    pub fn costs(&self) -> &ApiCosts {
        &self.costs
    }

    pub fn humanize_address(&self, canonical: &[u8]) -> (Result<String, WasmError>, Gas) {
        (self.codec.humanize(canonical), self.costs.humanize())
    }

    pub fn canonicalize_address(&self, human: &str) -> (Result<CanonicalAddress, WasmError>, Gas) {
        (self.codec.canonicalize(human), self.costs.canonicalize())
    }

    pub fn validate_address(&self, human: &str) -> (Result<(), WasmError>, Gas) {
        (self.codec.validate(human).map(|_| ()), self.costs.validate())
    }
}

impl Default for HostApi {
    fn default() -> Self {
        Self::new(AddressCodec::default(), ApiCosts::default())
    }
}
