//! The contract keeper: code artifacts, contract instances with their raw
//! state, auto-increment sequences and params, persisted in a [`Store`].
mod ibc;
pub mod keys;
mod storage;

use ibc_app_wasm_types::error::WasmError;
use ibc_app_wasm_types::genesis::{CodeInfo, ContractInfo, Model};
use ibc_app_wasm_types::identifiers::PortId;
use ibc_app_wasm_types::params::{AccessConfig, AccessType, Params};
use ibc_app_wasm_types::prelude::*;
use ibc_app_wasm_types::serializers::Binary;
use ibc_app_wasm_types::{CanonicalAddress, GasMeter, WasmConfig, KEY_LAST_CODE_ID};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, trace};

use self::keys::*;
use self::storage::store_error;
use crate::api::HostApi;
use crate::context::{PortKeeper, Store, WasmEngine};
use crate::port::ensure_ibc_port;

/// Keeps contract state in `S` and runs contracts on `E`.
#[derive(Debug)]
pub struct WasmKeeper<S, E> {
    store: S,
    engine: E,
    config: WasmConfig,
    api: HostApi,
    gas_meter: GasMeter,
}

impl<S, E> WasmKeeper<S, E>
where
    S: Store,
    E: WasmEngine,
{
    pub fn new(store: S, engine: E, config: WasmConfig) -> Result<Self, WasmError> {
        let api = HostApi::from_config(&config)?;
        Ok(Self {
            store,
            engine,
            config,
            api,
            gas_meter: GasMeter::infinite(),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn config(&self) -> &WasmConfig {
        &self.config
    }

    pub fn host_api(&self) -> &HostApi {
        &self.api
    }

    pub fn gas_meter(&self) -> &GasMeter {
        &self.gas_meter
    }

    /// Installs the meter the next contract calls are charged on.
    pub fn set_gas_meter(&mut self, gas_meter: GasMeter) {
        self.gas_meter = gas_meter;
    }

    /// Stored params, or the defaults if none were set.
    pub fn get_params(&self) -> Result<Params, WasmError> {
        Ok(self.read(PARAMS_KEY)?.unwrap_or_default())
    }

    pub fn set_params(&mut self, params: &Params) -> Result<(), WasmError> {
        params.validate_basic(self.api.codec())?;
        self.write(PARAMS_KEY.to_vec(), params)
    }

    pub fn get_code_info(&self, code_id: u64) -> Result<Option<CodeInfo>, WasmError> {
        self.read(&code_key(code_id))
    }

    /// Stores `wasm_code` under `code_id`. The checksum the engine computes
    /// must match the declared code hash.
    pub fn import_code(
        &mut self,
        code_id: u64,
        code_info: &CodeInfo,
        wasm_code: &[u8],
    ) -> Result<(), WasmError> {
        let checksum = self.engine.store_code(wasm_code).map_err(WasmError::Engine)?;
        if checksum.as_slice() != code_info.code_hash.as_slice() {
            return Err(WasmError::InvalidGenesis {
                description: "code hashes not same".to_string(),
            });
        }

        let key = code_key(code_id);
        if self.store.has(&key) {
            return Err(WasmError::Duplicate {
                description: format!("duplicate code: {code_id}"),
            });
        }
        self.write(key, code_info)?;
        debug!("imported code {code_id}");
        Ok(())
    }

    /// Uploads `wasm_code` under the next code id, as a store-code message
    /// does, and returns that id.
    pub fn create_code(
        &mut self,
        creator: &str,
        wasm_code: &[u8],
        instantiate_permission: Option<&AccessConfig>,
    ) -> Result<u64, WasmError> {
        let params = self.get_params()?;
        if !params.code_upload_access.allowed(creator) {
            return Err(WasmError::Unauthorized {
                description: format!("{creator} may not upload code"),
            });
        }
        if wasm_code.len() as u64 > params.max_wasm_code_size {
            return Err(WasmError::InvalidParams {
                description: format!(
                    "code of {} bytes exceeds the limit of {}",
                    wasm_code.len(),
                    params.max_wasm_code_size
                ),
            });
        }

        let checksum = self.engine.store_code(wasm_code).map_err(WasmError::Engine)?;
        let instantiate_config = match instantiate_permission {
            Some(config) => config.clone(),
            None if params.instantiate_default_permission == AccessType::OnlyAddress => {
                AccessConfig::only_address(creator)
            }
            None => AccessConfig {
                permission: params.instantiate_default_permission,
                address: String::new(),
            },
        };
        let code_id = self.auto_increment_id(KEY_LAST_CODE_ID)?;
        let code_info = CodeInfo {
            code_hash: Binary::from(checksum),
            creator: creator.to_string(),
            instantiate_config,
        };
        self.write(code_key(code_id), &code_info)?;
        debug!("stored code {code_id} for {creator}");
        Ok(code_id)
    }

    pub fn get_byte_code(&self, code_id: u64) -> Result<Vec<u8>, WasmError> {
        let code_info = self.code_info_or_not_found(code_id)?;
        self.engine
            .get_code(code_info.code_hash.as_slice())
            .map_err(WasmError::Engine)
    }

    /// Keeps the compiled code in the engine's memory cache.
    pub fn pin_code(&mut self, code_id: u64) -> Result<(), WasmError> {
        let code_info = self.code_info_or_not_found(code_id)?;
        self.engine
            .pin(code_info.code_hash.as_slice())
            .map_err(WasmError::Engine)?;
        self.store
            .set(pinned_code_key(code_id), vec![1])
            .map_err(store_error)?;
        debug!("pinned code {code_id}");
        Ok(())
    }

    pub fn is_pinned_code(&self, code_id: u64) -> bool {
        self.store.has(&pinned_code_key(code_id))
    }

    /// All code infos, in ascending id order.
    pub fn code_infos(&self) -> Result<Vec<(u64, CodeInfo)>, WasmError> {
        self.store
            .get_keys(CODE_KEY_PREFIX)
            .into_iter()
            .map(|key| {
                let code_id = code_id_from_key(&key)?;
                Ok((code_id, self.code_info_or_not_found(code_id)?))
            })
            .collect()
    }

    pub fn get_contract_info(
        &self,
        contract: &CanonicalAddress,
    ) -> Result<Option<ContractInfo>, WasmError> {
        self.read(&contract_key(contract))
    }

    /// All contracts, in address order.
    pub fn contract_infos(&self) -> Result<Vec<(CanonicalAddress, ContractInfo)>, WasmError> {
        self.store
            .get_keys(CONTRACT_KEY_PREFIX)
            .into_iter()
            .map(|key| {
                let info = self.read(&key)?.ok_or_else(|| WasmError::Store {
                    description: format!("contract key `{}` vanished", hex::encode(&key)),
                })?;
                Ok((contract_from_key(&key)?, info))
            })
            .collect()
    }

    /// Adds a contract with its state. The code must exist and the address
    /// must be free.
    pub fn import_contract(
        &mut self,
        contract: &CanonicalAddress,
        info: &ContractInfo,
        state: &[Model],
    ) -> Result<(), WasmError> {
        if !self.store.has(&code_key(info.code_id)) {
            return Err(WasmError::NotFound {
                description: format!("code id: {}", info.code_id),
            });
        }
        let key = contract_key(contract);
        if self.store.has(&key) {
            return Err(WasmError::Duplicate {
                description: format!("contract: {contract}"),
            });
        }
        self.write(key, info)?;
        self.import_contract_state(contract, state)?;
        debug!("imported contract {contract} of code {}", info.code_id);
        Ok(())
    }

    /// Writes raw state entries. A key may be written only once.
    pub fn import_contract_state(
        &mut self,
        contract: &CanonicalAddress,
        state: &[Model],
    ) -> Result<(), WasmError> {
        let prefix = contract_store_prefix(contract);
        for model in state {
            let key = storage::namespaced(&prefix, model.key.as_slice());
            if self.store.has(&key) {
                return Err(WasmError::Duplicate {
                    description: format!("duplicate key: {}", hex::encode(model.key.as_slice())),
                });
            }
            self.store
                .set(key, model.value.to_vec())
                .map_err(store_error)?;
        }
        Ok(())
    }

    /// Full state of `contract`, in key order.
    pub fn contract_state(&self, contract: &CanonicalAddress) -> Vec<Model> {
        let prefix = contract_store_prefix(contract);
        self.store
            .get_keys(&prefix)
            .into_iter()
            .filter_map(|key| {
                let value = self.store.get(&key)?;
                Some(Model::new(&key[prefix.len()..], value))
            })
            .collect()
    }

    /// Next value of the sequence `key`. An unset sequence starts at 1.
    pub fn peek_auto_increment_id(&self, key: &[u8]) -> Result<u64, WasmError> {
        match self.store.get(&sequence_key(key)) {
            Some(bytes) => decode_sequence(&bytes),
            None => Ok(1),
        }
    }

    /// Takes the next value of the sequence `key`.
    pub fn auto_increment_id(&mut self, key: &[u8]) -> Result<u64, WasmError> {
        let id = self.peek_auto_increment_id(key)?;
        self.store
            .set(sequence_key(key), (id + 1).to_be_bytes().to_vec())
            .map_err(store_error)?;
        Ok(id)
    }

    /// Sets the sequence `key`, which must be unset.
    pub fn import_auto_increment_id(&mut self, key: &[u8], value: u64) -> Result<(), WasmError> {
        let store_key = sequence_key(key);
        if self.store.has(&store_key) {
            return Err(WasmError::Duplicate {
                description: format!("autoincrement id: {}", String::from_utf8_lossy(key)),
            });
        }
        self.store
            .set(store_key, value.to_be_bytes().to_vec())
            .map_err(store_error)?;
        Ok(())
    }

    /// Binds the IBC port of an existing contract and records it on the
    /// contract.
    pub fn bind_contract_port(
        &mut self,
        ports: &mut impl PortKeeper,
        contract: &CanonicalAddress,
    ) -> Result<PortId, WasmError> {
        let mut info = self
            .get_contract_info(contract)?
            .ok_or_else(|| contract_not_found(contract))?;
        let port_id = ensure_ibc_port(ports, self.api.codec(), contract)?;
        info.ibc_port_id = port_id.to_string();
        self.write(contract_key(contract), &info)?;
        Ok(port_id)
    }

    fn code_info_or_not_found(&self, code_id: u64) -> Result<CodeInfo, WasmError> {
        self.get_code_info(code_id)?
            .ok_or_else(|| WasmError::NotFound {
                description: format!("code id: {code_id}"),
            })
    }

    fn read<T: DeserializeOwned>(&self, key: &[u8]) -> Result<Option<T>, WasmError> {
        self.store
            .get(key)
            .map(|bytes| serde_json::from_slice(&bytes))
            .transpose()
            .map_err(Into::into)
    }

    fn write<T: Serialize>(&mut self, key: Vec<u8>, value: &T) -> Result<(), WasmError> {
        trace!("write at key = {}", hex::encode(&key));
        let bytes = serde_json::to_vec(value)?;
        self.store.set(key, bytes).map_err(store_error)?;
        Ok(())
    }
}

fn contract_not_found(contract: &CanonicalAddress) -> WasmError {
    WasmError::NotFound {
        description: format!("contract: {contract}"),
    }
}
