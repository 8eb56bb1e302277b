use alloc::collections::{BTreeMap, BTreeSet};
use alloc::sync::Arc;

use ibc_app_wasm::api::HostApi;
use ibc_app_wasm::context::{ContractStorage, IbcCall, WasmEngine};
use ibc_app_wasm::types::envelope::EntryPoint;
use ibc_app_wasm::types::error::HostError;
use ibc_app_wasm::types::genesis::code_checksum;
use ibc_app_wasm::types::prelude::*;
use ibc_app_wasm::types::{CanonicalAddress, Gas};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::debug;

/// What a contract does when one of its entry points is called.
#[derive(Clone, Debug)]
pub struct ScriptedCall {
    pub result: Result<Vec<u8>, HostError>,
    /// Sandbox gas reported on top of the host API costs.
    pub gas_used: Gas,
    /// Writes to the contract namespace; `None` removes the key.
    pub writes: Vec<(Vec<u8>, Option<Vec<u8>>)>,
}

impl ScriptedCall {
    pub fn ok(data: Vec<u8>) -> Self {
        Self {
            result: Ok(data),
            gas_used: 0,
            writes: Vec::new(),
        }
    }

    /// Answers with `response` as JSON.
    pub fn json(response: &impl Serialize) -> Self {
        Self::ok(serde_json::to_vec(response).expect("serializable response"))
    }

    pub fn contract_error(description: &str) -> Self {
        Self {
            result: Err(HostError::Contract {
                description: description.to_string(),
            }),
            ..Self::ok(Vec::new())
        }
    }

    pub fn with_gas(self, gas_used: Gas) -> Self {
        Self { gas_used, ..self }
    }

    pub fn with_write(mut self, key: &[u8], value: &[u8]) -> Self {
        self.writes.push((key.to_vec(), Some(value.to_vec())));
        self
    }

    pub fn with_removal(mut self, key: &[u8]) -> Self {
        self.writes.push((key.to_vec(), None));
        self
    }
}

impl Default for ScriptedCall {
    fn default() -> Self {
        Self::ok(Vec::new())
    }
}

/// A single entry point invocation as seen by the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedCall {
    pub entry_point: EntryPoint,
    pub contract_address: String,
    /// The contract address as canonicalized through the host API.
    pub canonical_address: Option<CanonicalAddress>,
    pub checksum: Vec<u8>,
    pub msg: Vec<u8>,
    pub gas_limit: Gas,
    pub api_version: u32,
}

impl RecordedCall {
    pub fn msg_str(&self) -> &str {
        core::str::from_utf8(&self.msg).expect("JSON envelope")
    }
}

#[derive(Debug, Default)]
struct EngineState {
    codes: BTreeMap<Vec<u8>, Vec<u8>>,
    pinned: BTreeSet<Vec<u8>>,
    pin_failure: Option<String>,
    scripts: BTreeMap<&'static str, ScriptedCall>,
    calls: Vec<RecordedCall>,
}

/// A contract engine that answers every entry point from a script.
///
/// Clones share their state, so a test keeps a handle to inspect the calls
/// after moving the engine into a keeper. Unscripted entry points succeed
/// with an empty answer.
#[derive(Clone, Debug, Default)]
pub struct MockEngine {
    state: Arc<Mutex<EngineState>>,
}

impl MockEngine {
    pub fn script(&self, entry_point: EntryPoint, call: ScriptedCall) {
        self.state.lock().scripts.insert(entry_point.as_str(), call);
    }

    pub fn fail_pinning(&self, description: &str) {
        self.state.lock().pin_failure = Some(description.to_string());
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().calls.clone()
    }

    pub fn last_call(&self) -> Option<RecordedCall> {
        self.state.lock().calls.last().cloned()
    }

    pub fn is_pinned(&self, checksum: &[u8]) -> bool {
        self.state.lock().pinned.contains(checksum)
    }
}

impl WasmEngine for MockEngine {
    fn store_code(&mut self, code: &[u8]) -> Result<Vec<u8>, HostError> {
        if code.is_empty() {
            return Err(HostError::Vm {
                description: "empty wasm code".to_string(),
            });
        }
        let checksum = code_checksum(code).into_vec();
        self.state.lock().codes.insert(checksum.clone(), code.to_vec());
        Ok(checksum)
    }

    fn get_code(&self, checksum: &[u8]) -> Result<Vec<u8>, HostError> {
        self.state
            .lock()
            .codes
            .get(checksum)
            .cloned()
            .ok_or_else(|| HostError::Vm {
                description: "code not found".to_string(),
            })
    }

    fn pin(&mut self, checksum: &[u8]) -> Result<(), HostError> {
        let mut state = self.state.lock();
        if let Some(description) = state.pin_failure.clone() {
            return Err(HostError::Vm { description });
        }
        if !state.codes.contains_key(checksum) {
            return Err(HostError::Vm {
                description: "code not found".to_string(),
            });
        }
        state.pinned.insert(checksum.to_vec());
        Ok(())
    }

    fn execute_ibc(
        &mut self,
        call: IbcCall<'_>,
        storage: &mut dyn ContractStorage,
        api: &HostApi,
    ) -> (Result<Vec<u8>, HostError>, Gas) {
        let (canonical_address, api_gas) = api.canonicalize_address(call.contract_address);

        let mut state = self.state.lock();
        state.calls.push(RecordedCall {
            entry_point: call.entry_point,
            contract_address: call.contract_address.to_string(),
            canonical_address: canonical_address.ok(),
            checksum: call.checksum.to_vec(),
            msg: call.msg.to_vec(),
            gas_limit: call.gas_limit,
            api_version: api.version(),
        });
        let script = state
            .scripts
            .get(call.entry_point.as_str())
            .cloned()
            .unwrap_or_default();
        drop(state);

        for (key, value) in &script.writes {
            match value {
                Some(value) => storage.set(key, value),
                None => storage.remove(key),
            }
        }

        let gas_used = script.gas_used.saturating_add(api_gas);
        debug!("mock engine ran {} using {gas_used}", call.entry_point);
        if gas_used > call.gas_limit {
            return (Err(HostError::OutOfGas), call.gas_limit);
        }
        (script.result, gas_used)
    }
}
