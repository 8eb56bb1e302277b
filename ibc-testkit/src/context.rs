//! A keeper wired to in-memory collaborators, ready to drive callbacks.
use ibc_app_wasm::context::Store;
use ibc_app_wasm::keeper::WasmKeeper;
use ibc_app_wasm::router::IbcHandler;
use ibc_app_wasm::types::channel::ChannelEnd;
use ibc_app_wasm::types::genesis::{code_checksum, CodeInfo, ContractInfo};
use ibc_app_wasm::types::identifiers::{ChannelId, PortId};
use ibc_app_wasm::types::params::AccessConfig;
use ibc_app_wasm::types::prelude::*;
use ibc_app_wasm::types::{CanonicalAddress, WasmConfig};

use crate::store::MockStore;
use crate::fixtures::{dummy_creator, dummy_wasm_code};
use crate::testapp::{MockChannelKeeper, MockEngine, MockPortKeeper};

pub type MockKeeper = WasmKeeper<MockStore, MockEngine>;

/// The handler the protocol layer would route `wasm.` ports to.
pub type MockIbcHandler = IbcHandler<MockKeeper, MockChannelKeeper>;

#[derive(Debug)]
pub struct MockContext {
    pub keeper: MockKeeper,
    pub channels: MockChannelKeeper,
    pub ports: MockPortKeeper,
    engine: MockEngine,
}

impl Default for MockContext {
    fn default() -> Self {
        Self::new(WasmConfig::default())
    }
}

impl MockContext {
    pub fn new(config: WasmConfig) -> Self {
        let engine = MockEngine::default();
        let keeper = WasmKeeper::new(MockStore::default(), engine.clone(), config)
            .expect("valid keeper config");
        Self {
            keeper,
            channels: MockChannelKeeper::default(),
            ports: MockPortKeeper::default(),
            engine,
        }
    }

    /// A handle on the engine the keeper runs contracts on.
    pub fn engine(&self) -> &MockEngine {
        &self.engine
    }

    /// Stores `dummy_wasm_code(code_id)` under `code_id`.
    pub fn with_code(mut self, code_id: u64) -> Self {
        let code = dummy_wasm_code(code_id as u8);
        let info = CodeInfo {
            code_hash: code_checksum(&code),
            creator: dummy_creator(),
            instantiate_config: AccessConfig::everybody(),
        };
        self.keeper
            .import_code(code_id, &info, &code)
            .expect("fresh code id");
        self.commit()
    }

    /// Adds a contract of `code_id`, which must already be stored.
    pub fn with_contract(mut self, address: &CanonicalAddress, code_id: u64) -> Self {
        let info = ContractInfo {
            code_id,
            creator: dummy_creator(),
            label: "mock contract".to_string(),
            ..ContractInfo::default()
        };
        self.keeper
            .import_contract(address, &info, &[])
            .expect("fresh contract address");
        self.commit()
    }

    /// Adds a contract that bound its IBC port.
    pub fn with_ibc_contract(self, address: &CanonicalAddress, code_id: u64) -> Self {
        let mut ctx = self.with_contract(address, code_id);
        ctx.keeper
            .bind_contract_port(&mut ctx.ports, address)
            .expect("port is free");
        ctx.commit()
    }

    pub fn with_channel(
        mut self,
        port_id: PortId,
        channel_id: ChannelId,
        channel_end: ChannelEnd,
    ) -> Self {
        self.channels.insert_channel(port_id, channel_id, channel_end);
        self
    }

    pub fn into_handler(self) -> MockIbcHandler {
        IbcHandler::new(self.keeper, self.channels)
    }

    fn commit(mut self) -> Self {
        self.keeper
            .store_mut()
            .apply()
            .expect("in-memory store never fails");
        self
    }
}
