use ibc_app_wasm_types::envelope::{
    wasm_module_event, Attribute, EntryPoint, IbcBasicResponse, IbcChannelCloseMsg,
    IbcChannelConnectMsg, IbcChannelOpenMsg, IbcChannelOpenResponse, IbcPacketAckMsg,
    IbcPacketReceiveMsg, IbcPacketTimeoutMsg, IbcReceiveResponse,
};
use ibc_app_wasm_types::error::WasmError;
use ibc_app_wasm_types::identifiers::PortId;
use ibc_app_wasm_types::module::ModuleExtras;
use ibc_app_wasm_types::prelude::*;
use ibc_app_wasm_types::{
    to_engine_gas, to_sdk_gas, AddressCodec, CanonicalAddress,
    DEFAULT_DESERIALIZATION_COST_PER_BYTE,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::keys::contract_store_prefix;
use super::storage::{commit_writes, CachedContractStorage};
use super::{contract_not_found, WasmKeeper};
use crate::context::{IbcCall, IbcContractKeeper, Store, WasmEngine};

/// Raw answer of a contract entry point.
struct ContractResponse {
    contract_address: String,
    data: Vec<u8>,
}

impl ContractResponse {
    /// An empty answer decodes as `None`.
    fn decode<T: DeserializeOwned>(&self) -> Result<Option<T>, WasmError> {
        if self.data.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&self.data)?))
    }

    fn extras(&self, attributes: &[Attribute]) -> ModuleExtras {
        ModuleExtras {
            events: wasm_module_event(&self.contract_address, attributes)
                .into_iter()
                .collect(),
            log: Vec::new(),
        }
    }
}

impl<S, E> WasmKeeper<S, E>
where
    S: Store,
    E: WasmEngine,
{
    /// Runs `entry_point` of `contract` with `msg` as JSON.
    ///
    /// Gas reported by the engine is charged whether the call succeeded or
    /// not. Contract writes reach the store only when the call succeeded.
    fn call_ibc_entry_point<M: Serialize>(
        &mut self,
        contract: &CanonicalAddress,
        entry_point: EntryPoint,
        msg: &M,
    ) -> Result<ContractResponse, WasmError> {
        let info = self
            .get_contract_info(contract)?
            .ok_or_else(|| contract_not_found(contract))?;
        let code_info = self.code_info_or_not_found(info.code_id)?;
        let contract_address = self.api.codec().humanize(contract.as_slice())?;

        let msg = serde_json::to_vec(msg)?;
        let msg_len = u64::try_from(msg.len()).unwrap_or(u64::MAX);
        self.gas_meter.consume(
            msg_len.saturating_mul(DEFAULT_DESERIALIZATION_COST_PER_BYTE),
            "contract message deserialization",
        )?;

        let multiplier = self.config.gas_multiplier;
        let prefix = contract_store_prefix(contract);
        let mut storage = CachedContractStorage::new(&self.store, &prefix);
        let call = IbcCall {
            entry_point,
            checksum: code_info.code_hash.as_slice(),
            contract_address: &contract_address,
            msg: &msg,
            gas_limit: to_engine_gas(self.gas_meter.remaining(), multiplier),
        };
        let (result, gas_used) = self.engine.execute_ibc(call, &mut storage, &self.api);
        let writes = storage.into_writes();

        debug!("{entry_point} on {contract_address} used {gas_used} engine gas");
        self.gas_meter
            .consume(to_sdk_gas(gas_used, multiplier), entry_point.as_str())?;

        let data = result.map_err(|source| WasmError::HostInvocationFailed {
            entry_point,
            source,
        })?;
        commit_writes(&mut self.store, &prefix, writes)?;

        Ok(ContractResponse {
            contract_address,
            data,
        })
    }

    fn call_basic<M: Serialize>(
        &mut self,
        contract: &CanonicalAddress,
        entry_point: EntryPoint,
        msg: &M,
    ) -> Result<ModuleExtras, WasmError> {
        let response = self.call_ibc_entry_point(contract, entry_point, msg)?;
        let basic: IbcBasicResponse = response.decode()?.unwrap_or_default();
        Ok(response.extras(&basic.attributes))
    }
}

impl<S, E> IbcContractKeeper for WasmKeeper<S, E>
where
    S: Store,
    E: WasmEngine,
{
    fn address_codec(&self) -> &AddressCodec {
        self.api.codec()
    }

    fn contract_port_id(&self, contract: &CanonicalAddress) -> Option<PortId> {
        self.get_contract_info(contract)
            .ok()
            .flatten()
            .filter(|info| !info.ibc_port_id.is_empty())
            .map(|info| PortId::new_unchecked(info.ibc_port_id))
    }

    fn on_open_channel(
        &mut self,
        contract: &CanonicalAddress,
        msg: IbcChannelOpenMsg,
    ) -> Result<(ModuleExtras, Option<String>), WasmError> {
        let response = self.call_ibc_entry_point(contract, EntryPoint::IbcChannelOpen, &msg)?;
        let version = response
            .decode::<IbcChannelOpenResponse>()?
            .map(|open| open.version)
            .filter(|version| !version.is_empty());
        Ok((ModuleExtras::empty(), version))
    }

    fn on_connect_channel(
        &mut self,
        contract: &CanonicalAddress,
        msg: IbcChannelConnectMsg,
    ) -> Result<ModuleExtras, WasmError> {
        self.call_basic(contract, EntryPoint::IbcChannelConnect, &msg)
    }

    fn on_close_channel(
        &mut self,
        contract: &CanonicalAddress,
        msg: IbcChannelCloseMsg,
    ) -> Result<ModuleExtras, WasmError> {
        self.call_basic(contract, EntryPoint::IbcChannelClose, &msg)
    }

    fn on_recv_packet(
        &mut self,
        contract: &CanonicalAddress,
        msg: IbcPacketReceiveMsg,
    ) -> Result<(ModuleExtras, Vec<u8>), WasmError> {
        let response = self.call_ibc_entry_point(contract, EntryPoint::IbcPacketReceive, &msg)?;
        let receive: IbcReceiveResponse = response.decode()?.unwrap_or_default();
        let extras = response.extras(&receive.attributes);
        let ack = receive.acknowledgement.unwrap_or_default().into_vec();
        Ok((extras, ack))
    }

    fn on_ack_packet(
        &mut self,
        contract: &CanonicalAddress,
        msg: IbcPacketAckMsg,
    ) -> Result<ModuleExtras, WasmError> {
        self.call_basic(contract, EntryPoint::IbcPacketAck, &msg)
    }

    fn on_timeout_packet(
        &mut self,
        contract: &CanonicalAddress,
        msg: IbcPacketTimeoutMsg,
    ) -> Result<ModuleExtras, WasmError> {
        self.call_basic(contract, EntryPoint::IbcPacketTimeout, &msg)
    }
}
