//! Defines the collaborator traits of the contract bridge and the contract
//! keeper interface the IBC callbacks drive.
use core::fmt::Debug;

use ibc_app_wasm_types::channel::ChannelEnd;
use ibc_app_wasm_types::envelope::{
    EntryPoint, IbcChannelCloseMsg, IbcChannelConnectMsg, IbcChannelOpenMsg, IbcPacketAckMsg,
    IbcPacketReceiveMsg, IbcPacketTimeoutMsg,
};
use ibc_app_wasm_types::error::{HostError, PortError, WasmError};
use ibc_app_wasm_types::identifiers::{ChannelId, PortId, Sequence};
use ibc_app_wasm_types::module::{ModuleExtras, ModuleId};
use ibc_app_wasm_types::msgs::GenMsg;
use ibc_app_wasm_types::packet::TimeoutHeight;
use ibc_app_wasm_types::prelude::*;
use ibc_app_wasm_types::serializers::Binary;
use ibc_app_wasm_types::{AddressCodec, CanonicalAddress, Gas};

use crate::api::HostApi;
use crate::keeper::WasmKeeper;

/// Ordered byte-keyed store the keeper persists into.
///
/// Writes stay pending until `apply` keeps them or `reset` drops them. The
/// genesis import calls exactly one of the two.
pub trait Store {
    type Error: Debug;

    /// Writes `value` under `key`, returning the previous value.
    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<Option<Vec<u8>>, Self::Error>;

    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;

    fn delete(&mut self, key: &[u8]);

    fn has(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }

    /// All keys starting with `key_prefix`, in ascending byte order.
    fn get_keys(&self, key_prefix: &[u8]) -> Vec<Vec<u8>>;

    /// Keeps the pending writes.
    fn apply(&mut self) -> Result<(), Self::Error>;

    /// Drops the pending writes, restoring the state of the last `apply`.
    fn reset(&mut self);
}

/// The key-value namespace of a single contract, as seen by the sandbox.
pub trait ContractStorage {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;

    fn set(&mut self, key: &[u8], value: &[u8]);

    fn remove(&mut self, key: &[u8]);
}

/// A single IBC entry point invocation.
#[derive(Clone, Copy, Debug)]
pub struct IbcCall<'a> {
    pub entry_point: EntryPoint,
    pub checksum: &'a [u8],
    pub contract_address: &'a str,
    /// JSON encoded envelope.
    pub msg: &'a [u8],
    /// Sandbox gas available to the call.
    pub gas_limit: Gas,
}

/// The contract sandbox.
pub trait WasmEngine {
    /// Compiles and stores `code`, returning its checksum.
    fn store_code(&mut self, code: &[u8]) -> Result<Vec<u8>, HostError>;

    fn get_code(&self, checksum: &[u8]) -> Result<Vec<u8>, HostError>;

    /// Keeps the compiled module of `checksum` in memory.
    fn pin(&mut self, checksum: &[u8]) -> Result<(), HostError>;

    /// Runs an IBC entry point. The sandbox gas used is reported on
    /// success and on failure.
    fn execute_ibc(
        &mut self,
        call: IbcCall<'_>,
        storage: &mut dyn ContractStorage,
        api: &HostApi,
    ) -> (Result<Vec<u8>, HostError>, Gas);
}

/// Read access to channel ends kept by the protocol layer.
pub trait ChannelReader {
    fn channel_end(&self, port_id: &PortId, channel_id: &ChannelId) -> Option<ChannelEnd>;
}

/// Sends packets on behalf of a contract.
pub trait PacketSender {
    fn send_packet(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        timeout_height: TimeoutHeight,
        timeout_timestamp: u64,
        data: Vec<u8>,
    ) -> Result<Sequence, WasmError>;
}

/// Starts the closing handshake of a channel.
pub trait ChannelCloser {
    fn chan_close_init(&mut self, port_id: &PortId, channel_id: &ChannelId)
        -> Result<(), WasmError>;
}

/// Port allocation of the protocol layer.
pub trait PortKeeper {
    /// Binds `port_id` to `owner`. Binding a port twice fails with
    /// [`PortError::AlreadyBound`].
    fn bind_port(&mut self, port_id: &PortId, owner: &ModuleId) -> Result<(), PortError>;
}

/// A change of a validator's voting power.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatorUpdate {
    pub pub_key: Binary,
    pub power: i64,
}

/// The staking module as far as genesis is concerned.
pub trait ValidatorSetSource {
    fn apply_and_return_validator_set_updates(
        &mut self,
    ) -> Result<Vec<ValidatorUpdate>, WasmError>;
}

/// Executes the messages carried by genesis against the keeper being
/// initialized. Store writes made through `keeper` share the rollback of the
/// import.
pub trait GenesisMsgHandler<S, E> {
    fn handle(&mut self, keeper: &mut WasmKeeper<S, E>, msg: &GenMsg) -> Result<(), WasmError>;
}

/// Contract operations the IBC callbacks rely on.
pub trait IbcContractKeeper {
    fn address_codec(&self) -> &AddressCodec;

    /// Port bound by `contract`, if any.
    fn contract_port_id(&self, contract: &CanonicalAddress) -> Option<PortId>;

    /// Returns the version the contract picked, if it picked one.
    fn on_open_channel(
        &mut self,
        contract: &CanonicalAddress,
        msg: IbcChannelOpenMsg,
    ) -> Result<(ModuleExtras, Option<String>), WasmError>;

    fn on_connect_channel(
        &mut self,
        contract: &CanonicalAddress,
        msg: IbcChannelConnectMsg,
    ) -> Result<ModuleExtras, WasmError>;

    fn on_close_channel(
        &mut self,
        contract: &CanonicalAddress,
        msg: IbcChannelCloseMsg,
    ) -> Result<ModuleExtras, WasmError>;

    /// Returns the acknowledgement bytes the contract produced.
    fn on_recv_packet(
        &mut self,
        contract: &CanonicalAddress,
        msg: IbcPacketReceiveMsg,
    ) -> Result<(ModuleExtras, Vec<u8>), WasmError>;

    fn on_ack_packet(
        &mut self,
        contract: &CanonicalAddress,
        msg: IbcPacketAckMsg,
    ) -> Result<ModuleExtras, WasmError>;

    fn on_timeout_packet(
        &mut self,
        contract: &CanonicalAddress,
        msg: IbcPacketTimeoutMsg,
    ) -> Result<ModuleExtras, WasmError>;
}
