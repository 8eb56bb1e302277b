//! Mapping between contracts and the IBC ports they own.
use ibc_app_wasm_types::error::{PortError, WasmError};
use ibc_app_wasm_types::identifiers::{ChannelId, PortId};
use ibc_app_wasm_types::module::ModuleId;
use ibc_app_wasm_types::prelude::*;
use ibc_app_wasm_types::{AddressCodec, CanonicalAddress, MAX_CHANNEL_SEQUENCE, PORT_ID_PREFIX};
use tracing::debug;

use crate::context::PortKeeper;

/// Port owned by the contract with human address `contract`.
pub fn port_id_for_contract(contract: &str) -> PortId {
    PortId::new_unchecked(format!("{PORT_ID_PREFIX}{contract}"))
}

/// Port owned by the contract at `contract`.
pub fn port_id_for_canonical(
    codec: &AddressCodec,
    contract: &CanonicalAddress,
) -> Result<PortId, WasmError> {
    Ok(port_id_for_contract(&codec.humanize(contract.as_slice())?))
}

/// Recovers the contract behind a `wasm.` port.
pub fn contract_from_port_id(
    codec: &AddressCodec,
    port_id: &PortId,
) -> Result<CanonicalAddress, WasmError> {
    let address = port_id
        .as_str()
        .strip_prefix(PORT_ID_PREFIX)
        .ok_or_else(|| WasmError::InvalidPortFormat {
            port_id: port_id.to_string(),
        })?;
    codec.canonicalize(address)
}

/// Binds the port of `contract`, treating a port it already holds as bound.
pub fn ensure_ibc_port(
    port_keeper: &mut impl PortKeeper,
    codec: &AddressCodec,
    contract: &CanonicalAddress,
) -> Result<PortId, WasmError> {
    let port_id = port_id_for_canonical(codec, contract)?;
    match port_keeper.bind_port(&port_id, &ModuleId::wasm()) {
        Ok(()) => {
            debug!("bound ibc port {port_id}");
            Ok(port_id)
        }
        Err(PortError::AlreadyBound { .. }) => Ok(port_id),
        Err(e) => Err(e.into()),
    }
}

/// Rejects channels past the 2^32 channel limit.
pub fn validate_channel_sequence(channel_id: &ChannelId) -> Result<(), WasmError> {
    let sequence = channel_id.sequence()?;
    if sequence > MAX_CHANNEL_SEQUENCE {
        return Err(WasmError::ChannelLimitExceeded {
            sequence,
            max: MAX_CHANNEL_SEQUENCE,
        });
    }
    Ok(())
}
