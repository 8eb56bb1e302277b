//! Store layout of the keeper.
use ibc_app_wasm_types::error::WasmError;
use ibc_app_wasm_types::prelude::*;
use ibc_app_wasm_types::CanonicalAddress;

pub const CODE_KEY_PREFIX: &[u8] = &[0x01];
pub const CONTRACT_KEY_PREFIX: &[u8] = &[0x02];
pub const CONTRACT_STORE_PREFIX: &[u8] = &[0x03];
pub const SEQUENCE_KEY_PREFIX: &[u8] = &[0x04];
pub const PINNED_CODE_INDEX_PREFIX: &[u8] = &[0x07];
pub const PARAMS_KEY: &[u8] = &[0x10];

fn prefixed(prefix: &[u8], suffix: &[u8]) -> Vec<u8> {
    let mut key = Vec::with_capacity(prefix.len() + suffix.len());
    key.extend_from_slice(prefix);
    key.extend_from_slice(suffix);
    key
}

/// Code ids are big-endian so that keys iterate in id order.
pub fn code_key(code_id: u64) -> Vec<u8> {
    prefixed(CODE_KEY_PREFIX, &code_id.to_be_bytes())
}

pub fn pinned_code_key(code_id: u64) -> Vec<u8> {
    prefixed(PINNED_CODE_INDEX_PREFIX, &code_id.to_be_bytes())
}

/// Addresses vary in length, so they are length prefixed to keep one
/// contract's keys from nesting under another's.
fn length_prefixed(contract: &CanonicalAddress) -> Vec<u8> {
    let len = u8::try_from(contract.len()).expect("canonical addresses fit a length byte");
    prefixed(&[len], contract.as_slice())
}

pub fn contract_key(contract: &CanonicalAddress) -> Vec<u8> {
    prefixed(CONTRACT_KEY_PREFIX, &length_prefixed(contract))
}

pub fn contract_store_prefix(contract: &CanonicalAddress) -> Vec<u8> {
    prefixed(CONTRACT_STORE_PREFIX, &length_prefixed(contract))
}

pub fn sequence_key(name: &[u8]) -> Vec<u8> {
    prefixed(SEQUENCE_KEY_PREFIX, name)
}

/// Recovers the code id from a key produced by [`code_key`].
pub fn code_id_from_key(key: &[u8]) -> Result<u64, WasmError> {
    key.strip_prefix(CODE_KEY_PREFIX)
        .and_then(|id| <[u8; 8]>::try_from(id).ok())
        .map(u64::from_be_bytes)
        .ok_or_else(|| WasmError::Store {
            description: format!("malformed code key `{}`", hex::encode(key)),
        })
}

/// Recovers the address from a key produced by [`contract_key`].
pub fn contract_from_key(key: &[u8]) -> Result<CanonicalAddress, WasmError> {
    key.strip_prefix(CONTRACT_KEY_PREFIX)
        .and_then(|rest| rest.split_first())
        .filter(|(len, address)| usize::from(**len) == address.len())
        .map(|(_, address)| CanonicalAddress::from(address))
        .ok_or_else(|| WasmError::Store {
            description: format!("malformed contract key `{}`", hex::encode(key)),
        })
}

pub fn decode_sequence(bytes: &[u8]) -> Result<u64, WasmError> {
    <[u8; 8]>::try_from(bytes)
        .map(u64::from_be_bytes)
        .map_err(|_| WasmError::Store {
            description: format!("malformed sequence value `{}`", hex::encode(bytes)),
        })
}
