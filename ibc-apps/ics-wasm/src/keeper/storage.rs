use alloc::collections::BTreeMap;

use ibc_app_wasm_types::error::WasmError;
use ibc_app_wasm_types::prelude::*;
use tracing::trace;

use crate::context::{ContractStorage, Store};

/// Writes of a single contract call, keyed relative to the contract
/// namespace. `None` marks a removal.
pub(crate) type PendingWrites = BTreeMap<Vec<u8>, Option<Vec<u8>>>;

/// The namespace of one contract, buffering its writes until the call
/// returns. Reads see the buffered writes first.
pub(crate) struct CachedContractStorage<'a, S> {
    store: &'a S,
    prefix: &'a [u8],
    writes: PendingWrites,
}

impl<'a, S: Store> CachedContractStorage<'a, S> {
    pub(crate) fn new(store: &'a S, prefix: &'a [u8]) -> Self {
        Self {
            store,
            prefix,
            writes: PendingWrites::new(),
        }
    }

    pub(crate) fn into_writes(self) -> PendingWrites {
        self.writes
    }
}

impl<S: Store> ContractStorage for CachedContractStorage<'_, S> {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        match self.writes.get(key) {
            Some(pending) => pending.clone(),
            None => self.store.get(&namespaced(self.prefix, key)),
        }
    }

    fn set(&mut self, key: &[u8], value: &[u8]) {
        self.writes.insert(key.to_vec(), Some(value.to_vec()));
    }

    fn remove(&mut self, key: &[u8]) {
        self.writes.insert(key.to_vec(), None);
    }
}

/// Flushes the writes of a successful call into `store`.
pub(crate) fn commit_writes<S: Store>(
    store: &mut S,
    prefix: &[u8],
    writes: PendingWrites,
) -> Result<(), WasmError> {
    trace!("committing {} contract store writes", writes.len());
    for (key, value) in writes {
        let key = namespaced(prefix, &key);
        match value {
            Some(value) => {
                store.set(key, value).map_err(store_error)?;
            }
            None => {
                store.delete(&key);
            }
        }
    }
    Ok(())
}

pub(crate) fn namespaced(prefix: &[u8], key: &[u8]) -> Vec<u8> {
    [prefix, key].concat()
}

pub(crate) fn store_error(err: impl core::fmt::Debug) -> WasmError {
    WasmError::Store {
        description: format!("{err:?}"),
    }
}
