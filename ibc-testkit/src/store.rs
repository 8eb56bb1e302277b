//! Stores backing the keeper in tests.
use basecoin_store::context::Store as BackendStore;
use basecoin_store::impls::{GrowingStore, InMemoryStore};
use basecoin_store::types::{Height, Identifier, Path};
use ibc_app_wasm::context::Store;
use ibc_app_wasm::types::prelude::*;
use tracing::trace;

/// The basecoin store a [`MockContext`](crate::context::MockContext) keeper
/// writes to. Deleted paths are kept as empty values.
pub type MockBackend = GrowingStore<InMemoryStore>;

pub type MockStore = KeeperStore<MockBackend>;

const LIVE: u8 = 1;

/// Serves the keeper's byte-keyed [`Store`] from a basecoin store.
///
/// Keys are hex encoded into single-segment paths, which keeps prefix
/// matching and byte order intact. Values carry a leading tag so that empty
/// values stay distinguishable from deleted paths.
#[derive(Clone, Debug, Default)]
pub struct KeeperStore<S> {
    backend: S,
    /// Previous values of the writes since the last `apply`, oldest first.
    journal: Vec<(Path, Option<Vec<u8>>)>,
}

impl<S> KeeperStore<S>
where
    S: BackendStore,
{
    pub fn new(backend: S) -> Self {
        Self {
            backend,
            journal: Vec::new(),
        }
    }

    /// Number of live keys.
    pub fn len(&self) -> usize {
        self.get_keys(&[]).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of writes `reset` would undo.
    pub fn pending(&self) -> usize {
        self.journal.len()
    }

    fn live(&self, path: &Path) -> Option<Vec<u8>> {
        self.backend.get(Height::Pending, path)
    }
}

fn to_path(key: &[u8]) -> Path {
    Path::from(Identifier::from(hex::encode(key)))
}

fn from_path(path: &Path) -> Vec<u8> {
    hex::decode(path.to_string()).expect("store paths are hex encoded keys")
}

fn tag(value: Vec<u8>) -> Vec<u8> {
    let mut tagged = Vec::with_capacity(value.len() + 1);
    tagged.push(LIVE);
    tagged.extend(value);
    tagged
}

fn untag(value: Vec<u8>) -> Option<Vec<u8>> {
    match value.split_first() {
        Some((&LIVE, value)) => Some(value.to_vec()),
        _ => None,
    }
}

impl<S> Store for KeeperStore<S>
where
    S: BackendStore,
{
    type Error = S::Error;

    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<Option<Vec<u8>>, Self::Error> {
        trace!("set at key = {}", hex::encode(&key));
        let path = to_path(&key);
        let old_value = self.live(&path);
        self.backend.set(path.clone(), tag(value))?;
        self.journal.push((path, old_value.clone()));
        Ok(old_value.and_then(untag))
    }

    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.live(&to_path(key)).and_then(untag)
    }

    fn delete(&mut self, key: &[u8]) {
        trace!("delete at key = {}", hex::encode(key));
        let path = to_path(key);
        if let Some(old_value) = self.live(&path) {
            self.backend.delete(&path);
            self.journal.push((path, Some(old_value)));
        }
    }

    fn get_keys(&self, key_prefix: &[u8]) -> Vec<Vec<u8>> {
        self.backend
            .get_keys(&to_path(key_prefix))
            .iter()
            .map(from_path)
            .collect()
    }

    fn apply(&mut self) -> Result<(), Self::Error> {
        self.journal.clear();
        self.backend.apply()
    }

    fn reset(&mut self) {
        trace!("rolling back {} store writes", self.journal.len());
        while let Some((path, old_value)) = self.journal.pop() {
            match old_value {
                Some(value) => {
                    self.backend
                        .set(path, value)
                        .expect("reset failures are unrecoverable");
                }
                None => self.backend.delete(&path),
            }
        }
        self.backend.reset();
    }
}
