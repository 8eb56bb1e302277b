//! Adapters fitting newer host module interfaces onto the collaborator
//! traits of [`context`](crate::context).
use core::fmt::Display;

use ibc_app_wasm_types::channel::ChannelEnd;
use ibc_app_wasm_types::error::{PortError, WasmError};
use ibc_app_wasm_types::identifiers::{ChannelId, PortId};
use ibc_app_wasm_types::module::ModuleId;
use ibc_app_wasm_types::prelude::*;
use tracing::debug;

use crate::context::{ChannelReader, PortKeeper, ValidatorSetSource, ValidatorUpdate};

/// Channel lookup reporting a missing channel as an error.
pub trait ChannelQuery {
    type Error: Display;

    fn query_channel(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<ChannelEnd, Self::Error>;
}

/// Port allocation handing out a capability for every fresh port. No
/// capability is returned for a port that is already taken.
pub trait CapabilityPortBinder {
    type Capability;

    fn bind_port(&mut self, port_id: &PortId) -> Option<Self::Capability>;

    /// The capability for `port_id`, if the bridge already owns it.
    fn get_capability(&self, port_id: &PortId) -> Option<Self::Capability>;
}

/// Staking that reports updates and failure side by side.
pub trait ValidatorUpdateSource {
    type Error: Display;

    fn apply_and_return_validator_set_updates(
        &mut self,
    ) -> (Vec<ValidatorUpdate>, Option<Self::Error>);
}

#[derive(Clone, Debug)]
pub struct ChannelReaderAdapter<Q> {
    query: Q,
}

impl<Q: ChannelQuery> ChannelReaderAdapter<Q> {
    pub fn new(query: Q) -> Self {
        Self { query }
    }

    pub fn into_inner(self) -> Q {
        self.query
    }
}

impl<Q: ChannelQuery> ChannelReader for ChannelReaderAdapter<Q> {
    fn channel_end(&self, port_id: &PortId, channel_id: &ChannelId) -> Option<ChannelEnd> {
        match self.query.query_channel(port_id, channel_id) {
            Ok(channel_end) => Some(channel_end),
            Err(e) => {
                debug!("no channel {channel_id} on {port_id}: {e}");
                None
            }
        }
    }
}

/// Binds ports through `B`. A port whose capability the bridge already owns
/// reads as [`PortError::AlreadyBound`].
#[derive(Clone, Debug)]
pub struct PortBinderAdapter<B> {
    binder: B,
}

impl<B: CapabilityPortBinder> PortBinderAdapter<B> {
    pub fn new(binder: B) -> Self {
        Self { binder }
    }

    pub fn into_inner(self) -> B {
        self.binder
    }

    pub fn capability(&self, port_id: &PortId) -> Option<B::Capability> {
        self.binder.get_capability(port_id)
    }
}

impl<B: CapabilityPortBinder> PortKeeper for PortBinderAdapter<B> {
    fn bind_port(&mut self, port_id: &PortId, _owner: &ModuleId) -> Result<(), PortError> {
        if self.binder.get_capability(port_id).is_some() {
            return Err(PortError::AlreadyBound {
                port_id: port_id.clone(),
            });
        }
        self.binder
            .bind_port(port_id)
            .map(|_| ())
            .ok_or_else(|| PortError::CapabilityNotOwned {
                port_id: port_id.clone(),
            })
    }
}

#[derive(Clone, Debug)]
pub struct ValidatorSetSourceAdapter<V> {
    source: V,
}

impl<V: ValidatorUpdateSource> ValidatorSetSourceAdapter<V> {
    pub fn new(source: V) -> Self {
        Self { source }
    }
}

impl<V: ValidatorUpdateSource> ValidatorSetSource for ValidatorSetSourceAdapter<V> {
    fn apply_and_return_validator_set_updates(
        &mut self,
    ) -> Result<Vec<ValidatorUpdate>, WasmError> {
        match self.source.apply_and_return_validator_set_updates() {
            (updates, None) => Ok(updates),
            (_, Some(e)) => Err(WasmError::ValidatorSetUpdate {
                description: e.to_string(),
            }),
        }
    }
}
