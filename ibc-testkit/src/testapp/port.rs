use alloc::collections::{BTreeMap, BTreeSet};

use ibc_app_wasm::adapter::CapabilityPortBinder;
use ibc_app_wasm::context::PortKeeper;
use ibc_app_wasm::types::error::PortError;
use ibc_app_wasm::types::identifiers::PortId;
use ibc_app_wasm::types::module::ModuleId;

/// Port ownership as the protocol layer records it.
#[derive(Clone, Debug, Default)]
pub struct MockPortKeeper {
    pub owners: BTreeMap<PortId, ModuleId>,
}

impl MockPortKeeper {
    pub fn owner(&self, port_id: &PortId) -> Option<&ModuleId> {
        self.owners.get(port_id)
    }
}

impl PortKeeper for MockPortKeeper {
    fn bind_port(&mut self, port_id: &PortId, owner: &ModuleId) -> Result<(), PortError> {
        if self.owners.contains_key(port_id) {
            return Err(PortError::AlreadyBound {
                port_id: port_id.clone(),
            });
        }
        self.owners.insert(port_id.clone(), owner.clone());
        Ok(())
    }
}

/// Capability based port allocation handing out increasing indices.
/// `claimed` holds the capabilities of the bridge, `foreign` the ports other
/// modules took.
#[derive(Clone, Debug, Default)]
pub struct MockCapabilityKeeper {
    next_index: u64,
    pub claimed: BTreeMap<PortId, u64>,
    pub foreign: BTreeSet<PortId>,
}

impl CapabilityPortBinder for MockCapabilityKeeper {
    type Capability = u64;

    fn bind_port(&mut self, port_id: &PortId) -> Option<u64> {
        if self.claimed.contains_key(port_id) || self.foreign.contains(port_id) {
            return None;
        }
        self.next_index += 1;
        self.claimed.insert(port_id.clone(), self.next_index);
        Some(self.next_index)
    }

    fn get_capability(&self, port_id: &PortId) -> Option<u64> {
        self.claimed.get(port_id).copied()
    }
}
