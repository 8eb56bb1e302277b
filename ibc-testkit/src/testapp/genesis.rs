use ibc_app_wasm::adapter::ValidatorUpdateSource;
use ibc_app_wasm::context::{
    GenesisMsgHandler, Store, ValidatorSetSource, ValidatorUpdate, WasmEngine,
};
use ibc_app_wasm::keeper::WasmKeeper;
use ibc_app_wasm::types::error::WasmError;
use ibc_app_wasm::types::msgs::GenMsg;
use ibc_app_wasm::types::prelude::*;

/// Staking returning a fixed set of updates, or failing with `error`.
#[derive(Clone, Debug, Default)]
pub struct MockValidatorSource {
    pub updates: Vec<ValidatorUpdate>,
    pub error: Option<String>,
    pub calls: usize,
}

impl MockValidatorSource {
    pub fn with_updates(updates: Vec<ValidatorUpdate>) -> Self {
        Self {
            updates,
            ..Self::default()
        }
    }

    pub fn failing(error: &str) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::default()
        }
    }
}

impl ValidatorSetSource for MockValidatorSource {
    fn apply_and_return_validator_set_updates(
        &mut self,
    ) -> Result<Vec<ValidatorUpdate>, WasmError> {
        self.calls += 1;
        match &self.error {
            Some(description) => Err(WasmError::ValidatorSetUpdate {
                description: description.clone(),
            }),
            None => Ok(self.updates.clone()),
        }
    }
}

impl ValidatorUpdateSource for MockValidatorSource {
    type Error = String;

    fn apply_and_return_validator_set_updates(
        &mut self,
    ) -> (Vec<ValidatorUpdate>, Option<String>) {
        self.calls += 1;
        (self.updates.clone(), self.error.clone())
    }
}

/// Records every genesis message, failing at position `fail_at`. Store-code
/// messages upload their code through the keeper.
#[derive(Clone, Debug, Default)]
pub struct MockMsgHandler {
    pub handled: Vec<GenMsg>,
    /// Code ids assigned to the uploaded code, in message order.
    pub stored_codes: Vec<u64>,
    pub fail_at: Option<usize>,
}

impl MockMsgHandler {
    pub fn failing_at(index: usize) -> Self {
        Self {
            fail_at: Some(index),
            ..Self::default()
        }
    }
}

impl<S, E> GenesisMsgHandler<S, E> for MockMsgHandler
where
    S: Store,
    E: WasmEngine,
{
    fn handle(&mut self, keeper: &mut WasmKeeper<S, E>, msg: &GenMsg) -> Result<(), WasmError> {
        if self.fail_at == Some(self.handled.len()) {
            return Err(WasmError::NotFound {
                description: format!("message from {}", msg.sender()),
            });
        }
        if let GenMsg::StoreCode(store_code) = msg {
            let code_id = keeper.create_code(
                &store_code.sender,
                store_code.wasm_byte_code.as_slice(),
                store_code.instantiate_permission.as_ref(),
            )?;
            self.stored_codes.push(code_id);
        }
        self.handled.push(msg.clone());
        Ok(())
    }
}
