//! Bulk import and export of the keeper state.
use ibc_app_wasm_types::error::{ImportPosition, WasmError};
use ibc_app_wasm_types::genesis::{Code, Contract, GenesisState, Sequence};
use ibc_app_wasm_types::prelude::*;
use ibc_app_wasm_types::{KEY_LAST_CODE_ID, KEY_LAST_INSTANCE_ID};
use tracing::{debug, info};

use crate::context::{GenesisMsgHandler, Store, ValidatorSetSource, ValidatorUpdate, WasmEngine};
use crate::keeper::WasmKeeper;

/// Loads `genesis` into the keeper, replays its messages and returns the
/// resulting validator set updates.
///
/// Either every entry is imported or, on the first failure, every store write
/// made by the import is rolled back. Code already handed to the engine and
/// pinned in its cache stays there; only the store is reset.
pub fn init_genesis<S, E>(
    keeper: &mut WasmKeeper<S, E>,
    genesis: &GenesisState,
    staking: &mut impl ValidatorSetSource,
    msg_handler: &mut impl GenesisMsgHandler<S, E>,
) -> Result<Vec<ValidatorUpdate>, WasmError>
where
    S: Store,
    E: WasmEngine,
{
    match import(keeper, genesis, staking, msg_handler) {
        Ok(updates) => {
            keeper.store_mut().apply().map_err(|e| WasmError::Store {
                description: format!("{e:?}"),
            })?;
            info!(
                "imported genesis with {} codes and {} contracts",
                genesis.codes.len(),
                genesis.contracts.len()
            );
            Ok(updates)
        }
        Err(e) => {
            debug!("genesis import failed, rolling back: {e}");
            keeper.store_mut().reset();
            Err(e)
        }
    }
}

fn import<S, E>(
    keeper: &mut WasmKeeper<S, E>,
    genesis: &GenesisState,
    staking: &mut impl ValidatorSetSource,
    msg_handler: &mut impl GenesisMsgHandler<S, E>,
) -> Result<Vec<ValidatorUpdate>, WasmError>
where
    S: Store,
    E: WasmEngine,
{
    keeper.set_params(&genesis.params)?;

    let mut max_code_id = 0;
    for (index, code) in genesis.codes.iter().enumerate() {
        keeper
            .import_code(code.code_id, &code.code_info, code.code_bytes.as_slice())
            .map_err(|e| {
                e.at(ImportPosition::Code {
                    index,
                    code_id: code.code_id,
                })
            })?;
        max_code_id = max_code_id.max(code.code_id);
        if code.pinned {
            keeper
                .pin_code(code.code_id)
                .map_err(|e| e.at(ImportPosition::Contract { index }))?;
        }
    }

    // The highest instance id is not persisted, so the number of imported
    // contracts stands in for it.
    let mut max_contract_id = 0;
    for (index, contract) in genesis.contracts.iter().enumerate() {
        let address = keeper
            .host_api()
            .codec()
            .canonicalize(&contract.contract_address)
            .map_err(|e| e.at(ImportPosition::ContractAddress { index }))?;
        keeper
            .import_contract(&address, &contract.contract_info, &contract.contract_state)
            .map_err(|e| e.at(ImportPosition::Contract { index }))?;
        max_contract_id = index as u64 + 1;
    }

    for (index, sequence) in genesis.sequences.iter().enumerate() {
        keeper
            .import_auto_increment_id(sequence.id_key.as_slice(), sequence.value)
            .map_err(|e| e.at(ImportPosition::Sequence { index }))?;
    }

    check_sequence(keeper, KEY_LAST_CODE_ID, max_code_id)?;
    check_sequence(keeper, KEY_LAST_INSTANCE_ID, max_contract_id)?;

    if genesis.gen_msgs.is_empty() {
        return Ok(Vec::new());
    }
    for (index, msg) in genesis.gen_msgs.iter().enumerate() {
        msg_handler
            .handle(keeper, msg)
            .map_err(|e| WasmError::GenesisMessageFailed {
                index,
                cause: Box::new(e),
            })?;
    }
    staking.apply_and_return_validator_set_updates()
}

fn check_sequence<S, E>(
    keeper: &WasmKeeper<S, E>,
    key: &[u8],
    max_in_use: u64,
) -> Result<(), WasmError>
where
    S: Store,
    E: WasmEngine,
{
    let value = keeper.peek_auto_increment_id(key)?;
    if value <= max_in_use {
        return Err(WasmError::SequenceInvariantViolation {
            key: String::from_utf8_lossy(key).into_owned(),
            value,
            max: max_in_use,
        });
    }
    Ok(())
}

/// Dumps the keeper state. Creation positions are left out and no messages
/// are emitted.
pub fn export_genesis<S, E>(keeper: &WasmKeeper<S, E>) -> Result<GenesisState, WasmError>
where
    S: Store,
    E: WasmEngine,
{
    let codes = keeper
        .code_infos()?
        .into_iter()
        .map(|(code_id, code_info)| {
            Ok(Code {
                code_id,
                code_bytes: keeper.get_byte_code(code_id)?.into(),
                pinned: keeper.is_pinned_code(code_id),
                code_info,
            })
        })
        .collect::<Result<Vec<_>, WasmError>>()?;

    let codec = keeper.host_api().codec();
    let contracts = keeper
        .contract_infos()?
        .into_iter()
        .map(|(address, mut contract_info)| {
            contract_info.created = None;
            Ok(Contract {
                contract_address: codec.humanize(address.as_slice())?,
                contract_state: keeper.contract_state(&address),
                contract_info,
            })
        })
        .collect::<Result<Vec<_>, WasmError>>()?;

    let sequences = [KEY_LAST_CODE_ID, KEY_LAST_INSTANCE_ID]
        .into_iter()
        .map(|key| Ok(Sequence::new(key, keeper.peek_auto_increment_id(key)?)))
        .collect::<Result<Vec<_>, WasmError>>()?;

    Ok(GenesisState {
        params: keeper.get_params()?,
        codes,
        contracts,
        sequences,
        gen_msgs: Vec::new(),
    })
}
