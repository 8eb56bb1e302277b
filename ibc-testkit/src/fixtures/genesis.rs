use ibc_app_wasm::types::genesis::{code_checksum, Code, CodeInfo, Contract, ContractInfo, Model};
use ibc_app_wasm::types::params::AccessConfig;
use ibc_app_wasm::types::prelude::*;
use ibc_app_wasm::types::CanonicalAddress;
use typed_builder::TypedBuilder;

use super::{dummy_account_address, human_address};

/// Bytecode whose checksum is distinct for every `seed`.
pub fn dummy_wasm_code(seed: u8) -> Vec<u8> {
    let mut code = b"\0asm\x01\0\0\0".to_vec();
    code.push(seed);
    code
}

pub fn dummy_creator() -> String {
    human_address(&dummy_account_address(0xC0))
}

/// Configuration of a genesis code entry.
#[derive(TypedBuilder, Debug)]
#[builder(build_method(into = Code))]
pub struct CodeConfig {
    #[builder(default = 1)]
    pub code_id: u64,
    #[builder(default = dummy_wasm_code(1))]
    pub code_bytes: Vec<u8>,
    #[builder(default, setter(strip_option))]
    pub code_hash: Option<Vec<u8>>,
    #[builder(default)]
    pub pinned: bool,
}

impl From<CodeConfig> for Code {
    fn from(config: CodeConfig) -> Self {
        let code_hash = config
            .code_hash
            .map(Into::into)
            .unwrap_or_else(|| code_checksum(&config.code_bytes));
        Code {
            code_id: config.code_id,
            code_info: CodeInfo {
                code_hash,
                creator: dummy_creator(),
                instantiate_config: AccessConfig::everybody(),
            },
            code_bytes: config.code_bytes.into(),
            pinned: config.pinned,
        }
    }
}

/// Configuration of a genesis contract entry.
#[derive(TypedBuilder, Debug)]
#[builder(build_method(into = Contract))]
pub struct ContractConfig {
    pub address: CanonicalAddress,
    #[builder(default = 1)]
    pub code_id: u64,
    #[builder(default = "dummy contract".to_string())]
    pub label: String,
    #[builder(default)]
    pub state: Vec<Model>,
}

impl From<ContractConfig> for Contract {
    fn from(config: ContractConfig) -> Self {
        Contract {
            contract_address: human_address(&config.address),
            contract_info: ContractInfo {
                code_id: config.code_id,
                creator: dummy_creator(),
                label: config.label,
                ..ContractInfo::default()
            },
            contract_state: config.state,
        }
    }
}
