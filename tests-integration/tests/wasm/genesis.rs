use ibc_app_wasm::context::ValidatorUpdate;
use ibc_app_wasm::genesis::{export_genesis, init_genesis};
use ibc_app_wasm::types::error::{ImportPosition, WasmError};
use ibc_app_wasm::types::genesis::{
    code_checksum, AbsoluteTxPosition, Code, Contract, ContractInfo, GenesisState, Model, Sequence,
};
use ibc_app_wasm::types::msgs::{GenMsg, MsgStoreCode};
use ibc_app_wasm::types::params::{AccessConfig, Params};
use ibc_app_wasm::types::{CanonicalAddress, KEY_LAST_CODE_ID, KEY_LAST_INSTANCE_ID};
use ibc_wasm_testkit::fixtures::{
    dummy_contract_address, dummy_creator, dummy_wasm_code, CodeConfig, ContractConfig,
};
use ibc_wasm_testkit::testapp::{MockMsgHandler, MockValidatorSource};
use rstest::rstest;

use super::*;

fn code(code_id: u64) -> Code {
    CodeConfig::builder()
        .code_id(code_id)
        .code_bytes(dummy_wasm_code(code_id as u8))
        .build()
}

fn contract_entry(seed: u8) -> Contract {
    ContractConfig::builder()
        .address(dummy_contract_address(seed))
        .build()
}

fn sequences(last_code_id: u64, last_contract_id: u64) -> Vec<Sequence> {
    vec![
        Sequence::new(KEY_LAST_CODE_ID, last_code_id),
        Sequence::new(KEY_LAST_INSTANCE_ID, last_contract_id),
    ]
}

fn store_code_msg() -> GenMsg {
    GenMsg::StoreCode(MsgStoreCode {
        sender: dummy_creator(),
        wasm_byte_code: dummy_wasm_code(9).into(),
        instantiate_permission: None,
    })
}

fn import(
    ctx: &mut MockContext,
    genesis: &GenesisState,
) -> Result<Vec<ValidatorUpdate>, WasmError> {
    init_genesis(
        &mut ctx.keeper,
        genesis,
        &mut MockValidatorSource::default(),
        &mut MockMsgHandler::default(),
    )
}

fn assert_rolled_back(ctx: &MockContext) {
    assert_eq!(ctx.keeper.store().pending(), 0);
    assert!(ctx.keeper.store().is_empty());
}

#[test_log::test]
fn export_reproduces_imported_state() {
    let pinned_code = CodeConfig::builder().pinned(true).build();
    let mut contract = ContractConfig::builder()
        .address(dummy_contract_address(0x01))
        .state(vec![
            Model::new(b"config".to_vec(), b"{}".to_vec()),
            Model::new(b"count".to_vec(), b"7".to_vec()),
        ])
        .build();
    contract.contract_info.admin = dummy_creator();
    let genesis = GenesisState {
        params: Params {
            code_upload_access: AccessConfig::only_address(dummy_creator()),
            ..Params::default()
        },
        codes: vec![pinned_code, code(2)],
        contracts: vec![contract],
        sequences: sequences(3, 2),
        gen_msgs: Vec::new(),
    };
    let mut ctx = MockContext::default();

    let updates = import(&mut ctx, &genesis).expect("valid genesis");

    assert!(updates.is_empty());
    assert!(ctx.keeper.is_pinned_code(1));
    assert!(!ctx.keeper.is_pinned_code(2));
    assert!(ctx.engine().is_pinned(genesis.codes[0].code_info.code_hash.as_slice()));
    assert_eq!(export_genesis(&ctx.keeper).expect("exports"), genesis);
}

#[test_log::test]
fn contracts_sharing_address_bytes_keep_separate_state() {
    let short = CanonicalAddress::new(vec![0x11; 20]);
    let long = CanonicalAddress::new([vec![0x11; 20], vec![0x22; 12]].concat());
    let genesis = GenesisState {
        codes: vec![code(1)],
        contracts: vec![
            ContractConfig::builder()
                .address(short)
                .state(vec![Model::new(b"a".to_vec(), b"1".to_vec())])
                .build(),
            ContractConfig::builder()
                .address(long)
                .state(vec![Model::new(b"b".to_vec(), b"2".to_vec())])
                .build(),
        ],
        sequences: sequences(2, 3),
        ..GenesisState::default()
    };
    let mut ctx = MockContext::default();
    import(&mut ctx, &genesis).expect("valid genesis");

    let exported = export_genesis(&ctx.keeper).expect("exports");

    assert_eq!(exported.contracts, genesis.contracts);
    assert_eq!(
        exported.contracts[0].contract_state,
        vec![Model::new(b"a".to_vec(), b"1".to_vec())]
    );

    let mut reimported = MockContext::default();
    import(&mut reimported, &exported).expect("export imports again");
    assert_eq!(export_genesis(&reimported.keeper).expect("exports"), exported);
}

#[test_log::test]
fn creation_position_is_left_out_of_exports() {
    let genesis = GenesisState {
        codes: vec![code(1)],
        sequences: sequences(2, 2),
        ..GenesisState::default()
    };
    let mut ctx = MockContext::default();
    import(&mut ctx, &genesis).expect("valid genesis");
    let address = dummy_contract_address(0x01);
    let info = ContractInfo {
        code_id: 1,
        creator: dummy_creator(),
        label: "created at height 5".to_string(),
        created: Some(AbsoluteTxPosition {
            block_height: 5,
            tx_index: 1,
        }),
        ..ContractInfo::default()
    };
    ctx.keeper
        .import_contract(&address, &info, &[Model::new(b"k".to_vec(), b"v".to_vec())])
        .expect("contract imports");

    let exported = export_genesis(&ctx.keeper).expect("exports");

    assert_eq!(exported.contracts.len(), 1);
    assert_eq!(exported.contracts[0].contract_info.created, None);
    assert_eq!(exported.contracts[0].contract_info.label, info.label);

    let mut reimported = MockContext::default();
    import(&mut reimported, &exported).expect("export imports again");
    let restored = reimported
        .keeper
        .get_contract_info(&address)
        .expect("readable")
        .expect("contract exists");
    assert_eq!(restored.created, None);
}

#[test_log::test]
fn empty_genesis_imports() {
    let mut ctx = MockContext::default();

    import(&mut ctx, &GenesisState::default()).expect("nothing to import");

    let exported = export_genesis(&ctx.keeper).expect("exports");
    assert_eq!(exported.sequences, sequences(1, 1));
    assert_eq!(exported.params, Params::default());
}

#[rstest]
#[test_log::test]
#[case::missing(vec![], KEY_LAST_CODE_ID, 1, 1)]
#[case::code_id_in_use(sequences(1, 2), KEY_LAST_CODE_ID, 1, 1)]
#[case::instance_id_in_use(sequences(2, 1), KEY_LAST_INSTANCE_ID, 1, 1)]
fn sequence_must_pass_ids_in_use(
    #[case] sequences: Vec<Sequence>,
    #[case] key: &[u8],
    #[case] value: u64,
    #[case] max: u64,
) {
    let genesis = GenesisState {
        codes: vec![code(1)],
        contracts: vec![contract_entry(0x01)],
        sequences,
        ..GenesisState::default()
    };
    let mut ctx = MockContext::default();

    let err = import(&mut ctx, &genesis).expect_err("sequence too low");

    match err {
        WasmError::SequenceInvariantViolation {
            key: got_key,
            value: got_value,
            max: got_max,
        } => {
            assert_eq!(got_key.as_bytes(), key);
            assert_eq!((got_value, got_max), (value, max));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_rolled_back(&ctx);
}

#[rstest]
#[test_log::test]
#[case::at_count(2, false)]
#[case::past_count(3, true)]
fn instance_sequence_counts_contracts(#[case] last_contract_id: u64, #[case] ok: bool) {
    let genesis = GenesisState {
        codes: vec![code(1)],
        contracts: vec![contract_entry(0x01), contract_entry(0x02)],
        sequences: sequences(2, last_contract_id),
        ..GenesisState::default()
    };
    let mut ctx = MockContext::default();

    assert_eq!(import(&mut ctx, &genesis).is_ok(), ok);
}

#[test_log::test]
fn code_hash_mismatch_names_code() {
    let genesis = GenesisState {
        codes: vec![code(1), CodeConfig::builder().code_id(4).code_hash(vec![0; 32]).build()],
        sequences: sequences(5, 1),
        ..GenesisState::default()
    };
    let mut ctx = MockContext::default();

    let err = import(&mut ctx, &genesis).expect_err("hash mismatch");

    assert_eq!(
        err.to_string(),
        "import failed at code 1 with id: 4: `invalid genesis: `code hashes not same``"
    );
    assert_rolled_back(&ctx);
}

#[test_log::test]
fn duplicate_code_id_is_rejected() {
    let genesis = GenesisState {
        codes: vec![code(1), code(1)],
        sequences: sequences(2, 1),
        ..GenesisState::default()
    };
    let mut ctx = MockContext::default();

    let err = import(&mut ctx, &genesis).expect_err("duplicate");

    assert!(matches!(
        err,
        WasmError::ImportFailed {
            position: ImportPosition::Code { index: 1, code_id: 1 },
            ..
        }
    ));
    assert_rolled_back(&ctx);
}

#[test_log::test]
fn pin_failure_names_entry() {
    let genesis = GenesisState {
        codes: vec![CodeConfig::builder().pinned(true).build()],
        sequences: sequences(2, 1),
        ..GenesisState::default()
    };
    let mut ctx = MockContext::default();
    ctx.engine().fail_pinning("cache full");

    let err = import(&mut ctx, &genesis).expect_err("pin failed");

    match err {
        WasmError::ImportFailed { position, cause } => {
            assert_eq!(position, ImportPosition::Contract { index: 0 });
            assert!(matches!(*cause, WasmError::Engine(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_rolled_back(&ctx);
}

#[rstest]
#[test_log::test]
#[case::unknown_code(
    ContractConfig::builder().address(dummy_contract_address(0x01)).code_id(9).build(),
    ImportPosition::Contract { index: 1 }
)]
#[case::bad_address(
    Contract { contract_address: "cosmos1xyz".to_string(), ..contract_entry(0x01) },
    ImportPosition::ContractAddress { index: 1 }
)]
fn contract_failure_names_entry(#[case] broken: Contract, #[case] expected: ImportPosition) {
    let genesis = GenesisState {
        codes: vec![code(1)],
        contracts: vec![contract_entry(0x02), broken],
        sequences: sequences(2, 3),
        ..GenesisState::default()
    };
    let mut ctx = MockContext::default();

    let err = import(&mut ctx, &genesis).expect_err("broken contract");

    assert!(matches!(err, WasmError::ImportFailed { position, .. } if position == expected));
    assert_rolled_back(&ctx);
}

#[test_log::test]
fn duplicate_state_key_is_rejected() {
    let mut entry = contract_entry(0x01);
    entry.contract_state = vec![
        Model::new(b"k".to_vec(), b"1".to_vec()),
        Model::new(b"k".to_vec(), b"2".to_vec()),
    ];
    let genesis = GenesisState {
        codes: vec![code(1)],
        contracts: vec![entry],
        sequences: sequences(2, 2),
        ..GenesisState::default()
    };
    let mut ctx = MockContext::default();

    let err = import(&mut ctx, &genesis).expect_err("duplicate key");

    let expected = format!("duplicate key: {}", hex::encode(b"k"));
    assert!(err.to_string().contains(&expected));
    assert_rolled_back(&ctx);
}

#[test_log::test]
fn genesis_messages_return_validator_updates() {
    let update = ValidatorUpdate {
        pub_key: vec![1; 32].into(),
        power: 100,
    };
    let genesis = GenesisState {
        gen_msgs: vec![store_code_msg(), store_code_msg()],
        ..GenesisState::default()
    };
    let mut ctx = MockContext::default();
    let mut staking = MockValidatorSource::with_updates(vec![update.clone()]);
    let mut handler = MockMsgHandler::default();

    let updates = init_genesis(&mut ctx.keeper, &genesis, &mut staking, &mut handler)
        .expect("messages succeed");

    assert_eq!(updates, vec![update]);
    assert_eq!(handler.handled.len(), 2);
    assert_eq!(handler.stored_codes, vec![1, 2]);
    assert_eq!(staking.calls, 1);
}

#[test_log::test]
fn store_code_messages_upload_through_the_keeper() {
    let genesis = GenesisState {
        codes: vec![code(1)],
        sequences: sequences(2, 1),
        gen_msgs: vec![store_code_msg()],
        ..GenesisState::default()
    };
    let mut ctx = MockContext::default();
    let mut handler = MockMsgHandler::default();

    init_genesis(
        &mut ctx.keeper,
        &genesis,
        &mut MockValidatorSource::default(),
        &mut handler,
    )
    .expect("messages succeed");

    assert_eq!(handler.stored_codes, vec![2]);
    let code_info = ctx
        .keeper
        .get_code_info(2)
        .expect("readable")
        .expect("code stored");
    assert_eq!(code_info.code_hash, code_checksum(&dummy_wasm_code(9)));
    assert_eq!(code_info.creator, dummy_creator());
    assert_eq!(code_info.instantiate_config, AccessConfig::everybody());

    let exported = export_genesis(&ctx.keeper).expect("exports");
    assert_eq!(exported.codes.len(), 2);
    assert_eq!(exported.codes[1].code_bytes.as_slice(), dummy_wasm_code(9).as_slice());
    assert_eq!(exported.sequences, sequences(3, 1));
}

#[test_log::test]
fn refused_upload_rolls_back_import() {
    let genesis = GenesisState {
        params: Params {
            code_upload_access: AccessConfig::nobody(),
            ..Params::default()
        },
        gen_msgs: vec![store_code_msg()],
        ..GenesisState::default()
    };
    let mut ctx = MockContext::default();

    let err = init_genesis(
        &mut ctx.keeper,
        &genesis,
        &mut MockValidatorSource::default(),
        &mut MockMsgHandler::default(),
    )
    .expect_err("upload refused");

    match err {
        WasmError::GenesisMessageFailed { index, cause } => {
            assert_eq!(index, 0);
            assert!(matches!(*cause, WasmError::Unauthorized { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_rolled_back(&ctx);
}

#[test_log::test]
fn staking_is_untouched_without_messages() {
    let mut ctx = MockContext::default();
    let mut staking = MockValidatorSource::failing("must not be called");

    let updates = init_genesis(
        &mut ctx.keeper,
        &GenesisState::default(),
        &mut staking,
        &mut MockMsgHandler::default(),
    )
    .expect("no messages");

    assert!(updates.is_empty());
    assert_eq!(staking.calls, 0);
}

#[test_log::test]
fn failing_message_rolls_back_import() {
    let genesis = GenesisState {
        codes: vec![code(1)],
        sequences: sequences(2, 1),
        gen_msgs: vec![store_code_msg(), store_code_msg()],
        ..GenesisState::default()
    };
    let mut ctx = MockContext::default();
    let mut staking = MockValidatorSource::default();
    let mut handler = MockMsgHandler::failing_at(1);

    let err = init_genesis(&mut ctx.keeper, &genesis, &mut staking, &mut handler)
        .expect_err("second message fails");

    assert!(matches!(err, WasmError::GenesisMessageFailed { index: 1, .. }));
    assert_eq!(handler.stored_codes, vec![2]);
    assert_eq!(staking.calls, 0);
    assert_rolled_back(&ctx);
}

#[test_log::test]
fn staking_failure_rolls_back_import() {
    let genesis = GenesisState {
        codes: vec![code(1)],
        sequences: sequences(2, 1),
        gen_msgs: vec![store_code_msg()],
        ..GenesisState::default()
    };
    let mut ctx = MockContext::default();

    let err = init_genesis(
        &mut ctx.keeper,
        &genesis,
        &mut MockValidatorSource::failing("no bonded validators"),
        &mut MockMsgHandler::default(),
    )
    .expect_err("staking failed");

    assert!(matches!(err, WasmError::ValidatorSetUpdate { .. }));
    assert_rolled_back(&ctx);
}
