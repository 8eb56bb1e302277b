use ibc_app_wasm::adapter::{
    ChannelQuery, ChannelReaderAdapter, PortBinderAdapter, ValidatorSetSourceAdapter,
};
use ibc_app_wasm::context::{ChannelReader, ValidatorUpdate};
use ibc_app_wasm::genesis::init_genesis;
use ibc_app_wasm::port::ensure_ibc_port;
use ibc_app_wasm::router::{IbcHandler, IbcModule};
use ibc_app_wasm::types::channel::ChannelEnd;
use ibc_app_wasm::types::error::{PortError, WasmError};
use ibc_app_wasm::types::genesis::GenesisState;
use ibc_app_wasm::types::identifiers::{ChannelId, PortId};
use ibc_app_wasm::types::msgs::{GenMsg, MsgStoreCode};
use ibc_app_wasm::types::AddressCodec;
use ibc_wasm_testkit::fixtures::{contract_port_id, dummy_creator, dummy_wasm_code};
use ibc_wasm_testkit::testapp::{
    MockCapabilityKeeper, MockChannelKeeper, MockMsgHandler, MockValidatorSource,
};
use test_log::test;

use super::*;

/// Channel queries that report a missing channel as an error.
#[derive(Debug)]
struct QueryingChannels(MockChannelKeeper);

impl ChannelQuery for QueryingChannels {
    type Error = String;

    fn query_channel(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<ChannelEnd, String> {
        self.0
            .channel_end(port_id, channel_id)
            .ok_or_else(|| format!("channel {channel_id} not found"))
    }
}

#[test]
fn failing_channel_query_reads_as_missing_channel() {
    let ctx = ibc_context();
    let port_id = contract_port_id(&contract());
    let channels = ChannelReaderAdapter::new(QueryingChannels(ctx.channels.clone()));

    assert!(channels.channel_end(&port_id, &channel_id()).is_some());
    assert!(channels.channel_end(&port_id, &ChannelId::new(9)).is_none());

    let mut handler = IbcHandler::new(ctx.keeper, channels);
    handler
        .on_chan_open_confirm_execute(&port_id, &channel_id())
        .expect("channel found through the query");
    assert!(matches!(
        handler.on_chan_close_confirm_execute(&port_id, &ChannelId::new(9)),
        Err(WasmError::ChannelNotFound { .. })
    ));
}

#[test]
fn capability_ports_bind_once_per_contract() {
    let mut ctx = MockContext::default()
        .with_code(1)
        .with_contract(&contract(), 1);
    let mut ports = PortBinderAdapter::new(MockCapabilityKeeper::default());

    let port_id = ctx
        .keeper
        .bind_contract_port(&mut ports, &contract())
        .expect("fresh port");
    assert_eq!(port_id, contract_port_id(&contract()));
    assert_eq!(ports.capability(&port_id), Some(1));

    let again = ensure_ibc_port(&mut ports, &AddressCodec::default(), &contract())
        .expect("held port counts as bound");
    assert_eq!(again, port_id);
    assert_eq!(ports.capability(&port_id), Some(1));
}

#[test]
fn rebuilt_binder_adapter_keeps_contract_ports() {
    let mut ctx = MockContext::default()
        .with_code(1)
        .with_contract(&contract(), 1);
    let mut ports = PortBinderAdapter::new(MockCapabilityKeeper::default());
    let port_id = ctx
        .keeper
        .bind_contract_port(&mut ports, &contract())
        .expect("fresh port");

    let mut rebuilt = PortBinderAdapter::new(ports.into_inner());
    let again = ensure_ibc_port(&mut rebuilt, &AddressCodec::default(), &contract())
        .expect("capability still owned");

    assert_eq!(again, port_id);
    assert_eq!(rebuilt.capability(&port_id), Some(1));
    assert_eq!(rebuilt.into_inner().claimed.len(), 1);
}

#[test]
fn port_claimed_elsewhere_is_not_owned() {
    let mut binder = MockCapabilityKeeper::default();
    binder.foreign.insert(contract_port_id(&contract()));
    let mut ports = PortBinderAdapter::new(binder);

    let err = ensure_ibc_port(&mut ports, &AddressCodec::default(), &contract())
        .expect_err("capability held by another module");

    assert!(matches!(
        err,
        WasmError::PortBinding(PortError::CapabilityNotOwned { .. })
    ));
}

#[test]
fn staking_errors_abort_genesis() {
    let genesis = GenesisState {
        gen_msgs: vec![GenMsg::StoreCode(MsgStoreCode {
            sender: dummy_creator(),
            wasm_byte_code: dummy_wasm_code(3).into(),
            instantiate_permission: None,
        })],
        ..GenesisState::default()
    };
    let update = ValidatorUpdate {
        pub_key: vec![2; 32].into(),
        power: 5,
    };

    let mut ctx = MockContext::default();
    let mut staking = ValidatorSetSourceAdapter::new(MockValidatorSource::with_updates(vec![
        update.clone(),
    ]));
    let updates = init_genesis(
        &mut ctx.keeper,
        &genesis,
        &mut staking,
        &mut MockMsgHandler::default(),
    )
    .expect("staking succeeds");
    assert_eq!(updates, vec![update]);

    let mut ctx = MockContext::default();
    let mut staking = ValidatorSetSourceAdapter::new(MockValidatorSource {
        error: Some("jailed".to_string()),
        ..MockValidatorSource::with_updates(vec![])
    });
    let err = init_genesis(
        &mut ctx.keeper,
        &genesis,
        &mut staking,
        &mut MockMsgHandler::default(),
    )
    .expect_err("staking reported an error");
    assert!(matches!(
        err,
        WasmError::ValidatorSetUpdate { description } if description == "jailed"
    ));
}
