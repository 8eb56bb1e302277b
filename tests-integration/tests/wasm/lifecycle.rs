use ibc_app_wasm::router::IbcModule;
use ibc_app_wasm::types::channel::Version;
use ibc_app_wasm::types::envelope::{
    Attribute, EntryPoint, IbcBasicResponse, IbcChannelCloseMsg, IbcChannelConnectMsg,
    IbcChannelOpenMsg, IbcChannelOpenResponse, CONTRACT_ADDRESS_ATTRIBUTE, WASM_EVENT_KIND,
};
use ibc_app_wasm::types::error::{HostError, WasmError};
use ibc_app_wasm::types::identifiers::{ChannelId, ConnectionId};
use ibc_app_wasm::types::MAX_CHANNEL_SEQUENCE;
use ibc_wasm_testkit::fixtures::{contract_port_id, human_address};
use ibc_wasm_testkit::testapp::ScriptedCall;
use rstest::rstest;

use super::*;

fn contract_answers_open(version: &str) -> MockContext {
    let ctx = ibc_context();
    ctx.engine().script(
        EntryPoint::IbcChannelOpen,
        ScriptedCall::json(&IbcChannelOpenResponse {
            version: version.to_string(),
        }),
    );
    ctx
}

#[rstest]
#[test_log::test]
#[case::contract_picks_version("v2", "v2")]
#[case::empty_answer_keeps_proposal("", "v1")]
fn open_init_adopts_contract_version(#[case] answered: &str, #[case] expected: &str) {
    let mut handler = contract_answers_open(answered).into_handler();
    let (order, hops) = open_args();

    let (_, version) = handler
        .on_chan_open_init_execute(
            order,
            &hops,
            &contract_port_id(&contract()),
            &channel_id(),
            &counterparty(),
            &Version::from("v1"),
        )
        .expect("contract accepts the channel");

    assert_eq!(version, Version::from(expected));
}

#[test_log::test]
fn open_init_without_answer_keeps_proposal() {
    let ctx = ibc_context();
    let engine = ctx.engine().clone();
    let mut handler = ctx.into_handler();
    let (order, hops) = open_args();

    let (extras, version) = handler
        .on_chan_open_init_execute(
            order,
            &hops,
            &contract_port_id(&contract()),
            &channel_id(),
            &counterparty(),
            &Version::from("v1"),
        )
        .expect("contract accepts the channel");

    assert_eq!(version, Version::from("v1"));
    assert!(extras.events.is_empty());

    let call = engine.last_call().expect("contract was called");
    assert_eq!(call.entry_point, EntryPoint::IbcChannelOpen);
    assert_eq!(call.contract_address, human_address(&contract()));
    assert_eq!(call.canonical_address, Some(contract()));
    let msg: IbcChannelOpenMsg = serde_json::from_slice(&call.msg).expect("open envelope");
    assert!(matches!(msg, IbcChannelOpenMsg::OpenInit { .. }));
    assert_eq!(msg.channel().version, "v1");
    assert_eq!(msg.channel().counterparty_endpoint.channel_id, "");
}

#[test_log::test]
fn open_try_keeps_counterparty_version() {
    let ctx = contract_answers_open("v9");
    let engine = ctx.engine().clone();
    let mut handler = ctx.into_handler();
    let (order, hops) = open_args();

    let (_, version) = handler
        .on_chan_open_try_execute(
            order,
            &hops,
            &contract_port_id(&contract()),
            &channel_id(),
            &counterparty(),
            &Version::from("v3"),
        )
        .expect("contract accepts the channel");

    assert_eq!(version, Version::from("v3"));
    let call = engine.last_call().expect("contract was called");
    let msg: IbcChannelOpenMsg = serde_json::from_slice(&call.msg).expect("open envelope");
    assert!(matches!(
        msg,
        IbcChannelOpenMsg::OpenTry { ref counterparty_version, .. } if counterparty_version == "v3"
    ));
}

#[test_log::test]
fn open_rejection_aborts_handshake() {
    let ctx = ibc_context();
    ctx.engine().script(
        EntryPoint::IbcChannelOpen,
        ScriptedCall::contract_error("unsupported version"),
    );
    let mut handler = ctx.into_handler();
    let (order, hops) = open_args();

    let err = handler
        .on_chan_open_init_execute(
            order,
            &hops,
            &contract_port_id(&contract()),
            &channel_id(),
            &counterparty(),
            &Version::from("v1"),
        )
        .expect_err("contract refused");

    assert!(matches!(
        err,
        WasmError::HostInvocationFailed {
            entry_point: EntryPoint::IbcChannelOpen,
            source: HostError::Contract { .. },
        }
    ));
}

#[test_log::test]
fn open_validation_rejects_channels_past_the_limit() {
    let handler = ibc_context().into_handler();
    let (order, hops) = open_args();
    let channel_id = ChannelId::new(MAX_CHANNEL_SEQUENCE + 1);

    let err = handler
        .on_chan_open_init_validate(
            order,
            &hops,
            &contract_port_id(&contract()),
            &channel_id,
            &counterparty(),
            &Version::from("v1"),
        )
        .expect_err("channel sequence too high");

    assert!(matches!(err, WasmError::ChannelLimitExceeded { .. }));
}

#[test_log::test]
fn open_validation_rejects_multi_hop_channels() {
    let handler = ibc_context().into_handler();
    let hops = vec![ConnectionId::zero(), ConnectionId::new(1)];

    let err = handler
        .on_chan_open_try_validate(
            Order::Unordered,
            &hops,
            &contract_port_id(&contract()),
            &channel_id(),
            &counterparty(),
            &Version::from("v1"),
        )
        .expect_err("two hops");

    assert!(matches!(err, WasmError::InvalidConnectionHops { actual: 2 }));
}

#[test_log::test]
fn open_validation_rejects_foreign_ports() {
    let handler = ibc_context().into_handler();
    let (order, hops) = open_args();

    let err = handler
        .on_chan_open_init_validate(
            order,
            &hops,
            &transfer_port(),
            &channel_id(),
            &counterparty(),
            &Version::from("v1"),
        )
        .expect_err("not a contract port");

    assert!(matches!(err, WasmError::ContractPortId(_)));
}

#[test_log::test]
fn open_ack_hands_stored_channel_to_contract() {
    let ctx = ibc_context();
    let engine = ctx.engine().clone();
    engine.script(
        EntryPoint::IbcChannelConnect,
        ScriptedCall::json(&IbcBasicResponse {
            attributes: vec![Attribute {
                key: "action".to_string(),
                value: "connected".to_string(),
            }],
        }),
    );
    let mut handler = ctx.into_handler();
    let port_id = contract_port_id(&contract());

    handler
        .on_chan_open_ack_validate(&port_id, &channel_id(), &Version::from("v1"))
        .expect("channel is stored");
    let extras = handler
        .on_chan_open_ack_execute(&port_id, &channel_id(), &Version::from("v1"))
        .expect("contract accepts");

    let call = engine.last_call().expect("contract was called");
    let msg: IbcChannelConnectMsg = serde_json::from_slice(&call.msg).expect("connect envelope");
    assert!(matches!(msg, IbcChannelConnectMsg::OpenAck { .. }));
    assert_eq!(msg.channel().endpoint.port_id, port_id.to_string());
    assert_eq!(msg.channel().counterparty_endpoint.channel_id, "channel-0");

    let event = &extras.events[0];
    assert_eq!(event.kind, WASM_EVENT_KIND);
    assert_eq!(event.attributes[0].key, CONTRACT_ADDRESS_ATTRIBUTE);
    assert_eq!(event.attributes[0].value, human_address(&contract()));
    assert_eq!(event.attributes[1].value, "connected");
}

#[test_log::test]
fn open_confirm_needs_stored_channel() {
    let mut handler = ibc_context().into_handler();
    let port_id = contract_port_id(&contract());
    let unknown = ChannelId::new(7);

    assert!(matches!(
        handler.on_chan_open_confirm_validate(&port_id, &unknown),
        Err(WasmError::ChannelNotFound { .. })
    ));
    handler
        .on_chan_open_confirm_execute(&port_id, &channel_id())
        .expect("channel is stored");
}

#[test_log::test]
fn close_init_refusal_aborts_close() {
    let ctx = ibc_context();
    ctx.engine().script(
        EntryPoint::IbcChannelClose,
        ScriptedCall::contract_error("channel must stay open"),
    );
    let mut handler = ctx.into_handler();
    let port_id = contract_port_id(&contract());

    handler
        .on_chan_close_init_validate(&port_id, &channel_id())
        .expect("validation does not call the contract");
    let err = handler
        .on_chan_close_init_execute(&port_id, &channel_id())
        .expect_err("contract refused");

    assert!(matches!(
        err,
        WasmError::HostInvocationFailed {
            entry_point: EntryPoint::IbcChannelClose,
            ..
        }
    ));
}

#[test_log::test]
fn close_confirm_reaches_contract() {
    let ctx = ibc_context();
    let engine = ctx.engine().clone();
    let mut handler = ctx.into_handler();

    handler
        .on_chan_close_confirm_execute(&contract_port_id(&contract()), &channel_id())
        .expect("contract accepts");

    let call = engine.last_call().expect("contract was called");
    let msg: IbcChannelCloseMsg = serde_json::from_slice(&call.msg).expect("close envelope");
    assert!(matches!(msg, IbcChannelCloseMsg::CloseConfirm { .. }));
}

#[rstest]
#[test_log::test]
#[case::ack(EntryPoint::IbcPacketAck, "on ack")]
#[case::timeout(EntryPoint::IbcPacketTimeout, "on timeout")]
fn packet_callback_failure_names_callback(
    #[case] entry_point: EntryPoint,
    #[case] expected: &'static str,
) {
    let ctx = ibc_context();
    ctx.engine()
        .script(entry_point, ScriptedCall::contract_error("boom"));
    let mut handler = ctx.into_handler();
    let packet = outbound_packet();

    let (extras, result) = match entry_point {
        EntryPoint::IbcPacketAck => {
            handler.on_acknowledgement_packet_execute(&packet, b"{\"result\":\"AQ==\"}", "relayer")
        }
        _ => handler.on_timeout_packet_execute(&packet, "relayer"),
    };

    assert!(extras.events.is_empty());
    match result {
        Err(WasmError::CallbackFailed { callback, cause }) => {
            assert_eq!(callback, expected);
            assert!(matches!(*cause, WasmError::HostInvocationFailed { .. }));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test_log::test]
fn ack_hands_acknowledgement_to_contract() {
    let ctx = ibc_context();
    let engine = ctx.engine().clone();
    let mut handler = ctx.into_handler();
    let packet = outbound_packet();

    handler
        .on_acknowledgement_packet_validate(&packet, b"ack", "relayer")
        .expect("sender is a contract");
    let (_, result) = handler.on_acknowledgement_packet_execute(&packet, b"ack", "relayer");
    result.expect("contract accepts");

    let call = engine.last_call().expect("contract was called");
    assert_eq!(call.entry_point, EntryPoint::IbcPacketAck);
    assert!(call.msg_str().contains(r#""acknowledgement":{"data":"YWNr"}"#));
    assert!(call.msg_str().contains(r#""relayer":"relayer""#));
}

#[test_log::test]
fn timeout_on_foreign_port_is_rejected() {
    let handler = ibc_context().into_handler();
    let packet = inbound_packet();

    assert!(matches!(
        handler.on_timeout_packet_validate(&packet, "relayer"),
        Err(WasmError::ContractPortId(_))
    ));
}

#[test_log::test]
fn negotiation_accepts_proposed_version() {
    let handler = ibc_context().into_handler();

    let version = handler
        .negotiate_app_version(
            Order::Ordered,
            &ConnectionId::zero(),
            &contract_port_id(&contract()),
            &counterparty(),
            &Version::from("custom-1"),
        )
        .expect("always accepted");

    assert_eq!(version, Version::from("custom-1"));
}
