use ibc_app_wasm::router::IbcModule;
use ibc_app_wasm::types::envelope::{Attribute, EntryPoint, IbcPacketReceiveMsg, IbcReceiveResponse};
use ibc_app_wasm::types::identifiers::Sequence;
use ibc_app_wasm::types::packet::{Height, TimeoutHeight};
use ibc_app_wasm::types::serializers::Binary;
use ibc_wasm_testkit::fixtures::contract_port_id;
use ibc_wasm_testkit::testapp::ScriptedCall;
use test_log::test;

use super::*;

#[test]
fn contract_ack_is_relayed_as_success() {
    let ctx = ibc_context();
    ctx.engine().script(
        EntryPoint::IbcPacketReceive,
        ScriptedCall::json(&IbcReceiveResponse {
            acknowledgement: Some(Binary::from(br#"{"error":"app level"}"#.as_slice())),
            attributes: vec![Attribute {
                key: "packet".to_string(),
                value: "received".to_string(),
            }],
        }),
    );
    let mut handler = ctx.into_handler();

    let (extras, ack) = handler.on_recv_packet_execute(&inbound_packet(), "relayer");

    // application level errors still commit
    assert!(ack.success());
    assert_eq!(ack.acknowledgement(), br#"{"error":"app level"}"#.to_vec());
    assert_eq!(extras.events.len(), 1);
}

#[test]
fn missing_contract_ack_is_empty() {
    let mut handler = ibc_context().into_handler();

    let (extras, ack) = handler.on_recv_packet_execute(&inbound_packet(), "relayer");

    assert!(ack.success());
    assert!(ack.acknowledgement().is_empty());
    assert!(extras.events.is_empty());
}

#[test]
fn contract_failure_becomes_error_ack() {
    let ctx = ibc_context();
    ctx.engine().script(
        EntryPoint::IbcPacketReceive,
        ScriptedCall::contract_error(r#"bad "payload""#),
    );
    let mut handler = ctx.into_handler();

    let (extras, ack) = handler.on_recv_packet_execute(&inbound_packet(), "relayer");

    assert!(!ack.success());
    assert!(extras.events.is_empty());
    let ack = String::from_utf8(ack.acknowledgement()).expect("JSON ack");
    assert!(ack.starts_with(r#"{"error":"#));
    assert!(ack.contains(r#"bad \"payload\""#));
}

#[test]
fn foreign_port_becomes_error_ack() {
    let mut packet = inbound_packet();
    packet.port_id_on_b = transfer_port();
    let ctx = ibc_context();
    let engine = ctx.engine().clone();
    let mut handler = ctx.into_handler();

    let (_, ack) = handler.on_recv_packet_execute(&packet, "relayer");

    assert!(!ack.success());
    let ack = String::from_utf8(ack.acknowledgement()).expect("JSON ack");
    assert!(ack.starts_with(r#"{"error":"contract port id"#));
    assert!(engine.calls().is_empty());
}

#[test]
fn receive_envelope_carries_packet() {
    let mut packet = inbound_packet();
    packet.seq_on_a = Sequence::from(42);
    packet.data = b"hello".to_vec();
    packet.timeout_height_on_b = TimeoutHeight::from(Height::new(1, 500));
    packet.timeout_timestamp_on_b = 1_700_000_000_000_000_000;
    let ctx = ibc_context();
    let engine = ctx.engine().clone();
    let mut handler = ctx.into_handler();

    handler.on_recv_packet_execute(&packet, "relayer-1");

    let call = engine.last_call().expect("contract was called");
    let msg: IbcPacketReceiveMsg = serde_json::from_slice(&call.msg).expect("receive envelope");
    assert_eq!(msg.relayer, "relayer-1");
    assert_eq!(msg.packet.sequence, 42);
    assert_eq!(msg.packet.data.as_slice(), b"hello");
    assert_eq!(msg.packet.dest.port_id, contract_port_id(&contract()).to_string());
    assert_eq!(msg.packet.timeout.block.map(|b| b.height), Some(500));
    assert!(call
        .msg_str()
        .contains(r#""timestamp":"1700000000000000000""#));
}
