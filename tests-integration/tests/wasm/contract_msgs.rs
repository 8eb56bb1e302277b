use ibc_app_wasm::context::ChannelReader;
use ibc_app_wasm::handler::{close_channel_from_contract, send_packet_from_contract};
use ibc_app_wasm::types::channel::State;
use ibc_app_wasm::types::envelope::{IbcTimeout, IbcTimeoutBlock, IbcTimestamp};
use ibc_app_wasm::types::error::WasmError;
use ibc_app_wasm::types::identifiers::Sequence;
use ibc_app_wasm::types::packet::{Height, TimeoutHeight};
use ibc_wasm_testkit::fixtures::{contract_port_id, dummy_contract_address};
use rstest::rstest;

use super::*;

fn block_timeout(height: u64) -> IbcTimeout {
    IbcTimeout {
        block: Some(IbcTimeoutBlock {
            revision: 1,
            height,
        }),
        timestamp: None,
    }
}

#[test_log::test]
fn contract_sends_on_its_own_port() {
    let mut ctx = ibc_context();

    let first = send_packet_from_contract(
        &ctx.keeper,
        &mut ctx.channels,
        &contract(),
        &channel_id(),
        block_timeout(100),
        b"first".to_vec(),
    )
    .expect("channel exists");
    let second = send_packet_from_contract(
        &ctx.keeper,
        &mut ctx.channels,
        &contract(),
        &channel_id(),
        IbcTimeout {
            block: None,
            timestamp: Some(IbcTimestamp(5_000)),
        },
        b"second".to_vec(),
    )
    .expect("channel exists");

    assert_eq!(first, Sequence::from(1));
    assert_eq!(second, Sequence::from(2));

    let sent = &ctx.channels.sent_packets;
    assert_eq!(sent[0].port_id, contract_port_id(&contract()));
    assert_eq!(sent[0].timeout_height, TimeoutHeight::At(Height::new(1, 100)));
    assert_eq!(sent[0].timeout_timestamp, 0);
    assert_eq!(sent[1].timeout_height, TimeoutHeight::Never);
    assert_eq!(sent[1].timeout_timestamp, 5_000);
    assert_eq!(sent[1].data, b"second".to_vec());
}

#[test_log::test]
fn packet_without_timeout_is_rejected() {
    let mut ctx = ibc_context();

    let err = send_packet_from_contract(
        &ctx.keeper,
        &mut ctx.channels,
        &contract(),
        &channel_id(),
        IbcTimeout::default(),
        b"data".to_vec(),
    )
    .expect_err("no timeout");

    assert!(matches!(err, WasmError::EmptyTimeout));
    assert!(ctx.channels.sent_packets.is_empty());
}

#[rstest]
#[test_log::test]
#[case::never_bound(MockContext::default().with_code(1).with_contract(&contract(), 1))]
#[case::unknown(MockContext::default())]
fn contract_without_port_cannot_send(#[case] mut ctx: MockContext) {
    let err = send_packet_from_contract(
        &ctx.keeper,
        &mut ctx.channels,
        &contract(),
        &channel_id(),
        block_timeout(10),
        b"data".to_vec(),
    )
    .expect_err("no port");

    assert!(matches!(err, WasmError::NotIbcContract { .. }));
}

#[test_log::test]
fn contract_closes_its_channel() {
    let mut ctx = ibc_context();
    let port_id = contract_port_id(&contract());

    close_channel_from_contract(&ctx.keeper, &mut ctx.channels, &contract(), &channel_id())
        .expect("channel exists");

    let channel_end = ctx
        .channels
        .channel_end(&port_id, &channel_id())
        .expect("channel kept");
    assert_eq!(channel_end.state, State::Closed);
}

#[test_log::test]
fn closing_channel_of_other_port_fails() {
    let other = dummy_contract_address(0xBB);
    let mut ctx = ibc_context().with_ibc_contract(&other, 1);

    let err = close_channel_from_contract(&ctx.keeper, &mut ctx.channels, &other, &channel_id())
        .expect_err("channel is on another port");

    assert!(matches!(err, WasmError::ChannelNotFound { .. }));
}
