use ibc_app_wasm::port::port_id_for_contract;
use ibc_app_wasm::types::identifiers::PortId;
use ibc_app_wasm::types::prelude::*;
use ibc_app_wasm::types::{AddressCodec, CanonicalAddress};

/// A 32 byte contract address filled with `seed`.
pub fn dummy_contract_address(seed: u8) -> CanonicalAddress {
    CanonicalAddress::new(vec![seed; 32])
}

/// A 20 byte account address filled with `seed`.
pub fn dummy_account_address(seed: u8) -> CanonicalAddress {
    CanonicalAddress::new(vec![seed; 20])
}

/// The bech32 rendering of `address` under the default prefix.
pub fn human_address(address: &CanonicalAddress) -> String {
    AddressCodec::default()
        .humanize(address.as_slice())
        .expect("dummy addresses have a valid length")
}

/// The port the contract at `address` owns.
pub fn contract_port_id(address: &CanonicalAddress) -> PortId {
    port_id_for_contract(&human_address(address))
}
