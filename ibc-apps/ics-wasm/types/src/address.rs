use core::fmt::{Debug, Display, Error as FmtError, Formatter};

use derive_more::{From, Into};
use subtle_encoding::bech32;

use crate::error::WasmError;
use crate::prelude::*;
use crate::DEFAULT_BECH32_PREFIX;

/// Longest canonical address accepted by the account layer.
pub const MAX_ADDR_LEN: usize = 255;

/// Longest human-readable part allowed by BIP-173.
const MAX_HRP_LEN: usize = 83;

/// The binary form of an account address, as stored and compared on chain.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into)]
pub struct CanonicalAddress(Vec<u8>);

impl CanonicalAddress {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_slice(&self) -> &[u8] {
        self.0.as_slice()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&[u8]> for CanonicalAddress {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl AsRef<[u8]> for CanonicalAddress {
    fn as_ref(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl Debug for CanonicalAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "CanonicalAddress({})", hex::encode_upper(&self.0))
    }
}

impl Display for CanonicalAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", hex::encode_upper(&self.0))
    }
}

/// Converts between canonical addresses and their bech32 rendering under a
/// fixed human-readable prefix.
///
/// The lowercase bech32 string is the only normalized rendering; upper-case
/// input decodes but does not validate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddressCodec {
    prefix: String,
}

impl AddressCodec {
    pub fn new(prefix: impl Into<String>) -> Result<Self, WasmError> {
        let prefix = prefix.into();
        let valid = (1..=MAX_HRP_LEN).contains(&prefix.len())
            && prefix
                .chars()
                .all(|c| c.is_ascii_graphic() && !c.is_ascii_uppercase());
        if !valid {
            return Err(WasmError::InvalidConfig {
                description: format!("invalid bech32 prefix `{prefix}`"),
            });
        }
        Ok(Self { prefix })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Checks the canonical-form predicate: non-empty and at most
    /// [`MAX_ADDR_LEN`] bytes.
    pub fn verify_address_format(&self, bytes: &[u8]) -> Result<(), WasmError> {
        if bytes.is_empty() {
            return Err(WasmError::InvalidAddressFormat {
                description: "addresses cannot be empty".to_string(),
            });
        }
        if bytes.len() > MAX_ADDR_LEN {
            return Err(WasmError::InvalidAddressFormat {
                description: format!(
                    "address max length is {MAX_ADDR_LEN}, got {}",
                    bytes.len()
                ),
            });
        }
        Ok(())
    }

    pub fn humanize(&self, canonical: &[u8]) -> Result<String, WasmError> {
        self.verify_address_format(canonical)?;
        Ok(bech32::encode(&self.prefix, canonical))
    }

    pub fn canonicalize(&self, human: &str) -> Result<CanonicalAddress, WasmError> {
        if human.trim().is_empty() {
            return Err(WasmError::InvalidAddressFormat {
                description: "empty address string is not allowed".to_string(),
            });
        }

        // bech32 permits an all upper-case spelling; decode it as lowercase
        // and let `validate` reject it as not normalized.
        let decoded = if human.chars().any(|c| c.is_ascii_lowercase()) {
            bech32::decode(human)
        } else {
            bech32::decode(human.to_lowercase())
        };
        let (hrp, bytes) = decoded.map_err(|e| WasmError::InvalidAddressFormat {
            description: format!("decoding bech32 failed: {e:?}"),
        })?;

        if hrp != self.prefix {
            return Err(WasmError::InvalidAddressFormat {
                description: format!(
                    "invalid Bech32 prefix; expected {}, got {hrp}",
                    self.prefix
                ),
            });
        }

        self.verify_address_format(&bytes)?;

        Ok(CanonicalAddress(bytes))
    }

    /// Canonicalizes `human` and checks that humanizing the result gives back
    /// the very same string.
    pub fn validate(&self, human: &str) -> Result<CanonicalAddress, WasmError> {
        let canonical = self.canonicalize(human)?;
        if self.humanize(canonical.as_slice())? != human {
            return Err(WasmError::NotNormalized {
                address: human.to_string(),
            });
        }
        Ok(canonical)
    }
}

impl Default for AddressCodec {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_BECH32_PREFIX.to_string(),
        }
    }
}
