//! Twenty-byte account addresses.

use std::fmt;
use std::str::FromStr;

/// Length of an account address in bytes.
pub const ADDRESS_LENGTH: usize = 20;

/// An account address, such as the miner's reward recipient.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    /// The all-zero address, never a valid reward recipient.
    pub const ZERO: Self = Self([0; ADDRESS_LENGTH]);

    /// Wraps raw address bytes.
    #[must_use]
    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Raw address bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// Whether every byte is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Parses a hex string into an address.
    ///
    /// The `0x` prefix is optional and an odd digit count is padded with a
    /// leading zero. Inputs shorter than twenty bytes are left-padded with
    /// zeros; longer inputs keep their trailing twenty bytes.
    ///
    /// # Errors
    ///
    /// Returns the [`hex::FromHexError`] for non-hex characters.
    pub fn from_hex(text: &str) -> Result<Self, hex::FromHexError> {
        let digits = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
            .unwrap_or(text);
        let bytes = if digits.len().is_multiple_of(2) {
            hex::decode(digits)?
        } else {
            hex::decode(format!("0{digits}"))?
        };
        Ok(Self::from_trailing_bytes(&bytes))
    }

    fn from_trailing_bytes(bytes: &[u8]) -> Self {
        let kept = bytes
            .get(bytes.len().saturating_sub(ADDRESS_LENGTH)..)
            .unwrap_or_default();
        let mut address = [0_u8; ADDRESS_LENGTH];
        if let Some(slot) = address.get_mut(ADDRESS_LENGTH - kept.len()..) {
            slot.copy_from_slice(kept);
        }
        Self(address)
    }
}

impl FromStr for Address {
    type Err = hex::FromHexError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_hex(value)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "0x{}", hex::encode(self.as_bytes()))
    }
}
