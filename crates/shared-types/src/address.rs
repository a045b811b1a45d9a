// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Wallet address validation
//!
//! Addresses are accepted on shape alone: `<prefix>1` followed by 20 to 90 lowercase
//! ASCII letters or digits. The bech32 checksum is not verified.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use thiserror::Error;

use crate::network::ADDRESS_PREFIX;

const MIN_DATA_LEN: usize = 20;
const MAX_DATA_LEN: usize = 90;

/// Reasons an address string is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// Input was empty
    #[error("address is empty")]
    Empty,
    /// Input did not start with `<prefix>1`
    #[error("address must start with '{expected}1'")]
    WrongPrefix {
        /// Expected human-readable prefix
        expected: String,
    },
    /// Data part had the wrong length
    #[error("address data part must be {MIN_DATA_LEN}-{MAX_DATA_LEN} characters, got {len}")]
    InvalidLength {
        /// Observed data part length
        len: usize,
    },
    /// Data part contained a character outside `[0-9a-z]`
    #[error("address contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// A syntactically valid account address, immutable once accepted
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WalletAddress(Box<str>);

impl WalletAddress {
    /// Validate an address against the default `xion` prefix
    ///
    /// # Errors
    ///
    /// Returns an [`AddressError`] describing the first rule the input breaks
    pub fn parse(raw: &str) -> Result<Self, AddressError> {
        Self::parse_with_prefix(raw, ADDRESS_PREFIX)
    }

    /// Validate an address against an explicit human-readable prefix
    ///
    /// # Errors
    ///
    /// Returns an [`AddressError`] describing the first rule the input breaks
    pub fn parse_with_prefix(raw: &str, prefix: &str) -> Result<Self, AddressError> {
        if raw.is_empty() {
            return Err(AddressError::Empty);
        }

        let data = raw
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('1'))
            .ok_or_else(|| AddressError::WrongPrefix {
                expected: prefix.to_string(),
            })?;

        if let Some(bad) = data
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit()))
        {
            return Err(AddressError::InvalidCharacter(bad));
        }

        if !(MIN_DATA_LEN..=MAX_DATA_LEN).contains(&data.len()) {
            return Err(AddressError::InvalidLength { len: data.len() });
        }

        Ok(Self(raw.into()))
    }

    /// Returns true if `raw` would be accepted by [`WalletAddress::parse`]
    pub fn is_valid(raw: &str) -> bool {
        Self::parse(raw).is_ok()
    }

    /// Get the address as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for WalletAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for WalletAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for WalletAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for WalletAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(de::Error::custom)
    }
}
