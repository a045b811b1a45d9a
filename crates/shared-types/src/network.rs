// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Network selection and native denomination constants
//!
//! The service talks to one Xion network at a time. The network only decides which
//! built-in list of REST nodes is used when the operator does not supply one.

use std::{convert::Infallible, fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;

/// Minor-unit denomination of the native token
pub const NATIVE_DENOM: &str = "uxion";

/// Display ticker of the native token
pub const NATIVE_TICKER: &str = "XION";

/// Decimal places between the minor unit and the display unit
pub const NATIVE_DECIMALS: u32 = 6;

/// Bech32 human-readable prefix of account addresses
pub const ADDRESS_PREFIX: &str = "xion";

const MAINNET_ENDPOINTS: &[&str] = &[
    "https://api.mainnet.xion.burnt.com",
    "https://xion-rest.publicnode.com",
    "https://xion-mainnet-rest.chainlayer.network",
    "https://xion-mainnet-api.bigdipper.live",
    "https://xion-mainnet-api.customnode.com",
];

const TESTNET_ENDPOINTS: &[&str] = &["https://api.xion-testnet-2.burnt.com"];

/// Xion network selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ToSchema)]
pub enum Network {
    /// Production network
    #[default]
    Mainnet,
    /// Public test network
    Testnet,
}

impl Network {
    /// Returns the configuration name of the network
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
        }
    }

    /// Returns the built-in REST base URLs for this network
    pub const fn default_endpoints(self) -> &'static [&'static str] {
        match self {
            Self::Mainnet => MAINNET_ENDPOINTS,
            Self::Testnet => TESTNET_ENDPOINTS,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Anything other than `mainnet` (case-insensitive, trimmed) selects the test network.
impl FromStr for Network {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("mainnet") {
            Ok(Self::Mainnet)
        } else {
            Ok(Self::Testnet)
        }
    }
}

impl Serialize for Network {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Network {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        let Ok(network) = value.parse::<Self>();
        Ok(network)
    }
}
