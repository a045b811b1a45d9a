// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Wallet snapshot types
//!
//! [`WalletSnapshot`] is what a single REST node reported, in integer minor units.
//! [`WalletInfo`] is the final record handed to callers, in display units, carrying
//! the anomaly flag and any explorer rows used to correct the balance.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{address::WalletAddress, endpoint::Endpoint};

/// Outcome status of one resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WalletStatus {
    /// All reads answered, including the transaction count
    Ok,
    /// Balances answered but the transaction count was unavailable
    Partial,
    /// The address failed syntactic validation
    InvalidAddress,
    /// Every eligible endpoint failed or was circuit-blocked
    Unreachable,
}

impl WalletStatus {
    /// Returns the wire name of the status
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Partial => "partial",
            Self::InvalidAddress => "invalid_address",
            Self::Unreachable => "unreachable",
        }
    }

    /// Returns true if the status carries data from a node
    pub const fn is_resolved(self) -> bool {
        matches!(self, Self::Ok | Self::Partial)
    }
}

impl fmt::Display for WalletStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the category balances are folded into the total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TotalPolicy {
    /// `total = liquid + staked + unbonding`
    #[default]
    LiquidStakedUnbonding,
    /// `total = spendable + staked + unbonding`
    SpendableStakedUnbonding,
}

impl TotalPolicy {
    /// Fold category balances into a total, saturating on overflow
    pub const fn total(self, balances: &CategoryBalances) -> u128 {
        let base = match self {
            Self::LiquidStakedUnbonding => balances.liquid,
            Self::SpendableStakedUnbonding => balances.spendable,
        };
        base.saturating_add(balances.staked)
            .saturating_add(balances.unbonding)
    }
}

/// How a node confirmed the account is live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Liveness {
    /// The balances read returned a usable list
    WithBalances,
    /// Balances were unusable but the account record exists
    AccountExistsZeroBalance,
}

impl Liveness {
    /// Returns the diagnostic label for this liveness kind
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WithBalances => "ok_with_balances",
            Self::AccountExistsZeroBalance => "acct_exists_zero_balance",
        }
    }
}

/// One denom/amount pair as reported by a node, in minor units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinBalance {
    /// Denomination, e.g. `uxion` or an `ibc/...` hash
    pub denom: String,
    /// Raw integer amount
    pub amount: u128,
}

/// Native-token balances per category, in minor units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryBalances {
    /// Bank balance of the native denom
    pub liquid: u128,
    /// Spendable bank balance (informational)
    pub spendable: u128,
    /// Sum of active delegations
    pub staked: u128,
    /// Sum of unbonding entries
    pub unbonding: u128,
}

/// What one endpoint reported for one address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSnapshot {
    /// Queried address
    pub address: WalletAddress,
    /// `Ok` or `Partial`
    pub status: WalletStatus,
    /// The single endpoint credited with this data
    pub endpoint: Endpoint,
    /// How the account was confirmed live
    pub liveness: Liveness,
    /// Native-token category balances
    pub balances: CategoryBalances,
    /// Total under the configured [`TotalPolicy`]
    pub total: u128,
    /// Sender plus recipient transaction count (0 when unavailable)
    pub tx_count: u64,
    /// Coarse failed transaction count, best effort
    pub failed_txs: u64,
    /// Every denom the bank module reported
    pub raw_balances: Vec<CoinBalance>,
    /// Time the probe spent querying the endpoint
    pub elapsed: Duration,
}

/// One asset row scraped from the explorer page, kept verbatim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AssetRow {
    /// Symbol text as displayed, e.g. `XION`
    pub symbol: String,
    /// Amount text as displayed, may contain thousands separators
    pub amount: String,
}

impl AssetRow {
    /// Create a new asset row
    pub fn new(symbol: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            amount: amount.into(),
        }
    }
}

/// One denom in display form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DisplayBalance {
    /// Denomination as reported by the node
    pub denom: String,
    /// Display symbol (`XION` for the native denom, otherwise the denom)
    pub symbol: String,
    /// Amount in display units for the native denom, raw otherwise
    pub amount: f64,
}

/// Final wallet record handed to the presentation layer, metrics and scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WalletInfo {
    /// Address as submitted
    pub address: String,
    /// Resolution status
    pub status: WalletStatus,
    /// Human-readable explanation for non-success statuses
    pub reason: Option<String>,
    /// Endpoint whose data is shown, if any answered
    pub endpoint: Option<String>,
    /// Short diagnostic label
    pub debug_reason: String,
    /// Seconds from request start to completion
    pub duration: f64,
    /// Total native balance in display units
    pub balance: f64,
    /// Spendable native balance in display units
    pub spendable: f64,
    /// Liquid native balance in display units
    pub liquid: f64,
    /// Staked native balance in display units
    pub staked: f64,
    /// Unbonding native balance in display units
    pub unbonding: f64,
    /// All reported denoms
    pub balances: Vec<DisplayBalance>,
    /// Transaction count
    pub tx_count: u64,
    /// Coarse failed transaction count
    pub failed_txs: u64,
    /// Wallet looks empty and inactive per structured sources
    pub anomaly: bool,
    /// Explorer rows, present only when the fallback scrape ran and succeeded
    pub fallback_assets: Option<Vec<AssetRow>>,
}

impl WalletInfo {
    fn empty(address: &str, status: WalletStatus, reason: String, debug_reason: String) -> Self {
        Self {
            address: address.to_string(),
            status,
            reason: Some(reason),
            endpoint: None,
            debug_reason,
            duration: 0.0,
            balance: 0.0,
            spendable: 0.0,
            liquid: 0.0,
            staked: 0.0,
            unbonding: 0.0,
            balances: Vec::new(),
            tx_count: 0,
            failed_txs: 0,
            anomaly: true,
            fallback_assets: None,
        }
    }

    /// Terminal record for an address that failed validation
    pub fn invalid_address(address: &str) -> Self {
        Self::empty(
            address,
            WalletStatus::InvalidAddress,
            "Invalid Xion bech32 format".to_string(),
            "invalid_format".to_string(),
        )
    }

    /// Terminal record for a resolution where no endpoint answered
    pub fn unreachable(address: &str, last_reason: &str) -> Self {
        Self::empty(
            address,
            WalletStatus::Unreachable,
            format!("All endpoints failed. Last: {last_reason}"),
            last_reason.to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_wire_names() {
        assert_eq!(WalletStatus::Ok.to_string(), "ok");
        assert_eq!(WalletStatus::InvalidAddress.to_string(), "invalid_address");
        assert_eq!(
            serde_json::to_string(&WalletStatus::Unreachable).unwrap(),
            "\"unreachable\""
        );
        assert!(WalletStatus::Partial.is_resolved());
        assert!(!WalletStatus::Unreachable.is_resolved());
    }

    #[test]
    fn total_policies() {
        let balances = CategoryBalances {
            liquid: 5,
            spendable: 3,
            staked: 10,
            unbonding: 2,
        };
        assert_eq!(TotalPolicy::LiquidStakedUnbonding.total(&balances), 17);
        assert_eq!(TotalPolicy::SpendableStakedUnbonding.total(&balances), 15);
        assert_eq!(TotalPolicy::default(), TotalPolicy::LiquidStakedUnbonding);
    }

    #[test]
    fn total_saturates() {
        let balances = CategoryBalances {
            liquid: u128::MAX,
            spendable: 0,
            staked: 1,
            unbonding: 1,
        };
        assert_eq!(TotalPolicy::LiquidStakedUnbonding.total(&balances), u128::MAX);
    }

    #[test]
    fn terminal_records_are_zeroed_and_anomalous() {
        let info = WalletInfo::invalid_address("nope");
        assert_eq!(info.status, WalletStatus::InvalidAddress);
        assert_eq!(info.debug_reason, "invalid_format");
        assert!(info.anomaly);
        assert_eq!(info.balance, 0.0);
        assert_eq!(info.tx_count, 0);
        assert!(info.endpoint.is_none());

        let info = WalletInfo::unreachable("xion1abc", "timeout");
        assert_eq!(info.status, WalletStatus::Unreachable);
        assert_eq!(
            info.reason.as_deref(),
            Some("All endpoints failed. Last: timeout")
        );
        assert!(info.anomaly);
    }
}
