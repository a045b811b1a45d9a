// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Scoring inputs and the bounded score type

use std::fmt;

use serde::{Deserialize, Serialize};
use shared_types::{WalletInfo, WalletStatus};

use crate::error::{RiskError, RiskResult};

/// The fields of a resolved wallet the score depends on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskInput {
    /// Resolution status
    pub status: WalletStatus,
    /// Total balance in display units, after any explorer correction
    pub balance: f64,
    /// Transaction count
    pub tx_count: u64,
    /// Coarse failed transaction count
    pub failed_txs: u64,
    /// Empty-and-inactive flag
    pub anomaly: bool,
}

impl From<&WalletInfo> for RiskInput {
    fn from(info: &WalletInfo) -> Self {
        Self {
            status: info.status,
            balance: info.balance,
            tx_count: info.tx_count,
            failed_txs: info.failed_txs,
            anomaly: info.anomaly,
        }
    }
}

/// Trust score in `0..=100`, higher is more trustworthy
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct RiskScore(u8);

impl RiskScore {
    /// Highest possible score
    pub const MAX: Self = Self(100);
    /// Lowest possible score
    pub const MIN: Self = Self(0);

    /// Create a score, rejecting values outside `0..=100`
    pub fn new(value: i64) -> RiskResult<Self> {
        u8::try_from(value)
            .ok()
            .filter(|score| *score <= Self::MAX.0)
            .map(Self)
            .ok_or(RiskError::OutOfRange { value })
    }

    /// Clamp any value into `0..=100`
    pub fn saturating(value: i64) -> Self {
        let clamped = value.clamp(i64::from(Self::MIN.0), i64::from(Self::MAX.0));
        Self(u8::try_from(clamped).unwrap_or(Self::MIN.0))
    }

    /// Get the score as an integer
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for RiskScore {
    type Error = RiskError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RiskScore> for u8 {
    fn from(score: RiskScore) -> Self {
        score.0
    }
}

impl fmt::Display for RiskScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_bounds() {
        assert_eq!(RiskScore::new(0).unwrap(), RiskScore::MIN);
        assert_eq!(RiskScore::new(100).unwrap(), RiskScore::MAX);
        assert_eq!(
            RiskScore::new(101).unwrap_err(),
            RiskError::OutOfRange { value: 101 }
        );
        assert!(RiskScore::new(-1).is_err());
    }

    #[test]
    fn saturating_clamps() {
        assert_eq!(RiskScore::saturating(-15).value(), 0);
        assert_eq!(RiskScore::saturating(140).value(), 100);
        assert_eq!(RiskScore::saturating(65).value(), 65);
    }

    #[test]
    fn serde_is_a_plain_integer() {
        let score = RiskScore::new(42).unwrap();
        assert_eq!(serde_json::to_string(&score).unwrap(), "42");
        assert_eq!(serde_json::from_str::<RiskScore>("42").unwrap(), score);
        assert!(serde_json::from_str::<RiskScore>("250").is_err());
    }

    #[test]
    fn input_from_wallet_info() {
        let info = WalletInfo::unreachable("xion1abc", "timeout");
        let input = RiskInput::from(&info);
        assert_eq!(input.status, WalletStatus::Unreachable);
        assert!(input.anomaly);
        assert_eq!(input.tx_count, 0);
    }
}
