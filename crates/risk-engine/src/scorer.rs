// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Deduction heuristic
//!
//! Start at 100 and subtract:
//!
//! | condition                | deduction                 |
//! |--------------------------|---------------------------|
//! | anomaly                  | 50                        |
//! | failed transactions      | 5 each, at most 25        |
//! | fewer than 10 txs        | 10 - `tx_count`           |
//! | zero balance             | 30                        |
//!
//! The result is clamped to `0..=100`.

use crate::types::{RiskInput, RiskScore};

const ANOMALY_PENALTY: i64 = 50;
const FAILED_TX_PENALTY: i64 = 5;
const MAX_FAILED_TX_PENALTY: i64 = 25;
const ACTIVE_TX_THRESHOLD: i64 = 10;
const EMPTY_BALANCE_PENALTY: i64 = 30;

/// Score a resolved wallet
pub fn calculate_risk_score(input: &RiskInput) -> RiskScore {
    let mut score = i64::from(RiskScore::MAX.value());

    if input.anomaly {
        score -= ANOMALY_PENALTY;
    }

    let failed = i64::try_from(input.failed_txs).unwrap_or(i64::MAX);
    score -= failed.saturating_mul(FAILED_TX_PENALTY).min(MAX_FAILED_TX_PENALTY);

    let tx_count = i64::try_from(input.tx_count).unwrap_or(i64::MAX);
    score -= (ACTIVE_TX_THRESHOLD - tx_count.min(ACTIVE_TX_THRESHOLD)).max(0);

    if input.balance <= 0.0 || input.balance.is_nan() {
        score -= EMPTY_BALANCE_PENALTY;
    }

    RiskScore::saturating(score)
}
