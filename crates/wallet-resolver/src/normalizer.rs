// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Snapshot to [`WalletInfo`] conversion
//!
//! Pure post-processing: minor units become display units, the anomaly flag is
//! computed from the node's figures, and explorer rows are merged when the fallback
//! fired. No I/O happens here.

use std::time::Duration;

use shared_types::{
    AssetRow, DisplayBalance, NATIVE_DECIMALS, NATIVE_DENOM, NATIVE_TICKER, WalletInfo,
    WalletSnapshot, WalletStatus,
};

/// Convert an integer amount of the native minor denom to display units
#[allow(clippy::cast_precision_loss)]
pub fn to_display_units(minor: u128) -> f64 {
    minor as f64 / f64::from(10u32.pow(NATIVE_DECIMALS))
}

/// Build the caller-facing record for a resolved snapshot
pub fn normalize(snapshot: WalletSnapshot, duration: Duration) -> WalletInfo {
    let reason = match snapshot.status {
        WalletStatus::Partial => Some("Transaction count unavailable".to_string()),
        _ => None,
    };

    #[allow(clippy::cast_precision_loss)]
    let balances = snapshot
        .raw_balances
        .into_iter()
        .map(|coin| {
            if coin.denom == NATIVE_DENOM {
                DisplayBalance {
                    symbol: NATIVE_TICKER.to_string(),
                    amount: to_display_units(coin.amount),
                    denom: coin.denom,
                }
            } else {
                DisplayBalance {
                    symbol: coin.denom.clone(),
                    amount: coin.amount as f64,
                    denom: coin.denom,
                }
            }
        })
        .collect();

    WalletInfo {
        address: snapshot.address.to_string(),
        status: snapshot.status,
        reason,
        endpoint: Some(snapshot.endpoint.to_string()),
        debug_reason: snapshot.liveness.as_str().to_string(),
        duration: duration.as_secs_f64(),
        balance: to_display_units(snapshot.total),
        spendable: to_display_units(snapshot.balances.spendable),
        liquid: to_display_units(snapshot.balances.liquid),
        staked: to_display_units(snapshot.balances.staked),
        unbonding: to_display_units(snapshot.balances.unbonding),
        balances,
        tx_count: snapshot.tx_count,
        failed_txs: snapshot.failed_txs,
        anomaly: snapshot.total == 0 && snapshot.tx_count == 0,
        fallback_assets: None,
    }
}

/// Returns true if a resolved record looks empty enough to consult the explorer
///
/// Before any correction the anomaly flag is exactly "zero total and zero
/// transactions", which is the fallback trigger.
pub fn needs_fallback(info: &WalletInfo) -> bool {
    info.status.is_resolved() && info.anomaly && info.fallback_assets.is_none()
}

/// Sum of native-ticker rows whose amount is numeric once separators are removed
///
/// Returns `None` when no row qualifies.
pub fn native_total(rows: &[AssetRow]) -> Option<f64> {
    rows.iter()
        .filter(|row| row.symbol.contains(NATIVE_TICKER))
        .filter_map(|row| parse_amount(&row.amount))
        .fold(None, |acc, amount| Some(acc.unwrap_or(0.0) + amount))
}

/// Merge explorer rows into `info`
///
/// The balance is replaced only if some row qualified. The anomaly flag can be
/// cleared by a positive corrected balance but is never set here.
pub fn apply_fallback(info: &mut WalletInfo, rows: Vec<AssetRow>) {
    if let Some(total) = native_total(&rows) {
        info.balance = total;
    }
    info.anomaly = info.anomaly && info.balance <= 0.0;
    info.fallback_assets = Some(rows);
}

fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned = raw.replace(',', "");
    let digits_only = cleaned.replacen('.', "", 1);

    if digits_only.is_empty() || !digits_only.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    cleaned.parse().ok()
}
