// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Prometheus metrics module
//!
//! Provides global metrics using the default Prometheus registry via macros and
//! an Axum-compatible metrics handler.

use std::sync::LazyLock;

use axum::{
    http::{StatusCode, header},
    response::Response,
};
use prometheus::{
    Encoder, Histogram, HistogramVec, IntCounterVec, TextEncoder, register_histogram,
    register_histogram_vec, register_int_counter_vec,
};
use shared_types::WalletStatus;
use wallet_resolver::FallbackOutcome;

use crate::error::ServerError;

/// Completed resolutions, labeled by final status
pub static RESOLUTIONS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "wallet_guard_resolutions_total",
        "Total number of wallet resolutions, labeled by status",
        &["status"]
    )
    .expect("Failed to create wallet_guard_resolutions_total counter vec")
});

/// Resolution wall time in seconds, labeled by final status
pub static RESOLUTION_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    register_histogram_vec!(
        "wallet_guard_resolution_duration_seconds",
        "Wallet resolution durations in seconds",
        &["status"],
        vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 7.5, 10.0, 12.5, 15.0, 30.0]
    )
    .expect("Failed to create resolution duration histogram")
});

/// Explorer fallback decisions, labeled by outcome
pub static FALLBACKS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "wallet_guard_fallback_total",
        "Explorer fallback decisions, labeled by outcome",
        &["outcome"]
    )
    .expect("Failed to create wallet_guard_fallback_total counter vec")
});

/// Distribution of computed risk scores
pub static RISK_SCORE: LazyLock<Histogram> = LazyLock::new(|| {
    register_histogram!(
        "wallet_guard_risk_score",
        "Risk scores computed for resolved wallets",
        vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0]
    )
    .expect("Failed to create risk score histogram")
});

/// Record one finished resolution
///
/// # Arguments
/// * `status` - Final status of the record
/// * `duration_secs` - Time the resolution took in seconds
/// * `score` - Risk score attached to the record
pub fn observe_resolution(status: WalletStatus, duration_secs: f64, score: u8) {
    RESOLUTIONS.with_label_values(&[status.as_str()]).inc();
    RESOLUTION_DURATION
        .with_label_values(&[status.as_str()])
        .observe(duration_secs);
    RISK_SCORE.observe(f64::from(score));
}

/// Record what the explorer fallback did
pub fn record_fallback(outcome: FallbackOutcome) {
    FALLBACKS.with_label_values(&[outcome.as_str()]).inc();
}

/// Axum handler that exports metrics in Prometheus text format
pub async fn metrics_handler() -> Result<Response<String>, ServerError> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = vec![];
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| ServerError::Runtime {
            message: format!("failed to encode metrics: {e}"),
        })?;

    let body = String::from_utf8(buffer).map_err(|e| ServerError::Runtime {
        message: format!("metrics buffer is not UTF-8: {e}"),
    })?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, encoder.format_type())
        .body(body)
        .map_err(|e| ServerError::Runtime {
            message: format!("failed to build metrics response: {e}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn exported_text_contains_wallet_guard_series() {
        observe_resolution(WalletStatus::Ok, 0.42, 90);
        record_fallback(FallbackOutcome::Skipped);

        let response = metrics_handler().await.unwrap();
        let body = response.body();

        assert!(body.contains("wallet_guard_resolutions_total{status=\"ok\"}"));
        assert!(body.contains("wallet_guard_resolution_duration_seconds_bucket"));
        assert!(body.contains("wallet_guard_fallback_total{outcome=\"skipped\"}"));
        assert!(body.contains("wallet_guard_risk_score_count"));
    }
}
