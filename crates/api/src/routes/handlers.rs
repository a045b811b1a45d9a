// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP request handlers module
//!
//! This module provides HTTP request handlers for the wallet guard server:
//! health, wallet validation, the recent-validations view, the XML export and the
//! real-world asset listing.

use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use risk_engine::{RiskInput, calculate_risk_score};
use serde::{Deserialize, Serialize};
use shared_types::{WalletAddress, WalletInfo, WalletStatus};
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use wallet_resolver::RwaAsset;

use crate::{
    error::ServerError,
    export::{self, Amount, XML_CONTENT_TYPE},
    extractors::JsonExtractor,
    metrics,
    metrics_log::{MetricsEntry, RECENT_LIMIT},
    state::{HealthCheck, ServerState},
};

/// Message returned when the export has no address to work with
pub const NO_EXPORT_ADDRESS: &str = "No wallet address to export.";

/// Health check endpoint handler
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    summary = "Health check endpoint",
    description = "Returns the service version and environment, the network being served and the circuit state of every configured REST endpoint.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthCheck),
        (status = 503, description = "Service unavailable", body = String)
    )
)]
pub async fn health_handler(
    State(state): State<ServerState>,
) -> Result<impl IntoResponse, ServerError> {
    let health = state.health_check().await?;
    Ok(Json(health))
}

/// Wallet validation request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ValidateWalletRequest {
    /// Xion account address
    #[schema(example = "xion1cmnhhvesgtu5s00c9l3nphw7285266vpwqxdw5qjz78jvfl4vps65u3h7")]
    pub address: String,
}

/// Wallet snapshot with its risk score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WalletReport {
    /// Resolved wallet record
    #[serde(flatten)]
    pub wallet: WalletInfo,
    /// Risk score, 0 (worst) to 100 (best)
    #[schema(minimum = 0, maximum = 100)]
    pub score: u8,
}

/// Wallet validation
///
/// Resolves the address against the configured REST nodes and scores the result.
/// Every well-formed address gets a 200, including unreachable ones; the status
/// field says how the resolution went.
#[utoipa::path(
    post,
    path = "/v1/wallet/validate",
    tag = "wallets",
    summary = "Validate a Xion wallet",
    description = "Races every eligible REST node for the address, corrects implausibly empty answers from the public explorer and returns the wallet snapshot with a 0-100 risk score.",
    request_body = ValidateWalletRequest,
    responses(
        (status = 200, description = "Wallet resolved (status may still be unreachable)", body = WalletReport),
        (status = 400, description = "Malformed request body", body = String),
        (status = 422, description = "Address is not a valid Xion address", body = WalletReport),
        (status = 429, description = "Too many requests from this client", body = String)
    )
)]
pub async fn validate_wallet_handler(
    State(state): State<ServerState>,
    JsonExtractor(request): JsonExtractor<ValidateWalletRequest>,
) -> (StatusCode, Json<WalletReport>) {
    let resolution = state.resolver().resolve_detailed(request.address.trim()).await;
    let info = resolution.info;
    let score = calculate_risk_score(&RiskInput::from(&info)).value();

    if info.status == WalletStatus::InvalidAddress {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(WalletReport { wallet: info, score }),
        );
    }

    metrics::observe_resolution(info.status, info.duration, score);
    metrics::record_fallback(resolution.fallback);
    state.metrics_log().record(MetricsEntry::new(&info, score));

    info!(
        address = %info.address,
        status = %info.status,
        score,
        fallback = %resolution.fallback,
        duration_secs = info.duration,
        "wallet validated"
    );

    (StatusCode::OK, Json(WalletReport { wallet: info, score }))
}

/// Recent validations, newest first
#[utoipa::path(
    get,
    path = "/v1/metrics/recent",
    tag = "wallets",
    summary = "Recent validations",
    description = "Returns up to the last 20 validations, newest first.",
    responses(
        (status = 200, description = "Recent validations", body = Vec<MetricsEntry>),
        (status = 429, description = "Too many requests from this client", body = String)
    )
)]
pub async fn recent_metrics_handler(State(state): State<ServerState>) -> Json<Vec<MetricsEntry>> {
    Json(state.metrics_log().recent(RECENT_LIMIT))
}

/// Query parameters of the pain.001 export
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExportQuery {
    /// Address to export; defaults to the most recently validated one
    pub wallet_addr: Option<String>,
    /// Amount to write; defaults to 100.00
    pub amount: Option<String>,
}

/// ISO 20022 pain.001 export
#[utoipa::path(
    get,
    path = "/v1/iso/pain001.xml",
    tag = "export",
    summary = "Export a pain.001 document",
    description = "Returns a pain.001-style XML document for the wallet as a file attachment.",
    params(ExportQuery),
    responses(
        (status = 200, description = "XML document", content_type = "application/xml", body = String),
        (status = 400, description = "No address available or malformed amount", body = String),
        (status = 422, description = "Address is not a valid Xion address", body = String),
        (status = 429, description = "Too many requests from this client", body = String)
    )
)]
pub async fn pain001_handler(
    State(state): State<ServerState>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ServerError> {
    let raw = match query.wallet_addr.filter(|addr| !addr.trim().is_empty()) {
        Some(addr) => addr,
        None => state
            .metrics_log()
            .latest_address()
            .ok_or_else(|| ServerError::ValidationError(NO_EXPORT_ADDRESS.to_string()))?,
    };

    let address =
        WalletAddress::parse(raw.trim()).map_err(|source| ServerError::InvalidAddress {
            address: raw.clone(),
            source,
        })?;

    let amount = match query.amount.as_deref() {
        Some(amount) => Amount::parse(amount)?,
        None => Amount::default(),
    };

    let disposition = format!("attachment; filename=\"{}\"", export::file_name(&address));
    let body = export::pain001_document(&address, &amount);

    Ok((
        [
            (header::CONTENT_TYPE, XML_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

/// Real-world asset listing
#[utoipa::path(
    get,
    path = "/v1/rwa/assets",
    tag = "assets",
    summary = "List real-world assets",
    description = "Queries every configured CosmWasm asset source, skips sources that fail and returns the merged list with one entry per asset id. An empty list means no source is configured or none answered.",
    responses(
        (status = 200, description = "Merged asset list", body = Vec<RwaAsset>),
        (status = 429, description = "Too many requests from this client", body = String)
    )
)]
pub async fn rwa_assets_handler(State(state): State<ServerState>) -> Json<Vec<RwaAsset>> {
    Json(state.rwa().assets().await)
}
