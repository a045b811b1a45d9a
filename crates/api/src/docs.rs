// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! `OpenAPI` document definition

use shared_types::{AssetRow, DisplayBalance, Network, WalletInfo, WalletStatus};
use utoipa::OpenApi;
use wallet_resolver::{AssetId, RwaAsset};

use crate::{
    config::Environment,
    metrics_log::MetricsEntry,
    routes::handlers::{self, ValidateWalletRequest, WalletReport},
    state::{HealthCheck, HealthStatus},
};

/// `OpenAPI` document for the wallet guard HTTP API
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "Wallet Guard API",
        description = "Trust snapshots and risk scores for Xion wallets, resolved from unreliable Cosmos REST nodes."
    ),
    paths(
        handlers::health_handler,
        handlers::validate_wallet_handler,
        handlers::recent_metrics_handler,
        handlers::pain001_handler,
        handlers::rwa_assets_handler
    ),
    components(
        schemas(
            HealthCheck,
            HealthStatus,
            Environment,
            Network,
            ValidateWalletRequest,
            WalletReport,
            WalletInfo,
            WalletStatus,
            DisplayBalance,
            AssetRow,
            MetricsEntry,
            RwaAsset,
            AssetId
        )
    ),
    tags(
        (name = "health", description = "Service and endpoint health"),
        (name = "wallets", description = "Wallet validation and recent results"),
        (name = "export", description = "ISO 20022 document export"),
        (name = "assets", description = "Real-world asset listings")
    )
)]
pub struct ApiDoc;
