// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Routes module
//!
//! This module provides route configuration and handlers for the wallet guard server.

pub mod handlers;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use handlers::{
    health_handler, pain001_handler, recent_metrics_handler, rwa_assets_handler,
    validate_wallet_handler,
};

use crate::{
    metrics::metrics_handler,
    middleware::{RateLimiter, rate_limiting_middleware},
    openapi::{openapi_spec, swagger_ui},
    state::ServerState,
};

/// Create application routes with conditional rate limiting
#[allow(clippy::needless_pass_by_value)]
pub fn create_routes(rate_limiter: RateLimiter) -> Router<ServerState> {
    // Monitoring endpoints are not rate limited
    let monitoring_routes = Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler));

    let docs_routes = Router::new()
        .route("/api-doc/openapi.json", get(openapi_spec))
        .route("/swagger-ui", get(swagger_ui));

    let mut api_routes = Router::new()
        .route("/wallet/validate", post(validate_wallet_handler))
        .route("/metrics/recent", get(recent_metrics_handler))
        .route("/iso/pain001.xml", get(pain001_handler))
        .route("/rwa/assets", get(rwa_assets_handler));

    if rate_limiter.is_enabled() {
        api_routes = api_routes.layer(middleware::from_fn_with_state(
            rate_limiter.clone(),
            rate_limiting_middleware,
        ));
    }

    let v1 = Router::new().nest("/v1", api_routes);

    Router::new()
        .merge(monitoring_routes)
        .merge(docs_routes)
        .merge(v1)
}
