// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Wallet Guard API Server Implementation
//!
//! This crate provides the HTTP server for the wallet guard service, built with Axum
//! and designed for production use with layered configuration, middleware, and
//! graceful shutdown capabilities.
//!
//! # Module Structure
//!
//! - [`config`]: Server configuration and environment management with hierarchical loading
//! - [`error`]: Error types and HTTP response handling with proper status codes
//! - [`state`]: Shared application state management with cancellation token support
//! - [`server`]: Main server implementation, lifecycle, and coordinated shutdown
//! - [`routes`]: Route configuration and HTTP request handlers
//! - [`middleware`]: Per-IP rate limiting and security headers
//! - [`metrics`]: Prometheus series for resolutions, fallbacks and risk scores
//! - [`metrics_log`]: Bounded log of recent validations
//! - [`export`]: ISO 20022 pain.001-style XML export
//! - [`openapi`]: `OpenAPI` specification and Swagger UI endpoints for API documentation
//!
//! # Key Features
//!
//! - **Endpoint Racing**: Every eligible REST node is queried, the first answer wins
//! - **Circuit Breaking**: Failing nodes sit out a cooldown, visible on `/health`
//! - **Risk Scoring**: Each resolved wallet gets a 0-100 heuristic score
//! - **Asset Listings**: Real-world assets merged from CosmWasm query endpoints
//! - **Rate Limiting**: IP-based request limiting with configurable requests per minute
//! - **Graceful Shutdown**: Coordinated termination using `CancellationToken`

pub mod config;
pub mod docs;
pub mod error;
pub mod export;
pub mod extractors;
pub mod metrics;
pub mod metrics_log;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{Environment, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use routes::handlers::{ValidateWalletRequest, WalletReport};
pub use server::{Server, ShutdownConfig};
pub use state::{HealthCheck, ServerState};
