// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Wallet data resolution over unreliable Cosmos REST nodes
//!
//! This crate turns a Xion address into a single [`WalletInfo`] snapshot by racing
//! every eligible REST node, skipping nodes that recently failed, and consulting a
//! public explorer page when the winning answer looks implausibly empty.
//!
//! # Architecture
//!
//! - **Probe**: [`lcd::LcdClient`] - one node's full read sequence
//! - **Race**: [`resolver::WalletResolver`] - concurrent dispatch, first success wins
//! - **Fallback**: [`explorer::ExplorerScraper`] - best-effort HTML asset rows
//! - **Policy**: [`registry::EndpointRegistry`] and [`circuit_breaker::CircuitBreaker`]
//! - **Assets**: [`rwa::RwaAggregator`] - merged real-world asset listings
//!
//! # Features
//!
//! - **Shape Tolerance**: flat and nested list responses, modern and legacy paths
//! - **Bounded Latency**: per-read timeouts plus an overall race deadline
//! - **No Escaping Errors**: every failure ends up as a status on the record
//!
//! [`WalletInfo`]: shared_types::WalletInfo

pub mod circuit_breaker;
pub mod explorer;
pub mod lcd;
pub mod non_empty_string;
pub mod normalizer;
pub mod registry;
pub mod resolver;
pub mod responses;
pub mod rwa;

pub use circuit_breaker::{CircuitBreaker, DEFAULT_COOLDOWN, MAX_COOLDOWN};
pub use explorer::{ExplorerConfig, ExplorerScraper, ScrapeError, parse_assets};
pub use lcd::{DEFAULT_REQUEST_TIMEOUT, LcdClient, LcdConfig, LcdError};
pub use non_empty_string::NonEmptyString;
pub use registry::{EndpointRegistry, RegistryError};
pub use resolver::{
    DEFAULT_DEADLINE, FallbackOutcome, Resolution, ResolverConfig, WalletResolver,
};
pub use rwa::{AssetId, DEFAULT_RWA_TIMEOUT, RwaAggregator, RwaAsset, RwaConfig, RwaError};
