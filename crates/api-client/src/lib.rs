// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Data source traits for wallet resolution
//!
//! This crate provides the seams the resolver is generic over, so that the REST node
//! client and the explorer scraper can be replaced by test doubles.
//!
//! # Core Abstractions
//!
//! - **`WalletProbe` Trait**: one endpoint's full data-collection attempt for one address
//! - **`AssetScraper` Trait**: fallible explorer scrape returning loosely structured rows
//! - **Outcomes**: `ProbeOutcome` is a closed set of results, never an error that escapes
//! - **Error Handling**: `ApiError` is the common error every client converts into
//! - **Health**: `HealthStatus` describes whether a data source is currently usable

use shared_types::{AssetRow, Endpoint, WalletAddress};
use thiserror::Error;

pub mod health;
pub mod types;

pub use health::*;
pub use types::*;

/// One endpoint's data-collection sequence for one address
///
/// Implementations must never fail the caller: every error is folded into
/// [`ProbeOutcome::Failed`].
pub trait WalletProbe: Send + Sync {
    /// Query `endpoint` for everything known about `address`
    fn probe(
        &self,
        endpoint: &Endpoint,
        address: &WalletAddress,
    ) -> impl Future<Output = ProbeOutcome> + Send;

    /// Get the name/identifier of this probe
    fn name(&self) -> &'static str;
}

/// Secondary, unstructured source of asset rows
pub trait AssetScraper: Send + Sync {
    /// Extract asset rows for `address`
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be fetched; a page with no recognizable
    /// rows is an empty list, not an error
    fn scrape(
        &self,
        address: &WalletAddress,
    ) -> impl Future<Output = Result<Vec<AssetRow>, ApiError>> + Send;

    /// Get the name/identifier of this scraper
    fn name(&self) -> &'static str;
}

/// Common errors that can occur when talking to a data source
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {message}")]
    Http { message: String },

    /// Invalid response format
    #[error("Invalid response format: {message}")]
    InvalidResponse { message: String },

    /// The source answered with a status we cannot use
    #[error("Unexpected status {status}")]
    UnexpectedStatus { status: u16 },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Network timeout
    #[error("Request timeout after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },
}

impl ApiError {
    /// Returns true if retrying the same request may succeed
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Http { .. } | Self::Timeout { .. } => true,
            Self::UnexpectedStatus { status } => *status == 408 || *status == 429 || *status >= 500,
            Self::InvalidResponse { .. } | Self::Configuration { .. } => false,
        }
    }
}
