// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for risk scoring

use thiserror::Error;

/// Result type alias for risk engine operations
pub type RiskResult<T> = Result<T, RiskError>;

/// Errors raised when constructing risk values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RiskError {
    /// A score outside `0..=100`
    #[error("risk score {value} is outside 0..=100")]
    OutOfRange {
        /// Rejected value
        value: i64,
    },
}
