// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Wallet trust scoring
//!
//! A pure, deterministic heuristic over the fields of a resolved [`WalletInfo`]. The
//! score carries no identity and is never persisted by this crate.
//!
//! ```rust
//! use risk_engine::{RiskInput, calculate_risk_score};
//! use shared_types::WalletInfo;
//!
//! let info = WalletInfo::invalid_address("not-an-address");
//! let score = calculate_risk_score(&RiskInput::from(&info));
//! assert_eq!(score.value(), 10);
//! ```
//!
//! [`WalletInfo`]: shared_types::WalletInfo

pub mod error;
pub mod scorer;
pub mod types;

pub use error::{RiskError, RiskResult};
pub use scorer::calculate_risk_score;
pub use types::{RiskInput, RiskScore};
