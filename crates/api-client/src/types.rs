// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Probe outcome types

use std::fmt;

use shared_types::{Endpoint, WalletSnapshot};
use thiserror::Error;

use crate::ApiError;

/// Result of one probe against one endpoint
///
/// Built once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The endpoint returned a usable balance view
    Success(WalletSnapshot),
    /// The account exists but holds nothing; a legitimate empty wallet
    EmptyButLive(WalletSnapshot),
    /// The endpoint could not be used; trips the circuit breaker
    Failed(ProbeFailure),
}

impl ProbeOutcome {
    /// Endpoint this outcome came from
    pub fn endpoint(&self) -> &Endpoint {
        match self {
            Self::Success(snapshot) | Self::EmptyButLive(snapshot) => &snapshot.endpoint,
            Self::Failed(failure) => &failure.endpoint,
        }
    }

    /// Snapshot carried by an accepted outcome
    pub fn into_snapshot(self) -> Result<WalletSnapshot, ProbeFailure> {
        match self {
            Self::Success(snapshot) | Self::EmptyButLive(snapshot) => Ok(snapshot),
            Self::Failed(failure) => Err(failure),
        }
    }

    /// Returns true for `Failed`
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Short label for logs and metrics
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::EmptyButLive(_) => "empty_but_live",
            Self::Failed(_) => "failed",
        }
    }
}

/// Why a probe could not use an endpoint
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureKind {
    /// Neither an account record nor any balance data came back
    #[error("no account record and no balance data")]
    NoData,
    /// A client error on a read the probe could not do without
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// A failed probe and the endpoint it failed against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeFailure {
    /// Endpoint that failed
    pub endpoint: Endpoint,
    /// What went wrong
    pub kind: FailureKind,
}

impl ProbeFailure {
    /// Create a failure for `endpoint`
    pub fn new(endpoint: Endpoint, kind: impl Into<FailureKind>) -> Self {
        Self {
            endpoint,
            kind: kind.into(),
        }
    }
}

impl fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.endpoint, self.kind)
    }
}

impl std::error::Error for ProbeFailure {}
