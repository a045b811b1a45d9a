// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Health status of a data source

use serde::{Deserialize, Serialize};

/// Health status of a data source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum HealthStatus {
    /// Source is eligible for dispatch
    Up,
    /// Source is usable with reduced guarantees
    Degraded { reason: String },
    /// Source is currently suppressed or unusable
    Down { reason: String },
}

impl HealthStatus {
    /// Check if this health status indicates the source is available
    pub fn is_available(&self) -> bool {
        matches!(self, HealthStatus::Up | HealthStatus::Degraded { .. })
    }

    /// Check if this health status indicates the source is completely down
    pub fn is_down(&self) -> bool {
        matches!(self, HealthStatus::Down { .. })
    }

    /// Get a human-readable description of the status
    pub fn description(&self) -> &str {
        match self {
            HealthStatus::Up => "Source is healthy",
            HealthStatus::Degraded { reason } | HealthStatus::Down { reason } => reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_status_availability() {
        assert!(HealthStatus::Up.is_available());
        assert!(
            HealthStatus::Degraded {
                reason: "partial".to_string()
            }
            .is_available()
        );
        assert!(
            !HealthStatus::Down {
                reason: "circuit open".to_string()
            }
            .is_available()
        );
    }

    #[test]
    fn health_status_description() {
        assert_eq!(HealthStatus::Up.description(), "Source is healthy");
        let down = HealthStatus::Down {
            reason: "circuit open for 42s".to_string(),
        };
        assert!(down.is_down());
        assert_eq!(down.description(), "circuit open for 42s");
    }
}
