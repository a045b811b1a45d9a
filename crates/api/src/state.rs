// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Server state management module
//!
//! This module provides shared application state for the wallet guard server,
//! including configuration, the wallet resolver, the recent-validations log and
//! coordinated cancellation.

use std::{collections::BTreeMap, sync::Arc};

use serde::{Deserialize, Serialize};
use shared_types::Network;
use tokio_util::sync::CancellationToken;
use utoipa::ToSchema;
use wallet_resolver::{RwaAggregator, WalletResolver};

use crate::{
    config::{Environment, ServerConfig},
    error::ServerResult,
    metrics_log::MetricsLog,
};

/// Shared application state with cancellation token support
#[derive(Debug, Clone)]
pub struct ServerState {
    /// Server configuration
    config: ServerConfig,
    /// Endpoint race resolver shared by every request
    resolver: Arc<WalletResolver>,
    /// Recent validations
    metrics_log: Arc<MetricsLog>,
    /// Real-world asset sources
    rwa: Arc<RwaAggregator>,
    /// Cancellation token for coordinated shutdown
    pub cancellation_token: CancellationToken,
}

impl ServerState {
    /// Create new server state
    ///
    /// # Arguments
    ///
    /// * `config` - Server configuration
    /// * `resolver` - Wallet resolver
    /// * `metrics_log` - Recent-validations log
    /// * `rwa` - Real-world asset aggregator
    /// * `cancellation_token` - Token for coordinated cancellation
    pub fn new(
        config: ServerConfig,
        resolver: Arc<WalletResolver>,
        metrics_log: Arc<MetricsLog>,
        rwa: Arc<RwaAggregator>,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self {
            config,
            resolver,
            metrics_log,
            rwa,
            cancellation_token,
        }
    }

    /// Server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Wallet resolver
    pub fn resolver(&self) -> &Arc<WalletResolver> {
        &self.resolver
    }

    /// Recent-validations log
    pub fn metrics_log(&self) -> &Arc<MetricsLog> {
        &self.metrics_log
    }

    /// Real-world asset aggregator
    pub fn rwa(&self) -> &Arc<RwaAggregator> {
        &self.rwa
    }

    /// Perform health check operations
    ///
    /// The service is degraded when every configured endpoint is circuit-open.
    pub async fn health_check(&self) -> ServerResult<HealthCheck> {
        let registry = self.resolver.registry();
        let endpoints: BTreeMap<String, HealthStatus> = self
            .resolver
            .breaker()
            .health(registry.endpoints())
            .into_iter()
            .map(|(endpoint, status)| (endpoint.to_string(), Self::convert_health_status(status)))
            .collect();

        let all_down = !endpoints.is_empty()
            && endpoints
                .values()
                .all(|status| matches!(status, HealthStatus::Down { .. }));

        let status = if all_down {
            HealthStatus::Degraded {
                reason: Box::from("all endpoints circuit-open"),
            }
        } else {
            HealthStatus::Up
        };

        Ok(HealthCheck {
            status,
            version: Box::from(env!("CARGO_PKG_VERSION")),
            environment: self.config.environment,
            timestamp: chrono::Utc::now().to_rfc3339(),
            network: registry.network(),
            endpoints,
        })
    }

    /// Convert breaker health status to the API health status
    fn convert_health_status(status: api_client::HealthStatus) -> HealthStatus {
        match status {
            api_client::HealthStatus::Up => HealthStatus::Up,
            api_client::HealthStatus::Degraded { reason } => HealthStatus::Degraded {
                reason: reason.into_boxed_str(),
            },
            api_client::HealthStatus::Down { reason } => HealthStatus::Down {
                reason: reason.into_boxed_str(),
            },
        }
    }
}

/// Health status of a service or dependency
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub enum HealthStatus {
    /// Service is fully operational and responding normally
    Up,

    /// Service is not operational or has critical failures
    Down {
        /// Human-readable explanation of why the service is down
        reason: Box<str>,
    },

    /// Service is operational but experiencing partial failures
    Degraded {
        /// Human-readable explanation of the degradation condition
        reason: Box<str>,
    },
}

/// Health check status
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthCheck {
    /// Service status
    pub status: HealthStatus,
    /// Service version
    pub version: Box<str>,
    /// Environment
    pub environment: Environment,
    /// Timestamp
    pub timestamp: String,
    /// Network the resolver serves
    pub network: Network,
    /// Circuit state of each REST endpoint, keyed by base URL
    #[schema(value_type = Object)]
    pub endpoints: BTreeMap<String, HealthStatus>,
}

#[cfg(test)]
mod tests {
    use std::{num::NonZeroUsize, time::Duration};

    use shared_types::Endpoint;
    use wallet_resolver::{
        CircuitBreaker, EndpointRegistry, LcdClient, LcdConfig, ResolverConfig, RwaConfig,
    };

    use super::*;

    fn state_with(urls: &[&str]) -> ServerState {
        let registry = EndpointRegistry::from_sources(Network::Mainnet, urls).unwrap();
        let probe = LcdClient::new(LcdConfig::default()).unwrap();
        let resolver = WalletResolver::new(
            registry,
            Arc::new(CircuitBreaker::new()),
            probe,
            ResolverConfig::default(),
        );

        ServerState::new(
            ServerConfig::for_testing(),
            Arc::new(resolver),
            Arc::new(MetricsLog::new(NonZeroUsize::new(10).unwrap())),
            Arc::new(RwaAggregator::new(RwaConfig::default()).unwrap()),
            CancellationToken::new(),
        )
    }

    #[test]
    fn server_state_with_cancellation_token() {
        let state = state_with(&["https://a.example"]);
        let token = state.cancellation_token.clone();

        assert!(!state.cancellation_token.is_cancelled());
        token.cancel();
        assert!(state.cancellation_token.is_cancelled());
    }

    #[tokio::test]
    async fn health_lists_every_endpoint() {
        let state = state_with(&["https://a.example", "https://b.example"]);

        let health = state.health_check().await.unwrap();

        assert_eq!(health.status, HealthStatus::Up);
        assert_eq!(health.environment, Environment::Testing);
        assert_eq!(health.network, Network::Mainnet);
        assert_eq!(health.endpoints.len(), 2);
        assert!(health.endpoints.values().all(|s| *s == HealthStatus::Up));
    }

    #[tokio::test]
    async fn health_reports_open_circuits() {
        let state = state_with(&["https://a.example", "https://b.example"]);
        let breaker = state.resolver().breaker();
        let a = Endpoint::new("https://a.example").unwrap();
        breaker.trip(&a, Duration::from_secs(60));

        let health = state.health_check().await.unwrap();
        assert_eq!(health.status, HealthStatus::Up);
        assert!(matches!(
            health.endpoints[&a.to_string()],
            HealthStatus::Down { .. }
        ));

        breaker.trip(&Endpoint::new("https://b.example").unwrap(), Duration::from_secs(60));
        let health = state.health_check().await.unwrap();
        assert!(matches!(health.status, HealthStatus::Degraded { .. }));
    }
}
