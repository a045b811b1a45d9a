// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Candidate REST endpoints for the active network
//!
//! An operator-supplied override list takes precedence over the built-in list for
//! the selected network. The registry does not check reachability; probes do.

use shared_types::{Endpoint, Network};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{circuit_breaker::CircuitBreaker, non_empty_string::NonEmptyString};

/// Ordered set of base URLs, fixed at configuration time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointRegistry {
    network: Network,
    endpoints: Vec<Endpoint>,
}

/// Error type for registry construction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Nothing usable was configured
    #[error("no usable endpoints configured for {network}")]
    Empty {
        /// Network the registry was built for
        network: Network,
    },
}

impl EndpointRegistry {
    /// Create a registry from an explicit list, dropping duplicates
    pub fn new(network: Network, endpoints: Vec<Endpoint>) -> Result<Self, RegistryError> {
        let mut unique = Vec::with_capacity(endpoints.len());
        for endpoint in endpoints {
            if !unique.contains(&endpoint) {
                unique.push(endpoint);
            }
        }

        if unique.is_empty() {
            return Err(RegistryError::Empty { network });
        }

        Ok(Self {
            network,
            endpoints: unique,
        })
    }

    /// Registry holding the built-in list for `network`
    pub fn for_network(network: Network) -> Result<Self, RegistryError> {
        let endpoints = network
            .default_endpoints()
            .iter()
            .filter_map(|url| Endpoint::new(url).ok())
            .collect();
        Self::new(network, endpoints)
    }

    /// Build from an operator override list, falling back to the network default
    ///
    /// Blank entries are ignored. Entries that are not http(s) URLs are skipped with a
    /// warning. If no override entry survives, the built-in list is used.
    pub fn from_sources<S: AsRef<str>>(
        network: Network,
        overrides: &[S],
    ) -> Result<Self, RegistryError> {
        let endpoints: Vec<Endpoint> = overrides
            .iter()
            .filter_map(|raw| NonEmptyString::new(raw).ok())
            .filter_map(|raw| match Endpoint::new(raw.as_str()) {
                Ok(endpoint) => Some(endpoint),
                Err(e) => {
                    warn!(error = %e, "ignoring endpoint override entry");
                    None
                }
            })
            .collect();

        if endpoints.is_empty() {
            debug!(network = %network, "using built-in endpoint list");
            return Self::for_network(network);
        }

        info!(
            network = %network,
            count = endpoints.len(),
            "using operator endpoint list"
        );
        Self::new(network, endpoints)
    }

    /// Network this registry serves
    pub fn network(&self) -> Network {
        self.network
    }

    /// All configured endpoints, in configuration order
    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    /// Number of configured endpoints
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// Returns true if no endpoint is configured
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Endpoints not currently blocked by `breaker`
    pub fn eligible(&self, breaker: &CircuitBreaker) -> Vec<Endpoint> {
        self.endpoints
            .iter()
            .filter(|endpoint| !breaker.is_blocked(endpoint))
            .cloned()
            .collect()
    }
}
