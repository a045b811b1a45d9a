// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Race resolver
//!
//! Resolves one address to one [`WalletInfo`] by probing every eligible endpoint at
//! once and keeping the first acceptable answer. Probes still running after a winner
//! is chosen are detached; their failures still trip the breaker.

use std::{
    fmt,
    sync::Arc,
    time::{Duration, Instant},
};

use api_client::{AssetScraper, ProbeOutcome, WalletProbe};
use shared_types::{WalletAddress, WalletInfo, WalletSnapshot};
use tokio::{task::JoinSet, time::timeout};
use tracing::{debug, info, warn};

use crate::{
    circuit_breaker::{CircuitBreaker, DEFAULT_COOLDOWN},
    explorer::ExplorerScraper,
    lcd::LcdClient,
    normalizer::{apply_fallback, needs_fallback, normalize},
    registry::EndpointRegistry,
};

/// Default bound on one whole race
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(12);

const ALL_BLOCKED: &str = "all endpoints circuit-open";
const DEADLINE_EXCEEDED: &str = "resolution deadline exceeded";

/// Resolver policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverConfig {
    /// How long a failed endpoint stays blocked
    pub cooldown: Duration,
    /// Upper bound on the race, excluding the explorer fallback
    pub deadline: Duration,
    /// Whether an empty-looking result consults the explorer
    pub fallback_enabled: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            cooldown: DEFAULT_COOLDOWN,
            deadline: DEFAULT_DEADLINE,
            fallback_enabled: true,
        }
    }
}

/// What the explorer fallback did during one resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackOutcome {
    /// The trigger condition did not hold, or no scraper is configured
    Skipped,
    /// Rows were scraped and merged
    Applied,
    /// The scrape failed and the node data was kept
    Failed,
}

impl FallbackOutcome {
    /// Label used in logs and metrics
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Skipped => "skipped",
            Self::Applied => "applied",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for FallbackOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final record plus what the fallback did to it
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Caller-facing record
    pub info: WalletInfo,
    /// Fallback path taken
    pub fallback: FallbackOutcome,
}

/// Concurrent resolver over an [`EndpointRegistry`]
///
/// Generic over the probe and scraper so tests can substitute either.
#[derive(Debug)]
pub struct WalletResolver<P = LcdClient, S = ExplorerScraper> {
    registry: EndpointRegistry,
    breaker: Arc<CircuitBreaker>,
    probe: Arc<P>,
    scraper: Option<Arc<S>>,
    config: ResolverConfig,
}

impl<P, S> WalletResolver<P, S>
where
    P: WalletProbe + 'static,
    S: AssetScraper + 'static,
{
    /// Create a resolver without an explorer fallback
    pub fn new(
        registry: EndpointRegistry,
        breaker: Arc<CircuitBreaker>,
        probe: P,
        config: ResolverConfig,
    ) -> Self {
        Self {
            registry,
            breaker,
            probe: Arc::new(probe),
            scraper: None,
            config,
        }
    }

    /// Attach the explorer fallback
    #[must_use]
    pub fn with_scraper(mut self, scraper: S) -> Self {
        self.scraper = Some(Arc::new(scraper));
        self
    }

    /// Shared breaker state
    pub fn breaker(&self) -> &Arc<CircuitBreaker> {
        &self.breaker
    }

    /// Endpoint registry
    pub fn registry(&self) -> &EndpointRegistry {
        &self.registry
    }

    /// Resolver policy
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve `raw` into a [`WalletInfo`]
    ///
    /// Never fails: invalid input and exhausted endpoints are reported through the
    /// record's status.
    pub async fn resolve(&self, raw: &str) -> WalletInfo {
        self.resolve_detailed(raw).await.info
    }

    /// Resolve `raw`, also reporting what the explorer fallback did
    pub async fn resolve_detailed(&self, raw: &str) -> Resolution {
        let started = Instant::now();

        let address = match WalletAddress::parse(raw) {
            Ok(address) => address,
            Err(e) => {
                debug!(error = %e, "rejecting address");
                return Resolution {
                    info: WalletInfo::invalid_address(raw),
                    fallback: FallbackOutcome::Skipped,
                };
            }
        };

        let raced = timeout(self.config.deadline, self.race(&address))
            .await
            .unwrap_or_else(|_| Err(DEADLINE_EXCEEDED.to_string()));

        let (mut info, fallback) = match raced {
            Ok(snapshot) => {
                info!(
                    address = %address,
                    endpoint = %snapshot.endpoint,
                    status = %snapshot.status,
                    elapsed_ms = started.elapsed().as_millis(),
                    "race won"
                );
                let mut info = normalize(snapshot, Duration::ZERO);
                let fallback = self.fallback(&address, &mut info).await;
                (info, fallback)
            }
            Err(reason) => {
                warn!(address = %address, reason = %reason, "all endpoints failed");
                (
                    WalletInfo::unreachable(address.as_str(), &reason),
                    FallbackOutcome::Skipped,
                )
            }
        };

        info.duration = started.elapsed().as_secs_f64();
        Resolution { info, fallback }
    }

    async fn race(&self, address: &WalletAddress) -> Result<WalletSnapshot, String> {
        let eligible = self.registry.eligible(&self.breaker);
        if eligible.is_empty() {
            return Err(ALL_BLOCKED.to_string());
        }

        debug!(
            address = %address,
            probe = self.probe.name(),
            candidates = eligible.len(),
            "dispatching probes"
        );

        let mut probes = JoinSet::new();
        for endpoint in eligible {
            let probe = Arc::clone(&self.probe);
            let breaker = Arc::clone(&self.breaker);
            let address = address.clone();
            let cooldown = self.config.cooldown;

            probes.spawn(async move {
                let outcome = probe.probe(&endpoint, &address).await;
                if let ProbeOutcome::Failed(failure) = &outcome {
                    breaker.trip(&failure.endpoint, cooldown);
                }
                outcome
            });
        }

        let mut last_reason = String::from("no probe completed");
        while let Some(joined) = probes.join_next().await {
            match joined {
                Ok(outcome) => {
                    let kind = outcome.kind();
                    match outcome.into_snapshot() {
                        Ok(snapshot) => {
                            debug!(endpoint = %snapshot.endpoint, kind, "accepting probe result");
                            probes.detach_all();
                            return Ok(snapshot);
                        }
                        Err(failure) => {
                            debug!(error = %failure, "probe failed");
                            last_reason = failure.to_string();
                        }
                    }
                }
                Err(e) => {
                    warn!(error = %e, "probe task aborted");
                    last_reason = format!("probe task aborted: {e}");
                }
            }
        }

        Err(last_reason)
    }

    async fn fallback(&self, address: &WalletAddress, info: &mut WalletInfo) -> FallbackOutcome {
        if !self.config.fallback_enabled || !needs_fallback(info) {
            return FallbackOutcome::Skipped;
        }
        let Some(scraper) = &self.scraper else {
            return FallbackOutcome::Skipped;
        };

        info!(address = %address, scraper = scraper.name(), "empty wallet, consulting explorer");

        match scraper.scrape(address).await {
            Ok(rows) => {
                apply_fallback(info, rows);
                info!(
                    address = %address,
                    balance = info.balance,
                    anomaly = info.anomaly,
                    "explorer fallback applied"
                );
                FallbackOutcome::Applied
            }
            Err(e) => {
                warn!(address = %address, error = %e, "explorer fallback failed, keeping node data");
                FallbackOutcome::Failed
            }
        }
    }
}
