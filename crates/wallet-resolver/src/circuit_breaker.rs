// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Per-endpoint cooldown tracking
//!
//! An endpoint that fails a probe is suppressed until its cooldown elapses. The
//! breaker limits retries against broken nodes; it never bans an endpoint for good.
//! A stored unblock time in the past is equivalent to no entry at all.

use std::time::{Duration, Instant};

use api_client::HealthStatus;
use dashmap::DashMap;
use shared_types::Endpoint;
use tracing::{debug, warn};

/// Cooldown applied when a probe fails
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(180);

/// Longest cooldown the breaker will apply; longer requests are clamped
pub const MAX_COOLDOWN: Duration = Duration::from_secs(86_400);

const MAX_BREAKER_ENTRIES: usize = 1_000;

/// Shared endpoint → blocked-until map
///
/// Owned by the caller and handed to the resolver, so independent instances can be
/// used side by side.
#[derive(Debug, Default)]
pub struct CircuitBreaker {
    blocked_until: DashMap<Endpoint, Instant>,
}

impl CircuitBreaker {
    /// Create a breaker with no blocked endpoints
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true while `endpoint`'s unblock time is in the future
    pub fn is_blocked(&self, endpoint: &Endpoint) -> bool {
        self.remaining(endpoint).is_some()
    }

    /// Time left before `endpoint` becomes eligible again
    pub fn remaining(&self, endpoint: &Endpoint) -> Option<Duration> {
        let now = Instant::now();
        let remaining = self
            .blocked_until
            .get(endpoint)
            .map(|until| until.saturating_duration_since(now))
            .filter(|left| !left.is_zero());

        if remaining.is_none() {
            self.blocked_until
                .remove_if(endpoint, |_, until| *until <= now);
        }

        remaining
    }

    /// Block `endpoint` until now + `cooldown`, at most [`MAX_COOLDOWN`]
    pub fn trip(&self, endpoint: &Endpoint, cooldown: Duration) {
        let now = Instant::now();
        let cooldown = cooldown.min(MAX_COOLDOWN);

        if self.blocked_until.len() >= MAX_BREAKER_ENTRIES {
            self.blocked_until.retain(|_, until| *until > now);
        }

        let Some(until) = now.checked_add(cooldown) else {
            warn!(endpoint = %endpoint, "cooldown overflows the clock, not tripping");
            return;
        };

        self.blocked_until.insert(endpoint.clone(), until);
        warn!(
            endpoint = %endpoint,
            cooldown_secs = cooldown.as_secs_f64(),
            "circuit breaker tripped"
        );
    }

    /// Clear any cooldown for `endpoint`
    pub fn reset(&self, endpoint: &Endpoint) {
        if self.blocked_until.remove(endpoint).is_some() {
            debug!(endpoint = %endpoint, "circuit breaker reset");
        }
    }

    /// Number of endpoints currently blocked
    pub fn blocked_count(&self) -> usize {
        let now = Instant::now();
        self.blocked_until
            .iter()
            .filter(|entry| *entry.value() > now)
            .count()
    }

    /// Health of each endpoint as seen by the breaker
    pub fn health<'a>(
        &self,
        endpoints: impl IntoIterator<Item = &'a Endpoint>,
    ) -> Vec<(Endpoint, HealthStatus)> {
        endpoints
            .into_iter()
            .map(|endpoint| {
                let status = match self.remaining(endpoint) {
                    Some(left) => HealthStatus::Down {
                        reason: format!("circuit open for {}s", left.as_secs().max(1)),
                    },
                    None => HealthStatus::Up,
                };
                (endpoint.clone(), status)
            })
            .collect()
    }
}
