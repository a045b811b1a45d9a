// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Cosmos LCD REST probe
//!
//! This module provides the [`WalletProbe`] implementation that queries one REST node
//! for account existence, balances, staking and transaction activity. Every failure is
//! folded into a [`ProbeOutcome`]; nothing escapes to the resolver.

use std::time::{Duration, Instant};

use api_client::{ApiError, FailureKind, ProbeFailure, ProbeOutcome, WalletProbe};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared_types::{
    CategoryBalances, CoinBalance, Endpoint, Liveness, NATIVE_DENOM, TotalPolicy, WalletAddress,
    WalletSnapshot, WalletStatus,
};
use thiserror::Error;
use tokio::time::timeout;
use tracing::debug;

use crate::responses::{
    Coin, DelegationResponse, ListShape, TxSearch, UnbondingResponse, has_account, sum_delegations,
    sum_denom, sum_unbonding,
};

// LCD client constants
/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(6);
const USER_AGENT: &str = concat!("wallet-guard/", env!("CARGO_PKG_VERSION"));

type Query = &'static [(&'static str, &'static str)];

const PAGED: Query = &[("pagination.limit", "1000")];
const NO_QUERY: Query = &[];

/// Configuration for the LCD probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LcdConfig {
    /// Timeout applied to each individual read
    pub request_timeout: Duration,
    /// How category balances fold into the total
    pub total_policy: TotalPolicy,
}

impl Default for LcdConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            total_policy: TotalPolicy::default(),
        }
    }
}

/// Errors specific to the LCD client
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum LcdError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The read did not finish in time
    #[error("request timed out after {}ms", .timeout.as_millis())]
    Timeout { timeout: Duration },

    /// Node answered with a non-200 status
    #[error("unexpected status {0}")]
    Status(StatusCode),

    /// Body was not JSON
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Node answered 200 with an empty body
    #[error("empty response body")]
    EmptyBody,

    /// Body carried neither accepted shape of the list
    #[error("no usable `{key}` list in response")]
    MissingShape { key: &'static str },
}

impl From<LcdError> for ApiError {
    fn from(value: LcdError) -> Self {
        match value {
            LcdError::Http(error) => ApiError::Http {
                message: error.to_string(),
            },
            LcdError::Timeout { timeout } => ApiError::Timeout {
                timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            },
            LcdError::Status(status) => ApiError::UnexpectedStatus {
                status: status.as_u16(),
            },
            LcdError::Json(error) => ApiError::InvalidResponse {
                message: error.to_string(),
            },
            LcdError::EmptyBody | LcdError::MissingShape { .. } => ApiError::InvalidResponse {
                message: value.to_string(),
            },
        }
    }
}

/// Transaction activity for one address on one node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct TxActivity {
    /// `None` when neither filter returned usable metadata
    count: Option<u64>,
    failed: u64,
}

/// Cosmos LCD REST client
#[derive(Debug, Clone)]
pub struct LcdClient {
    client: Client,
    config: LcdConfig,
}

impl LcdClient {
    /// Create a new LCD client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created
    pub fn new(config: LcdConfig) -> Result<Self, LcdError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(LcdError::Http)?;

        Ok(Self { client, config })
    }

    /// Probe configuration
    pub fn config(&self) -> &LcdConfig {
        &self.config
    }

    async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<Value, LcdError> {
        let request = self.client.get(url).query(query);

        let response = timeout(self.config.request_timeout, request.send())
            .await
            .map_err(|_| LcdError::Timeout {
                timeout: self.config.request_timeout,
            })??;

        match response.status() {
            StatusCode::OK => {
                let body = response.bytes().await?;
                if body.is_empty() {
                    return Err(LcdError::EmptyBody);
                }
                Ok(serde_json::from_slice(&body)?)
            }
            status => Err(LcdError::Status(status)),
        }
    }

    /// First path whose body carries a usable `key` list
    ///
    /// A node that answered with JSON in neither shape reports `MissingShape`, even if
    /// a later path failed at the transport level.
    async fn read_list<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        paths: &[(String, Query)],
        key: &'static str,
    ) -> Result<ListShape<T>, LcdError> {
        let mut answered = false;
        let mut last_error = None;

        for (path, query) in paths {
            match self.get_json(&endpoint.join(path), query).await {
                Ok(body) => match ListShape::decode(&body, key) {
                    Some(shape) => return Ok(shape),
                    None => answered = true,
                },
                Err(e) => last_error = Some(e),
            }
        }

        match last_error {
            Some(e) if !answered => Err(e),
            _ => Err(LcdError::MissingShape { key }),
        }
    }

    async fn account_live(&self, endpoint: &Endpoint, address: &WalletAddress) -> bool {
        let paths = [
            format!("/cosmos/auth/v1beta1/accounts/{address}"),
            format!("/auth/accounts/{address}"),
        ];

        for path in &paths {
            match self.get_json(&endpoint.join(path), NO_QUERY).await {
                Ok(body) if has_account(&body) => return true,
                Ok(_) => {}
                Err(e) => debug!(endpoint = %endpoint, path = %path, error = %e, "account read failed"),
            }
        }

        false
    }

    async fn tx_search(&self, endpoint: &Endpoint, filter: &str) -> Option<TxSearch> {
        let url = endpoint.join("/cosmos/tx/v1beta1/txs");
        let query = [
            ("events", filter),
            ("pagination.limit", "1"),
            ("pagination.count_total", "true"),
        ];

        match self.get_json(&url, &query).await {
            Ok(body) => serde_json::from_value::<TxSearch>(body)
                .ok()
                .filter(TxSearch::has_metadata),
            Err(e) => {
                debug!(endpoint = %endpoint, filter, error = %e, "tx search failed");
                None
            }
        }
    }

    async fn tx_activity(&self, endpoint: &Endpoint, address: &WalletAddress) -> TxActivity {
        let sender = format!("message.sender='{address}'");
        let recipient = format!("transfer.recipient='{address}'");

        let (sent, received) = tokio::join!(
            self.tx_search(endpoint, &sender),
            self.tx_search(endpoint, &recipient)
        );

        [sent, received]
            .into_iter()
            .flatten()
            .fold(TxActivity::default(), |acc, search| TxActivity {
                count: Some(acc.count.unwrap_or(0).saturating_add(search.count())),
                failed: acc.failed.saturating_add(search.failed()),
            })
    }

    async fn collect(&self, endpoint: &Endpoint, address: &WalletAddress) -> ProbeOutcome {
        let started = Instant::now();

        let balance_paths = [
            (format!("/cosmos/bank/v1beta1/balances/{address}"), PAGED),
            (format!("/bank/balances/{address}"), NO_QUERY),
        ];

        let (live, balances) = tokio::join!(
            self.account_live(endpoint, address),
            self.read_list::<Coin>(endpoint, &balance_paths, "balances")
        );

        let (coins, liveness) = match balances {
            Ok(shape) => (shape.into_items(), Liveness::WithBalances),
            Err(e) if live => {
                debug!(endpoint = %endpoint, error = %e, "balances unusable, account exists");
                (Vec::new(), Liveness::AccountExistsZeroBalance)
            }
            Err(LcdError::MissingShape { .. }) => {
                return ProbeOutcome::Failed(ProbeFailure::new(endpoint.clone(), FailureKind::NoData));
            }
            Err(e) => {
                return ProbeOutcome::Failed(ProbeFailure::new(
                    endpoint.clone(),
                    ApiError::from(e),
                ));
            }
        };

        let spendable_paths = [
            (
                format!("/cosmos/bank/v1beta1/spendable_balances/{address}"),
                PAGED,
            ),
            (format!("/bank/spendable_balances/{address}"), NO_QUERY),
        ];
        let delegation_paths = [(
            format!("/cosmos/staking/v1beta1/delegations/{address}"),
            NO_QUERY,
        )];
        let unbonding_paths = [(
            format!("/cosmos/staking/v1beta1/delegators/{address}/unbonding_delegations"),
            NO_QUERY,
        )];

        let (spendable, delegations, unbonding, activity) = tokio::join!(
            self.read_list::<Coin>(endpoint, &spendable_paths, "balances"),
            self.read_list::<DelegationResponse>(endpoint, &delegation_paths, "delegation_responses"),
            self.read_list::<UnbondingResponse>(endpoint, &unbonding_paths, "unbonding_responses"),
            self.tx_activity(endpoint, address),
        );

        let spendable = items_or_empty(endpoint, "spendable", spendable);
        let delegations = items_or_empty(endpoint, "delegations", delegations);
        let unbonding = items_or_empty(endpoint, "unbonding", unbonding);

        let balances = CategoryBalances {
            liquid: sum_denom(&coins, NATIVE_DENOM),
            spendable: sum_denom(&spendable, NATIVE_DENOM),
            staked: sum_delegations(&delegations, NATIVE_DENOM),
            unbonding: sum_unbonding(&unbonding),
        };

        let status = if activity.count.is_some() {
            WalletStatus::Ok
        } else {
            WalletStatus::Partial
        };

        let snapshot = WalletSnapshot {
            address: address.clone(),
            status,
            endpoint: endpoint.clone(),
            liveness,
            total: self.config.total_policy.total(&balances),
            balances,
            tx_count: activity.count.unwrap_or(0),
            failed_txs: activity.failed,
            raw_balances: coins
                .into_iter()
                .map(|coin| CoinBalance {
                    denom: coin.denom,
                    amount: coin.amount,
                })
                .collect(),
            elapsed: started.elapsed(),
        };

        match liveness {
            Liveness::WithBalances => ProbeOutcome::Success(snapshot),
            Liveness::AccountExistsZeroBalance => ProbeOutcome::EmptyButLive(snapshot),
        }
    }
}

fn items_or_empty<T>(
    endpoint: &Endpoint,
    what: &str,
    result: Result<ListShape<T>, LcdError>,
) -> Vec<T> {
    result.map_or_else(
        |e| {
            debug!(endpoint = %endpoint, what, error = %e, "optional read unavailable");
            Vec::new()
        },
        ListShape::into_items,
    )
}

impl WalletProbe for LcdClient {
    async fn probe(&self, endpoint: &Endpoint, address: &WalletAddress) -> ProbeOutcome {
        let outcome = self.collect(endpoint, address).await;
        debug!(
            endpoint = %endpoint,
            address = %address,
            outcome = outcome.kind(),
            "probe finished"
        );
        outcome
    }

    fn name(&self) -> &'static str {
        "lcd"
    }
}
