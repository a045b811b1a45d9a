// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Real-world asset listings from CosmWasm query endpoints
//!
//! Each configured source answers `{"assets": [...]}`. Sources are queried
//! concurrently, failing sources are skipped, and the merged list keeps the first
//! asset seen for each `id` in source order.

use std::{
    collections::{BTreeMap, HashSet},
    time::Duration,
};

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_types::Endpoint;
use thiserror::Error;
use tokio::{task::JoinSet, time::timeout};
use tracing::{debug, info, warn};
use utoipa::ToSchema;

use crate::non_empty_string::NonEmptyString;

/// Default timeout for one source query
pub const DEFAULT_RWA_TIMEOUT: Duration = Duration::from_secs(5);

const USER_AGENT: &str = concat!("wallet-guard/", env!("CARGO_PKG_VERSION"));

/// Asset identifier as published by the contract
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum AssetId {
    /// String identifier
    Text(String),
    /// Numeric identifier
    Number(u64),
}

/// One real-world asset record
///
/// Only `id` is interpreted; every other field is passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RwaAsset {
    /// Identifier used for de-duplication
    pub id: AssetId,
    /// Remaining fields of the record
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub attributes: BTreeMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct AssetPage {
    #[serde(default)]
    assets: Vec<Value>,
}

/// Errors raised by one source query
#[derive(Debug, Error)]
pub enum RwaError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The source did not answer in time
    #[error("asset source timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The source answered with a non-200 status
    #[error("asset source returned status {0}")]
    Status(StatusCode),
}

/// Sources and timeout for the aggregator
#[derive(Debug, Clone)]
pub struct RwaConfig {
    /// Query URLs, in precedence order for duplicate ids
    pub sources: Vec<Endpoint>,
    /// Timeout for one source query
    pub timeout: Duration,
}

impl RwaConfig {
    /// Build a configuration from raw URLs, ignoring blank and malformed entries
    pub fn from_sources<S: AsRef<str>>(sources: &[S], timeout: Duration) -> Self {
        let sources = sources
            .iter()
            .filter_map(|raw| NonEmptyString::new(raw).ok())
            .filter_map(|raw| match Endpoint::new(raw.as_str()) {
                Ok(endpoint) => Some(endpoint),
                Err(e) => {
                    warn!(error = %e, "ignoring asset source entry");
                    None
                }
            })
            .collect();

        Self { sources, timeout }
    }
}

impl Default for RwaConfig {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            timeout: DEFAULT_RWA_TIMEOUT,
        }
    }
}

/// Fan-out client over the configured asset sources
#[derive(Debug, Clone)]
pub struct RwaAggregator {
    client: Client,
    config: RwaConfig,
}

impl RwaAggregator {
    /// Create a new aggregator
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created
    pub fn new(config: RwaConfig) -> Result<Self, RwaError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client, config })
    }

    /// Configured sources
    pub fn sources(&self) -> &[Endpoint] {
        &self.config.sources
    }

    /// Query every source and merge the answers
    ///
    /// Never fails: a source that errors contributes nothing.
    pub async fn assets(&self) -> Vec<RwaAsset> {
        let mut tasks = JoinSet::new();

        for (index, source) in self.config.sources.iter().cloned().enumerate() {
            let client = self.client.clone();
            let limit = self.config.timeout;
            tasks.spawn(async move {
                let result = fetch(&client, &source, limit).await;
                (index, source, result)
            });
        }

        let mut pages = Vec::with_capacity(self.config.sources.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, source, Ok(assets))) => {
                    debug!(source = %source, count = assets.len(), "asset source answered");
                    pages.push((index, assets));
                }
                Ok((_, source, Err(e))) => {
                    warn!(source = %source, error = %e, "skipping asset source");
                }
                Err(e) => warn!(error = %e, "asset source task failed"),
            }
        }

        pages.sort_by_key(|(index, _)| *index);
        let merged = merge_assets(pages.into_iter().map(|(_, assets)| assets));
        info!(
            sources = self.config.sources.len(),
            assets = merged.len(),
            "real-world assets aggregated"
        );
        merged
    }
}

async fn fetch(client: &Client, source: &Endpoint, limit: Duration) -> Result<Vec<RwaAsset>, RwaError> {
    let response = timeout(limit, client.get(source.as_str()).send())
        .await
        .map_err(|_| RwaError::Timeout(limit))??;

    if response.status() != StatusCode::OK {
        return Err(RwaError::Status(response.status()));
    }

    let page: AssetPage = response.json().await?;

    Ok(page
        .assets
        .into_iter()
        .filter_map(|raw| match serde_json::from_value::<RwaAsset>(raw) {
            Ok(asset) => Some(asset),
            Err(e) => {
                debug!(source = %source, error = %e, "dropping asset without usable id");
                None
            }
        })
        .collect())
}

/// Concatenate pages, keeping the first asset for each id
pub fn merge_assets(pages: impl IntoIterator<Item = Vec<RwaAsset>>) -> Vec<RwaAsset> {
    let mut seen = HashSet::new();
    pages
        .into_iter()
        .flatten()
        .filter(|asset| seen.insert(asset.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    use super::*;

    fn asset(value: Value) -> RwaAsset {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn records_keep_extra_fields() {
        let record = asset(json!({"id": "bond-1", "name": "Treasury Bond", "yield": 4.2}));

        assert_eq!(record.id, AssetId::Text("bond-1".to_string()));
        assert_eq!(record.attributes["name"], "Treasury Bond");
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"id": "bond-1", "name": "Treasury Bond", "yield": 4.2})
        );
    }

    #[test]
    fn numeric_ids_are_accepted() {
        assert_eq!(asset(json!({"id": 7})).id, AssetId::Number(7));
        assert!(serde_json::from_value::<RwaAsset>(json!({"name": "no id"})).is_err());
    }

    #[test]
    fn merge_keeps_first_occurrence() {
        let first = vec![
            asset(json!({"id": "a", "source": 1})),
            asset(json!({"id": "b", "source": 1})),
        ];
        let second = vec![
            asset(json!({"id": "b", "source": 2})),
            asset(json!({"id": "c", "source": 2})),
        ];

        let merged = merge_assets([first, second]);

        let ids: Vec<_> = merged.iter().map(|a| a.id.clone()).collect();
        assert_eq!(
            ids,
            vec![
                AssetId::Text("a".into()),
                AssetId::Text("b".into()),
                AssetId::Text("c".into())
            ]
        );
        assert_eq!(merged[1].attributes["source"], 1);
    }

    #[test]
    fn config_ignores_blank_and_malformed_sources() {
        let config = RwaConfig::from_sources(
            &["", "not a url", "https://rwa.example/query"],
            DEFAULT_RWA_TIMEOUT,
        );
        assert_eq!(config.sources.len(), 1);
        assert_eq!(config.sources[0].as_str(), "https://rwa.example/query");
    }

    async fn source(body: Value) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn aggregates_and_skips_failing_sources() {
        let first = source(json!({"assets": [
            {"id": "a", "name": "first a"},
            {"name": "missing id"},
            {"id": "b", "name": "first b"}
        ]}))
        .await;
        let second = source(json!({"assets": [
            {"id": "b", "name": "second b"},
            {"id": 3, "name": "second 3"}
        ]}))
        .await;
        let broken = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&broken)
            .await;
        let garbage = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&garbage)
            .await;

        let urls = [
            format!("{}/query", broken.uri()),
            format!("{}/query", first.uri()),
            format!("{}/query", garbage.uri()),
            format!("{}/query", second.uri()),
        ];
        let aggregator =
            RwaAggregator::new(RwaConfig::from_sources(&urls, Duration::from_secs(2))).unwrap();

        let assets = aggregator.assets().await;

        let names: Vec<_> = assets
            .iter()
            .map(|a| a.attributes["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["first a", "first b", "second 3"]);
    }

    #[tokio::test]
    async fn slow_source_is_skipped() {
        let slow = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"assets": [{"id": "late"}]}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&slow)
            .await;

        let aggregator = RwaAggregator::new(RwaConfig::from_sources(
            &[slow.uri()],
            Duration::from_millis(50),
        ))
        .unwrap();

        assert!(aggregator.assets().await.is_empty());
    }

    #[tokio::test]
    async fn no_sources_means_no_assets() {
        let aggregator = RwaAggregator::new(RwaConfig::default()).unwrap();
        assert!(aggregator.sources().is_empty());
        assert!(aggregator.assets().await.is_empty());
    }
}
