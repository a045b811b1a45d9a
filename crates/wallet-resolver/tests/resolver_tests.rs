// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for `WalletResolver`
//!
//! These tests race real `LcdClient` probes against wiremock nodes and exercise the
//! explorer fallback against a wiremock explorer.

use std::{sync::Arc, time::Duration};

use shared_types::{AssetRow, Endpoint, Network, WalletStatus};
use wallet_resolver::{
    CircuitBreaker, EndpointRegistry, ExplorerConfig, ExplorerScraper, FallbackOutcome, LcdClient,
    LcdConfig, ResolverConfig, WalletResolver,
};
use wiremock::MockServer;

mod fixtures;
use fixtures::*;

const TEST_REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

fn resolver_for(servers: &[&MockServer], config: ResolverConfig) -> WalletResolver {
    let urls: Vec<String> = servers.iter().map(|server| server.uri()).collect();
    let registry = EndpointRegistry::from_sources(Network::Mainnet, &urls).unwrap();
    let probe = LcdClient::new(LcdConfig {
        request_timeout: TEST_REQUEST_TIMEOUT,
        ..LcdConfig::default()
    })
    .unwrap();

    WalletResolver::new(registry, Arc::new(CircuitBreaker::new()), probe, config)
}

fn scraper_for(explorer: &MockServer) -> ExplorerScraper {
    let config = ExplorerConfig::new(explorer.uri(), TEST_REQUEST_TIMEOUT, 0).unwrap();
    ExplorerScraper::new(config).unwrap()
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.map_or(0, |requests| requests.len())
}

/// The first node to answer is credited, regardless of list order
#[tokio::test]
async fn fast_endpoint_wins_the_race() {
    let slow = MockServer::start().await;
    let fast = MockServer::start().await;
    NodeFixture::funded(&slow, Duration::from_millis(800)).await;
    NodeFixture::funded(&fast, Duration::ZERO).await;

    let resolver = resolver_for(&[&slow, &fast], ResolverConfig::default());
    let info = resolver.resolve(ADDRESS).await;

    assert_eq!(info.status, WalletStatus::Ok);
    assert_eq!(info.endpoint.as_deref(), Some(fast.uri().as_str()));
    assert!((info.balance - 5.5).abs() < 1e-9);
    assert!((info.balance - (info.liquid + info.staked + info.unbonding)).abs() < 1e-9);
    assert!((info.spendable - 1.5).abs() < 1e-9);
    assert_eq!(info.tx_count, 12);
    assert_eq!(info.failed_txs, 1);
    assert!(!info.anomaly);
    assert_eq!(info.debug_reason, "ok_with_balances");
    assert!(info.fallback_assets.is_none());
}

/// Every node failing is a normal `unreachable` record, and every node is tripped
#[tokio::test]
async fn all_endpoints_failing_is_unreachable() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;
    NodeFixture::broken(&first).await;
    NodeFixture::broken(&second).await;

    let resolver = resolver_for(&[&first, &second], ResolverConfig::default());
    let info = resolver.resolve(ADDRESS).await;

    assert_eq!(info.status, WalletStatus::Unreachable);
    assert!(info.anomaly);
    assert!(info.endpoint.is_none());
    assert!(
        info.reason
            .as_deref()
            .is_some_and(|reason| reason.starts_with("All endpoints failed. Last: "))
    );
    assert!(info.debug_reason.contains("Unexpected status 500"));
    assert_eq!(resolver.breaker().blocked_count(), 2);
}

/// Invalid input never reaches the network
#[tokio::test]
async fn invalid_address_makes_no_calls() {
    let node = MockServer::start().await;
    NodeFixture::funded(&node, Duration::ZERO).await;

    let resolver = resolver_for(&[&node], ResolverConfig::default());

    for raw in [
        "",
        "cosmos1cmnhhvesgtu5s00c9l3nphw7285266vpwq",
        "xion1short",
        "XION1CMNHHVESGTU5S00C9L3NPHW7285266VPWQ",
    ] {
        let info = resolver.resolve(raw).await;
        assert_eq!(info.status, WalletStatus::InvalidAddress);
        assert!(info.anomaly);
        assert_eq!(info.tx_count, 0);
        assert!(info.balance.abs() < f64::EPSILON);
        assert_eq!(info.debug_reason, "invalid_format");
    }

    assert_eq!(request_count(&node).await, 0);
}

/// Same nodes, same answer
#[tokio::test]
async fn resolution_is_idempotent() {
    let node = MockServer::start().await;
    NodeFixture::funded(&node, Duration::ZERO).await;

    let resolver = resolver_for(&[&node], ResolverConfig::default());

    let mut first = resolver.resolve(ADDRESS).await;
    let mut second = resolver.resolve(ADDRESS).await;
    first.duration = 0.0;
    second.duration = 0.0;

    assert_eq!(first, second);
}

/// A failed node is skipped during its cooldown and probed again afterwards
#[tokio::test]
async fn breaker_skips_then_readmits_endpoint() {
    let node = MockServer::start().await;
    NodeFixture::broken(&node).await;

    let resolver = resolver_for(
        &[&node],
        ResolverConfig {
            cooldown: Duration::from_millis(300),
            ..ResolverConfig::default()
        },
    );

    let info = resolver.resolve(ADDRESS).await;
    assert_eq!(info.status, WalletStatus::Unreachable);
    assert!(resolver.breaker().is_blocked(&Endpoint::new(&node.uri()).unwrap()));
    let after_failure = request_count(&node).await;

    let info = resolver.resolve(ADDRESS).await;
    assert_eq!(info.status, WalletStatus::Unreachable);
    assert_eq!(info.debug_reason, "all endpoints circuit-open");
    assert_eq!(request_count(&node).await, after_failure);

    tokio::time::sleep(Duration::from_millis(400)).await;
    node.reset().await;
    NodeFixture::funded(&node, Duration::ZERO).await;

    let info = resolver.resolve(ADDRESS).await;
    assert_eq!(info.status, WalletStatus::Ok);
    assert_eq!(info.endpoint.as_deref(), Some(node.uri().as_str()));
}

/// An empty answer is corrected from the explorer page
#[tokio::test]
async fn empty_wallet_uses_explorer_fallback() {
    let node = MockServer::start().await;
    let explorer = MockServer::start().await;
    NodeFixture::empty(&node).await;
    ExplorerFixture::assets(&explorer).await;

    let resolver =
        resolver_for(&[&node], ResolverConfig::default()).with_scraper(scraper_for(&explorer));
    let resolution = resolver.resolve_detailed(ADDRESS).await;
    let info = resolution.info;

    assert_eq!(resolution.fallback, FallbackOutcome::Applied);
    assert_eq!(info.status, WalletStatus::Ok);
    assert!((info.balance - 12_500.0).abs() < 1e-9);
    assert!(!info.anomaly);
    assert_eq!(
        info.fallback_assets,
        Some(vec![
            AssetRow::new("XION", "12,500.00"),
            AssetRow::new("OTHER", "3"),
        ])
    );
}

/// A failing explorer leaves the node data untouched
#[tokio::test]
async fn explorer_failure_is_swallowed() {
    let node = MockServer::start().await;
    let explorer = MockServer::start().await;
    NodeFixture::empty(&node).await;
    ExplorerFixture::unavailable(&explorer).await;

    let resolver =
        resolver_for(&[&node], ResolverConfig::default()).with_scraper(scraper_for(&explorer));
    let resolution = resolver.resolve_detailed(ADDRESS).await;

    assert_eq!(resolution.fallback, FallbackOutcome::Failed);
    assert_eq!(resolution.info.status, WalletStatus::Ok);
    assert!(resolution.info.anomaly);
    assert!(resolution.info.balance.abs() < f64::EPSILON);
    assert!(resolution.info.fallback_assets.is_none());
    assert_eq!(request_count(&explorer).await, 1);
}

/// The explorer is never consulted for a funded wallet
#[tokio::test]
async fn funded_wallet_skips_explorer() {
    let node = MockServer::start().await;
    let explorer = MockServer::start().await;
    NodeFixture::funded(&node, Duration::ZERO).await;
    ExplorerFixture::assets(&explorer).await;

    let resolver =
        resolver_for(&[&node], ResolverConfig::default()).with_scraper(scraper_for(&explorer));
    let resolution = resolver.resolve_detailed(ADDRESS).await;

    assert_eq!(resolution.fallback, FallbackOutcome::Skipped);
    assert_eq!(request_count(&explorer).await, 0);
}
