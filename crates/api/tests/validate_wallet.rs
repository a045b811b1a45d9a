// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for the wallet validation, recent metrics and export endpoints


use std::{net::SocketAddr, num::NonZeroU32};

use axum::http::StatusCode;
use fixtures::{ADDRESS, broken_node, funded_node, spawn_server};
use serde_json::{Value, json};

async fn validate(client: &reqwest::Client, addr: SocketAddr, address: &str) -> reqwest::Response {
    client
        .post(format!("http://{addr}/v1/wallet/validate"))
        .json(&json!({ "address": address }))
        .send()
        .await
        .expect("Failed to send request")
}

#[tokio::test]
async fn validate_funded_wallet() {
    let node = funded_node().await;
    let (addr, _) = spawn_server(&[&node], |_| {}).await;
    let client = reqwest::Client::new();

    let response = validate(&client, addr, ADDRESS).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["address"], ADDRESS);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["endpoint"], node.uri());
    assert_eq!(body["tx_count"], 12);
    assert_eq!(body["failed_txs"], 1);
    assert_eq!(body["anomaly"], false);
    assert_eq!(body["score"], 95);
    assert!((body["balance"].as_f64().unwrap() - 5.5).abs() < 1e-9);
}

#[tokio::test]
async fn validate_trims_surrounding_whitespace() {
    let node = funded_node().await;
    let (addr, _) = spawn_server(&[&node], |_| {}).await;
    let client = reqwest::Client::new();

    let response = validate(&client, addr, &format!("  {ADDRESS}\n")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn validate_invalid_address() {
    let node = funded_node().await;
    let (addr, _) = spawn_server(&[&node], |_| {}).await;
    let client = reqwest::Client::new();

    for address in ["", "cosmos1abc", "xion1short", "not_an_address"] {
        let response = validate(&client, addr, address).await;
        assert_eq!(
            response.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "address {address:?}"
        );

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["status"], "invalid_address");
        assert_eq!(body["debug_reason"], "invalid_format");
        assert_eq!(body["score"], 10);
    }

    assert!(node.received_requests().await.unwrap().is_empty());

    let recent: Vec<Value> = client
        .get(format!("http://{addr}/v1/metrics/recent"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(recent.is_empty());
}

#[tokio::test]
async fn validate_malformed_body() {
    let node = funded_node().await;
    let (addr, _) = spawn_server(&[&node], |_| {}).await;

    let response = reqwest::Client::new()
        .post(format!("http://{addr}/v1/wallet/validate"))
        .json(&json!({ "wallet": ADDRESS }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn validate_unreachable_wallet() {
    let node = broken_node().await;
    let (addr, _) = spawn_server(&[&node], |_| {}).await;
    let client = reqwest::Client::new();

    let response = validate(&client, addr, ADDRESS).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "unreachable");
    assert_eq!(body["anomaly"], true);
    assert_eq!(body["score"], 10);
    assert!(body["endpoint"].is_null());

    let health: Value = client
        .get(format!("http://{addr}/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(health["status"]["Degraded"]["reason"].is_string());
    assert!(health["endpoints"][node.uri()]["Down"]["reason"].is_string());
}

#[tokio::test]
async fn recent_metrics_newest_first() {
    let node = funded_node().await;
    let (addr, _) = spawn_server(&[&node], |_| {}).await;
    let client = reqwest::Client::new();

    assert_eq!(validate(&client, addr, ADDRESS).await.status(), StatusCode::OK);
    assert_eq!(validate(&client, addr, ADDRESS).await.status(), StatusCode::OK);

    let recent: Vec<Value> = client
        .get(format!("http://{addr}/v1/metrics/recent"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(recent.len(), 2);
    for entry in &recent {
        assert_eq!(entry["address"], ADDRESS);
        assert_eq!(entry["score"], 95);
        assert_eq!(entry["status"], "ok");
    }
    assert!(recent[0]["timestamp"].as_str().unwrap() >= recent[1]["timestamp"].as_str().unwrap());
}

#[tokio::test]
async fn export_defaults_to_latest_validation() {
    let node = funded_node().await;
    let (addr, _) = spawn_server(&[&node], |_| {}).await;
    let client = reqwest::Client::new();
    let export_url = format!("http://{addr}/v1/iso/pain001.xml");

    let response = client.get(&export_url).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Validation error: No wallet address to export.");

    assert_eq!(validate(&client, addr, ADDRESS).await.status(), StatusCode::OK);

    let response = client.get(&export_url).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "application/xml");
    assert_eq!(
        response.headers()["content-disposition"],
        format!("attachment; filename=\"pain001-{ADDRESS}.xml\"").as_str()
    );

    let xml = response.text().await.unwrap();
    assert!(xml.starts_with("<?xml"));
    assert!(xml.contains(&format!("<Id>{ADDRESS}</Id>")));
    assert!(xml.contains("100.00"));
}

#[tokio::test]
async fn export_with_explicit_parameters() {
    let node = funded_node().await;
    let (addr, _) = spawn_server(&[&node], |_| {}).await;
    let client = reqwest::Client::new();
    let export_url = format!("http://{addr}/v1/iso/pain001.xml");

    let response = client
        .get(&export_url)
        .query(&[("wallet_addr", ADDRESS), ("amount", "12.5")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().contains("12.5"));

    let response = client
        .get(&export_url)
        .query(&[("wallet_addr", "not_an_address")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = client
        .get(&export_url)
        .query(&[("wallet_addr", ADDRESS), ("amount", "</Amt>")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn responses_carry_security_headers() {
    let node = funded_node().await;
    let (addr, _) = spawn_server(&[&node], |_| {}).await;

    let response = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    let headers = response.headers();

    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert!(headers.contains_key("content-security-policy"));
}

#[tokio::test]
async fn api_is_rate_limited_per_client() {
    let node = funded_node().await;
    let (addr, _) = spawn_server(&[&node], |config| {
        config.rate_limiting.requests_per_minute = NonZeroU32::new(2).unwrap();
    })
    .await;
    let client = reqwest::Client::new();
    let recent_url = format!("http://{addr}/v1/metrics/recent");

    for _ in 0..2 {
        let response = client.get(&recent_url).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = client.get(&recent_url).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        response.text().await.unwrap(),
        "Too many requests. Try again later."
    );

    let response = client
        .get(format!("http://{addr}/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn health_lists_configured_endpoints() {
    let node = funded_node().await;
    let (addr, _) = spawn_server(&[&node], |_| {}).await;

    let health: Value = reqwest::get(format!("http://{addr}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(health["status"], "Up");
    assert_eq!(health["environment"], "testing");
    assert_eq!(health["endpoints"][node.uri()], "Up");
}

#[tokio::test]
async fn prometheus_metrics_after_validation() {
    let node = funded_node().await;
    let (addr, _) = spawn_server(&[&node], |_| {}).await;
    let client = reqwest::Client::new();

    assert_eq!(validate(&client, addr, ADDRESS).await.status(), StatusCode::OK);

    let body = client
        .get(format!("http://{addr}/metrics"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.contains("wallet_guard_resolutions_total"));
    assert!(body.contains("wallet_guard_risk_score"));
}
