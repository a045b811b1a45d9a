// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0
#![allow(missing_docs, dead_code)]

//! Wallet resolver test fixtures
//!
//! Mock Cosmos REST nodes and explorer pages for resolver integration tests.

use std::time::Duration;

use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, path_regex, query_param},
};

/// Address used throughout the integration tests
pub const ADDRESS: &str = "xion1cmnhhvesgtu5s00c9l3nphw7285266vpwqxdw5qjz78jvfl4vps65u3h7";

/// Mock REST node behaviours
#[derive(Debug)]
pub struct NodeFixture;

impl NodeFixture {
    /// Node reporting a funded, active account, answering after `delay`
    ///
    /// liquid 2 XION, staked 3 XION, unbonding 0.5 XION, 12 transactions, 1 failed.
    pub async fn funded(server: &MockServer, delay: Duration) {
        Self::mount(
            server,
            &format!("/cosmos/auth/v1beta1/accounts/{ADDRESS}"),
            Self::account(),
            delay,
        )
        .await;
        Self::mount(
            server,
            &format!("/cosmos/bank/v1beta1/balances/{ADDRESS}"),
            json!({"balances": [
                {"denom": "uxion", "amount": "2000000"},
                {"denom": "ibc/USDC", "amount": "42"}
            ]}),
            delay,
        )
        .await;
        Self::mount(
            server,
            &format!("/cosmos/bank/v1beta1/spendable_balances/{ADDRESS}"),
            json!({"balances": [{"denom": "uxion", "amount": "1500000"}]}),
            delay,
        )
        .await;
        Self::mount(
            server,
            &format!("/cosmos/staking/v1beta1/delegations/{ADDRESS}"),
            json!({"delegation_responses": [{"balance": {"denom": "uxion", "amount": "3000000"}}]}),
            delay,
        )
        .await;
        Self::mount(
            server,
            &format!("/cosmos/staking/v1beta1/delegators/{ADDRESS}/unbonding_delegations"),
            json!({"unbonding_responses": [{"entries": [{"balance": "500000"}]}]}),
            delay,
        )
        .await;
        Self::mount_txs(server, 7, 5, delay).await;
    }

    /// Node reporting a live account with no balance and no activity
    pub async fn empty(server: &MockServer) {
        let delay = Duration::ZERO;
        Self::mount(
            server,
            &format!("/cosmos/auth/v1beta1/accounts/{ADDRESS}"),
            Self::account(),
            delay,
        )
        .await;
        Self::mount(
            server,
            &format!("/cosmos/bank/v1beta1/balances/{ADDRESS}"),
            json!({"balances": []}),
            delay,
        )
        .await;
        Self::mount(
            server,
            &format!("/cosmos/bank/v1beta1/spendable_balances/{ADDRESS}"),
            json!({"balances": []}),
            delay,
        )
        .await;
        Self::mount(
            server,
            &format!("/cosmos/staking/v1beta1/delegations/{ADDRESS}"),
            json!({"delegation_responses": []}),
            delay,
        )
        .await;
        Self::mount(
            server,
            &format!("/cosmos/staking/v1beta1/delegators/{ADDRESS}/unbonding_delegations"),
            json!({"unbonding_responses": []}),
            delay,
        )
        .await;
        Self::mount_txs(server, 0, 0, delay).await;
    }

    /// Node failing every request with a 500
    pub async fn broken(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path_regex(r"^/.*$"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(server)
            .await;
    }

    fn account() -> Value {
        json!({"account": {"@type": "/cosmos.auth.v1beta1.BaseAccount", "address": ADDRESS}})
    }

    async fn mount(server: &MockServer, route: &str, body: Value, delay: Duration) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(body)
                    .set_delay(delay),
            )
            .mount(server)
            .await;
    }

    async fn mount_txs(server: &MockServer, sent: u64, received: u64, delay: Duration) {
        let filters = [
            (format!("message.sender='{ADDRESS}'"), sent, 11),
            (format!("transfer.recipient='{ADDRESS}'"), received, 0),
        ];

        for (filter, total, code) in filters {
            let page = if total == 0 {
                json!([])
            } else {
                json!([{"code": code}])
            };
            Mock::given(method("GET"))
                .and(path("/cosmos/tx/v1beta1/txs"))
                .and(query_param("events", filter))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(json!({
                            "tx_responses": page,
                            "pagination": {"total": total.to_string()}
                        }))
                        .set_delay(delay),
                )
                .mount(server)
                .await;
        }
    }
}

/// Mock explorer behaviours
#[derive(Debug)]
pub struct ExplorerFixture;

impl ExplorerFixture {
    /// Account page listing 12,500.00 XION and 3 OTHER
    pub async fn assets(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path(format!("/account/{ADDRESS}")))
            .respond_with(ResponseTemplate::new(200).set_body_string(Self::page()))
            .mount(server)
            .await;
    }

    /// Account page that is unavailable
    pub async fn unavailable(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path(format!("/account/{ADDRESS}")))
            .respond_with(ResponseTemplate::new(404))
            .mount(server)
            .await;
    }

    pub fn page() -> &'static str {
        r#"<html><body>
            <div class="AssetRow flex"><span class="AssetSymbol">XION</span><span class="AssetAmount">12,500.00</span></div>
            <div class="AssetRow flex"><span class="AssetSymbol">OTHER</span><span class="AssetAmount">3</span></div>
        </body></html>"#
    }
}
