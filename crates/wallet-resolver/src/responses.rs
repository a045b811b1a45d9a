// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Cosmos REST response decoding
//!
//! Nodes on different SDK versions wrap the same list differently: either
//! `{"balances": [...]}` or `{"balances": {"balances": [...]}}`. [`ListShape`] names
//! both cases and [`ListShape::decode`] tries them in that order.

use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use serde_with::{DisplayFromStr, PickFirst, serde_as};

/// A list found under `key`, either directly or nested one level under `key` again
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListShape<T> {
    /// `{key: [...]}`
    Flat(Vec<T>),
    /// `{key: {key: [...]}}`
    Nested(Vec<T>),
}

impl<T: DeserializeOwned> ListShape<T> {
    /// Decode the list under `key`, or `None` if neither shape is present
    ///
    /// Items that do not decode as `T` are skipped rather than failing the list.
    pub fn decode(body: &Value, key: &str) -> Option<Self> {
        let field = body.get(key)?;

        if let Some(items) = field.as_array() {
            return Some(Self::Flat(decode_items(items)));
        }

        field
            .get(key)
            .and_then(Value::as_array)
            .map(|items| Self::Nested(decode_items(items)))
    }
}

impl<T> ListShape<T> {
    /// Borrow the decoded items regardless of shape
    pub fn items(&self) -> &[T] {
        match self {
            Self::Flat(items) | Self::Nested(items) => items,
        }
    }

    /// Take the decoded items regardless of shape
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Flat(items) | Self::Nested(items) => items,
        }
    }
}

fn decode_items<T: DeserializeOwned>(items: &[Value]) -> Vec<T> {
    items
        .iter()
        .filter_map(|item| T::deserialize(item).ok())
        .collect()
}

/// `{"denom": "uxion", "amount": "1000"}`
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Coin {
    /// Denomination
    pub denom: String,
    /// Integer amount, sent as a string or a number
    #[serde_as(as = "PickFirst<(DisplayFromStr, _)>")]
    pub amount: u128,
}

/// One entry of `delegation_responses`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DelegationResponse {
    /// Delegated coin
    pub balance: Option<Coin>,
}

/// One entry of `unbonding_responses`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UnbondingResponse {
    /// Individual unbonding entries
    #[serde(default)]
    pub entries: Vec<UnbondingEntry>,
}

/// One maturing unbonding amount
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UnbondingEntry {
    /// Amount in the bond denom
    #[serde_as(as = "PickFirst<(DisplayFromStr, _)>")]
    pub balance: u128,
}

/// Reply of `/cosmos/tx/v1beta1/txs`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TxSearch {
    #[serde(default)]
    pagination: Option<Pagination>,
    #[serde(default)]
    tx_responses: Option<Vec<TxResponse>>,
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
struct Pagination {
    #[serde_as(as = "Option<PickFirst<(DisplayFromStr, _)>>")]
    total: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct TxResponse {
    #[serde(default)]
    code: u32,
}

impl TxSearch {
    /// Returns true if the reply carried pagination or a transaction page
    ///
    /// Error objects such as `{"code": 12, "message": "Not Implemented"}` decode
    /// into an empty `TxSearch` and must not count as an answer.
    pub fn has_metadata(&self) -> bool {
        self.pagination.is_some() || self.tx_responses.is_some()
    }

    /// Reported total, or the page length when the node omits it
    pub fn count(&self) -> u64 {
        self.pagination
            .as_ref()
            .and_then(|pagination| pagination.total)
            .unwrap_or_else(|| {
                self.tx_responses
                    .as_ref()
                    .map_or(0, |txs| txs.len() as u64)
            })
    }

    /// Transactions on this page with a non-zero result code
    pub fn failed(&self) -> u64 {
        self.tx_responses
            .iter()
            .flatten()
            .filter(|tx| tx.code != 0)
            .count() as u64
    }
}

/// Returns true if an account lookup body carries a live account record
pub fn has_account(body: &Value) -> bool {
    match body.get("account") {
        None | Some(Value::Null) => false,
        Some(Value::Object(fields)) => !fields.is_empty(),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(_) => true,
    }
}

/// Sum the amounts of `denom` in a coin list
pub fn sum_denom(coins: &[Coin], denom: &str) -> u128 {
    coins
        .iter()
        .filter(|coin| coin.denom == denom)
        .fold(0u128, |acc, coin| acc.saturating_add(coin.amount))
}

/// Sum delegated amounts of `denom`
pub fn sum_delegations(delegations: &[DelegationResponse], denom: &str) -> u128 {
    delegations
        .iter()
        .filter_map(|delegation| delegation.balance.as_ref())
        .filter(|coin| coin.denom == denom)
        .fold(0u128, |acc, coin| acc.saturating_add(coin.amount))
}

/// Sum every unbonding entry
pub fn sum_unbonding(unbonding: &[UnbondingResponse]) -> u128 {
    unbonding
        .iter()
        .flat_map(|response| &response.entries)
        .fold(0u128, |acc, entry| acc.saturating_add(entry.balance))
}
