// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Block explorer scrape adapter
//!
//! The explorer page is meant for humans, so extraction is best effort. Rows are
//! located by class name first (`AssetRow` blocks with `AssetSymbol`/`AssetAmount`
//! children), then by table cells, and finally by a plain-text `amount SYMBOL`
//! pattern. Markup changes degrade the result to an empty list, never to an error.

use std::{sync::LazyLock, time::Duration};

use api_client::{ApiError, AssetScraper};
use regex::Regex;
use reqwest::{Client, StatusCode};
use shared_types::{AssetRow, WalletAddress};
use thiserror::Error;
use tokio::time::timeout;
use tokio_retry::{
    RetryIf,
    strategy::{ExponentialBackoff, jitter},
};
use tracing::{debug, warn};

use crate::non_empty_string::NonEmptyString;

// Explorer constants
/// Public Xion mainnet explorer
pub const DEFAULT_EXPLORER_URL: &str = "https://explorer.burnt.com/xion-mainnet-1";
/// Default timeout for one page fetch
pub const DEFAULT_EXPLORER_TIMEOUT: Duration = Duration::from_secs(8);
/// Default number of extra attempts after a transient failure
pub const DEFAULT_EXPLORER_MAX_RETRIES: usize = 1;

const USER_AGENT: &str = concat!("wallet-guard/", env!("CARGO_PKG_VERSION"));
const HEADER_SYMBOL: &str = "Symbol";

static ASSET_ROW_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<[a-z][a-z0-9]*\b[^>]*\bclass\s*=\s*["'][^"']*\bAssetRow\b[^"']*["'][^>]*>"#)
        .expect("asset row regex is valid")
});

static ASSET_SYMBOL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)\bclass\s*=\s*["'][^"']*\bAssetSymbol\b[^"']*["'][^>]*>(.*?)<"#)
        .expect("asset symbol regex is valid")
});

static ASSET_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)\bclass\s*=\s*["'][^"']*\bAssetAmount\b[^"']*["'][^>]*>(.*?)<"#)
        .expect("asset amount regex is valid")
});

static PLAIN_SYMBOL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)\bclass\s*=\s*["'][^"']*\bsymbol\b[^"']*["'][^>]*>(.*?)<"#)
        .expect("symbol class regex is valid")
});

static PLAIN_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)\bclass\s*=\s*["'][^"']*\bamount\b[^"']*["'][^>]*>(.*?)<"#)
        .expect("amount class regex is valid")
});

static TABLE_ROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<tr\b[^>]*>(.*?)</tr>").expect("table row regex is valid"));

static TABLE_CELL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<td\b[^>]*>(.*?)</td>").expect("table cell regex is valid"));

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("tag regex is valid"));

static NON_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)>").expect("script regex is valid")
});

static AMOUNT_SYMBOL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?)\s+([A-Z][A-Z0-9]{1,11})\b")
        .expect("amount symbol regex is valid")
});

/// Configuration for the explorer scraper
#[derive(Debug, Clone)]
pub struct ExplorerConfig {
    /// Explorer base URL; the account page is `{base_url}/account/{address}`
    pub base_url: NonEmptyString,
    /// Timeout for one page fetch
    pub timeout: Duration,
    /// Extra attempts after a transient failure
    pub max_retries: usize,
}

impl ExplorerConfig {
    /// Create a new `ExplorerConfig` with validation
    pub fn new(
        base_url: impl AsRef<str>,
        timeout: Duration,
        max_retries: usize,
    ) -> Result<Self, String> {
        Ok(Self {
            base_url: NonEmptyString::new(base_url)?,
            timeout,
            max_retries,
        })
    }

    /// Account page URL for `address`
    pub fn account_url(&self, address: &WalletAddress) -> String {
        format!(
            "{}/account/{address}",
            self.base_url.as_str().trim_end_matches('/')
        )
    }
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            base_url: NonEmptyString::from_static(DEFAULT_EXPLORER_URL),
            timeout: DEFAULT_EXPLORER_TIMEOUT,
            max_retries: DEFAULT_EXPLORER_MAX_RETRIES,
        }
    }
}

/// Errors specific to the explorer scraper
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ScrapeError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The page did not load in time
    #[error("explorer request timed out after {}ms", .timeout.as_millis())]
    Timeout { timeout: Duration },

    /// Explorer answered with a non-200 status
    #[error("explorer returned status {0}")]
    Status(StatusCode),
}

impl ScrapeError {
    /// Returns true if another attempt may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(error) => error.is_connect() || error.is_timeout() || error.is_request(),
            Self::Timeout { .. } => true,
            Self::Status(status) => {
                matches!(status.as_u16(), 408 | 429) || status.is_server_error()
            }
        }
    }
}

impl From<ScrapeError> for ApiError {
    fn from(value: ScrapeError) -> Self {
        match value {
            ScrapeError::Http(error) => ApiError::Http {
                message: error.to_string(),
            },
            ScrapeError::Timeout { timeout } => ApiError::Timeout {
                timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            },
            ScrapeError::Status(status) => ApiError::UnexpectedStatus {
                status: status.as_u16(),
            },
        }
    }
}

/// Explorer page scraper
#[derive(Debug, Clone)]
pub struct ExplorerScraper {
    client: Client,
    config: ExplorerConfig,
}

impl ExplorerScraper {
    /// Create a new explorer scraper
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created
    pub fn new(config: ExplorerConfig) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(ScrapeError::Http)?;

        Ok(Self { client, config })
    }

    async fn fetch_once(&self, url: &str) -> Result<String, ScrapeError> {
        let response = timeout(self.config.timeout, self.client.get(url).send())
            .await
            .map_err(|_| ScrapeError::Timeout {
                timeout: self.config.timeout,
            })??;

        match response.status() {
            StatusCode::OK => Ok(response.text().await?),
            status => Err(ScrapeError::Status(status)),
        }
    }

    async fn fetch_page(&self, url: &str) -> Result<String, ScrapeError> {
        let retry_strategy = ExponentialBackoff::from_millis(100)
            .max_delay(Duration::from_secs(2))
            .map(jitter)
            .take(self.config.max_retries);

        RetryIf::spawn(
            retry_strategy,
            || async {
                let result = self.fetch_once(url).await;
                if let Err(e) = &result {
                    debug!(url, error = %e, "explorer fetch attempt failed");
                }
                result
            },
            ScrapeError::is_transient,
        )
        .await
    }
}

impl AssetScraper for ExplorerScraper {
    async fn scrape(&self, address: &WalletAddress) -> Result<Vec<AssetRow>, ApiError> {
        let url = self.config.account_url(address);

        let html = self.fetch_page(&url).await.map_err(|e| {
            warn!(url = %url, error = %e, "explorer scrape failed");
            ApiError::from(e)
        })?;

        let rows = parse_assets(&html);
        debug!(url = %url, rows = rows.len(), "explorer page parsed");
        Ok(rows)
    }

    fn name(&self) -> &'static str {
        "explorer"
    }
}

/// Extract asset rows from an explorer account page
pub fn parse_assets(html: &str) -> Vec<AssetRow> {
    let rows = class_rows(html);
    if !rows.is_empty() {
        return rows;
    }

    let rows = table_rows(html);
    if !rows.is_empty() {
        return rows;
    }

    text_rows(html)
}

fn class_rows(html: &str) -> Vec<AssetRow> {
    let starts: Vec<usize> = ASSET_ROW_OPEN.find_iter(html).map(|m| m.start()).collect();

    starts
        .iter()
        .enumerate()
        .filter_map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(html.len());
            let segment = &html[start..end];

            let symbol = first_capture(&ASSET_SYMBOL, segment)
                .or_else(|| first_capture(&PLAIN_SYMBOL, segment));
            let amount = first_capture(&ASSET_AMOUNT, segment)
                .or_else(|| first_capture(&PLAIN_AMOUNT, segment));

            match (symbol, amount) {
                (Some(symbol), Some(amount)) => accept(symbol, amount),
                _ => cells_row(segment),
            }
        })
        .collect()
}

fn table_rows(html: &str) -> Vec<AssetRow> {
    TABLE_ROW
        .captures_iter(html)
        .filter_map(|row| row.get(1))
        .filter_map(|row| cells_row(row.as_str()))
        .collect()
}

fn cells_row(fragment: &str) -> Option<AssetRow> {
    let cells: Vec<String> = TABLE_CELL
        .captures_iter(fragment)
        .filter_map(|cell| cell.get(1))
        .map(|cell| clean_text(cell.as_str()))
        .collect();

    match cells.as_slice() {
        [_, symbol, amount, ..] => accept(symbol.clone(), amount.clone()),
        _ => None,
    }
}

fn text_rows(html: &str) -> Vec<AssetRow> {
    let text = clean_text(&NON_TEXT.replace_all(html, " "));

    AMOUNT_SYMBOL
        .captures_iter(&text)
        .filter_map(|found| {
            let amount = found.get(1)?.as_str();
            let symbol = found.get(2)?.as_str();
            accept(symbol.to_string(), amount.to_string())
        })
        .collect()
}

fn first_capture(pattern: &Regex, fragment: &str) -> Option<String> {
    pattern
        .captures(fragment)
        .and_then(|found| found.get(1))
        .map(|inner| clean_text(inner.as_str()))
        .filter(|text| !text.is_empty())
}

fn accept(symbol: String, amount: String) -> Option<AssetRow> {
    if symbol.is_empty() || amount.is_empty() || symbol == HEADER_SYMBOL {
        return None;
    }
    Some(AssetRow { symbol, amount })
}

/// Strip tags, decode the common entities and collapse whitespace
fn clean_text(fragment: &str) -> String {
    let text = TAG.replace_all(fragment, " ");
    let text = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
