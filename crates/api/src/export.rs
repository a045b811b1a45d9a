// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! ISO 20022 pain.001-style XML export
//!
//! Produces a minimal `Document/pain.001/Acct` record for one wallet. This is a
//! demonstration document, not a schema-complete credit transfer initiation.

use std::{fmt::Write as _, sync::LazyLock};

use regex::Regex;
use shared_types::WalletAddress;
use thiserror::Error;

/// Namespace of the customer credit transfer initiation message
pub const PAIN001_NAMESPACE: &str = "urn:iso:std:iso:20022:tech:xsd:pain.001.001.03";

/// Amount used when the caller does not give one
pub const DEFAULT_AMOUNT: &str = "100.00";

/// Media type of the export
pub const XML_CONTENT_TYPE: &str = "application/xml";

static AMOUNT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,15}(\.\d{1,2})?$").expect("amount pattern is valid"));

/// Errors building an export document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    /// The amount is not a plain decimal with at most two fraction digits
    #[error("amount must be a decimal with at most two fraction digits, got {0:?}")]
    InvalidAmount(String),
}

/// Validated export amount
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Amount(String);

impl Amount {
    /// Parse an amount such as `100.00` or `42`
    pub fn parse(raw: &str) -> Result<Self, ExportError> {
        let trimmed = raw.trim();
        if AMOUNT_PATTERN.is_match(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(ExportError::InvalidAmount(raw.to_string()))
        }
    }

    /// Amount as written into the document
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self(DEFAULT_AMOUNT.to_string())
    }
}

/// Attachment file name for `address`
pub fn file_name(address: &WalletAddress) -> String {
    format!("pain001-{address}.xml")
}

/// Render the pain.001 document for `address`
///
/// Both inputs are validated types restricted to characters that need no XML
/// escaping.
pub fn pain001_document(address: &WalletAddress, amount: &Amount) -> String {
    let mut xml = String::with_capacity(320);
    xml.push_str("<?xml version='1.0' encoding='UTF-8'?>\n");
    let _ = writeln!(xml, "<Document xmlns=\"{PAIN001_NAMESPACE}\">");
    xml.push_str("  <pain.001>\n");
    xml.push_str("    <Acct>\n");
    let _ = writeln!(xml, "      <Id>{address}</Id>");
    let _ = writeln!(xml, "      <Amt>{}</Amt>", amount.as_str());
    xml.push_str("      <Status>Validated</Status>\n");
    xml.push_str("    </Acct>\n");
    xml.push_str("  </pain.001>\n");
    xml.push_str("</Document>\n");
    xml
}
