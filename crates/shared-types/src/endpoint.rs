// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! REST node base URLs

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use thiserror::Error;
use url::Url;

/// Errors raised while parsing an endpoint base URL
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointError {
    /// The value was not a URL at all
    #[error("invalid endpoint URL '{value}': {reason}")]
    InvalidUrl {
        /// Offending input
        value: String,
        /// Parser message
        reason: String,
    },
    /// The URL used a scheme other than http or https
    #[error("endpoint '{0}' must use http or https")]
    UnsupportedScheme(String),
}

/// Base URL of one REST data source
///
/// Stored without a trailing slash so request paths can be appended directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Endpoint(Box<str>);

impl Endpoint {
    /// Parse and normalize a base URL
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not an absolute http(s) URL
    pub fn new(value: &str) -> Result<Self, EndpointError> {
        let trimmed = value.trim();
        let url = Url::parse(trimmed).map_err(|e| EndpointError::InvalidUrl {
            value: trimmed.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(EndpointError::UnsupportedScheme(trimmed.to_string()));
        }

        Ok(Self(trimmed.trim_end_matches('/').into()))
    }

    /// Build a full URL from a path beginning with `/`
    pub fn join(&self, path: &str) -> String {
        format!("{}{path}", self.0)
    }

    /// Get the base URL as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Endpoint {
    type Err = EndpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for Endpoint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Endpoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(&raw).map_err(de::Error::custom)
    }
}
