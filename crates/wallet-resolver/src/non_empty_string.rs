// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Non-empty string validation utilities
//!
//! [`NonEmptyString`] guards configuration values such as the explorer base URL and
//! the individual entries of an endpoint override list, where a blank value means
//! "not configured" rather than "configured as empty".
//!
//! ```rust
//! use wallet_resolver::NonEmptyString;
//!
//! let url = NonEmptyString::new("https://explorer.burnt.com/xion-mainnet-1").unwrap();
//! assert_eq!(url.as_str(), "https://explorer.burnt.com/xion-mainnet-1");
//!
//! assert!(NonEmptyString::new("   ").is_err());
//! ```

use core::fmt;
use std::str::FromStr;

/// A string that holds at least one non-whitespace character
///
/// Surrounding whitespace is trimmed on construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyString(Box<str>);

impl NonEmptyString {
    /// Create a new `NonEmptyString`, trimming surrounding whitespace
    ///
    /// # Errors
    ///
    /// Returns an error message if the input is empty or whitespace-only
    pub fn new(s: impl AsRef<str>) -> Result<Self, String> {
        let trimmed = s.as_ref().trim();
        if trimmed.is_empty() {
            Err("String cannot be empty or whitespace-only".to_string())
        } else {
            Ok(NonEmptyString(trimmed.into()))
        }
    }

    /// Wrap a compile-time constant known to be non-blank
    pub(crate) fn from_static(s: &'static str) -> Self {
        debug_assert!(!s.trim().is_empty());
        NonEmptyString(s.trim().into())
    }

    /// Get a string slice of the contained value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NonEmptyString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NonEmptyString {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for NonEmptyString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_values() {
        assert!(NonEmptyString::new("").is_err());
        assert!(NonEmptyString::new(" \t\n ").is_err());
        assert!("".parse::<NonEmptyString>().is_err());
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let value = NonEmptyString::new("  https://node.example  ").unwrap();
        assert_eq!(value.as_str(), "https://node.example");
        assert_eq!(value.to_string(), "https://node.example");
    }
}
