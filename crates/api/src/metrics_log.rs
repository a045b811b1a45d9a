// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Recent-validations log
//!
//! A bounded in-memory record of finished validations, newest last. It backs the
//! `/v1/metrics/recent` view and supplies the default address for the XML export.

use std::{
    collections::VecDeque,
    num::NonZeroUsize,
    sync::{Mutex, MutexGuard, PoisonError},
};

use serde::{Deserialize, Serialize};
use shared_types::{WalletInfo, WalletStatus};
use utoipa::ToSchema;

/// Entries returned by the recent view
pub const RECENT_LIMIT: usize = 20;

/// One finished validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MetricsEntry {
    /// UTC time the validation finished, RFC 3339
    pub timestamp: String,
    /// Address as submitted
    pub address: String,
    /// Resolution time in seconds
    pub duration: f64,
    /// Risk score, 0 to 100
    pub score: u8,
    /// Final status
    pub status: WalletStatus,
}

impl MetricsEntry {
    /// Entry for `info` stamped with the current time
    pub fn new(info: &WalletInfo, score: u8) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            address: info.address.clone(),
            duration: info.duration,
            score,
            status: info.status,
        }
    }
}

/// Bounded log of recent validations
#[derive(Debug)]
pub struct MetricsLog {
    capacity: NonZeroUsize,
    entries: Mutex<VecDeque<MetricsEntry>>,
}

impl MetricsLog {
    /// Create an empty log keeping at most `capacity` entries
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity.get().min(1024))),
        }
    }

    /// Append an entry, dropping the oldest once full
    pub fn record(&self, entry: MetricsEntry) {
        let mut entries = self.lock();
        if entries.len() == self.capacity.get() {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Up to `limit` entries, newest first
    pub fn recent(&self, limit: usize) -> Vec<MetricsEntry> {
        self.lock().iter().rev().take(limit).cloned().collect()
    }

    /// Address of the newest entry
    pub fn latest_address(&self) -> Option<String> {
        self.lock().back().map(|entry| entry.address.clone())
    }

    /// Number of entries held
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if nothing has been logged
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the lock cannot leave the deque half-updated
    fn lock(&self) -> MutexGuard<'_, VecDeque<MetricsEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(address: &str, score: u8) -> MetricsEntry {
        MetricsEntry {
            timestamp: "2025-01-01T00:00:00+00:00".to_string(),
            address: address.to_string(),
            duration: 0.5,
            score,
            status: WalletStatus::Ok,
        }
    }

    fn log(capacity: usize) -> MetricsLog {
        MetricsLog::new(NonZeroUsize::new(capacity).unwrap())
    }

    #[test]
    fn recent_is_newest_first() {
        let log = log(10);
        log.record(entry("a", 10));
        log.record(entry("b", 20));
        log.record(entry("c", 30));

        let recent: Vec<_> = log.recent(2).into_iter().map(|e| e.address).collect();
        assert_eq!(recent, vec!["c", "b"]);
    }

    #[test]
    fn capacity_drops_oldest() {
        let log = log(2);
        log.record(entry("a", 10));
        log.record(entry("b", 20));
        log.record(entry("c", 30));

        assert_eq!(log.len(), 2);
        let recent: Vec<_> = log.recent(RECENT_LIMIT).into_iter().map(|e| e.address).collect();
        assert_eq!(recent, vec!["c", "b"]);
    }

    #[test]
    fn latest_address() {
        let log = log(5);
        assert!(log.is_empty());
        assert_eq!(log.latest_address(), None);

        log.record(entry("a", 10));
        log.record(entry("b", 20));
        assert_eq!(log.latest_address().as_deref(), Some("b"));
    }

    #[test]
    fn entry_from_wallet_info() {
        let info = WalletInfo::unreachable(
            "xion1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5lzv7xu",
            "all endpoints circuit-open",
        );
        let entry = MetricsEntry::new(&info, 10);

        assert_eq!(entry.address, info.address);
        assert_eq!(entry.status, WalletStatus::Unreachable);
        assert_eq!(entry.score, 10);
        assert!(chrono::DateTime::parse_from_rfc3339(&entry.timestamp).is_ok());
    }
}
