use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Duration, Utc};

use super::types::PacingStatus;

/// One snapshot of a campaign evaluation, kept for confidence estimation.
#[derive(Debug, Clone, Copy)]
pub struct PacingHistoryEntry {
    pub at: DateTime<Utc>,
    pub spend: f64,
    pub status: PacingStatus,
    pub projected_spend: f64,
    pub confidence_score: f64,
}

/// Bounded per-campaign time series. Entries older than the retention window
/// are evicted lazily on write, and a hard capacity cap bounds memory even
/// under very frequent checks.
pub struct PacingHistory {
    retention: Duration,
    capacity: usize,
    entries: HashMap<String, VecDeque<PacingHistoryEntry>>,
}

impl PacingHistory {
    pub fn new(retention_days: i64, capacity: usize) -> Self {
        Self {
            retention: Duration::days(retention_days.max(1)),
            capacity: capacity.max(1),
            entries: HashMap::new(),
        }
    }

    /// Append an entry, evicting anything older than the retention window
    /// relative to the new entry's timestamp.
    pub fn push(&mut self, campaign_id: &str, entry: PacingHistoryEntry) {
        let series = self.entries.entry(campaign_id.to_string()).or_default();
        let cutoff = entry.at - self.retention;
        while series.front().is_some_and(|e| e.at < cutoff) {
            series.pop_front();
        }
        series.push_back(entry);
        while series.len() > self.capacity {
            series.pop_front();
        }
    }

    /// Snapshot of the series for a campaign, oldest first.
    pub fn series(&self, campaign_id: &str) -> Vec<PacingHistoryEntry> {
        self.entries
            .get(campaign_id)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn len(&self, campaign_id: &str) -> usize {
        self.entries.get(campaign_id).map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self, campaign_id: &str) -> bool {
        self.len(campaign_id) == 0
    }
}
