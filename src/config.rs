use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Engine configuration. Every field has a default so partial JSON configs
/// deserialize cleanly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Seconds between scheduled scans of all active campaigns.
    #[serde(default = "default_scan_interval_secs")]
    pub scan_interval_secs: u64,

    /// Rolling history window per campaign, in days.
    #[serde(default = "default_history_retention_days")]
    pub history_retention_days: i64,

    /// Hard cap on history entries kept per campaign.
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Spend ratio at or above which a campaign is exhausted.
    #[serde(default = "default_overspend_critical")]
    pub overspend_critical: f64,

    /// Projected-to-total ratio above which a campaign is at risk.
    #[serde(default = "default_overspend_warning")]
    pub overspend_warning: f64,

    /// Fraction of the expected ratio below which a campaign is underspending.
    #[serde(default = "default_underspend_warning")]
    pub underspend_warning: f64,

    /// Maximum campaigns evaluated concurrently within one scan tick.
    #[serde(default = "default_max_concurrent_checks")]
    pub max_concurrent_checks: usize,

    /// Seconds each alert notifier gets before its invocation is abandoned.
    #[serde(default = "default_notify_timeout_secs")]
    pub notify_timeout_secs: u64,
}

fn default_scan_interval_secs() -> u64 {
    2 * 60 * 60
}
fn default_history_retention_days() -> i64 {
    30
}
fn default_history_capacity() -> usize {
    512
}
fn default_overspend_critical() -> f64 {
    1.0
}
fn default_overspend_warning() -> f64 {
    0.95
}
fn default_underspend_warning() -> f64 {
    0.70
}
fn default_max_concurrent_checks() -> usize {
    4
}
fn default_notify_timeout_secs() -> u64 {
    5
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            scan_interval_secs: default_scan_interval_secs(),
            history_retention_days: default_history_retention_days(),
            history_capacity: default_history_capacity(),
            overspend_critical: default_overspend_critical(),
            overspend_warning: default_overspend_warning(),
            underspend_warning: default_underspend_warning(),
            max_concurrent_checks: default_max_concurrent_checks(),
            notify_timeout_secs: default_notify_timeout_secs(),
        }
    }
}

impl PacingConfig {
    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_secs.max(1))
    }

    pub fn notify_timeout(&self) -> Duration {
        Duration::from_secs(self.notify_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = PacingConfig::default();
        assert_eq!(cfg.scan_interval_secs, 7200);
        assert_eq!(cfg.history_retention_days, 30);
        assert_eq!(cfg.overspend_critical, 1.0);
        assert_eq!(cfg.overspend_warning, 0.95);
        assert_eq!(cfg.underspend_warning, 0.70);
        assert_eq!(cfg.max_concurrent_checks, 4);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg: PacingConfig = serde_json::from_str(r#"{"scan_interval_secs": 60}"#).unwrap();
        assert_eq!(cfg.scan_interval_secs, 60);
        assert_eq!(cfg.history_retention_days, 30);
        assert_eq!(cfg.notify_timeout_secs, 5);
    }

    #[test]
    fn test_interval_floor() {
        let cfg: PacingConfig = serde_json::from_str(r#"{"scan_interval_secs": 0}"#).unwrap();
        assert_eq!(cfg.scan_interval(), std::time::Duration::from_secs(1));
    }
}
