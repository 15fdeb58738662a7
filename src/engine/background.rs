use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use super::BudgetPacingService;

/// Runtime state for the monitor, shared across threads.
pub struct MonitorState {
    running: AtomicBool,
    ticks: AtomicU64,
    campaigns_checked: AtomicU64,
    checks_failed: AtomicU64,
    alerts_raised: AtomicU64,
}

impl Default for MonitorState {
    fn default() -> Self {
        Self::new()
    }
}

impl MonitorState {
    pub fn new() -> Self {
        Self {
            running: AtomicBool::new(false),
            ticks: AtomicU64::new(0),
            campaigns_checked: AtomicU64::new(0),
            checks_failed: AtomicU64::new(0),
            alerts_raised: AtomicU64::new(0),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Set the running flag, returning the previous value.
    pub(crate) fn swap_running(&self, running: bool) -> bool {
        self.running.swap(running, Ordering::Relaxed)
    }

    pub(crate) fn record_tick(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_checked(&self) {
        self.campaigns_checked.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failed(&self) {
        self.checks_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_alert(&self) {
        self.alerts_raised.fetch_add(1, Ordering::Relaxed);
    }

    pub fn stats(&self) -> MonitorStats {
        MonitorStats {
            running: self.running.load(Ordering::Relaxed),
            ticks: self.ticks.load(Ordering::Relaxed),
            campaigns_checked: self.campaigns_checked.load(Ordering::Relaxed),
            checks_failed: self.checks_failed.load(Ordering::Relaxed),
            alerts_raised: self.alerts_raised.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MonitorStats {
    pub running: bool,
    pub ticks: u64,
    pub campaigns_checked: u64,
    pub checks_failed: u64,
    pub alerts_raised: u64,
}

/// Periodic scan: evaluate every active campaign each interval until
/// cancelled. The first tick fires immediately after start.
pub(crate) async fn scan_loop(service: Arc<BudgetPacingService>, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(service.config().scan_interval());
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {}
        }
        if !service.state().is_running() {
            break;
        }
        service.clone().run_scan_tick(&cancel).await;
    }
    tracing::info!("Budget scan loop exited");
}
