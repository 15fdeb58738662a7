use std::sync::Arc;
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinSet;

use crate::db::models::Alert;
use crate::error::PacingError;

/// A notification sink for alerts (e-mail, webhook, UI push, ...).
#[async_trait]
pub trait AlertNotifier: Send + Sync {
    async fn notify(&self, alert: &Alert) -> Result<(), PacingError>;
}

/// Fans out alerts to registered notifiers. Each invocation runs in its own
/// task under a timeout, so one failing, hanging, or panicking notifier never
/// affects the others, persistence, or the scan.
pub struct AlertDispatcher {
    notifiers: RwLock<Vec<Arc<dyn AlertNotifier>>>,
    timeout: Duration,
}

impl AlertDispatcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            notifiers: RwLock::new(Vec::new()),
            timeout,
        }
    }

    pub fn register(&self, notifier: Arc<dyn AlertNotifier>) {
        if let Ok(mut notifiers) = self.notifiers.write() {
            notifiers.push(notifier);
        }
    }

    pub fn count(&self) -> usize {
        self.notifiers.read().map(|n| n.len()).unwrap_or(0)
    }

    /// Deliver one alert to every registered notifier and wait for all of
    /// them (or their timeouts) to finish.
    pub async fn dispatch(&self, alert: &Alert) {
        let snapshot: Vec<Arc<dyn AlertNotifier>> = match self.notifiers.read() {
            Ok(notifiers) => notifiers.clone(),
            Err(_) => {
                tracing::error!("Notifier list lock poisoned, skipping dispatch");
                return;
            }
        };
        if snapshot.is_empty() {
            return;
        }

        let alert = Arc::new(alert.clone());
        let timeout = self.timeout;
        let mut tasks = JoinSet::new();
        for notifier in snapshot {
            let alert = alert.clone();
            tasks.spawn(async move {
                tokio::time::timeout(timeout, notifier.notify(&alert)).await
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(Ok(()))) => {}
                Ok(Ok(Err(e))) => {
                    tracing::warn!(
                        alert_id = %alert.id,
                        error = %e,
                        "Alert notifier failed"
                    );
                }
                Ok(Err(_)) => {
                    tracing::warn!(
                        alert_id = %alert.id,
                        timeout_ms = timeout.as_millis() as u64,
                        "Alert notifier timed out"
                    );
                }
                Err(e) => {
                    tracing::error!(alert_id = %alert.id, "Alert notifier panicked: {}", e);
                }
            }
        }
    }
}
