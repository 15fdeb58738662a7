pub mod alert_policy;
pub mod background;
pub mod calculator;
pub mod classifier;
pub mod clock;
pub mod confidence;
pub mod dispatch;
pub mod history;
pub mod types;

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use chrono::Datelike;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::config::PacingConfig;
use crate::db::models::{Alert, CampaignBudget, CampaignCheckUpdate};
use crate::db::repos::{alerts as alert_repo, campaigns as campaign_repo};
use crate::db::DbPool;
use crate::error::PacingError;
use crate::spend::SpendSource;

use self::background::{scan_loop, MonitorState, MonitorStats};
use self::calculator::PacingInputs;
use self::clock::Clock;
use self::dispatch::{AlertDispatcher, AlertNotifier};
use self::history::{PacingHistory, PacingHistoryEntry};
use self::types::{PacingResult, PacingStatus, Recommendations};

/// The budget pacing engine: evaluates campaigns on demand and on a periodic
/// scan, persists the results, and raises alerts.
///
/// Constructed with injected dependencies (store pool, spend source, clock);
/// no global state. Intended to live in an `Arc` for the lifetime of the
/// process.
pub struct BudgetPacingService {
    pool: DbPool,
    spend_source: Arc<dyn SpendSource>,
    clock: Arc<dyn Clock>,
    config: PacingConfig,
    dispatcher: AlertDispatcher,
    history: StdMutex<PacingHistory>,
    state: Arc<MonitorState>,
    cancel: StdMutex<Option<CancellationToken>>,
    /// Per-campaign evaluation locks: an on-demand check and the scan loop
    /// never evaluate the same campaign concurrently.
    eval_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl BudgetPacingService {
    pub fn new(
        pool: DbPool,
        spend_source: Arc<dyn SpendSource>,
        clock: Arc<dyn Clock>,
        config: PacingConfig,
    ) -> Self {
        let dispatcher = AlertDispatcher::new(config.notify_timeout());
        let history = StdMutex::new(PacingHistory::new(
            config.history_retention_days,
            config.history_capacity,
        ));
        Self {
            pool,
            spend_source,
            clock,
            config,
            dispatcher,
            history,
            state: Arc::new(MonitorState::new()),
            cancel: StdMutex::new(None),
            eval_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &PacingConfig {
        &self.config
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    pub fn monitor_stats(&self) -> MonitorStats {
        self.state.stats()
    }

    /// Register a notification sink invoked for each new alert. Failing
    /// sinks are isolated and never affect the scan or persistence.
    pub fn register_alert_callback(&self, notifier: Arc<dyn AlertNotifier>) {
        self.dispatcher.register(notifier);
    }

    /// Start the periodic scan loop. Idempotent: starting an already-running
    /// monitor is a no-op. Fails only if no tokio runtime is available to
    /// host the loop.
    pub fn start_monitoring(self: Arc<Self>) -> Result<(), PacingError> {
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|e| PacingError::Internal(format!("No runtime for scan loop: {e}")))?;

        if self.state.swap_running(true) {
            tracing::debug!("Monitor already running, start is a no-op");
            return Ok(());
        }

        let token = CancellationToken::new();
        if let Ok(mut slot) = self.cancel.lock() {
            *slot = Some(token.clone());
        }

        tracing::info!(
            interval_secs = self.config.scan_interval_secs,
            workers = self.config.max_concurrent_checks,
            "Budget monitor starting"
        );
        handle.spawn(scan_loop(self, token));
        Ok(())
    }

    /// Stop the scan loop. Idempotent: stopping an unstarted monitor is a
    /// no-op. Cancellation is observed between campaign evaluations; an
    /// in-flight single-campaign evaluation runs to completion.
    pub fn stop_monitoring(&self) {
        if !self.state.swap_running(false) {
            return;
        }
        if let Ok(mut slot) = self.cancel.lock() {
            if let Some(token) = slot.take() {
                token.cancel();
            }
        }
        tracing::info!("Budget monitor stopped");
    }

    /// Evaluate one campaign now: fetch spend, run the pacing math, persist
    /// the updated facts, record history, and raise any alert.
    ///
    /// A persistence failure is logged and the in-memory result is still
    /// returned; the stored record stays stale until the next successful save.
    pub async fn check_campaign_budget(&self, campaign_id: &str) -> Result<PacingResult, PacingError> {
        let lock = self.eval_lock(campaign_id).await;
        let _guard = lock.lock().await;

        let campaign = campaign_repo::get_by_id(&self.pool, campaign_id)?;
        if campaign.total_budget <= 0.0 {
            return Err(PacingError::InvalidBudget(format!(
                "Campaign {} has non-positive budget {}",
                campaign_id, campaign.total_budget
            )));
        }

        let now = self.clock.now();
        let fetched = self
            .spend_source
            .current_spend(campaign_id)
            .await
            .map_err(|e| PacingError::SpendSource(e.to_string()))?;
        // Spend is monotone in this model; a lower reading is clamped up.
        let current_spend = fetched.max(campaign.current_spend);

        let calc = calculator::calculate(&PacingInputs {
            current_spend,
            total_budget: campaign.total_budget,
            days_elapsed: (now - campaign.period_start).num_days(),
            days_remaining: (campaign.period_end - now).num_days(),
            strategy: campaign.pacing_strategy,
            weekday: now.weekday(),
        });
        let status = classifier::classify(&calc, campaign.total_budget, &self.config);

        let expected_daily = campaign.total_budget / calc.total_days as f64;
        let confidence = {
            let history = self
                .history
                .lock()
                .map_err(|_| PacingError::Internal("History lock poisoned".into()))?;
            confidence::estimate(calc.days_elapsed, expected_daily, &history.series(campaign_id))
        };

        let result = PacingResult {
            campaign_id: campaign_id.to_string(),
            current_spend,
            daily_budget: calc.daily_budget,
            recommended_daily_budget: calc.recommended_daily_budget,
            pacing_status: status,
            days_remaining: calc.days_remaining,
            projected_spend: calc.projected_spend,
            adjustment_factor: calc.adjustment_factor,
            confidence_score: confidence,
        };

        self.persist_check(campaign_id, &result, now);

        if let Ok(mut history) = self.history.lock() {
            history.push(
                campaign_id,
                PacingHistoryEntry {
                    at: now,
                    spend: current_spend,
                    status,
                    projected_spend: calc.projected_spend,
                    confidence_score: confidence,
                },
            );
        }

        if let Some(draft) = alert_policy::evaluate(&campaign.name, campaign.total_budget, &result)
        {
            self.raise_alert(&campaign, &result, draft, now).await;
        }

        tracing::debug!(
            campaign_id = %campaign_id,
            status = status.as_str(),
            spend = current_spend,
            projected = calc.projected_spend,
            confidence = confidence,
            "Campaign budget checked"
        );
        Ok(result)
    }

    /// Run a fresh evaluation and derive a human-readable action list.
    pub async fn get_pacing_recommendations(
        &self,
        campaign_id: &str,
    ) -> Result<Recommendations, PacingError> {
        let result = self.check_campaign_budget(campaign_id).await?;
        let actions = match result.pacing_status {
            PacingStatus::Exhausted => vec![
                "Pause the campaign or increase its budget immediately".to_string(),
                "Review spend drivers before re-enabling delivery".to_string(),
            ],
            PacingStatus::Overspending => vec![
                format!(
                    "Reduce daily budget to ${:.2}",
                    result.recommended_daily_budget
                ),
                "Lower bids on the highest-cost keywords".to_string(),
            ],
            PacingStatus::Underspending => vec![
                format!(
                    "Increase daily budget to ${:.2}",
                    result.recommended_daily_budget
                ),
                "Expand targeting or raise bids to capture more volume".to_string(),
            ],
            PacingStatus::AtRisk => {
                vec!["Monitor closely and consider a budget adjustment".to_string()]
            }
            PacingStatus::OnTrack => {
                vec!["No changes needed; spend is tracking to plan".to_string()]
            }
        };
        Ok(Recommendations {
            campaign_id: campaign_id.to_string(),
            pacing_status: result.pacing_status,
            actions,
            result,
        })
    }

    /// Snapshot of the in-memory history series for a campaign.
    pub fn history_series(&self, campaign_id: &str) -> Vec<PacingHistoryEntry> {
        self.history
            .lock()
            .map(|h| h.series(campaign_id))
            .unwrap_or_default()
    }

    /// One scan tick: evaluate all active campaigns with bounded concurrency.
    /// Per-campaign failures are logged and skipped; the tick always completes
    /// unless cancelled.
    pub(crate) async fn run_scan_tick(self: Arc<Self>, cancel: &CancellationToken) {
        self.state.record_tick();

        let campaigns = match campaign_repo::get_active(&self.pool) {
            Ok(campaigns) => campaigns,
            Err(e) => {
                tracing::error!("Scan tick: failed to list active campaigns: {}", e);
                return;
            }
        };
        tracing::debug!(count = campaigns.len(), "Scan tick: evaluating active campaigns");

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_checks.max(1)));
        let mut tasks = JoinSet::new();
        for campaign in campaigns {
            if cancel.is_cancelled() {
                tracing::info!("Scan tick cancelled, remaining campaigns deferred");
                break;
            }
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => break,
            };
            let service = self.clone();
            let cancel = cancel.clone();
            tasks.spawn(async move {
                let _permit = permit;
                if cancel.is_cancelled() {
                    return;
                }
                match service.check_campaign_budget(&campaign.id).await {
                    Ok(_) => service.state.record_checked(),
                    Err(e) => {
                        service.state.record_failed();
                        tracing::warn!(
                            campaign_id = %campaign.id,
                            kind = e.kind(),
                            "Campaign check failed, skipped until next tick: {}", e
                        );
                    }
                }
            });
        }
        while tasks.join_next().await.is_some() {}
    }

    async fn eval_lock(&self, campaign_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.eval_locks.lock().await;
        locks
            .entry(campaign_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn persist_check(&self, campaign_id: &str, result: &PacingResult, now: chrono::DateTime<chrono::Utc>) {
        let update = CampaignCheckUpdate {
            current_spend: result.current_spend,
            pacing_status: result.pacing_status,
            projected_spend: result.projected_spend,
            checked_at: now,
        };
        match campaign_repo::apply_check(&self.pool, campaign_id, &update) {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!(
                    campaign_id = %campaign_id,
                    "Stale check result rejected by a newer write"
                );
            }
            Err(e) => {
                tracing::warn!(
                    campaign_id = %campaign_id,
                    "Failed to persist check result, record stale until next save: {}", e
                );
            }
        }
    }

    async fn raise_alert(
        &self,
        campaign: &CampaignBudget,
        result: &PacingResult,
        draft: alert_policy::AlertDraft,
        now: chrono::DateTime<chrono::Utc>,
    ) {
        let alert = Alert {
            id: alert_policy::alert_id(&campaign.id, draft.alert_type, now),
            campaign_id: campaign.id.clone(),
            alert_type: draft.alert_type,
            severity: draft.severity,
            message: draft.message,
            current_spend: result.current_spend,
            budget_limit: campaign.total_budget,
            projected_spend: result.projected_spend,
            recommended_action: draft.recommended_action,
            created_at: now,
            resolved: false,
            resolved_at: None,
        };

        if let Err(e) = alert_repo::insert(&self.pool, &alert) {
            tracing::warn!(
                campaign_id = %campaign.id,
                alert_id = %alert.id,
                "Failed to persist alert, dispatching anyway: {}", e
            );
        }
        self.state.record_alert();

        tracing::info!(
            campaign_id = %campaign.id,
            alert_type = alert.alert_type.as_str(),
            severity = alert.severity.as_str(),
            "Alert raised"
        );
        self.dispatcher.dispatch(&alert).await;
    }
}
