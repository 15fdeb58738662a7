use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::types::{AlertSeverity, AlertType, PacingStatus, PacingStrategy};

/// A campaign's budget facts for one billing period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignBudget {
    pub id: String,
    pub name: String,
    pub total_budget: f64,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub pacing_strategy: PacingStrategy,
    pub current_spend: f64,
    pub last_pacing_check: Option<DateTime<Utc>>,
    pub pacing_status: Option<PacingStatus>,
    pub projected_spend: Option<f64>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCampaignInput {
    /// Caller-supplied id; a v4 uuid is generated when absent.
    pub id: Option<String>,
    pub name: String,
    pub total_budget: f64,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub pacing_strategy: PacingStrategy,
}

/// Facts written back after one evaluation. `checked_at` doubles as the
/// stale-write guard: an update older than the stored check is rejected.
#[derive(Debug, Clone)]
pub struct CampaignCheckUpdate {
    pub current_spend: f64,
    pub pacing_status: PacingStatus,
    pub projected_spend: f64,
    pub checked_at: DateTime<Utc>,
}

/// A persisted alert row. Created by the engine, resolved by operators.
#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    pub id: String,
    pub campaign_id: String,
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub message: String,
    pub current_spend: f64,
    pub budget_limit: f64,
    pub projected_spend: f64,
    pub recommended_action: String,
    pub created_at: DateTime<Utc>,
    pub resolved: bool,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Filters for listing a campaign's alerts.
#[derive(Debug, Clone, Default)]
pub struct AlertFilter {
    pub alert_type: Option<AlertType>,
    pub unresolved_only: bool,
    pub limit: Option<u32>,
}
