use chrono::{DateTime, Utc};

use super::types::{AlertSeverity, AlertType, PacingResult, PacingStatus};

/// An alert before persistence and dispatch.
#[derive(Debug, Clone)]
pub struct AlertDraft {
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub message: String,
    pub recommended_action: String,
}

/// Map an evaluation to at most one alert draft. ON_TRACK produces none.
///
/// Repeat checks in the same status intentionally produce fresh alerts: the
/// alert id embeds the evaluation instant and no cooldown is applied.
pub fn evaluate(campaign_name: &str, total_budget: f64, result: &PacingResult) -> Option<AlertDraft> {
    match result.pacing_status {
        PacingStatus::Exhausted => Some(AlertDraft {
            alert_type: AlertType::BudgetExhausted,
            severity: AlertSeverity::Critical,
            message: format!(
                "{} has exhausted its budget: spent ${:.2} of ${:.2}.",
                campaign_name, result.current_spend, total_budget
            ),
            recommended_action: "Pause campaign or increase budget immediately".into(),
        }),
        PacingStatus::Overspending => Some(AlertDraft {
            alert_type: AlertType::Overspending,
            severity: AlertSeverity::High,
            message: format!(
                "{} is projected to spend ${:.2} against a ${:.2} budget.",
                campaign_name, result.projected_spend, total_budget
            ),
            recommended_action: format!(
                "Reduce daily budget to ${:.2}",
                result.recommended_daily_budget
            ),
        }),
        PacingStatus::Underspending => Some(AlertDraft {
            alert_type: AlertType::Underspending,
            severity: AlertSeverity::Medium,
            message: format!(
                "{} is spending well below plan: ${:.2} of ${:.2} so far.",
                campaign_name, result.current_spend, total_budget
            ),
            recommended_action: format!(
                "Increase daily budget to ${:.2} or adjust targeting",
                result.recommended_daily_budget
            ),
        }),
        PacingStatus::AtRisk => Some(AlertDraft {
            alert_type: AlertType::AtRisk,
            severity: AlertSeverity::Medium,
            message: format!(
                "{} is at risk of exhausting its budget: projected ${:.2} of ${:.2}.",
                campaign_name, result.projected_spend, total_budget
            ),
            recommended_action: "Monitor closely and consider budget adjustment".into(),
        }),
        PacingStatus::OnTrack => None,
    }
}

/// Alert id: campaign, type, and evaluation instant. Two checks of the same
/// campaign in the same millisecond with the same type collapse into one row.
pub fn alert_id(campaign_id: &str, alert_type: AlertType, at: DateTime<Utc>) -> String {
    format!("{}:{}:{}", campaign_id, alert_type.as_str(), at.timestamp_millis())
}
