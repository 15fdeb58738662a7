use serde::{Deserialize, Serialize};

/// How aggressively to front- or back-load budget recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PacingStrategy {
    Linear,
    Accelerated,
    Conservative,
    Adaptive,
}

impl PacingStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PacingStrategy::Linear => "linear",
            PacingStrategy::Accelerated => "accelerated",
            PacingStrategy::Conservative => "conservative",
            PacingStrategy::Adaptive => "adaptive",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "linear" => Some(PacingStrategy::Linear),
            "accelerated" => Some(PacingStrategy::Accelerated),
            "conservative" => Some(PacingStrategy::Conservative),
            "adaptive" => Some(PacingStrategy::Adaptive),
            _ => None,
        }
    }
}

/// Health state of a campaign's spend trajectory. Recomputed from scratch
/// every check; there is no transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PacingStatus {
    OnTrack,
    Underspending,
    AtRisk,
    Overspending,
    Exhausted,
}

impl PacingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PacingStatus::OnTrack => "on_track",
            PacingStatus::Underspending => "underspending",
            PacingStatus::AtRisk => "at_risk",
            PacingStatus::Overspending => "overspending",
            PacingStatus::Exhausted => "exhausted",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "on_track" => Some(PacingStatus::OnTrack),
            "underspending" => Some(PacingStatus::Underspending),
            "at_risk" => Some(PacingStatus::AtRisk),
            "overspending" => Some(PacingStatus::Overspending),
            "exhausted" => Some(PacingStatus::Exhausted),
            _ => None,
        }
    }
}

/// Alert category, one per non-healthy pacing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    BudgetExhausted,
    Overspending,
    Underspending,
    AtRisk,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::BudgetExhausted => "budget_exhausted",
            AlertType::Overspending => "overspending",
            AlertType::Underspending => "underspending",
            AlertType::AtRisk => "at_risk",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "budget_exhausted" => Some(AlertType::BudgetExhausted),
            "overspending" => Some(AlertType::Overspending),
            "underspending" => Some(AlertType::Underspending),
            "at_risk" => Some(AlertType::AtRisk),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Low => "low",
            AlertSeverity::Medium => "medium",
            AlertSeverity::High => "high",
            AlertSeverity::Critical => "critical",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(AlertSeverity::Low),
            "medium" => Some(AlertSeverity::Medium),
            "high" => Some(AlertSeverity::High),
            "critical" => Some(AlertSeverity::Critical),
            _ => None,
        }
    }
}

/// Outcome of one budget evaluation for one campaign.
#[derive(Debug, Clone, Serialize)]
pub struct PacingResult {
    pub campaign_id: String,
    pub current_spend: f64,
    /// Naive even split of the total budget across the full period.
    pub daily_budget: f64,
    /// Strategy-adjusted daily spend recommendation for the remaining days.
    pub recommended_daily_budget: f64,
    pub pacing_status: PacingStatus,
    pub days_remaining: i64,
    /// End-of-period spend if the recommended rate holds for all remaining days.
    pub projected_spend: f64,
    /// recommended_daily_budget / daily_budget (1.0 when daily_budget is 0).
    pub adjustment_factor: f64,
    /// [0, 1] trust estimate for the projection.
    pub confidence_score: f64,
}

/// Human-readable action list derived from a fresh evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendations {
    pub campaign_id: String,
    pub pacing_status: PacingStatus,
    pub actions: Vec<String>,
    pub result: PacingResult,
}
