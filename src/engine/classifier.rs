use super::calculator::PacingCalc;
use super::types::PacingStatus;
use crate::config::PacingConfig;

/// Classify one evaluation into a health state. First match wins:
///
/// 1. spend ratio at/over the critical threshold → EXHAUSTED
/// 2. projection strictly over the budget → OVERSPENDING
/// 3. projection over the warning fraction of the budget while spend runs
///    ahead of plan → AT_RISK
/// 4. spend ratio under the underspend fraction of the expected ratio →
///    UNDERSPENDING
/// 5. otherwise → ON_TRACK
///
/// The ahead-of-plan condition on branch 3 keeps a perfectly-paced linear
/// campaign (whose projection always lands exactly on the budget) out of the
/// warning band.
pub fn classify(calc: &PacingCalc, total_budget: f64, config: &PacingConfig) -> PacingStatus {
    if calc.actual_spend_ratio >= config.overspend_critical {
        return PacingStatus::Exhausted;
    }
    if calc.projected_spend > total_budget {
        return PacingStatus::Overspending;
    }
    if calc.projected_spend > total_budget * config.overspend_warning
        && calc.actual_spend_ratio > calc.expected_spend_ratio
    {
        return PacingStatus::AtRisk;
    }
    if calc.actual_spend_ratio < calc.expected_spend_ratio * config.underspend_warning {
        return PacingStatus::Underspending;
    }
    PacingStatus::OnTrack
}
