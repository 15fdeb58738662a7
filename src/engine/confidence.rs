use super::history::PacingHistoryEntry;

/// Consistency fallback when there is not enough history to measure anything.
const NEUTRAL_CONSISTENCY: f64 = 0.5;

/// Estimate how trustworthy a projection is, in [0, 1].
///
/// Blends data maturity (full weight once a week of data exists) with spend
/// consistency: how closely the realized daily run rate, taken from
/// consecutive history deltas, tracks the strategy-neutral expected daily
/// spend.
pub fn estimate(days_elapsed: i64, expected_daily: f64, history: &[PacingHistoryEntry]) -> f64 {
    let data_confidence = (days_elapsed.max(0) as f64 / 7.0).min(1.0);
    let consistency = consistency_score(expected_daily, history);
    (0.7 * data_confidence + 0.3 * consistency).clamp(0.0, 1.0)
}

fn consistency_score(expected_daily: f64, history: &[PacingHistoryEntry]) -> f64 {
    if history.len() < 2 || expected_daily <= 0.0 {
        return NEUTRAL_CONSISTENCY;
    }

    let mut rates = Vec::new();
    for pair in history.windows(2) {
        let delta_days = (pair[1].at - pair[0].at).num_seconds() as f64 / 86_400.0;
        if delta_days <= 0.0 {
            continue;
        }
        let delta_spend = (pair[1].spend - pair[0].spend).max(0.0);
        rates.push(delta_spend / delta_days);
    }
    if rates.is_empty() {
        return NEUTRAL_CONSISTENCY;
    }

    let avg_daily = rates.iter().sum::<f64>() / rates.len() as f64;
    (1.0 - (avg_daily - expected_daily).abs() / expected_daily).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::PacingStatus;
    use chrono::{DateTime, TimeZone, Utc};

    fn entry(at: DateTime<Utc>, spend: f64) -> PacingHistoryEntry {
        PacingHistoryEntry {
            at,
            spend,
            status: PacingStatus::OnTrack,
            projected_spend: 0.0,
            confidence_score: 0.0,
        }
    }

    fn day(d: u32, spend: f64) -> PacingHistoryEntry {
        entry(Utc.with_ymd_and_hms(2026, 3, d, 0, 0, 0).unwrap(), spend)
    }

    #[test]
    fn test_no_history_defaults_to_neutral_consistency() {
        // 10 days elapsed → full data confidence; consistency defaults to 0.5.
        let score = estimate(10, 100.0, &[]);
        assert!((score - (0.7 + 0.3 * 0.5)).abs() < 1e-9);
    }

    #[test]
    fn test_single_entry_is_not_enough() {
        let score = estimate(10, 100.0, &[day(1, 100.0)]);
        assert!((score - 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_data_confidence_ramps_over_a_week() {
        let one_day = estimate(1, 100.0, &[]);
        let full = estimate(7, 100.0, &[]);
        assert!(one_day < full);
        assert!((full - estimate(30, 100.0, &[])).abs() < 1e-12);
    }

    #[test]
    fn test_perfectly_consistent_spend_scores_one() {
        // 100/day realized, 100/day expected.
        let history = vec![day(1, 100.0), day(2, 200.0), day(3, 300.0)];
        let score = estimate(14, 100.0, &history);
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_erratic_spend_lowers_score() {
        // Realized run rate 300/day vs expected 100/day: consistency floors at 0.
        let history = vec![day(1, 100.0), day(2, 400.0), day(3, 700.0)];
        let score = estimate(14, 100.0, &history);
        assert!((score - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_bounds_hold_for_all_inputs() {
        let histories = [
            vec![],
            vec![day(1, 0.0)],
            vec![day(1, 0.0), day(2, 1_000_000.0)],
            vec![day(1, 500.0), day(1, 500.0)], // zero day gap, skipped
        ];
        for days in [1, 3, 7, 90] {
            for history in &histories {
                let score = estimate(days, 100.0, history);
                assert!((0.0..=1.0).contains(&score), "score {score} out of range");
            }
        }
    }

    #[test]
    fn test_zero_expected_daily_is_neutral() {
        let history = vec![day(1, 100.0), day(2, 200.0)];
        let score = estimate(7, 0.0, &history);
        assert!((score - 0.85).abs() < 1e-9);
    }
}
