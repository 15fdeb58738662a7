use chrono::Weekday;

use super::types::PacingStrategy;

/// Inputs for one pacing evaluation. `weekday` is supplied by the caller so
/// the adaptive seasonality factor never reads the clock itself.
#[derive(Debug, Clone, Copy)]
pub struct PacingInputs {
    pub current_spend: f64,
    pub total_budget: f64,
    pub days_elapsed: i64,
    pub days_remaining: i64,
    pub strategy: PacingStrategy,
    pub weekday: Weekday,
}

/// Raw pacing math for one evaluation. Status and confidence are layered on
/// by the classifier and estimator; the ratios here feed the classifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PacingCalc {
    pub daily_budget: f64,
    pub recommended_daily_budget: f64,
    pub projected_spend: f64,
    pub adjustment_factor: f64,
    pub actual_spend_ratio: f64,
    pub expected_spend_ratio: f64,
    pub days_elapsed: i64,
    pub days_remaining: i64,
    pub total_days: i64,
}

/// Pure per-strategy pacing math. `days_elapsed` is clamped to at least 1 and
/// `days_remaining` to at least 0; a non-positive `total_budget` must be
/// rejected upstream and is guarded to a zero ratio here rather than NaN.
pub fn calculate(inputs: &PacingInputs) -> PacingCalc {
    let days_elapsed = inputs.days_elapsed.max(1);
    let days_remaining = inputs.days_remaining.max(0);
    let total_days = days_elapsed + days_remaining;

    let expected_spend_ratio = days_elapsed as f64 / total_days as f64;
    let actual_spend_ratio = if inputs.total_budget > 0.0 {
        inputs.current_spend / inputs.total_budget
    } else {
        0.0
    };

    let base_daily = inputs.total_budget / total_days as f64;
    let remaining_budget = inputs.total_budget - inputs.current_spend;
    let spread_days = days_remaining.max(1) as f64;

    let (daily_budget, recommended) = match inputs.strategy {
        PacingStrategy::Linear => (base_daily, remaining_budget / spread_days),
        PacingStrategy::Accelerated => (base_daily * 1.2, remaining_budget / spread_days * 0.8),
        PacingStrategy::Conservative => (base_daily * 0.8, remaining_budget / spread_days * 1.2),
        PacingStrategy::Adaptive => {
            let factor = adaptive_factor(
                inputs.current_spend,
                base_daily,
                days_elapsed,
                inputs.weekday,
            );
            (base_daily, base_daily * factor)
        }
    };

    let projected_spend = inputs.current_spend + recommended * days_remaining as f64;
    let adjustment_factor = if daily_budget > 0.0 {
        recommended / daily_budget
    } else {
        1.0
    };

    PacingCalc {
        daily_budget,
        recommended_daily_budget: recommended,
        projected_spend,
        adjustment_factor,
        actual_spend_ratio,
        expected_spend_ratio,
        days_elapsed,
        days_remaining,
        total_days,
    }
}

/// Adaptive adjustment: blend of catch-up velocity and weekday seasonality,
/// weighted 80/20, clamped to [0.5, 2.0]. Hand-tuned heuristic, not a model.
fn adaptive_factor(current_spend: f64, expected_daily: f64, days_elapsed: i64, weekday: Weekday) -> f64 {
    let observed_velocity = current_spend / days_elapsed as f64;
    let velocity_factor = if observed_velocity > 0.0 {
        expected_daily / observed_velocity
    } else {
        1.0
    };
    let seasonality = seasonality_factor(weekday);
    (0.8 * velocity_factor + 0.2 * seasonality).clamp(0.5, 2.0)
}

fn seasonality_factor(weekday: Weekday) -> f64 {
    match weekday {
        Weekday::Sat | Weekday::Sun => 0.8,
        Weekday::Tue | Weekday::Wed | Weekday::Thu => 1.1,
        Weekday::Mon | Weekday::Fri => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_inputs(current_spend: f64) -> PacingInputs {
        PacingInputs {
            current_spend,
            total_budget: 3000.0,
            days_elapsed: 10,
            days_remaining: 20,
            strategy: PacingStrategy::Linear,
            weekday: Weekday::Mon,
        }
    }

    #[test]
    fn test_linear_on_track() {
        // 3000 over 30 days, 1000 spent after 10 days.
        let calc = calculate(&linear_inputs(1000.0));
        assert_eq!(calc.daily_budget, 100.0);
        assert_eq!(calc.recommended_daily_budget, 100.0);
        assert_eq!(calc.projected_spend, 3000.0);
        assert_eq!(calc.adjustment_factor, 1.0);
        assert_eq!(calc.actual_spend_ratio, calc.expected_spend_ratio);
    }

    #[test]
    fn test_linear_near_exhaustion() {
        let calc = calculate(&linear_inputs(2950.0));
        assert_eq!(calc.recommended_daily_budget, 2.5);
        assert_eq!(calc.projected_spend, 3000.0);
        assert!(calc.actual_spend_ratio < 1.0);
    }

    #[test]
    fn test_accelerated_factors() {
        let mut inputs = linear_inputs(1000.0);
        inputs.strategy = PacingStrategy::Accelerated;
        let calc = calculate(&inputs);
        assert!((calc.daily_budget - 120.0).abs() < 1e-9);
        assert!((calc.recommended_daily_budget - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_conservative_factors() {
        let mut inputs = linear_inputs(1000.0);
        inputs.strategy = PacingStrategy::Conservative;
        let calc = calculate(&inputs);
        assert!((calc.daily_budget - 80.0).abs() < 1e-9);
        assert!((calc.recommended_daily_budget - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_projection_invariant_all_strategies() {
        for strategy in [
            PacingStrategy::Linear,
            PacingStrategy::Accelerated,
            PacingStrategy::Conservative,
            PacingStrategy::Adaptive,
        ] {
            let inputs = PacingInputs {
                current_spend: 734.5,
                total_budget: 5000.0,
                days_elapsed: 7,
                days_remaining: 23,
                strategy,
                weekday: Weekday::Wed,
            };
            let calc = calculate(&inputs);
            // Exact, not approximate: the projection is defined by this identity.
            assert_eq!(
                calc.projected_spend,
                inputs.current_spend + calc.recommended_daily_budget * calc.days_remaining as f64,
                "strategy {:?}",
                strategy
            );
        }
    }

    #[test]
    fn test_days_elapsed_clamped_to_one() {
        let mut inputs = linear_inputs(0.0);
        inputs.days_elapsed = 0;
        let calc = calculate(&inputs);
        assert_eq!(calc.days_elapsed, 1);
        assert_eq!(calc.total_days, 21);
        assert!(calc.daily_budget.is_finite());
        assert!(calc.expected_spend_ratio.is_finite());
    }

    #[test]
    fn test_zero_days_remaining_projects_current_spend() {
        let mut inputs = linear_inputs(2000.0);
        inputs.days_remaining = 0;
        let calc = calculate(&inputs);
        assert_eq!(calc.days_remaining, 0);
        assert_eq!(calc.projected_spend, 2000.0);
        // Recommendation still spreads over one day to avoid division by zero.
        assert_eq!(calc.recommended_daily_budget, 1000.0);
    }

    #[test]
    fn test_idempotent() {
        let inputs = linear_inputs(1234.56);
        assert_eq!(calculate(&inputs), calculate(&inputs));
    }

    #[test]
    fn test_adaptive_underspend_catches_up() {
        // Spent half the expected rate: velocity factor 2.0, blended and clamped.
        let inputs = PacingInputs {
            current_spend: 500.0,
            total_budget: 3000.0,
            days_elapsed: 10,
            days_remaining: 20,
            strategy: PacingStrategy::Adaptive,
            weekday: Weekday::Mon,
        };
        let calc = calculate(&inputs);
        // velocity = 100/50 = 2.0, seasonality 1.0 → 0.8*2.0 + 0.2*1.0 = 1.8
        assert!((calc.adjustment_factor - 1.8).abs() < 1e-9);
        assert!((calc.recommended_daily_budget - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_adaptive_clamps_extreme_velocity() {
        // Nearly nothing spent: raw velocity factor explodes, clamp holds at 2.0.
        let inputs = PacingInputs {
            current_spend: 1.0,
            total_budget: 3000.0,
            days_elapsed: 10,
            days_remaining: 20,
            strategy: PacingStrategy::Adaptive,
            weekday: Weekday::Mon,
        };
        let calc = calculate(&inputs);
        assert_eq!(calc.adjustment_factor, 2.0);
    }

    #[test]
    fn test_adaptive_zero_spend_defaults_velocity() {
        let inputs = PacingInputs {
            current_spend: 0.0,
            total_budget: 3000.0,
            days_elapsed: 10,
            days_remaining: 20,
            strategy: PacingStrategy::Adaptive,
            weekday: Weekday::Mon,
        };
        let calc = calculate(&inputs);
        // velocity falls back to 1.0, Monday seasonality 1.0 → no adjustment
        assert!((calc.adjustment_factor - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_adaptive_seasonality_weekend_vs_midweek() {
        let base = PacingInputs {
            current_spend: 1000.0,
            total_budget: 3000.0,
            days_elapsed: 10,
            days_remaining: 20,
            strategy: PacingStrategy::Adaptive,
            weekday: Weekday::Sat,
        };
        let weekend = calculate(&base);
        let midweek = calculate(&PacingInputs { weekday: Weekday::Wed, ..base });
        // velocity is 1.0 on plan; only the seasonality term differs.
        assert!((weekend.adjustment_factor - (0.8 + 0.2 * 0.8)).abs() < 1e-9);
        assert!((midweek.adjustment_factor - (0.8 + 0.2 * 1.1)).abs() < 1e-9);
        assert!(midweek.recommended_daily_budget > weekend.recommended_daily_budget);
    }

    #[test]
    fn test_actual_ratio_monotone_in_spend() {
        let mut previous = -1.0;
        for spend in [0.0, 500.0, 1500.0, 2999.0, 3000.0, 3100.0] {
            let calc = calculate(&linear_inputs(spend));
            assert!(calc.actual_spend_ratio >= previous);
            previous = calc.actual_spend_ratio;
        }
    }
}
