//! Month-end projection and the GREEN / YELLOW / RED rules

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::types::{RiskLevel, Trend, TrendSummary};

/// Projected usage above this is RED
pub const RED_PROJECTED_RATIO: Decimal = dec!(0.90);
/// Projected usage from this up to the RED threshold is YELLOW
pub const YELLOW_PROJECTED_RATIO: Decimal = dec!(0.70);
/// Spent usage above this before the early-month cutoff is RED
pub const EARLY_SPENT_RATIO: Decimal = dec!(0.70);
/// Spent usage above this with an increasing trend is YELLOW
pub const TREND_SPENT_RATIO: Decimal = dec!(0.50);

/// Day fractions are measured against a normalized month of this length
pub const NORMALIZED_MONTH_DAYS: u32 = 30;
/// Early-month rule applies while fewer than this many normalized days elapsed
pub const EARLY_MONTH_DAYS: u32 = 20;

/// Extrapolated remainder is scaled by these for a rising or falling trend
pub const TREND_UP_MULTIPLIER: Decimal = dec!(1.10);
pub const TREND_DOWN_MULTIPLIER: Decimal = dec!(0.90);

/// `amount / budget`, or `None` when there is no usable budget
pub fn ratio(amount: Decimal, budget: Option<Decimal>) -> Option<Decimal> {
    match budget {
        Some(b) if b > Decimal::ZERO => amount.checked_div(b),
        _ => None,
    }
}

/// True while the elapsed share of a normalized month is below 20/30
pub fn is_early_month(day: u32) -> bool {
    let month = Decimal::from(NORMALIZED_MONTH_DAYS);
    Decimal::from(day) / month < Decimal::from(EARLY_MONTH_DAYS) / month
}

/// Project month-end spend from what has been spent so far
///
/// The remaining share of the month is filled with the historical moving
/// average, or with the current daily pace when there is no history. The
/// result is never below `spent` and saturates at `Decimal::MAX`.
pub fn project_month_end(
    spent: Decimal,
    summary: &TrendSummary,
    day: u32,
    days_in_month: u32,
) -> Decimal {
    let days_in_month = days_in_month.max(1);
    let day = day.clamp(1, days_in_month);
    let total_days = Decimal::from(days_in_month);

    let remaining_share = Decimal::from(days_in_month - day) / total_days;
    let baseline = if summary.has_history() {
        summary.moving_average
    } else {
        (spent / Decimal::from(day)).saturating_mul(total_days)
    };

    let multiplier = match summary.trend {
        Trend::Increasing => TREND_UP_MULTIPLIER,
        Trend::Decreasing => TREND_DOWN_MULTIPLIER,
        Trend::Stable => Decimal::ONE,
    };
    let remainder = baseline
        .saturating_mul(remaining_share)
        .saturating_mul(multiplier);

    spent.saturating_add(remainder).round_dp(2)
}

/// Map projected/spent amounts against the ceiling to a risk level
///
/// Without a usable budget the level is GREEN only when nothing was spent
/// or projected, and RED otherwise.
pub fn classify(
    projected: Decimal,
    spent: Decimal,
    budget: Option<Decimal>,
    day: u32,
    trend: Trend,
) -> RiskLevel {
    let (p, s) = match (ratio(projected, budget), ratio(spent, budget)) {
        (Some(p), Some(s)) => (p, s),
        _ => {
            return if projected.is_zero() && spent.is_zero() {
                RiskLevel::Green
            } else {
                RiskLevel::Red
            };
        }
    };

    if p > RED_PROJECTED_RATIO || (is_early_month(day) && s > EARLY_SPENT_RATIO) {
        RiskLevel::Red
    } else if (p >= YELLOW_PROJECTED_RATIO && p <= RED_PROJECTED_RATIO)
        || (trend == Trend::Increasing && s > TREND_SPENT_RATIO)
    {
        RiskLevel::Yellow
    } else {
        RiskLevel::Green
    }
}

/// Supportive insight text for a classification
pub fn message(level: RiskLevel, trend: Trend, projected: Decimal, has_budget: bool) -> String {
    let base = match (level, has_budget) {
        (RiskLevel::Green, false) => {
            "No spending recorded yet this month. Set a budget to start tracking!".to_string()
        }
        (RiskLevel::Green, true) => format!(
            "Great work! Your projected spend is {:.2}. You're in control!",
            projected
        ),
        (RiskLevel::Yellow, _) => format!(
            "Heads up: projected spend of {:.2}. Consider reviewing non-essential expenses.",
            projected
        ),
        (RiskLevel::Red, true) => format!(
            "Alert! Projected spend of {:.2} may exceed your budget. Prioritize the essentials.",
            projected
        ),
        (RiskLevel::Red, false) => format!(
            "No budget defined for this month and projected spend is {:.2}. Set a budget to keep it in check.",
            projected
        ),
    };

    if trend == Trend::Increasing && level != RiskLevel::Green {
        format!("{} Your spending has increased over recent months.", base)
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(average: Decimal, trend: Trend) -> TrendSummary {
        TrendSummary {
            moving_average: average,
            std_deviation: Decimal::ZERO,
            trend,
            active_months: 6,
        }
    }

    #[test]
    fn test_ratio_sentinel() {
        assert_eq!(ratio(dec!(50), Some(dec!(100))), Some(dec!(0.5)));
        assert_eq!(ratio(dec!(50), Some(Decimal::ZERO)), None);
        assert_eq!(ratio(dec!(50), Some(dec!(-10))), None);
        assert_eq!(ratio(dec!(50), None), None);
    }

    #[test]
    fn test_early_month_boundary() {
        assert!(is_early_month(1));
        assert!(is_early_month(19));
        assert!(!is_early_month(20));
        assert!(!is_early_month(21));
        assert!(!is_early_month(31));
    }

    #[test]
    fn test_projection_without_anything_is_zero() {
        assert_eq!(
            project_month_end(Decimal::ZERO, &TrendSummary::empty(), 10, 30),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_projection_uses_pace_without_history() {
        // 300 in 10 days of a 30-day month -> 900
        assert_eq!(
            project_month_end(dec!(300), &TrendSummary::empty(), 10, 30),
            dec!(900.00)
        );
    }

    #[test]
    fn test_projection_uses_moving_average() {
        // 200 spent + 600 * 20/30
        let projected = project_month_end(dec!(200), &history(dec!(600), Trend::Stable), 10, 30);
        assert_eq!(projected, dec!(600.00));
    }

    #[test]
    fn test_projection_trend_multipliers() {
        let up = project_month_end(dec!(0), &history(dec!(300), Trend::Increasing), 0, 30);
        let down = project_month_end(dec!(0), &history(dec!(300), Trend::Decreasing), 15, 30);
        // day 0 clamps to 1: 300 * 29/30 * 1.1
        assert_eq!(up, dec!(319.00));
        assert_eq!(down, dec!(135.00));
    }

    #[test]
    fn test_projection_last_day_is_spent() {
        let projected = project_month_end(dec!(123.45), &history(dec!(999), Trend::Increasing), 31, 31);
        assert_eq!(projected, dec!(123.45));
    }

    #[test]
    fn test_projection_never_below_spent() {
        for day in 1..=28 {
            let p = project_month_end(dec!(500), &history(dec!(10), Trend::Decreasing), day, 28);
            assert!(p >= dec!(500));
        }
    }

    #[test]
    fn test_projection_saturates_at_max() {
        let projected = project_month_end(Decimal::MAX, &TrendSummary::empty(), 2, 31);
        assert_eq!(projected, Decimal::MAX);

        let projected = project_month_end(
            dec!(10),
            &history(Decimal::MAX, Trend::Increasing),
            1,
            31,
        );
        assert_eq!(projected, Decimal::MAX);
    }

    #[test]
    fn test_red_when_projection_above_ninety_percent() {
        let budget = Some(dec!(1000));
        assert_eq!(
            classify(dec!(900.01), dec!(100), budget, 25, Trend::Stable),
            RiskLevel::Red
        );
        assert_eq!(
            classify(dec!(2000), dec!(0), budget, 25, Trend::Decreasing),
            RiskLevel::Red
        );
    }

    #[test]
    fn test_yellow_band_is_inclusive() {
        let budget = Some(dec!(1000));
        assert_eq!(
            classify(dec!(700), dec!(100), budget, 25, Trend::Stable),
            RiskLevel::Yellow
        );
        assert_eq!(
            classify(dec!(900), dec!(100), budget, 25, Trend::Stable),
            RiskLevel::Yellow
        );
        assert_eq!(
            classify(dec!(699.99), dec!(100), budget, 25, Trend::Stable),
            RiskLevel::Green
        );
    }

    #[test]
    fn test_early_month_overspend() {
        let budget = Some(dec!(1000));
        // 75% spent on day 19 is RED even if the projection is capped lower
        assert_eq!(
            classify(dec!(800), dec!(750), budget, 19, Trend::Stable),
            RiskLevel::Red
        );
        // same spend on day 21 is not forced RED by the early rule
        assert_eq!(
            classify(dec!(800), dec!(750), budget, 21, Trend::Stable),
            RiskLevel::Yellow
        );
    }

    #[test]
    fn test_increasing_trend_with_half_spent_is_yellow() {
        let budget = Some(dec!(1000));
        assert_eq!(
            classify(dec!(600), dec!(510), budget, 25, Trend::Increasing),
            RiskLevel::Yellow
        );
        assert_eq!(
            classify(dec!(600), dec!(510), budget, 25, Trend::Stable),
            RiskLevel::Green
        );
        assert_eq!(
            classify(dec!(600), dec!(500), budget, 25, Trend::Increasing),
            RiskLevel::Green
        );
    }

    #[test]
    fn test_zero_budget_sentinel() {
        assert_eq!(
            classify(Decimal::ZERO, Decimal::ZERO, Some(Decimal::ZERO), 10, Trend::Stable),
            RiskLevel::Green
        );
        assert_eq!(
            classify(dec!(10), Decimal::ZERO, Some(Decimal::ZERO), 10, Trend::Stable),
            RiskLevel::Red
        );
        assert_eq!(
            classify(dec!(10), dec!(10), None, 10, Trend::Stable),
            RiskLevel::Red
        );
    }

    #[test]
    fn test_level_is_monotonic_in_projection() {
        let budget = Some(dec!(1000));
        for trend in [Trend::Increasing, Trend::Stable, Trend::Decreasing] {
            for day in [1, 19, 20, 30] {
                let mut previous = RiskLevel::Green;
                for step in 0..=150 {
                    let projected = Decimal::from(step * 10);
                    let level = classify(projected, dec!(300), budget, day, trend);
                    assert!(level >= previous, "level dropped at {}", projected);
                    previous = level;
                }
            }
        }
    }

    #[test]
    fn test_messages() {
        let green = message(RiskLevel::Green, Trend::Increasing, dec!(412.5), true);
        assert!(green.contains("412.50"));
        assert!(!green.contains("increased"));

        let yellow = message(RiskLevel::Yellow, Trend::Increasing, dec!(800), true);
        assert!(yellow.ends_with("Your spending has increased over recent months."));

        let red = message(RiskLevel::Red, Trend::Stable, dec!(50), false);
        assert!(red.contains("No budget defined"));
        assert!(!red.contains("increased"));
    }
}
