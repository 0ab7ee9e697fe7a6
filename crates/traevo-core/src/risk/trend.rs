//! Moving average, dispersion and trend direction over monthly totals

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

use super::types::{MonthlyTotal, Trend, TrendSummary};

/// Recent half must exceed the prior half by this factor to count as increasing
pub const INCREASE_FACTOR: Decimal = dec!(1.10);
/// Recent half must fall below the prior half by this factor to count as decreasing
pub const DECREASE_FACTOR: Decimal = dec!(0.90);
/// Fewer active months than this always yields a stable trend
pub const MIN_TREND_MONTHS: usize = 3;

fn mean(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    let count = Decimal::from(values.len());
    match values.iter().try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v)) {
        Some(total) => total / count,
        // Sum overflows, so divide first and accept the rounding
        None => values
            .iter()
            .fold(Decimal::ZERO, |acc, v| acc.saturating_add(*v / count)),
    }
}

/// Summarize a month-ordered history (oldest first)
///
/// Leading empty months are skipped so that a user who started recently is
/// not averaged against months before they recorded anything.
pub fn summarize(history: &[MonthlyTotal]) -> TrendSummary {
    let start = match history.iter().position(|m| m.total > Decimal::ZERO) {
        Some(idx) => idx,
        None => return TrendSummary::empty(),
    };
    let values: Vec<Decimal> = history[start..].iter().map(|m| m.total).collect();

    let average = mean(&values);
    let variance = mean(
        &values
            .iter()
            .map(|v| (*v - average).saturating_mul(*v - average))
            .collect::<Vec<_>>(),
    );
    let std_deviation = variance.sqrt().unwrap_or(Decimal::ZERO);

    TrendSummary {
        moving_average: average,
        std_deviation,
        trend: direction(&values),
        active_months: values.len(),
    }
}

/// Compare the recent half of the values with the prior half
///
/// With an odd count the middle month belongs to neither half.
pub fn direction(values: &[Decimal]) -> Trend {
    if values.len() < MIN_TREND_MONTHS {
        return Trend::Stable;
    }
    let half = values.len() / 2;
    let prior = mean(&values[..half]);
    let recent = mean(&values[values.len() - half..]);

    if recent > prior.saturating_mul(INCREASE_FACTOR) {
        Trend::Increasing
    } else if recent < prior.saturating_mul(DECREASE_FACTOR) {
        Trend::Decreasing
    } else {
        Trend::Stable
    }
}
