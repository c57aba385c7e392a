//! Derived metrics for target-tracking records.
//!
//! This is the single source of truth for the computed fields returned to
//! clients. Services call [`calculate`] after every read and every
//! mutation; the values are never persisted.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Serialize;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackableMetrics {
    /// Share of the target covered by linked expenses, capped at 100 and
    /// rounded to two decimal places (half away from zero).
    pub percentage: Decimal,
    /// Amount still missing towards the target, floored at zero.
    pub remaining_amount: Decimal,
    /// Calendar-day ceiling until the deadline; negative once the deadline
    /// has passed, `None` when no deadline is set.
    pub days_remaining: Option<i64>,
    pub is_overdue: bool,
}

/// Computes the derived fields for a target amount, the live sum of linked
/// expenses and an optional deadline. Pure; `now` is passed in so callers
/// and tests share one clock.
pub fn calculate(
    target_amount: Decimal,
    current_amount: Decimal,
    deadline: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> TrackableMetrics {
    let percentage = if target_amount > Decimal::ZERO {
        ((current_amount / target_amount) * dec!(100))
            .min(dec!(100))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    } else {
        Decimal::ZERO
    };

    let remaining_amount = (target_amount - current_amount).max(Decimal::ZERO);

    // Millisecond difference, not calendar-date subtraction: a deadline
    // later today still counts as one day remaining.
    let days_remaining = deadline.map(|deadline| {
        let diff_ms = deadline.signed_duration_since(now).num_milliseconds() as f64;
        (diff_ms / MILLIS_PER_DAY).ceil() as i64
    });

    let is_overdue = matches!(days_remaining, Some(days) if days < 0);

    TrackableMetrics {
        percentage,
        remaining_amount,
        days_remaining,
        is_overdue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn percentage_is_capped_at_100() {
        let m = calculate(dec!(100), dec!(250), None, now());
        assert_eq!(m.percentage, dec!(100));
        assert_eq!(m.remaining_amount, Decimal::ZERO);
    }

    #[test]
    fn percentage_reaches_100_exactly_at_target() {
        let m = calculate(dec!(80), dec!(80), None, now());
        assert_eq!(m.percentage, dec!(100));
    }

    #[test]
    fn zero_target_yields_zero_percent() {
        let m = calculate(Decimal::ZERO, dec!(50), None, now());
        assert_eq!(m.percentage, Decimal::ZERO);
        assert_eq!(m.remaining_amount, Decimal::ZERO);
    }

    #[test]
    fn percentage_rounds_half_away_from_zero() {
        // 1.005 / 3 * 100 style cases hit the x.xx5 boundary
        let m = calculate(dec!(800), dec!(100.20), None, now());
        // 100.20 / 800 * 100 = 12.525 -> 12.53
        assert_eq!(m.percentage, dec!(12.53));
    }

    #[test]
    fn remaining_amount_never_negative() {
        let m = calculate(dec!(10), dec!(99.99), None, now());
        assert_eq!(m.remaining_amount, Decimal::ZERO);
    }

    #[test]
    fn no_deadline_means_no_day_count() {
        let m = calculate(dec!(10), dec!(1), None, now());
        assert_eq!(m.days_remaining, None);
        assert!(!m.is_overdue);
    }

    #[test]
    fn partial_days_round_up() {
        let deadline = now() + Duration::hours(1);
        let m = calculate(dec!(10), dec!(1), Some(deadline), now());
        assert_eq!(m.days_remaining, Some(1));
        assert!(!m.is_overdue);
    }

    #[test]
    fn deadline_in_the_past_is_overdue() {
        let deadline = now() - Duration::days(2) - Duration::hours(1);
        let m = calculate(dec!(10), dec!(1), Some(deadline), now());
        assert_eq!(m.days_remaining, Some(-2));
        assert!(m.is_overdue);
    }

    #[test]
    fn deadline_moments_ago_counts_as_zero_days_not_overdue() {
        let deadline = now() - Duration::minutes(5);
        let m = calculate(dec!(10), dec!(1), Some(deadline), now());
        assert_eq!(m.days_remaining, Some(0));
        assert!(!m.is_overdue);
    }

    #[test]
    fn exact_multiple_of_a_day() {
        let deadline = now() + Duration::days(3);
        let m = calculate(dec!(10), dec!(1), Some(deadline), now());
        assert_eq!(m.days_remaining, Some(3));
    }
}
