//! Salary-based rates and value-to-work-time conversion.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{debug, warn};

use super::WorkTime;

/// Average number of weeks in a month (52 / 12, rounded).
pub const WEEKS_PER_MONTH: Decimal = Decimal::from_parts(433, 0, 0, false, 2);

const MINUTES_PER_HOUR: Decimal = Decimal::from_parts(60, 0, 0, false, 0);
const DAYS_PER_WEEK: Decimal = Decimal::from_parts(7, 0, 0, false, 0);

/// Returns the positive salary/hours pair, or `None` when the profile cannot be used.
fn usable(monthly_salary: Option<Decimal>, weekly_hours: Option<Decimal>) -> Option<(Decimal, Decimal)> {
    match (monthly_salary, weekly_hours) {
        (Some(salary), Some(hours)) if salary > Decimal::ZERO && hours > Decimal::ZERO => {
            Some((salary, hours))
        }
        _ => None,
    }
}

/// Hourly pay: `monthly_salary / (weekly_hours * 4.33)`.
///
/// Zero when either input is missing, zero or negative.
pub fn hourly_rate(monthly_salary: Option<Decimal>, weekly_hours: Option<Decimal>) -> Decimal {
    usable(monthly_salary, weekly_hours)
        .and_then(|(salary, hours)| {
            let monthly_hours = hours.checked_mul(WEEKS_PER_MONTH)?;
            salary.checked_div(monthly_hours)
        })
        .unwrap_or(Decimal::ZERO)
}

/// Daily pay: hourly rate times the average hours worked per calendar day.
pub fn daily_rate(monthly_salary: Option<Decimal>, weekly_hours: Option<Decimal>) -> Decimal {
    usable(monthly_salary, weekly_hours)
        .and_then(|(_, hours)| {
            let daily_hours = hours.checked_div(DAYS_PER_WEEK)?;
            hourly_rate(monthly_salary, weekly_hours).checked_mul(daily_hours)
        })
        .unwrap_or(Decimal::ZERO)
}

/// Convert a monetary value into the work time needed to earn it.
///
/// A degenerate profile (missing, zero or negative salary or hours) yields
/// [`WorkTime::ZERO`]. Negative values are clamped to zero.
pub fn convert(value: Decimal, monthly_salary: Option<Decimal>, weekly_hours: Option<Decimal>) -> WorkTime {
    let rate = hourly_rate(monthly_salary, weekly_hours);
    if rate.is_zero() {
        debug!("Profile not configured, returning zero work time");
        return WorkTime::ZERO;
    }

    if value.is_sign_negative() {
        debug!("Negative value {} clamped to zero", value);
        return WorkTime::ZERO;
    }

    match split_hours(value, rate) {
        Some(duration) => duration,
        None => {
            warn!("Work time for {} at rate {} is out of range", value, rate);
            WorkTime::ZERO
        }
    }
}

fn split_hours(value: Decimal, rate: Decimal) -> Option<WorkTime> {
    let total_hours = value.checked_div(rate)?;
    let hours = total_hours.floor();
    let minutes = round_half_up((total_hours - hours) * MINUTES_PER_HOUR);
    let total_minutes = round_half_up(total_hours.checked_mul(MINUTES_PER_HOUR)?);

    Some(WorkTime {
        hours: hours.to_u64()?,
        minutes: minutes.to_u32()?,
        total_minutes: total_minutes.to_u64()?,
    })
}

fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_hourly_rate() {
        let rate = hourly_rate(Some(d("3500")), Some(d("40")));
        assert_eq!(rate.round_dp(2), d("20.21"));

        // 100 h/week * 4.33 = 433 h/month
        assert_eq!(hourly_rate(Some(d("4330")), Some(d("100"))), d("10"));
    }

    #[test]
    fn test_rates_degenerate_profile() {
        for (salary, hours) in [
            (None, Some(d("40"))),
            (Some(d("3500")), None),
            (Some(d("0")), Some(d("40"))),
            (Some(d("3500")), Some(d("0"))),
            (Some(d("-1")), Some(d("40"))),
            (Some(d("3500")), Some(d("-40"))),
            (None, None),
        ] {
            assert_eq!(hourly_rate(salary, hours), Decimal::ZERO);
            assert_eq!(daily_rate(salary, hours), Decimal::ZERO);
        }
    }

    #[test]
    fn test_daily_rate() {
        let rate = daily_rate(Some(d("4330")), Some(d("100")));
        assert_eq!(rate.round_dp(2), d("142.86"));
    }

    #[test]
    fn test_convert_basic() {
        let duration = convert(d("100"), Some(d("3500")), Some(d("40")));
        assert_eq!(
            duration,
            WorkTime {
                hours: 4,
                minutes: 57,
                total_minutes: 297,
            }
        );
        assert_eq!(duration.to_string(), "4h 57m");
    }

    #[test]
    fn test_convert_degenerate_profile_is_zero_for_any_value() {
        for value in ["0", "1", "100", "99999.99"] {
            assert_eq!(convert(d(value), None, Some(d("40"))), WorkTime::ZERO);
            assert_eq!(convert(d(value), Some(d("3500")), None), WorkTime::ZERO);
            assert_eq!(convert(d(value), Some(d("0")), Some(d("40"))), WorkTime::ZERO);
            assert_eq!(convert(d(value), Some(d("3500")), Some(d("-2"))), WorkTime::ZERO);
        }
    }

    #[test]
    fn test_convert_zero_value() {
        assert_eq!(convert(Decimal::ZERO, Some(d("3500")), Some(d("40"))), WorkTime::ZERO);
    }

    #[test]
    fn test_convert_negative_value_clamped() {
        assert_eq!(convert(d("-50"), Some(d("3500")), Some(d("40"))), WorkTime::ZERO);
    }

    #[test]
    fn test_convert_whole_hours() {
        // rate 10/h
        let duration = convert(d("25"), Some(d("4330")), Some(d("100")));
        assert_eq!(duration, WorkTime { hours: 2, minutes: 30, total_minutes: 150 });

        let duration = convert(d("30"), Some(d("4330")), Some(d("100")));
        assert_eq!(duration.to_string(), "3h");
    }

    #[test]
    fn test_convert_minutes_round_independently() {
        // 1.995 h: floor 1, remainder 59.7 min rounds to 60, total 119.7 rounds to 120
        let duration = convert(d("19.95"), Some(d("4330")), Some(d("100")));
        assert_eq!(
            duration,
            WorkTime {
                hours: 1,
                minutes: 60,
                total_minutes: 120,
            }
        );
        assert_eq!(
            duration.hours * 60 + duration.minutes as u64,
            duration.total_minutes
        );
    }

    #[test]
    fn test_convert_rounds_half_up() {
        // 0.075 h = 4.5 min
        let duration = convert(d("0.75"), Some(d("4330")), Some(d("100")));
        assert_eq!(duration, WorkTime { hours: 0, minutes: 5, total_minutes: 5 });
    }

    #[test]
    fn test_convert_is_idempotent() {
        let first = convert(d("123.45"), Some(d("2800")), Some(d("44")));
        let second = convert(d("123.45"), Some(d("2800")), Some(d("44")));
        assert_eq!(first, second);
    }
}
