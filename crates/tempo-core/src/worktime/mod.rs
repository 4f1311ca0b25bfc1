//! Work-time conversion: how long one has to work to pay for something.

mod converter;

pub use converter::{convert, daily_rate, hourly_rate, WEEKS_PER_MONTH};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Duration of paid work needed to earn an amount.
///
/// `hours` is the floor of the unrounded total and `minutes` the rounded
/// remainder, while `total_minutes` is rounded from the whole value. The two
/// roundings are independent, so `minutes` can reach 60 just below an hour
/// boundary; `hours * 60 + minutes == total_minutes` holds either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkTime {
    /// Whole hours.
    pub hours: u64,
    /// Remaining minutes.
    pub minutes: u32,
    /// Rounded total in minutes.
    pub total_minutes: u64,
}

impl WorkTime {
    /// The zero duration, also returned when a profile cannot be used.
    pub const ZERO: WorkTime = WorkTime {
        hours: 0,
        minutes: 0,
        total_minutes: 0,
    };

    /// Build a duration from whole minutes, e.g. a sum of stored purchases.
    pub fn from_minutes(total_minutes: u64) -> Self {
        Self {
            hours: total_minutes / 60,
            minutes: (total_minutes % 60) as u32,
            total_minutes,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.hours == 0 && self.minutes == 0
    }
}

impl fmt::Display for WorkTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.hours, self.minutes) {
            (0, 0) => write!(f, "0m"),
            (0, m) => write!(f, "{}m", m),
            (h, 0) => write!(f, "{}h", h),
            (h, m) => write!(f, "{}h {}m", h, m),
        }
    }
}

/// Format a duration as `"2h 15m"`, `"2h"`, `"15m"` or `"0m"`.
pub fn format_work_time(duration: &WorkTime) -> String {
    duration.to_string()
}

/// Outcome of converting a value against a user's rate profile.
///
/// `computable` separates "profile not configured" from a purchase that
/// legitimately costs no time; `duration` is zero in both cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkTimeConversion {
    pub duration: WorkTime,
    pub computable: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn wt(hours: u64, minutes: u32) -> WorkTime {
        WorkTime {
            hours,
            minutes,
            total_minutes: hours * 60 + minutes as u64,
        }
    }

    #[test]
    fn test_format_work_time() {
        assert_eq!(format_work_time(&WorkTime::ZERO), "0m");
        assert_eq!(format_work_time(&wt(2, 0)), "2h");
        assert_eq!(format_work_time(&wt(0, 15)), "15m");
        assert_eq!(format_work_time(&wt(2, 15)), "2h 15m");
    }

    #[test]
    fn test_format_ignores_total_minutes() {
        let odd = WorkTime {
            hours: 1,
            minutes: 60,
            total_minutes: 120,
        };
        assert_eq!(odd.to_string(), "1h 60m");
    }

    #[test]
    fn test_from_minutes() {
        assert_eq!(WorkTime::from_minutes(135), wt(2, 15));
        assert_eq!(WorkTime::from_minutes(0), WorkTime::ZERO);
        assert!(WorkTime::from_minutes(0).is_zero());
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(wt(4, 57)).unwrap();
        assert_eq!(json["totalMinutes"], 297);
        assert_eq!(json["hours"], 4);
        assert_eq!(json["minutes"], 57);
    }
}
