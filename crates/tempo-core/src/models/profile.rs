//! User profile and the salary/hours pair used for conversions.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::worktime::{self, WorkTimeConversion};

/// Salary and weekly hours used to express prices as work time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateProfile {
    /// Monthly salary in BRL. Absent or zero means not configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_salary: Option<Decimal>,

    /// Hours worked per week.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly_hours: Option<Decimal>,
}

impl RateProfile {
    pub fn new(monthly_salary: Decimal, weekly_hours: Decimal) -> Self {
        Self {
            monthly_salary: Some(monthly_salary),
            weekly_hours: Some(weekly_hours),
        }
    }

    /// Both values present and positive.
    pub fn is_configured(&self) -> bool {
        matches!(
            (self.monthly_salary, self.weekly_hours),
            (Some(s), Some(h)) if s > Decimal::ZERO && h > Decimal::ZERO
        )
    }

    pub fn hourly_rate(&self) -> Decimal {
        worktime::hourly_rate(self.monthly_salary, self.weekly_hours)
    }

    pub fn daily_rate(&self) -> Decimal {
        worktime::daily_rate(self.monthly_salary, self.weekly_hours)
    }

    /// Convert a value, flagging whether the profile allowed a real computation.
    pub fn convert(&self, value: Decimal) -> WorkTimeConversion {
        WorkTimeConversion {
            duration: worktime::convert(value, self.monthly_salary, self.weekly_hours),
            computable: self.is_configured(),
        }
    }
}

/// A stored user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,

    /// External identity (unique).
    pub uid: String,

    pub email: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_salary: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly_hours: Option<Decimal>,

    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn rate_profile(&self) -> RateProfile {
        RateProfile {
            monthly_salary: self.monthly_salary,
            weekly_hours: self.weekly_hours,
        }
    }
}

/// Payload for creating a user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub uid: String,
    pub email: String,
    #[serde(default)]
    pub monthly_salary: Option<Decimal>,
    #[serde(default)]
    pub weekly_hours: Option<Decimal>,
}

/// Partial update of a user; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub monthly_salary: Option<Decimal>,
    #[serde(default)]
    pub weekly_hours: Option<Decimal>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.monthly_salary.is_none() && self.weekly_hours.is_none()
    }

    /// Apply the update to a user in place.
    pub fn apply(&self, user: &mut User) {
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if let Some(salary) = self.monthly_salary {
            user.monthly_salary = Some(salary);
        }
        if let Some(hours) = self.weekly_hours {
            user.weekly_hours = Some(hours);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worktime::WorkTime;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rate_profile_configured() {
        assert!(RateProfile::new(Decimal::from(3500), Decimal::from(40)).is_configured());
        assert!(!RateProfile::default().is_configured());
        assert!(!RateProfile::new(Decimal::ZERO, Decimal::from(40)).is_configured());
        assert!(!RateProfile {
            monthly_salary: Some(Decimal::from(3500)),
            weekly_hours: None,
        }
        .is_configured());
    }

    #[test]
    fn test_convert_flags_computable() {
        let unconfigured = RateProfile::default().convert(Decimal::from(100));
        assert_eq!(unconfigured.duration, WorkTime::ZERO);
        assert!(!unconfigured.computable);

        let free = RateProfile::new(Decimal::from(3500), Decimal::from(40)).convert(Decimal::ZERO);
        assert_eq!(free.duration, WorkTime::ZERO);
        assert!(free.computable);
    }

    #[test]
    fn test_profile_update_apply() {
        let mut user = User {
            id: 1,
            uid: "abc".to_string(),
            email: "a@example.com".to_string(),
            monthly_salary: None,
            weekly_hours: Some(Decimal::from(40)),
            created_at: Utc::now(),
        };

        let update = ProfileUpdate {
            monthly_salary: Some(Decimal::from(3500)),
            ..Default::default()
        };
        update.apply(&mut user);

        assert_eq!(user.monthly_salary, Some(Decimal::from(3500)));
        assert_eq!(user.weekly_hours, Some(Decimal::from(40)));
        assert_eq!(user.email, "a@example.com");
        assert!(user.rate_profile().is_configured());
    }
}
