//! Purchase records and history views.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::worktime::WorkTime;

/// How the purchase value was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseKind {
    /// Total read from a receipt photo.
    Ocr,
    /// Value typed in by the user.
    Manual,
}

impl PurchaseKind {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ocr => "Receipt",
            Self::Manual => "Manual",
        }
    }
}

impl fmt::Display for PurchaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ocr => write!(f, "ocr"),
            Self::Manual => write!(f, "manual"),
        }
    }
}

/// A recorded purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: u64,

    /// Owner of the purchase.
    pub user_id: u64,

    /// Amount paid (BRL).
    pub value: Decimal,

    /// Work time at the moment of recording.
    pub time_hours: u64,
    pub time_minutes: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "type")]
    pub kind: PurchaseKind,

    pub created_at: DateTime<Utc>,
}

impl Purchase {
    /// Stored work time in minutes.
    pub fn work_minutes(&self) -> u64 {
        self.time_hours * 60 + self.time_minutes as u64
    }

    /// Stored work time formatted like a conversion result.
    pub fn work_time(&self) -> WorkTime {
        WorkTime {
            hours: self.time_hours,
            minutes: self.time_minutes,
            total_minutes: self.work_minutes(),
        }
    }
}

/// Payload for recording a purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPurchase {
    pub user_id: u64,
    pub value: Decimal,
    pub time_hours: u64,
    pub time_minutes: u32,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: PurchaseKind,
}

impl NewPurchase {
    /// Build a purchase from a conversion result.
    pub fn from_work_time(
        user_id: u64,
        value: Decimal,
        duration: &WorkTime,
        kind: PurchaseKind,
        description: Option<String>,
    ) -> Self {
        Self {
            user_id,
            value,
            time_hours: duration.hours,
            time_minutes: duration.minutes,
            image_url: None,
            description,
            kind,
        }
    }

    /// Check the payload before it is stored.
    pub fn validate(&self) -> Result<(), StorageError> {
        if self.value.is_sign_negative() && !self.value.is_zero() {
            return Err(StorageError::Invalid {
                field: "value".to_string(),
                reason: format!("must not be negative, got {}", self.value),
            });
        }

        // 60 is reachable through independent minute rounding
        if self.time_minutes > 60 {
            return Err(StorageError::Invalid {
                field: "timeMinutes".to_string(),
                reason: format!("must be at most 60, got {}", self.time_minutes),
            });
        }

        Ok(())
    }
}

/// Sort order for the purchase history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Newest first.
    #[default]
    Date,
    /// Highest value first.
    Value,
    /// Longest work time first.
    Time,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "value" => Ok(Self::Value),
            "time" => Ok(Self::Time),
            other => Err(format!("unknown sort key: {}", other)),
        }
    }
}

/// Filter and ordering applied to a purchase list.
#[derive(Debug, Clone, Default)]
pub struct HistoryQuery {
    /// Case-insensitive substring of the description.
    pub search: Option<String>,
    pub sort: SortKey,
}

impl HistoryQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = if search.trim().is_empty() { None } else { Some(search) };
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    /// Filter and sort a list of purchases.
    pub fn apply(&self, purchases: &[Purchase]) -> Vec<Purchase> {
        let needle = self.search.as_ref().map(|s| s.to_lowercase());

        let mut result: Vec<Purchase> = purchases
            .iter()
            .filter(|p| match &needle {
                None => true,
                Some(needle) => p
                    .description
                    .as_ref()
                    .is_some_and(|d| d.to_lowercase().contains(needle.as_str())),
            })
            .cloned()
            .collect();

        match self.sort {
            SortKey::Date => result.sort_by(|a, b| {
                b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id))
            }),
            SortKey::Value => result.sort_by(|a, b| b.value.cmp(&a.value)),
            SortKey::Time => result.sort_by_key(|p| std::cmp::Reverse(p.work_minutes())),
        }

        result
    }
}

/// Totals shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseSummary {
    pub count: usize,
    pub total_spent: Decimal,
    pub total_time: WorkTime,
}

impl PurchaseSummary {
    pub fn from_purchases(purchases: &[Purchase]) -> Self {
        let total_spent = purchases.iter().map(|p| p.value).sum();
        let total_minutes = purchases.iter().map(Purchase::work_minutes).sum();

        Self {
            count: purchases.len(),
            total_spent,
            total_time: WorkTime::from_minutes(total_minutes),
        }
    }
}
