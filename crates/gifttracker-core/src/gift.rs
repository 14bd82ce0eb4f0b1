//! Gift record types.
//!
//! - [`GiftRecord`]: a stored gift as read back from the database
//! - [`NewGift`]: validated input for a manual entry
//! - [`GiftFilter`]: optional category / date-range constraints
//! - [`Cost`]: exact two-decimal money amount

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// Non-negative money amount with two fractional digits, stored as cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Cost(i64);

impl Cost {
    pub const ZERO: Cost = Cost(0);

    /// Build a cost from a cent amount. Negative amounts are rejected.
    pub fn from_cents(cents: i64) -> Result<Self, ValidationError> {
        if cents < 0 {
            return Err(ValidationError::InvalidValue {
                field: "cost".into(),
                message: "must not be negative".into(),
            });
        }
        Ok(Cost(cents))
    }

    pub fn cents(self) -> i64 {
        self.0
    }

    /// Whole currency units.
    pub fn units(self) -> i64 {
        self.0 / 100
    }

    /// Fractional part in cents (0-99).
    pub fn fraction(self) -> i64 {
        self.0 % 100
    }

    pub fn checked_add(self, other: Cost) -> Option<Cost> {
        self.0.checked_add(other.0).map(Cost)
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.units(), self.fraction())
    }
}

impl FromStr for Cost {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |message: &str| ValidationError::InvalidValue {
            field: "cost".into(),
            message: format!("'{s}' {message}"),
        };

        let raw = s.trim();
        if raw.starts_with('-') {
            return Err(invalid("must not be negative"));
        }
        let (whole, frac) = match raw.split_once('.') {
            Some((w, f)) => (w, f),
            None => (raw, ""),
        };
        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("is not a decimal amount"));
        }
        if frac.len() > 2 || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("allows at most two decimal places"));
        }

        let whole: i64 = whole.parse().map_err(|_| invalid("is too large"))?;
        let frac_cents: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid("is not a decimal amount"))? * 10,
            _ => frac.parse().map_err(|_| invalid("is not a decimal amount"))?,
        };

        whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac_cents))
            .map(Cost)
            .ok_or_else(|| invalid("is too large"))
    }
}

impl Serialize for Cost {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Cost {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl ToSql for Cost {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for Cost {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let cents = i64::column_result(value)?;
        Cost::from_cents(cents).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// A gift as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftRecord {
    pub id: i64,
    pub giver: String,
    pub gift_details: String,
    pub date_received: NaiveDate,
    pub cost: Option<Cost>,
    pub category: Option<String>,
    pub thank_you_sent: bool,
}

/// Input for a manually entered gift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGift {
    pub giver: String,
    pub gift_details: String,
    pub date_received: NaiveDate,
    #[serde(default)]
    pub cost: Option<Cost>,
    #[serde(default)]
    pub category: Option<String>,
}

impl NewGift {
    pub fn new(giver: impl Into<String>, gift_details: impl Into<String>, date_received: NaiveDate) -> Self {
        Self {
            giver: giver.into(),
            gift_details: gift_details.into(),
            date_received,
            cost: None,
            category: None,
        }
    }

    pub fn with_cost(mut self, cost: Cost) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Check required fields and normalize the optional ones.
    ///
    /// Giver and details are trimmed and must be non-empty. A blank category
    /// is stored as no category.
    pub fn validated(self) -> Result<Self, ValidationError> {
        let giver = self.giver.trim().to_string();
        if giver.is_empty() {
            return Err(ValidationError::MissingField("giver"));
        }
        let gift_details = self.gift_details.trim().to_string();
        if gift_details.is_empty() {
            return Err(ValidationError::MissingField("gift_details"));
        }
        let category = self
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        Ok(Self {
            giver,
            gift_details,
            date_received: self.date_received,
            cost: self.cost,
            category,
        })
    }
}

/// Filters for [`crate::GiftDb::list_filtered`]. `None` means unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftFilter {
    pub category: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl GiftFilter {
    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..Self::default()
        }
    }

    pub fn between(start_date: Option<NaiveDate>, end_date: Option<NaiveDate>) -> Self {
        Self {
            category: None,
            start_date,
            end_date,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(ValidationError::InvalidDateRange { start, end });
            }
        }
        Ok(())
    }
}
