//! Gift summary statistics.
//!
//! Totals for the metrics row of a front end, plus per-day counts and a
//! zero-filled month grid for a calendar heatmap.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::gift::{Cost, GiftFilter, GiftRecord};
use crate::storage::GiftDb;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GiftSummary {
    pub total_gifts: usize,
    pub total_givers: usize,
    /// Sum of all present costs. Gifts without a cost count as zero.
    pub total_value: Cost,
    pub thank_you_pending: usize,
    pub gifts_by_date: BTreeMap<NaiveDate, u32>,
}

/// One day in a month heatmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub day: u32,
    /// Full weekday name, e.g. "Monday".
    pub weekday: String,
    pub gifts: u32,
}

impl GiftSummary {
    pub fn from_records(records: &[GiftRecord]) -> Self {
        let mut givers = BTreeSet::new();
        let mut summary = GiftSummary::default();

        for gift in records {
            summary.total_gifts += 1;
            givers.insert(gift.giver.as_str());
            if let Some(cost) = gift.cost {
                match summary.total_value.checked_add(cost) {
                    Some(total) => summary.total_value = total,
                    None => tracing::warn!(gift_id = gift.id, "total gift value overflowed"),
                }
            }
            if !gift.thank_you_sent {
                summary.thank_you_pending += 1;
            }
            *summary.gifts_by_date.entry(gift.date_received).or_default() += 1;
        }

        summary.total_givers = givers.len();
        summary
    }

    /// Gift counts for every day of `month`, including days without gifts.
    pub fn month_calendar(&self, year: i32, month: u32) -> Result<Vec<CalendarCell>> {
        let invalid_month = || ValidationError::InvalidValue {
            field: "month".into(),
            message: format!("{year}-{month} is not a valid month"),
        };
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid_month)?;
        let next_month = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(invalid_month)?;

        let cells = first
            .iter_days()
            .take_while(|date| *date < next_month)
            .map(|date| CalendarCell {
                date,
                day: date.day(),
                weekday: date.format("%A").to_string(),
                gifts: self.gifts_by_date.get(&date).copied().unwrap_or(0),
            })
            .collect();
        Ok(cells)
    }
}

impl GiftDb {
    /// Summarize the gifts matching `filter`.
    pub fn summary(&self, filter: &GiftFilter) -> Result<GiftSummary> {
        Ok(GiftSummary::from_records(&self.list_filtered(filter)?))
    }
}
