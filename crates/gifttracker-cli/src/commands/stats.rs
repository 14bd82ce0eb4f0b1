use chrono::{Datelike, Local, NaiveDate};
use clap::Subcommand;
use gifttracker_core::GiftFilter;

use super::{open_db, CmdResult};
use crate::format::format_currency;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Totals for gifts matching the filters
    Summary {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Gifts per day for one month (default: current month)
    Calendar {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
    },
}

pub fn run(action: StatsAction) -> CmdResult {
    let (config, db) = open_db()?;

    match action {
        StatsAction::Summary { category, from, to } => {
            let summary = db.summary(&GiftFilter {
                category,
                start_date: from,
                end_date: to,
            })?;
            let mut json = serde_json::to_value(&summary)?;
            json["total_value_display"] = serde_json::Value::String(format_currency(
                Some(summary.total_value),
                &config.display.currency_symbol,
            ));
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        StatsAction::Calendar { year, month } => {
            let today = Local::now().date_naive();
            let summary = db.summary(&GiftFilter::default())?;
            let cells = summary.month_calendar(
                year.unwrap_or(today.year()),
                month.unwrap_or(today.month()),
            )?;
            println!("{}", serde_json::to_string_pretty(&cells)?);
        }
    }
    Ok(())
}
