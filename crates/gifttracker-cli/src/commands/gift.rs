//! Gift record commands for CLI.

use chrono::{Local, NaiveDate};
use clap::Subcommand;
use gifttracker_core::{Cost, DatabaseError, GiftFilter, NewGift};

use super::{open_db, CmdResult};

#[derive(Subcommand)]
pub enum GiftAction {
    /// Record a gift received
    Add {
        /// Who gave the gift
        giver: String,
        /// What the gift was
        details: String,
        /// Date received, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Cost, e.g. 24.99
        #[arg(long)]
        cost: Option<Cost>,
        /// Category, e.g. Books
        #[arg(long)]
        category: Option<String>,
    },
    /// List gifts, most recent first
    List {
        /// Only this category (exact match)
        #[arg(long)]
        category: Option<String>,
        /// Received on or after, YYYY-MM-DD
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Received on or before, YYYY-MM-DD
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// List categories in use
    Categories,
    /// List givers
    Givers,
    /// Mark a thank-you note as sent
    Thank {
        /// Gift ID
        id: i64,
    },
    /// Delete every gift and all suggestion history
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: GiftAction) -> CmdResult {
    let (_config, db) = open_db()?;

    match action {
        GiftAction::Add {
            giver,
            details,
            date,
            cost,
            category,
        } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let mut gift = NewGift::new(giver, details, date);
            gift.cost = cost;
            gift.category = category;

            let id = db.add_gift(gift)?;
            let record = db
                .get_gift(id)?
                .ok_or(DatabaseError::NotFound { entity: "gift", id })?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        GiftAction::List { category, from, to } => {
            let filter = GiftFilter {
                category,
                start_date: from,
                end_date: to,
            };
            let gifts = db.list_filtered(&filter)?;
            println!("{}", serde_json::to_string_pretty(&gifts)?);
        }
        GiftAction::Categories => {
            println!("{}", serde_json::to_string_pretty(&db.distinct_categories()?)?);
        }
        GiftAction::Givers => {
            println!("{}", serde_json::to_string_pretty(&db.distinct_givers()?)?);
        }
        GiftAction::Thank { id } => {
            if db.get_gift(id)?.is_none() {
                return Err(DatabaseError::NotFound { entity: "gift", id }.into());
            }
            if !db.mark_thank_you_sent(id) {
                return Err(format!("Could not record thank-you for gift {id}").into());
            }
            println!("Thank-you recorded for gift {id}");
        }
        GiftAction::Clear { yes } => {
            if !yes {
                return Err("refusing to delete all gift data without --yes".into());
            }
            let summary = db.clear_all()?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}
