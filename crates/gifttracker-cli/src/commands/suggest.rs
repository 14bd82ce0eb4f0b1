//! Gift suggestion commands for CLI.

use clap::Subcommand;
use gifttracker_core::{FeedbackRecorder, SuggestionEngine, SuggestionRequest, SuggestionStatus};

use super::{open_db, CmdResult};

#[derive(Subcommand)]
pub enum SuggestAction {
    /// Suggest gifts based on past gifts
    Get {
        /// Only gifts from this giver (exact match)
        #[arg(long)]
        giver: Option<String>,
        /// Only gifts in this category (exact match)
        #[arg(long)]
        category: Option<String>,
        /// Number of suggestions (default: suggestions.default_count)
        #[arg(long)]
        count: Option<usize>,
    },
    /// Mark a suggestion as helpful; its gift is not suggested again
    Accept {
        /// Suggestion ID
        id: i64,
    },
    /// Mark a suggestion as not helpful
    Reject {
        /// Suggestion ID
        id: i64,
    },
    /// Show recorded suggestions, newest first
    History {
        /// Only suggestions for this gift ID
        #[arg(long)]
        gift: Option<i64>,
    },
}

pub fn run(action: SuggestAction) -> CmdResult {
    let (config, db) = open_db()?;

    match action {
        SuggestAction::Get {
            giver,
            category,
            count,
        } => {
            let request = SuggestionRequest {
                giver,
                category,
                count: count.unwrap_or(config.suggestions.default_count),
            };
            let response = SuggestionEngine::with_config(&db, &config.suggestions)
                .get_suggestions(&request);
            println!("{}", serde_json::to_string_pretty(&response)?);
            if response.status == SuggestionStatus::Error {
                return Err(response.message.into());
            }
        }
        SuggestAction::Accept { id } => record(&db, id, true)?,
        SuggestAction::Reject { id } => record(&db, id, false)?,
        SuggestAction::History { gift } => {
            let events = db.list_suggestions(gift)?;
            println!("{}", serde_json::to_string_pretty(&events)?);
        }
    }
    Ok(())
}

fn record(db: &gifttracker_core::GiftDb, id: i64, accepted: bool) -> CmdResult {
    if !FeedbackRecorder::new(db).record(id, accepted) {
        return Err(format!("Could not record feedback for suggestion {id}").into());
    }
    let verdict = if accepted { "helpful" } else { "not helpful" };
    println!("Suggestion {id} marked as {verdict}");
    Ok(())
}
