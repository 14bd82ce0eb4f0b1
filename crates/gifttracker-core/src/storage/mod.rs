mod config;
pub mod database;
mod gifts;
pub mod migrations;
mod suggestions;

pub use config::{Config, DatabaseConfig, DisplayConfig, SuggestionsConfig};
pub use database::GiftDb;
pub use gifts::ClearSummary;

use std::path::PathBuf;

use crate::error::Result;

/// Returns the data directory for the database and `config.toml`.
///
/// `GIFTTRACKER_DATA_DIR` overrides the location entirely. Otherwise this is
/// `~/.config/gifttracker/`, or `~/.config/gifttracker-dev/` when
/// `GIFTTRACKER_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("GIFTTRACKER_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("GIFTTRACKER_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("gifttracker-dev")
            } else {
                base_dir.join("gifttracker")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
