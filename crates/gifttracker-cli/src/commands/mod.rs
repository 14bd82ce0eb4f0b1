pub mod config;
pub mod gift;
pub mod stats;
pub mod suggest;

use gifttracker_core::{Config, GiftDb};

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Load configuration and open the database it points at.
pub fn open_db() -> Result<(Config, GiftDb), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    tracing::debug!(path = %config.database_path()?.display(), "opening database");
    let db = GiftDb::open_with_config(&config)?;
    Ok((config, db))
}
