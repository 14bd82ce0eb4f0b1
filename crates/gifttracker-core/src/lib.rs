//! # Gift Tracker Core Library
//!
//! This library provides the core logic for Gift Tracker, a personal record of
//! gifts received. All operations are available through the `gifttracker` CLI,
//! which is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Storage**: SQLite-based gift and suggestion-event storage with
//!   versioned migrations, and TOML-based configuration
//! - **Suggestions**: ranks past gifts by giver frequency and cost, records
//!   every surfaced suggestion, and excludes gifts once a suggestion for them
//!   is accepted
//! - **Summary**: totals and per-day counts for reporting
//!
//! ## Key Components
//!
//! - [`GiftDb`]: gift and suggestion persistence
//! - [`SuggestionEngine`]: candidate selection and ranking
//! - [`FeedbackRecorder`]: accept/reject feedback on suggestions
//! - [`Config`]: application configuration management

pub mod error;
pub mod gift;
pub mod storage;
pub mod suggest;
pub mod summary;

pub use error::{ConfigError, CoreError, DatabaseError, Result, ValidationError};
pub use gift::{Cost, GiftFilter, GiftRecord, NewGift};
pub use storage::{ClearSummary, Config, GiftDb};
pub use suggest::{
    Feedback, FeedbackRecorder, Suggestion, SuggestionEngine, SuggestionEvent,
    SuggestionRequest, SuggestionResponse, SuggestionStatus, SuggestionStore,
};
pub use summary::{CalendarCell, GiftSummary};
