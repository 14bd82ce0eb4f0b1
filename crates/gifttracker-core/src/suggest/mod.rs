//! Gift suggestion engine and feedback loop.
//!
//! The engine reads eligible gifts from a [`SuggestionStore`], ranks them
//! with [`ranking::rank`], records one pending [`SuggestionEvent`] per
//! surfaced gift, and returns a [`SuggestionResponse`]. The
//! [`FeedbackRecorder`] later marks events accepted or rejected; an accepted
//! event removes its gift from every future suggestion.

mod engine;
mod feedback;
pub mod ranking;

pub use engine::SuggestionEngine;
pub use feedback::FeedbackRecorder;
pub use ranking::DEFAULT_PER_CATEGORY_CAP;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::gift::Cost;

/// Suggestions returned when the caller does not ask for a count.
pub const DEFAULT_SUGGESTION_COUNT: usize = 3;

/// Outcome recorded for a suggestion event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    Pending,
    Accepted,
    Rejected,
}

impl Feedback {
    pub fn from_accepted(accepted: bool) -> Self {
        if accepted {
            Feedback::Accepted
        } else {
            Feedback::Rejected
        }
    }

    /// Column representation: NULL, 1 or 0.
    pub fn as_column(self) -> Option<bool> {
        match self {
            Feedback::Pending => None,
            Feedback::Accepted => Some(true),
            Feedback::Rejected => Some(false),
        }
    }

    pub fn from_column(value: Option<bool>) -> Self {
        match value {
            None => Feedback::Pending,
            Some(true) => Feedback::Accepted,
            Some(false) => Feedback::Rejected,
        }
    }
}

/// A record that a gift was surfaced as a suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionEvent {
    pub id: i64,
    pub gift_id: i64,
    pub suggested_at: DateTime<Utc>,
    pub accepted: Feedback,
}

/// An eligible gift together with the popularity of its giver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub gift_id: i64,
    pub giver: String,
    pub gift_details: String,
    pub category: Option<String>,
    pub cost: Option<Cost>,
    /// Number of eligible candidates from the same giver under the active filters.
    pub giver_frequency: u32,
}

/// Parameters for [`SuggestionEngine::get_suggestions`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionRequest {
    pub giver: Option<String>,
    pub category: Option<String>,
    pub count: usize,
}

impl Default for SuggestionRequest {
    fn default() -> Self {
        Self {
            giver: None,
            category: None,
            count: DEFAULT_SUGGESTION_COUNT,
        }
    }
}

impl SuggestionRequest {
    pub fn with_count(count: usize) -> Self {
        Self {
            count,
            ..Self::default()
        }
    }

    pub fn giver(mut self, giver: impl Into<String>) -> Self {
        self.giver = Some(giver.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionStatus {
    Success,
    NoSuggestions,
    Error,
}

/// A ranked suggestion handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Gift id.
    pub id: i64,
    /// Event id to pass to [`FeedbackRecorder::record`].
    pub suggestion_id: i64,
    pub gift_details: String,
    pub category: Option<String>,
    pub cost: Option<Cost>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionResponse {
    pub status: SuggestionStatus,
    pub message: String,
    pub suggestions: Vec<Suggestion>,
}

impl SuggestionResponse {
    pub fn no_suggestions() -> Self {
        Self {
            status: SuggestionStatus::NoSuggestions,
            message: "No suitable gift suggestions found based on the criteria.".into(),
            suggestions: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: SuggestionStatus::Error,
            message: message.into(),
            suggestions: Vec::new(),
        }
    }
}

/// Storage operations the suggestion loop depends on.
pub trait SuggestionStore {
    /// Gifts matching the exact-match filters that have no accepted event.
    fn eligible_candidates(
        &self,
        giver: Option<&str>,
        category: Option<&str>,
    ) -> Result<Vec<Candidate>>;

    /// Insert one pending event per gift, all or nothing. Returns event ids in
    /// the order of `gift_ids`.
    fn insert_suggestions(&self, gift_ids: &[i64], suggested_at: DateTime<Utc>) -> Result<Vec<i64>>;

    /// Set feedback on a pending event. `Ok(false)` when no pending event with
    /// that id exists.
    fn set_feedback(&self, suggestion_id: i64, feedback: Feedback) -> Result<bool>;
}
