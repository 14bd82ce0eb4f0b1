use chrono::Utc;

use super::ranking::{self, DEFAULT_PER_CATEGORY_CAP};
use super::{Suggestion, SuggestionRequest, SuggestionResponse, SuggestionStatus, SuggestionStore};
use crate::storage::SuggestionsConfig;

/// Selects, ranks and records gift suggestions.
pub struct SuggestionEngine<'a, S: SuggestionStore + ?Sized> {
    store: &'a S,
    per_category_cap: usize,
}

impl<'a, S: SuggestionStore + ?Sized> SuggestionEngine<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            per_category_cap: DEFAULT_PER_CATEGORY_CAP,
        }
    }

    pub fn with_config(store: &'a S, config: &SuggestionsConfig) -> Self {
        Self {
            store,
            per_category_cap: config.per_category_cap.max(1),
        }
    }

    /// Rank eligible gifts and record one pending event per returned gift.
    ///
    /// Never fails: storage errors become a response with
    /// [`SuggestionStatus::Error`] and no events are left behind.
    pub fn get_suggestions(&self, request: &SuggestionRequest) -> SuggestionResponse {
        let candidates = match self
            .store
            .eligible_candidates(request.giver.as_deref(), request.category.as_deref())
        {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!("loading suggestion candidates failed: {e}");
                return SuggestionResponse::error(format!(
                    "An error occurred while fetching gift suggestions: {e}"
                ));
            }
        };

        let eligible = candidates.len();
        let mut ranked = ranking::rank(candidates, self.per_category_cap);
        ranked.truncate(request.count);
        tracing::debug!(
            eligible,
            returned = ranked.len(),
            giver = ?request.giver,
            category = ?request.category,
            "ranked gift suggestions"
        );

        if ranked.is_empty() {
            return SuggestionResponse::no_suggestions();
        }

        let gift_ids: Vec<i64> = ranked.iter().map(|c| c.gift_id).collect();
        let event_ids = match self.store.insert_suggestions(&gift_ids, Utc::now()) {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!("recording suggestion events failed: {e}");
                return SuggestionResponse::error(format!(
                    "An error occurred while fetching gift suggestions: {e}"
                ));
            }
        };

        let suggestions: Vec<Suggestion> = ranked
            .into_iter()
            .zip(event_ids)
            .map(|(candidate, suggestion_id)| Suggestion {
                id: candidate.gift_id,
                suggestion_id,
                gift_details: candidate.gift_details,
                category: candidate.category,
                cost: candidate.cost,
            })
            .collect();

        SuggestionResponse {
            status: SuggestionStatus::Success,
            message: format!(
                "Found {} suggestion(s) based on the criteria.",
                suggestions.len()
            ),
            suggestions,
        }
    }
}
