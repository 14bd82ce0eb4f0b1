use super::{Feedback, SuggestionStore};

/// Records accept/reject feedback on suggestion events.
pub struct FeedbackRecorder<'a, S: SuggestionStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: SuggestionStore + ?Sized> FeedbackRecorder<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Mark a pending suggestion accepted or rejected.
    ///
    /// Returns `false` when the event does not exist, already carries
    /// feedback, or the update fails. Accepting excludes the gift from all
    /// later suggestions.
    pub fn record(&self, suggestion_id: i64, accepted: bool) -> bool {
        let feedback = Feedback::from_accepted(accepted);
        match self.store.set_feedback(suggestion_id, feedback) {
            Ok(true) => {
                tracing::info!(suggestion_id, ?feedback, "suggestion feedback recorded");
                true
            }
            Ok(false) => {
                tracing::warn!(suggestion_id, "no pending suggestion to update");
                false
            }
            Err(e) => {
                tracing::warn!(suggestion_id, "updating suggestion feedback failed: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use chrono::{DateTime, Utc};

    use super::*;
    use crate::error::{CoreError, Result};
    use crate::suggest::Candidate;

    struct FakeStore {
        events: RefCell<HashMap<i64, Feedback>>,
        broken: bool,
    }

    impl SuggestionStore for FakeStore {
        fn eligible_candidates(&self, _: Option<&str>, _: Option<&str>) -> Result<Vec<Candidate>> {
            Ok(Vec::new())
        }

        fn insert_suggestions(&self, _: &[i64], _: DateTime<Utc>) -> Result<Vec<i64>> {
            Ok(Vec::new())
        }

        fn set_feedback(&self, suggestion_id: i64, feedback: Feedback) -> Result<bool> {
            if self.broken {
                return Err(CoreError::Custom("disk unavailable".into()));
            }
            let mut events = self.events.borrow_mut();
            match events.get_mut(&suggestion_id) {
                Some(current) if *current == Feedback::Pending => {
                    *current = feedback;
                    Ok(true)
                }
                _ => Ok(false),
            }
        }
    }

    fn store_with_pending(id: i64) -> FakeStore {
        FakeStore {
            events: RefCell::new(HashMap::from([(id, Feedback::Pending)])),
            broken: false,
        }
    }

    #[test]
    fn records_acceptance() {
        let store = store_with_pending(7);
        assert!(FeedbackRecorder::new(&store).record(7, true));
        assert_eq!(store.events.borrow()[&7], Feedback::Accepted);
    }

    #[test]
    fn unknown_or_decided_event_returns_false() {
        let store = store_with_pending(7);
        let recorder = FeedbackRecorder::new(&store);
        assert!(!recorder.record(8, true));
        assert!(recorder.record(7, false));
        assert!(!recorder.record(7, true));
        assert_eq!(store.events.borrow()[&7], Feedback::Rejected);
    }

    #[test]
    fn storage_failure_returns_false() {
        let store = FakeStore {
            events: RefCell::new(HashMap::new()),
            broken: true,
        };
        assert!(!FeedbackRecorder::new(&store).record(1, true));
    }
}
