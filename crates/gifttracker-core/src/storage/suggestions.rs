//! Suggestion event persistence.

use std::collections::HashMap;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, OptionalExtension};

use super::database::{parse_timestamp_column, GiftDb};
use crate::error::{DatabaseError, Result, ValidationError};
use crate::suggest::{Candidate, Feedback, SuggestionEvent, SuggestionStore};

fn row_to_event(row: &rusqlite::Row) -> rusqlite::Result<SuggestionEvent> {
    let suggested_at: String = row.get(2)?;
    Ok(SuggestionEvent {
        id: row.get(0)?,
        gift_id: row.get(1)?,
        suggested_at: parse_timestamp_column(2, &suggested_at)?,
        accepted: Feedback::from_column(row.get(3)?),
    })
}

impl GiftDb {
    pub fn get_suggestion(&self, id: i64) -> Result<Option<SuggestionEvent>> {
        let event = self
            .conn
            .query_row(
                "SELECT id, gift_id, suggested_at, accepted FROM gift_suggestions WHERE id = ?1",
                params![id],
                row_to_event,
            )
            .optional()
            .map_err(DatabaseError::from)?;
        Ok(event)
    }

    /// Suggestion events, newest first, optionally for one gift.
    pub fn list_suggestions(&self, gift_id: Option<i64>) -> Result<Vec<SuggestionEvent>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, gift_id, suggested_at, accepted FROM gift_suggestions
                 WHERE (?1 IS NULL OR gift_id = ?1)
                 ORDER BY suggested_at DESC, id DESC",
            )
            .map_err(DatabaseError::from)?;
        let events = stmt
            .query_map(params![gift_id], row_to_event)
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
            .map_err(DatabaseError::from)?;
        Ok(events)
    }
}

impl SuggestionStore for GiftDb {
    fn eligible_candidates(
        &self,
        giver: Option<&str>,
        category: Option<&str>,
    ) -> Result<Vec<Candidate>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT g.id, g.giver, g.gift_details, g.category, g.cost_cents
                 FROM gifts g
                 WHERE NOT EXISTS (
                         SELECT 1 FROM gift_suggestions s
                         WHERE s.gift_id = g.id AND s.accepted = 1
                       )
                   AND (?1 IS NULL OR g.giver = ?1)
                   AND (?2 IS NULL OR g.category = ?2)
                 ORDER BY g.id",
            )
            .map_err(DatabaseError::from)?;

        let mut candidates = stmt
            .query_map(params![giver, category], |row| {
                Ok(Candidate {
                    gift_id: row.get(0)?,
                    giver: row.get(1)?,
                    gift_details: row.get(2)?,
                    category: row.get(3)?,
                    cost: row.get(4)?,
                    giver_frequency: 0,
                })
            })
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
            .map_err(DatabaseError::from)?;

        // Frequency is taken over the filtered, still-eligible set only
        let mut per_giver: HashMap<String, u32> = HashMap::new();
        for candidate in &candidates {
            *per_giver.entry(candidate.giver.clone()).or_default() += 1;
        }
        for candidate in &mut candidates {
            candidate.giver_frequency = per_giver.get(&candidate.giver).copied().unwrap_or(0);
        }
        Ok(candidates)
    }

    fn insert_suggestions(&self, gift_ids: &[i64], suggested_at: DateTime<Utc>) -> Result<Vec<i64>> {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(DatabaseError::from)?;
        // Fixed-width UTC text so lexical order matches time order
        let suggested_at = suggested_at.to_rfc3339_opts(SecondsFormat::Micros, true);
        let mut event_ids = Vec::with_capacity(gift_ids.len());
        {
            let mut stmt = tx
                .prepare("INSERT INTO gift_suggestions (gift_id, suggested_at) VALUES (?1, ?2)")
                .map_err(DatabaseError::from)?;
            for gift_id in gift_ids {
                stmt.execute(params![gift_id, suggested_at])
                    .map_err(DatabaseError::from)?;
                event_ids.push(tx.last_insert_rowid());
            }
        }
        // Dropping `tx` on any early return above rolls the batch back
        tx.commit().map_err(DatabaseError::from)?;
        Ok(event_ids)
    }

    fn set_feedback(&self, suggestion_id: i64, feedback: Feedback) -> Result<bool> {
        let accepted = feedback.as_column().ok_or_else(|| ValidationError::InvalidValue {
            field: "accepted".into(),
            message: "feedback must be accepted or rejected".into(),
        })?;
        let updated = self
            .conn
            .execute(
                "UPDATE gift_suggestions SET accepted = ?1 WHERE id = ?2 AND accepted IS NULL",
                params![accepted, suggestion_id],
            )
            .map_err(DatabaseError::from)?;
        Ok(updated == 1)
    }
}
