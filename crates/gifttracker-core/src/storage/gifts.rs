//! Gift record persistence.

use rusqlite::{params, OptionalExtension};
use serde::{Deserialize, Serialize};

use super::database::{format_date, parse_date_column, GiftDb};
use crate::error::{DatabaseError, Result};
use crate::gift::{GiftFilter, GiftRecord, NewGift};

const GIFT_COLUMNS: &str =
    "id, giver, gift_details, date_received, cost_cents, category, thank_you_sent";

fn row_to_gift(row: &rusqlite::Row) -> rusqlite::Result<GiftRecord> {
    let date_str: String = row.get(3)?;
    Ok(GiftRecord {
        id: row.get(0)?,
        giver: row.get(1)?,
        gift_details: row.get(2)?,
        date_received: parse_date_column(3, &date_str)?,
        cost: row.get(4)?,
        category: row.get(5)?,
        thank_you_sent: row.get(6)?,
    })
}

/// Row counts removed by [`GiftDb::clear_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearSummary {
    pub deleted_gifts: usize,
    pub deleted_suggestions: usize,
}

impl GiftDb {
    /// Validate and insert a gift, returning its new id.
    ///
    /// # Errors
    /// Returns a validation error for a blank giver or details, or a database
    /// error if the insert fails.
    pub fn add_gift(&self, gift: NewGift) -> Result<i64> {
        let gift = gift.validated()?;
        self.conn
            .execute(
                "INSERT INTO gifts (giver, gift_details, date_received, cost_cents, category)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    gift.giver,
                    gift.gift_details,
                    format_date(gift.date_received),
                    gift.cost,
                    gift.category,
                ],
            )
            .map_err(DatabaseError::from)?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, giver = %gift.giver, "gift added");
        Ok(id)
    }

    pub fn get_gift(&self, id: i64) -> Result<Option<GiftRecord>> {
        let gift = self
            .conn
            .query_row(
                &format!("SELECT {GIFT_COLUMNS} FROM gifts WHERE id = ?1"),
                params![id],
                row_to_gift,
            )
            .optional()
            .map_err(DatabaseError::from)?;
        Ok(gift)
    }

    /// All gifts, most recently received first.
    pub fn list_all(&self) -> Result<Vec<GiftRecord>> {
        self.list_filtered(&GiftFilter::default())
    }

    /// Gifts matching every present filter, most recently received first.
    ///
    /// Date bounds are inclusive. Category matching is exact.
    pub fn list_filtered(&self, filter: &GiftFilter) -> Result<Vec<GiftRecord>> {
        filter.validate()?;
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {GIFT_COLUMNS} FROM gifts
                 WHERE (?1 IS NULL OR category = ?1)
                   AND (?2 IS NULL OR date_received >= ?2)
                   AND (?3 IS NULL OR date_received <= ?3)
                 ORDER BY date_received DESC, id DESC"
            ))
            .map_err(DatabaseError::from)?;

        let gifts = stmt
            .query_map(
                params![
                    filter.category,
                    filter.start_date.map(format_date),
                    filter.end_date.map(format_date),
                ],
                row_to_gift,
            )
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
            .map_err(DatabaseError::from)?;
        Ok(gifts)
    }

    /// Sorted non-empty categories in use.
    pub fn distinct_categories(&self) -> Result<Vec<String>> {
        self.distinct_text(
            "SELECT DISTINCT category FROM gifts
             WHERE category IS NOT NULL AND category != ''
             ORDER BY category",
        )
    }

    /// Sorted givers in use.
    pub fn distinct_givers(&self) -> Result<Vec<String>> {
        self.distinct_text("SELECT DISTINCT giver FROM gifts ORDER BY giver")
    }

    fn distinct_text(&self, sql: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(sql).map_err(DatabaseError::from)?;
        let values = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
            .map_err(DatabaseError::from)?;
        Ok(values)
    }

    /// Flag a gift as thanked.
    ///
    /// Returns `false` instead of an error when the gift does not exist or the
    /// update fails, so callers can show a soft failure. Repeat calls on the
    /// same gift keep returning `true`.
    pub fn mark_thank_you_sent(&self, gift_id: i64) -> bool {
        match self.conn.execute(
            "UPDATE gifts SET thank_you_sent = 1 WHERE id = ?1",
            params![gift_id],
        ) {
            Ok(1) => true,
            Ok(_) => {
                tracing::warn!(gift_id, "thank-you not recorded: gift not found");
                false
            }
            Err(e) => {
                tracing::warn!(gift_id, "thank-you not recorded: {e}");
                false
            }
        }
    }

    /// Delete every suggestion event and every gift in one transaction.
    pub fn clear_all(&self) -> Result<ClearSummary> {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(DatabaseError::from)?;
        let deleted_suggestions = tx
            .execute("DELETE FROM gift_suggestions", [])
            .map_err(DatabaseError::from)?;
        let deleted_gifts = tx
            .execute("DELETE FROM gifts", [])
            .map_err(DatabaseError::from)?;
        tx.commit().map_err(DatabaseError::from)?;

        tracing::info!(deleted_gifts, deleted_suggestions, "cleared all gift data");
        Ok(ClearSummary {
            deleted_gifts,
            deleted_suggestions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, ValidationError};
    use crate::gift::Cost;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn seed(db: &GiftDb) -> (i64, i64, i64) {
        let a = db
            .add_gift(
                NewGift::new("Alice", "Novel", day(2024, 3, 1))
                    .with_cost("20".parse().unwrap())
                    .with_category("Books"),
            )
            .unwrap();
        let b = db
            .add_gift(
                NewGift::new("Bob", "Mug", day(2024, 5, 10)).with_category("Kitchen"),
            )
            .unwrap();
        let c = db
            .add_gift(NewGift::new("Alice", "Card", day(2023, 12, 25)))
            .unwrap();
        (a, b, c)
    }

    #[test]
    fn add_and_get_gift() {
        let db = GiftDb::open_memory().unwrap();
        let id = db
            .add_gift(
                NewGift::new("Alice", "Scarf", day(2024, 1, 2))
                    .with_cost("15.50".parse().unwrap())
                    .with_category("Clothing"),
            )
            .unwrap();

        let gift = db.get_gift(id).unwrap().unwrap();
        assert_eq!(gift.giver, "Alice");
        assert_eq!(gift.cost, Some(Cost::from_cents(1550).unwrap()));
        assert_eq!(gift.category.as_deref(), Some("Clothing"));
        assert!(!gift.thank_you_sent);
        assert!(db.get_gift(id + 100).unwrap().is_none());
    }

    #[test]
    fn add_rejects_missing_fields() {
        let db = GiftDb::open_memory().unwrap();
        let err = db
            .add_gift(NewGift::new("", "Scarf", day(2024, 1, 2)))
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::MissingField("giver"))
        ));
        assert!(db.list_all().unwrap().is_empty());
    }

    #[test]
    fn list_all_orders_by_date_descending() {
        let db = GiftDb::open_memory().unwrap();
        let (a, b, c) = seed(&db);
        let ids: Vec<i64> = db.list_all().unwrap().iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![b, a, c]);
    }

    #[test]
    fn list_filtered_combines_filters() {
        let db = GiftDb::open_memory().unwrap();
        let (a, b, _) = seed(&db);

        let books = db.list_filtered(&GiftFilter::category("Books")).unwrap();
        assert_eq!(books.iter().map(|g| g.id).collect::<Vec<_>>(), vec![a]);

        let in_2024 = db
            .list_filtered(&GiftFilter::between(Some(day(2024, 1, 1)), Some(day(2024, 12, 31))))
            .unwrap();
        assert_eq!(in_2024.iter().map(|g| g.id).collect::<Vec<_>>(), vec![b, a]);

        let kitchen_before_may = db
            .list_filtered(&GiftFilter {
                category: Some("Kitchen".into()),
                start_date: None,
                end_date: Some(day(2024, 5, 9)),
            })
            .unwrap();
        assert!(kitchen_before_may.is_empty());
    }

    #[test]
    fn list_filtered_bounds_are_inclusive() {
        let db = GiftDb::open_memory().unwrap();
        let (_, b, _) = seed(&db);
        let exact = db
            .list_filtered(&GiftFilter::between(Some(day(2024, 5, 10)), Some(day(2024, 5, 10))))
            .unwrap();
        assert_eq!(exact.len(), 1);
        assert_eq!(exact[0].id, b);
    }

    #[test]
    fn list_filtered_unknown_category_is_empty() {
        let db = GiftDb::open_memory().unwrap();
        seed(&db);
        assert!(db.list_filtered(&GiftFilter::category("Garden")).unwrap().is_empty());
        // Exact, case-sensitive match
        assert!(db.list_filtered(&GiftFilter::category("books")).unwrap().is_empty());
    }

    #[test]
    fn distinct_categories_and_givers() {
        let db = GiftDb::open_memory().unwrap();
        seed(&db);
        assert_eq!(db.distinct_categories().unwrap(), vec!["Books", "Kitchen"]);
        assert_eq!(db.distinct_givers().unwrap(), vec!["Alice", "Bob"]);
    }

    #[test]
    fn mark_thank_you_sent_is_idempotent() {
        let db = GiftDb::open_memory().unwrap();
        let (a, _, _) = seed(&db);
        assert!(db.mark_thank_you_sent(a));
        assert!(db.mark_thank_you_sent(a));
        assert!(db.get_gift(a).unwrap().unwrap().thank_you_sent);
    }

    #[test]
    fn mark_thank_you_sent_unknown_gift_returns_false() {
        let db = GiftDb::open_memory().unwrap();
        assert!(!db.mark_thank_you_sent(42));
    }

    #[test]
    fn clear_all_removes_gifts_and_suggestions() {
        let db = GiftDb::open_memory().unwrap();
        let (a, b, _) = seed(&db);
        db.conn()
            .execute(
                "INSERT INTO gift_suggestions (gift_id, suggested_at) VALUES (?1, '2024-06-01T00:00:00+00:00'), (?2, '2024-06-01T00:00:00+00:00')",
                params![a, b],
            )
            .unwrap();

        let summary = db.clear_all().unwrap();
        assert_eq!(
            summary,
            ClearSummary {
                deleted_gifts: 3,
                deleted_suggestions: 2
            }
        );
        assert!(db.list_all().unwrap().is_empty());
        let remaining: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM gift_suggestions", [], |row| row.get(0))
            .unwrap();
        assert_eq!(remaining, 0);
    }
}
