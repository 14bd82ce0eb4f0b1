//! Database schema migrations for gifttracker.
//!
//! Migrations are versioned and applied automatically when opening the database.
//! The `schema_version` table tracks the current migration version.

use rusqlite::{Connection, Result as SqliteResult};

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 3;

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);
    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }
    if current_version < 3 {
        migrate_v3(conn)?;
    }

    if current_version < SCHEMA_VERSION {
        tracing::info!(from = current_version, to = SCHEMA_VERSION, "database schema migrated");
    }
    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (initial database).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| row.get::<_, i32>(0))
        .unwrap_or_else(|e| {
            if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
                tracing::warn!("failed to read schema_version: {e}");
            }
            0
        })
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

fn has_column(conn: &Connection, table: &str, column: &str) -> bool {
    conn.query_row(
        "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2",
        [table, column],
        |row| row.get::<_, i32>(0),
    )
    .unwrap_or(0)
        > 0
}

/// Migration v1: gifts and suggestion events.
///
/// `gift_suggestions.accepted` is NULL until feedback is recorded.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS gifts (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            giver           TEXT NOT NULL,
            gift_details    TEXT NOT NULL,
            date_received   TEXT NOT NULL,
            cost_cents      INTEGER CHECK (cost_cents IS NULL OR cost_cents >= 0),
            category        TEXT,
            thank_you_sent  INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS gift_suggestions (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            gift_id       INTEGER NOT NULL REFERENCES gifts(id) ON DELETE CASCADE,
            suggested_at  TEXT NOT NULL,
            accepted      INTEGER
        );",
    )?;

    set_schema_version(&tx, 1)?;
    tx.commit()
}

/// Migration v2: backfill columns missing from early `gifts` tables.
///
/// Databases created before categories and thank-you tracking existed lack
/// `category` and `thank_you_sent`.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    if !has_column(&tx, "gifts", "category") {
        tx.execute_batch("ALTER TABLE gifts ADD COLUMN category TEXT;")?;
    }
    if !has_column(&tx, "gifts", "thank_you_sent") {
        tx.execute_batch(
            "ALTER TABLE gifts ADD COLUMN thank_you_sent INTEGER NOT NULL DEFAULT 0;",
        )?;
    }

    set_schema_version(&tx, 2)?;
    tx.commit()
}

/// Migration v3: indexes for filtered listing and the eligibility predicate.
fn migrate_v3(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_gifts_date_received ON gifts(date_received);
         CREATE INDEX IF NOT EXISTS idx_gifts_category ON gifts(category);
         CREATE INDEX IF NOT EXISTS idx_gifts_giver ON gifts(giver);
         CREATE INDEX IF NOT EXISTS idx_gift_suggestions_gift_accepted
             ON gift_suggestions(gift_id, accepted);",
    )?;

    set_schema_version(&tx, 3)?;
    tx.commit()
}
