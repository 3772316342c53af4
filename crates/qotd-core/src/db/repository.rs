//! Quote repository implementation

#![allow(clippy::cast_possible_wrap)] // SQLite uses i64 for LIMIT/OFFSET

use crate::error::Result;
use crate::models::{Quote, SyncConflict};
use rusqlite::{params, Connection};

/// Trait for quote storage operations
pub trait QuoteRepository {
    /// Load the whole collection, oldest first
    fn load_all(&self) -> Result<Vec<Quote>>;

    /// Insert a quote, or overwrite the stored row with the same id
    fn upsert(&self, quote: &Quote) -> Result<()>;

    /// Replace the stored collection with the given quotes, atomically
    fn replace_all(&self, quotes: &[Quote]) -> Result<()>;

    /// Append a resolved conflict to the log, returning its row id
    fn append_conflict(&self, conflict: &SyncConflict) -> Result<i64>;

    /// List logged conflicts, most recent first
    fn list_conflicts(&self, limit: usize) -> Result<Vec<SyncConflict>>;
}

/// `SQLite` implementation of `QuoteRepository`
pub struct SqliteQuoteRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteQuoteRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Parse a quote from a database row
    fn parse_quote(row: &rusqlite::Row<'_>) -> rusqlite::Result<Quote> {
        let id: String = row.get(0)?;
        Ok(Quote {
            id: id.parse().unwrap_or_default(),
            server_id: row.get(1)?,
            text: row.get(2)?,
            category: row.get(3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
            dirty: row.get::<_, i32>(6)? != 0,
        })
    }

    /// Parse a conflict record from a database row
    fn parse_conflict(row: &rusqlite::Row<'_>) -> rusqlite::Result<SyncConflict> {
        Ok(SyncConflict {
            id: row.get(0)?,
            quote_id: row.get(1)?,
            server_id: row.get(2)?,
            reason: row.get(3)?,
            local_text: row.get(4)?,
            local_category: row.get(5)?,
            local_updated_at: row.get(6)?,
            server_text: row.get(7)?,
            server_category: row.get(8)?,
            server_stamp: row.get(9)?,
            resolved_as: row.get(10)?,
            resolved_at: row.get(11)?,
        })
    }
}

impl QuoteRepository for SqliteQuoteRepository<'_> {
    fn load_all(&self) -> Result<Vec<Quote>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, server_id, text, category, created_at, updated_at, dirty
             FROM quotes
             ORDER BY created_at ASC, id ASC",
        )?;

        let quotes = stmt
            .query_map([], Self::parse_quote)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(quotes)
    }

    fn upsert(&self, quote: &Quote) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO quotes (id, server_id, text, category, created_at, updated_at, dirty)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                quote.id.as_str(),
                quote.server_id,
                quote.text,
                quote.category,
                quote.created_at,
                quote.updated_at,
                i32::from(quote.dirty)
            ],
        )?;

        Ok(())
    }

    fn replace_all(&self, quotes: &[Quote]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;

        tx.execute("DELETE FROM quotes", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO quotes (id, server_id, text, category, created_at, updated_at, dirty)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
            )?;
            for quote in quotes {
                stmt.execute(params![
                    quote.id.as_str(),
                    quote.server_id,
                    quote.text,
                    quote.category,
                    quote.created_at,
                    quote.updated_at,
                    i32::from(quote.dirty)
                ])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn append_conflict(&self, conflict: &SyncConflict) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO sync_conflicts (
                quote_id, server_id, reason,
                local_text, local_category, local_updated_at,
                server_text, server_category, server_stamp,
                resolved_as, resolved_at
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                conflict.quote_id,
                conflict.server_id,
                conflict.reason,
                conflict.local_text,
                conflict.local_category,
                conflict.local_updated_at,
                conflict.server_text,
                conflict.server_category,
                conflict.server_stamp,
                conflict.resolved_as,
                conflict.resolved_at
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn list_conflicts(&self, limit: usize) -> Result<Vec<SyncConflict>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, quote_id, server_id, reason,
                    local_text, local_category, local_updated_at,
                    server_text, server_category, server_stamp,
                    resolved_as, resolved_at
             FROM sync_conflicts
             ORDER BY resolved_at DESC, id DESC
             LIMIT ?",
        )?;

        let conflicts = stmt
            .query_map(params![limit as i64], Self::parse_conflict)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(conflicts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::RESOLVED_AS_SERVER;

    fn setup() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn conflict(quote_id: &str, resolved_at: i64) -> SyncConflict {
        SyncConflict {
            id: 0,
            quote_id: quote_id.to_string(),
            server_id: "9".to_string(),
            reason: "both sides changed since last sync".to_string(),
            local_text: "local".to_string(),
            local_category: "Life".to_string(),
            local_updated_at: resolved_at - 50,
            server_text: "server".to_string(),
            server_category: "Work".to_string(),
            server_stamp: resolved_at,
            resolved_as: RESOLVED_AS_SERVER.to_string(),
            resolved_at,
        }
    }

    #[test]
    fn test_upsert_and_load_all() {
        let db = setup();
        let repo = SqliteQuoteRepository::new(db.connection());

        let mut first = Quote::new("First", "Life");
        first.created_at = 100;
        let mut second = Quote::new("Second", "Work");
        second.created_at = 200;
        second.server_id = Some("42".to_string());

        repo.upsert(&second).unwrap();
        repo.upsert(&first).unwrap();

        let loaded = repo.load_all().unwrap();
        assert_eq!(loaded.len(), 2);
        // Oldest first regardless of insertion order
        assert_eq!(loaded[0].text, "First");
        assert_eq!(loaded[1].server_id, Some("42".to_string()));
        assert!(loaded[0].dirty);
    }

    #[test]
    fn test_upsert_overwrites_same_id() {
        let db = setup();
        let repo = SqliteQuoteRepository::new(db.connection());

        let mut quote = Quote::new("Before", "Life");
        repo.upsert(&quote).unwrap();

        quote.text = "After".to_string();
        quote.dirty = false;
        repo.upsert(&quote).unwrap();

        let loaded = repo.load_all().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].text, "After");
        assert!(!loaded[0].dirty);
    }

    #[test]
    fn test_replace_all() {
        let db = setup();
        let repo = SqliteQuoteRepository::new(db.connection());

        repo.upsert(&Quote::new("Old", "Life")).unwrap();

        let replacement = vec![Quote::new("New 1", "Life"), Quote::new("New 2", "Work")];
        repo.replace_all(&replacement).unwrap();

        let loaded = repo.load_all().unwrap();
        assert_eq!(loaded.len(), 2);
        assert!(loaded.iter().all(|quote| quote.text.starts_with("New")));
    }

    #[test]
    fn test_replace_all_with_empty_clears() {
        let db = setup();
        let repo = SqliteQuoteRepository::new(db.connection());

        repo.upsert(&Quote::new("Only", "Life")).unwrap();
        repo.replace_all(&[]).unwrap();

        assert!(repo.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_append_and_list_conflicts() {
        let db = setup();
        let repo = SqliteQuoteRepository::new(db.connection());

        let first_id = repo.append_conflict(&conflict("a", 1_000)).unwrap();
        let second_id = repo.append_conflict(&conflict("b", 2_000)).unwrap();
        assert!(second_id > first_id);

        let conflicts = repo.list_conflicts(10).unwrap();
        assert_eq!(conflicts.len(), 2);
        // Most recent first
        assert_eq!(conflicts[0].quote_id, "b");
        assert_eq!(conflicts[1].quote_id, "a");
        assert_eq!(conflicts[0].resolved_as, RESOLVED_AS_SERVER);
    }

    #[test]
    fn test_list_conflicts_respects_limit() {
        let db = setup();
        let repo = SqliteQuoteRepository::new(db.connection());

        for i in 0..5 {
            repo.append_conflict(&conflict("q", 1_000 + i)).unwrap();
        }

        let conflicts = repo.list_conflicts(2).unwrap();
        assert_eq!(conflicts.len(), 2);
        assert_eq!(conflicts[0].resolved_at, 1_004);
    }
}
