//! Store state repository implementation

use crate::error::Result;
use crate::models::StoreState;
use rusqlite::{params, Connection};

const KEY_LAST_SYNC_MS: &str = "last_sync_ms";
const KEY_LAST_CATEGORY: &str = "last_category";

/// Trait for store state persistence
pub trait StateRepository {
    /// Load the persisted store state
    fn load(&self) -> Result<StoreState>;

    /// Save the store state
    fn save(&self, state: &StoreState) -> Result<()>;
}

/// `SQLite` implementation of `StateRepository`
pub struct SqliteStateRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteStateRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl StateRepository for SqliteStateRepository<'_> {
    fn load(&self) -> Result<StoreState> {
        let mut state = StoreState::default();

        // Unreadable values fall back to defaults instead of failing the load
        if let Ok(value) = self.get_value(KEY_LAST_SYNC_MS) {
            if let Ok(timestamp) = value.parse() {
                state.last_sync_ms = Some(timestamp);
            }
        }

        if let Ok(value) = self.get_value(KEY_LAST_CATEGORY) {
            if !value.is_empty() {
                state.last_category = Some(value);
            }
        }

        Ok(state)
    }

    fn save(&self, state: &StoreState) -> Result<()> {
        match state.last_sync_ms {
            Some(timestamp) => self.set_value(KEY_LAST_SYNC_MS, &timestamp.to_string())?,
            None => self.clear_value(KEY_LAST_SYNC_MS)?,
        }

        match &state.last_category {
            Some(category) => self.set_value(KEY_LAST_CATEGORY, category)?,
            None => self.clear_value(KEY_LAST_CATEGORY)?,
        }

        Ok(())
    }
}

impl SqliteStateRepository<'_> {
    fn get_value(&self, key: &str) -> Result<String> {
        let result = self.conn.query_row(
            "SELECT value FROM store_state WHERE key = ?",
            params![key],
            |row| row.get(0),
        );

        match result {
            Ok(value) => Ok(value),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                Err(crate::error::Error::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn set_value(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO store_state (key, value) VALUES (?, ?)",
            params![key, value],
        )?;
        Ok(())
    }

    fn clear_value(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM store_state WHERE key = ?", params![key])?;
        Ok(())
    }
}
