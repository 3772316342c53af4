//! Database migrations

use crate::error::Result;
use rusqlite::Connection;

/// Current schema version
const CURRENT_VERSION: i32 = 2;

/// Run all pending migrations
pub fn run(conn: &Connection) -> Result<()> {
    let version = get_version(conn)?;

    if version < 1 {
        migrate_v1(conn)?;
    }
    if version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

/// Get the current schema version
fn get_version(conn: &Connection) -> Result<i32> {
    // Check if schema_version table exists
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| Ok(row.get::<_, i32>(0)? != 0),
    )?;

    if !exists {
        return Ok(0);
    }

    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;

    Ok(version)
}

/// Migration to version 1: Initial schema
fn migrate_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "BEGIN;
        -- Schema version tracking
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );
        -- Quotes table
        CREATE TABLE IF NOT EXISTS quotes (
            id TEXT PRIMARY KEY,
            server_id TEXT,
            text TEXT NOT NULL,
            category TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL,
            dirty INTEGER NOT NULL DEFAULT 0
        );
        CREATE UNIQUE INDEX IF NOT EXISTS idx_quotes_server_id
            ON quotes(server_id) WHERE server_id IS NOT NULL;
        CREATE INDEX IF NOT EXISTS idx_quotes_updated ON quotes(updated_at DESC);
        CREATE INDEX IF NOT EXISTS idx_quotes_category ON quotes(category);
        -- Store state table (local only)
        CREATE TABLE IF NOT EXISTS store_state (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        -- Record migration version
        INSERT INTO schema_version (version) VALUES (1);
        COMMIT;",
    )?;

    tracing::info!("Migrated database to version 1");
    Ok(())
}

/// Migration to version 2: Server-wins conflict logging support
fn migrate_v2(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "BEGIN;
        CREATE TABLE IF NOT EXISTS sync_conflicts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            quote_id TEXT NOT NULL,
            server_id TEXT NOT NULL,
            reason TEXT NOT NULL,
            local_text TEXT NOT NULL,
            local_category TEXT NOT NULL,
            local_updated_at INTEGER NOT NULL,
            server_text TEXT NOT NULL,
            server_category TEXT NOT NULL,
            server_stamp INTEGER NOT NULL,
            resolved_as TEXT NOT NULL,
            resolved_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_sync_conflicts_quote_id ON sync_conflicts(quote_id);
        CREATE INDEX IF NOT EXISTS idx_sync_conflicts_resolved_at ON sync_conflicts(resolved_at DESC);
        INSERT INTO schema_version (version) VALUES (2);
        COMMIT;",
    )?;

    tracing::info!("Migrated database to version {CURRENT_VERSION}");
    Ok(())
}
