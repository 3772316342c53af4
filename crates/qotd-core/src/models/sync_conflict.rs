//! Sync conflict model

use serde::{Deserialize, Serialize};

/// Resolution name recorded on every conflict; the remote value always wins.
pub const RESOLVED_AS_SERVER: &str = "server";

/// Recorded sync conflict, resolved by preferring the server value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConflict {
    /// Conflict row identifier (assigned by the store on insert)
    pub id: i64,
    /// Local quote involved in the conflict
    pub quote_id: String,
    /// Remote identity both sides share
    pub server_id: String,
    /// Why the conflict was flagged
    pub reason: String,
    /// Local text before the overwrite
    pub local_text: String,
    /// Local category before the overwrite
    pub local_category: String,
    /// Local modification timestamp when the conflict occurred (Unix ms)
    pub local_updated_at: i64,
    /// Remote text that won
    pub server_text: String,
    /// Remote category that won
    pub server_category: String,
    /// Fetch timestamp of the remote snapshot (Unix ms)
    pub server_stamp: i64,
    /// Winning side, always "server"
    pub resolved_as: String,
    /// Resolution timestamp (Unix ms)
    pub resolved_at: i64,
}
