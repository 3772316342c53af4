//! Persisted store state model

use serde::{Deserialize, Serialize};

/// Durable sync and filter state, one typed record validated on load.
///
/// Absent or unreadable persisted values fall back to these defaults
/// instead of failing startup.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoreState {
    /// When the last successful sync cycle finished (Unix ms)
    pub last_sync_ms: Option<i64>,
    /// Category filter remembered across sessions (`None` means all)
    pub last_category: Option<String>,
}
