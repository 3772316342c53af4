//! Quote model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Category assigned when none is provided
pub const DEFAULT_CATEGORY: &str = "General";

/// A unique identifier for a quote, using UUID v7 (time-sortable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuoteId(Uuid);

impl QuoteId {
    /// Create a new unique quote ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for QuoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for QuoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for QuoteId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A quote in the collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Unique identifier
    pub id: QuoteId,
    /// Identity assigned by the remote collection, once known.
    /// No two quotes may share one.
    pub server_id: Option<String>,
    /// Quote text
    pub text: String,
    /// Category label
    pub category: String,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
    /// Last local modification timestamp (Unix ms)
    pub updated_at: i64,
    /// Set while local changes have not been confirmed pushed
    pub dirty: bool,
}

impl Quote {
    /// Create a locally authored quote, marked dirty until pushed
    #[must_use]
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            id: QuoteId::new(),
            server_id: None,
            text: text.into(),
            category: category.into(),
            created_at: now,
            updated_at: now,
            dirty: true,
        }
    }

    /// Check if quote text is empty (whitespace-only counts as empty)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_id_unique() {
        let id1 = QuoteId::new();
        let id2 = QuoteId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_quote_id_parse() {
        let id = QuoteId::new();
        let parsed: QuoteId = id.as_str().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_quote_new() {
        let quote = Quote::new("Stay curious", "Life");
        assert_eq!(quote.text, "Stay curious");
        assert_eq!(quote.category, "Life");
        assert!(quote.dirty);
        assert!(quote.server_id.is_none());
        assert!(quote.created_at > 0);
        assert_eq!(quote.created_at, quote.updated_at);
    }

    #[test]
    fn test_is_empty() {
        let empty = Quote::new("   ", DEFAULT_CATEGORY);
        assert!(empty.is_empty());

        let not_empty = Quote::new("Hello", DEFAULT_CATEGORY);
        assert!(!not_empty.is_empty());
    }
}
