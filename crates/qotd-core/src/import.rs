//! Quote import parsing.
//!
//! Imports accept either a bare JSON array or an object wrapping one under
//! a `quotes` key. Entries may be plain strings or records with `text`,
//! `category`, and `updatedAt` fields. Entries that cannot be coerced into
//! a usable quote are dropped and counted, never fatal.

use crate::error::{Error, Result};
use crate::models::DEFAULT_CATEGORY;
use crate::util::{normalize_category, normalize_text_option};

/// One entry parsed out of an import payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedQuote {
    pub text: String,
    pub category: String,
    pub updated_at: i64,
}

/// Everything a payload yielded, plus how many entries were unusable
#[derive(Debug, Default)]
pub struct ParsedImport {
    pub quotes: Vec<ImportedQuote>,
    pub dropped: usize,
}

/// Outcome of applying an import to the collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Quotes actually added
    pub imported: usize,
    /// Entries dropped as unusable or skipped as duplicates
    pub skipped: usize,
}

/// Parse an import payload. `now_ms` stamps entries without a timestamp.
pub fn parse_import(payload: &str, now_ms: i64) -> Result<ParsedImport> {
    let value: serde_json::Value = serde_json::from_str(payload)?;

    let entries = match &value {
        serde_json::Value::Array(entries) => entries.as_slice(),
        serde_json::Value::Object(fields) => fields
            .get("quotes")
            .and_then(serde_json::Value::as_array)
            .map(Vec::as_slice)
            .ok_or_else(|| {
                Error::InvalidInput(
                    "import payload must be a quote array or an object with a quotes array".into(),
                )
            })?,
        _ => {
            return Err(Error::InvalidInput(
                "import payload must be a quote array or an object with a quotes array".into(),
            ))
        }
    };

    let mut parsed = ParsedImport::default();
    for entry in entries {
        match coerce_entry(entry, now_ms) {
            Some(quote) => parsed.quotes.push(quote),
            None => parsed.dropped += 1,
        }
    }

    Ok(parsed)
}

fn coerce_entry(entry: &serde_json::Value, now_ms: i64) -> Option<ImportedQuote> {
    match entry {
        serde_json::Value::String(text) => {
            let text = normalize_text_option(Some(text.clone()))?;
            Some(ImportedQuote {
                text,
                category: DEFAULT_CATEGORY.to_string(),
                updated_at: now_ms,
            })
        }
        serde_json::Value::Object(fields) => {
            let text = fields
                .get("text")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string);
            let text = normalize_text_option(text)?;
            let category =
                normalize_category(fields.get("category").and_then(serde_json::Value::as_str));
            let updated_at = fields
                .get("updatedAt")
                .or_else(|| fields.get("updated_at"))
                .and_then(serde_json::Value::as_i64)
                .unwrap_or(now_ms);

            Some(ImportedQuote {
                text,
                category,
                updated_at,
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const NOW: i64 = 99_000;

    #[test]
    fn parses_bare_string_array() {
        let parsed = parse_import(r#"["One liner", "  Another  "]"#, NOW).unwrap();

        assert_eq!(parsed.dropped, 0);
        assert_eq!(parsed.quotes.len(), 2);
        assert_eq!(parsed.quotes[0].text, "One liner");
        assert_eq!(parsed.quotes[0].category, DEFAULT_CATEGORY);
        assert_eq!(parsed.quotes[0].updated_at, NOW);
        assert_eq!(parsed.quotes[1].text, "Another");
    }

    #[test]
    fn parses_wrapped_object_payload() {
        let payload = r#"{"quotes": [{"text": "Wrapped", "category": "Work"}]}"#;
        let parsed = parse_import(payload, NOW).unwrap();

        assert_eq!(parsed.quotes.len(), 1);
        assert_eq!(parsed.quotes[0].category, "Work");
    }

    #[test]
    fn record_entries_default_missing_fields() {
        let payload = r#"[
            {"text": "Full", "category": "Life", "updatedAt": 123},
            {"text": "Snake case stamp", "updated_at": 456},
            {"text": "Bare"}
        ]"#;
        let parsed = parse_import(payload, NOW).unwrap();

        assert_eq!(parsed.quotes[0].updated_at, 123);
        assert_eq!(parsed.quotes[1].updated_at, 456);
        assert_eq!(parsed.quotes[1].category, DEFAULT_CATEGORY);
        assert_eq!(parsed.quotes[2].updated_at, NOW);
    }

    #[test]
    fn unusable_entries_are_dropped_and_counted() {
        let payload = r#"[
            "Kept",
            "",
            "   ",
            {"text": "   "},
            {"category": "No text"},
            42,
            null
        ]"#;
        let parsed = parse_import(payload, NOW).unwrap();

        assert_eq!(parsed.quotes.len(), 1);
        assert_eq!(parsed.quotes[0].text, "Kept");
        assert_eq!(parsed.dropped, 6);
    }

    #[test]
    fn blank_category_falls_back_to_default() {
        let parsed = parse_import(r#"[{"text": "Q", "category": "  "}]"#, NOW).unwrap();
        assert_eq!(parsed.quotes[0].category, DEFAULT_CATEGORY);
    }

    #[test]
    fn rejects_payloads_without_a_quote_array() {
        assert!(parse_import(r#"{"notes": []}"#, NOW).is_err());
        assert!(parse_import("\"just a string\"", NOW).is_err());
        assert!(parse_import("not json at all", NOW).is_err());
    }

    #[test]
    fn empty_array_imports_nothing() {
        let parsed = parse_import("[]", NOW).unwrap();
        assert!(parsed.quotes.is_empty());
        assert_eq!(parsed.dropped, 0);
    }
}
