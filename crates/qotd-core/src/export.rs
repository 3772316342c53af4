//! Quote export helpers.

use serde::{Deserialize, Serialize};

use crate::Quote;

/// Default file name for export flows
pub const DEFAULT_EXPORT_FILE_NAME: &str = "quotes.json";

/// Serializable quote representation used in JSON exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportQuote {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub server_id: Option<String>,
    pub text: String,
    pub category: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub dirty: bool,
}

/// Convert a quote into an export record.
#[must_use]
pub fn quote_to_export_item(quote: &Quote) -> ExportQuote {
    ExportQuote {
        id: quote.id.to_string(),
        server_id: quote.server_id.clone(),
        text: quote.text.clone(),
        category: quote.category.clone(),
        created_at: quote.created_at,
        updated_at: quote.updated_at,
        dirty: quote.dirty,
    }
}

/// Render quotes as pretty-printed JSON.
pub fn render_quotes_export(quotes: &[Quote]) -> serde_json::Result<String> {
    let items = quotes
        .iter()
        .map(quote_to_export_item)
        .collect::<Vec<ExportQuote>>();
    serde_json::to_string_pretty(&items)
}
