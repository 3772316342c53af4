use std::path::Path;

use crate::commands::common::{
    format_quote_lines, open_service, quote_to_list_item, recent_quotes, QuoteListItem,
};
use crate::error::CliError;

pub async fn run_list(
    category: Option<&str>,
    all: bool,
    limit: usize,
    as_json: bool,
    db_path: &Path,
    remote_url: &str,
) -> Result<(), CliError> {
    let service = open_service(db_path, remote_url)?;

    let filter = if all {
        None
    } else if let Some(category) = category {
        // A requested category becomes the saved filter
        service.set_category_filter(Some(category)).await?;
        Some(category.to_string())
    } else {
        service.category_filter().await
    };

    let quotes = recent_quotes(&service, filter.as_deref(), limit).await;

    if as_json {
        let json_items = quotes
            .iter()
            .map(quote_to_list_item)
            .collect::<Vec<QuoteListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else {
        for line in format_quote_lines(&quotes) {
            println!("{line}");
        }
    }

    Ok(())
}
