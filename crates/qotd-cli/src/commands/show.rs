use std::path::Path;

use crate::commands::common::open_service;
use crate::error::CliError;

pub async fn run_show(
    category: Option<&str>,
    db_path: &Path,
    remote_url: &str,
) -> Result<(), CliError> {
    let service = open_service(db_path, remote_url)?;

    let Some(quote) = service.random_quote(category).await else {
        let filter = match category {
            Some(category) => Some(category.to_string()),
            None => service.category_filter().await,
        };
        if filter.is_some() {
            println!("No quotes in this category.");
        } else {
            println!("No quotes yet.");
        }
        return Ok(());
    };

    println!("\"{}\"", quote.text);
    println!("    [{}]", quote.category);
    Ok(())
}
