use std::path::Path;

use crate::commands::common::{open_service, resolve_quote_text};
use crate::error::CliError;

pub async fn run_add(
    text_parts: &[String],
    category: Option<&str>,
    db_path: &Path,
    remote_url: &str,
) -> Result<(), CliError> {
    let text = resolve_quote_text(text_parts)?;

    let service = open_service(db_path, remote_url)?;
    let quote = service.add_quote(&text, category).await?;

    println!("{}", quote.id);
    Ok(())
}
