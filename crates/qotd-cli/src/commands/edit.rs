use std::path::Path;

use crate::commands::common::{
    capture_editor_input_with_initial, normalize_quote_identifier, normalize_text, open_service,
};
use crate::error::CliError;

pub async fn run_edit(
    id: &str,
    text_parts: &[String],
    category: Option<&str>,
    db_path: &Path,
    remote_url: &str,
) -> Result<(), CliError> {
    let normalized_id = normalize_quote_identifier(id)?;
    let service = open_service(db_path, remote_url)?;
    let quote = service.find_quote(&normalized_id).await?;

    let new_text = if let Some(text) = normalize_text(&text_parts.join(" ")) {
        Some(text)
    } else if category.is_none() {
        let Some(edited) = capture_editor_input_with_initial(&quote.text)? else {
            return Err(CliError::EmptyEditedText);
        };
        if edited == quote.text {
            println!("{}", quote.id);
            return Ok(());
        }
        Some(edited)
    } else {
        None
    };

    let updated = service
        .edit_quote(&quote.id, new_text.as_deref(), category)
        .await?;
    println!("{}", updated.id);
    Ok(())
}
