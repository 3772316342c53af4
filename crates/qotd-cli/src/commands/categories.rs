use std::path::Path;

use crate::commands::common::open_service;
use crate::error::CliError;

pub async fn run_categories(db_path: &Path, remote_url: &str) -> Result<(), CliError> {
    let service = open_service(db_path, remote_url)?;
    let active = service.category_filter().await;

    for (category, count) in service.category_counts().await {
        let marker = if active.as_deref() == Some(category.as_str()) {
            " (active filter)"
        } else {
            ""
        };
        println!("{category:<16}  {count}{marker}");
    }

    Ok(())
}
