use std::path::Path;

use crate::commands::common::open_service;
use crate::error::CliError;

pub async fn run_import(file: &Path, db_path: &Path, remote_url: &str) -> Result<(), CliError> {
    let payload = std::fs::read_to_string(file)?;

    let service = open_service(db_path, remote_url)?;
    let report = service.import_quotes(&payload).await?;

    println!(
        "Imported {} quotes, skipped {}",
        report.imported, report.skipped
    );
    Ok(())
}
