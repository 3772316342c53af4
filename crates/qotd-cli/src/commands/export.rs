use std::path::{Path, PathBuf};

use qotd_core::export::DEFAULT_EXPORT_FILE_NAME;

use crate::commands::common::open_service;
use crate::error::CliError;

pub async fn run_export(
    output_path: Option<&Path>,
    db_path: &Path,
    remote_url: &str,
) -> Result<(), CliError> {
    let service = open_service(db_path, remote_url)?;
    let rendered = service.export_json().await?;

    let path = output_path.map_or_else(
        || PathBuf::from(DEFAULT_EXPORT_FILE_NAME),
        Path::to_path_buf,
    );
    std::fs::write(&path, rendered)?;
    println!("{}", path.display());

    Ok(())
}
