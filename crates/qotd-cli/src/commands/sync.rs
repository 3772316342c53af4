use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use qotd_core::services::SyncOutcome;

use crate::commands::common::{
    format_sync_conflict_lines, format_sync_timestamp, open_service, sync_conflict_to_item,
    SyncConflictItem,
};
use crate::error::CliError;

pub async fn run_sync(db_path: &Path, remote_url: &str) -> Result<(), CliError> {
    let service = open_service(db_path, remote_url)?;

    match service.sync().await? {
        SyncOutcome::Completed(summary) => println!("Sync completed: {summary}"),
        SyncOutcome::AlreadyRunning => println!("Sync already in progress, skipped."),
    }
    Ok(())
}

pub async fn run_sync_watch(
    interval_secs: u64,
    db_path: &Path,
    remote_url: &str,
) -> Result<(), CliError> {
    let service = open_service(db_path, remote_url)?;
    let period = Duration::from_secs(interval_secs.max(1));
    println!(
        "Syncing every {}s against {} (Ctrl+C to stop)",
        period.as_secs(),
        service.remote_endpoint()
    );

    let mut ticker = tokio::time::interval(period);
    loop {
        // The first tick fires immediately
        ticker.tick().await;

        // Each cycle runs detached so a slow one cannot stall the ticker;
        // an overlapping tick is dropped by the in-flight guard instead.
        let service = service.clone();
        tokio::spawn(async move {
            let stamp = format_sync_timestamp(Utc::now().timestamp_millis());
            match service.sync().await {
                Ok(SyncOutcome::Completed(summary)) => println!("[{stamp}] {summary}"),
                Ok(SyncOutcome::AlreadyRunning) => {
                    println!("[{stamp}] skipped, previous cycle still running");
                }
                Err(error) => eprintln!("[{stamp}] sync failed: {error}"),
            }
        });
    }
}

pub async fn run_sync_conflicts(
    limit: usize,
    as_json: bool,
    db_path: &Path,
    remote_url: &str,
) -> Result<(), CliError> {
    let service = open_service(db_path, remote_url)?;
    let conflicts = service.list_conflicts(limit).await?;

    if as_json {
        let json_items = conflicts
            .iter()
            .map(sync_conflict_to_item)
            .collect::<Vec<SyncConflictItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
        return Ok(());
    }

    if conflicts.is_empty() {
        println!("No sync conflicts recorded.");
        return Ok(());
    }

    for line in format_sync_conflict_lines(&conflicts) {
        println!("{line}");
    }
    Ok(())
}
