use std::env;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::Utc;
use qotd_core::models::SyncConflict;
use qotd_core::remote::{DEFAULT_ENDPOINT, RemoteClient};
use qotd_core::services::QuoteService;
use qotd_core::Quote;
use serde::Serialize;

use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct QuoteListItem {
    pub id: String,
    pub preview: String,
    pub text: String,
    pub category: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub relative_time: String,
    pub pending_push: bool,
}

#[derive(Debug, Serialize)]
pub struct SyncConflictItem {
    pub id: i64,
    pub quote_id: String,
    pub server_id: String,
    pub reason: String,
    pub local_text: String,
    pub local_category: String,
    pub local_updated_at: i64,
    pub server_text: String,
    pub server_category: String,
    pub server_stamp: i64,
    pub resolved_as: String,
    pub resolved_at: i64,
    pub resolved_at_iso: String,
}

pub fn open_service(db_path: &Path, remote_url: &str) -> Result<QuoteService, CliError> {
    let remote = RemoteClient::new(remote_url).map_err(qotd_core::Error::from)?;
    Ok(QuoteService::open(db_path, remote)?)
}

/// Most recent quotes first, capped at `limit`.
pub async fn recent_quotes(
    service: &QuoteService,
    category: Option<&str>,
    limit: usize,
) -> Vec<Quote> {
    // Collection order is oldest first
    let mut quotes = service.list_quotes(category).await;
    quotes.reverse();
    quotes.truncate(limit);
    quotes
}

pub fn format_quote_lines(quotes: &[Quote]) -> Vec<String> {
    let now_ms = Utc::now().timestamp_millis();
    quotes
        .iter()
        .map(|quote| {
            let short_id = short_quote_id(&quote.id.as_str());
            let preview = quote_preview(quote, 40);
            let relative_time = format_relative_time(quote.updated_at, now_ms);
            let marker = if quote.dirty { " *" } else { "" };

            format!(
                "{short_id:<13}  {preview:<40}  {:<12}  {relative_time}{marker}",
                quote.category
            )
        })
        .collect()
}

pub fn quote_to_list_item(quote: &Quote) -> QuoteListItem {
    let now_ms = Utc::now().timestamp_millis();

    QuoteListItem {
        id: quote.id.as_str(),
        preview: quote_preview(quote, 80),
        text: quote.text.clone(),
        category: quote.category.clone(),
        created_at: quote.created_at,
        updated_at: quote.updated_at,
        relative_time: format_relative_time(quote.updated_at, now_ms),
        pending_push: quote.dirty,
    }
}

pub fn sync_conflict_to_item(conflict: &SyncConflict) -> SyncConflictItem {
    SyncConflictItem {
        id: conflict.id,
        quote_id: conflict.quote_id.clone(),
        server_id: conflict.server_id.clone(),
        reason: conflict.reason.clone(),
        local_text: conflict.local_text.clone(),
        local_category: conflict.local_category.clone(),
        local_updated_at: conflict.local_updated_at,
        server_text: conflict.server_text.clone(),
        server_category: conflict.server_category.clone(),
        server_stamp: conflict.server_stamp,
        resolved_as: conflict.resolved_as.clone(),
        resolved_at: conflict.resolved_at,
        resolved_at_iso: format_sync_timestamp(conflict.resolved_at),
    }
}

pub fn format_sync_conflict_lines(conflicts: &[SyncConflict]) -> Vec<String> {
    conflicts
        .iter()
        .map(|conflict| {
            format!(
                "{}  {:<6}  quote={}  server={}  local=\"{}\"  kept=\"{}\"",
                format_sync_timestamp(conflict.resolved_at),
                conflict.resolved_as,
                short_quote_id(&conflict.quote_id),
                conflict.server_id,
                text_preview(&conflict.local_text, 28),
                text_preview(&conflict.server_text, 28)
            )
        })
        .collect()
}

pub fn short_quote_id(id: &str) -> String {
    id.chars().take(13).collect()
}

pub fn quote_preview(quote: &Quote, max_chars: usize) -> String {
    text_preview(&quote.text, max_chars)
}

pub fn text_preview(text: &str, max_chars: usize) -> String {
    let first_line = text.lines().next().unwrap_or("").trim();
    let collapsed = first_line.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn format_sync_timestamp(timestamp_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp_ms).map_or_else(
        || timestamp_ms.to_string(),
        |date_time| date_time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}

pub fn resolve_quote_text(text_parts: &[String]) -> Result<String, CliError> {
    if let Some(text) = normalize_text(&text_parts.join(" ")) {
        return Ok(text);
    }

    if let Some(text) = read_piped_stdin()? {
        return Ok(text);
    }

    if let Some(text) = capture_editor_input()? {
        return Ok(text);
    }

    Err(CliError::EmptyText)
}

pub fn normalize_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn normalize_quote_identifier(id: &str) -> Result<String, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyQuoteId)
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(normalize_text(&buffer))
}

pub fn capture_editor_input() -> Result<Option<String>, CliError> {
    capture_editor_input_with_initial("")
}

pub fn capture_editor_input_with_initial(initial_text: &str) -> Result<Option<String>, CliError> {
    let editor = preferred_editor();
    let temp_file = create_temp_quote_file_path();
    std::fs::write(&temp_file, initial_text)?;

    let launch_result = launch_editor(&editor, &temp_file);
    let quote_text = std::fs::read_to_string(&temp_file)?;
    let _ = std::fs::remove_file(&temp_file);

    launch_result?;
    Ok(normalize_text(&quote_text))
}

pub fn launch_editor(editor: &str, file_path: &Path) -> Result<(), CliError> {
    match Command::new(editor).arg(file_path).status() {
        Ok(status) => {
            if status.success() {
                Ok(())
            } else {
                Err(CliError::EditorFailed(format!(
                    "`{editor}` exited with status {status}"
                )))
            }
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            let mut parts = editor.split_whitespace();
            let Some(program) = parts.next() else {
                return Err(CliError::EditorFailed("empty EDITOR command".into()));
            };

            let mut command = Command::new(program);
            command.args(parts).arg(file_path);

            let status = command.status()?;
            if status.success() {
                Ok(())
            } else {
                Err(CliError::EditorFailed(format!(
                    "`{editor}` exited with status {status}"
                )))
            }
        }
        Err(err) => Err(CliError::Io(err)),
    }
}

pub fn preferred_editor() -> String {
    env::var("VISUAL")
        .or_else(|_| env::var("EDITOR"))
        .unwrap_or_else(|_| default_editor().to_string())
}

pub const fn default_editor() -> &'static str {
    if cfg!(windows) {
        "notepad"
    } else {
        "vi"
    }
}

pub fn create_temp_quote_file_path() -> PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_nanos());
    env::temp_dir().join(format!("qotd-quote-{}-{now}.txt", std::process::id()))
}

pub fn resolve_db_path(cli_db_path: Option<PathBuf>) -> PathBuf {
    cli_db_path
        .or_else(|| env::var_os("QOTD_DB_PATH").map(PathBuf::from))
        .unwrap_or_else(default_db_path)
}

pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| panic!("Failed to resolve CLI data directory"))
        .join("qotd")
        .join("qotd.db")
}

pub fn resolve_remote_url(cli_remote: Option<String>) -> String {
    cli_remote
        .or_else(|| env::var("QOTD_REMOTE_URL").ok())
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
}
