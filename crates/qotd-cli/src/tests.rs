use pretty_assertions::assert_eq;
use qotd_core::models::{RESOLVED_AS_SERVER, SyncConflict};
use qotd_core::remote::DEFAULT_ENDPOINT;
use qotd_core::Quote;

use crate::cli::CompletionShell;
use crate::commands::add::run_add;
use crate::commands::common::{
    default_editor, format_quote_lines, format_relative_time, format_sync_conflict_lines,
    format_sync_timestamp, normalize_quote_identifier, normalize_text, open_service,
    quote_preview, resolve_quote_text, resolve_remote_url, short_quote_id,
};
use crate::commands::completions::run_completions;
use crate::commands::edit::run_edit;
use crate::commands::export::run_export;
use crate::commands::import::run_import;
use crate::commands::list::run_list;
use crate::commands::sync::run_sync;
use crate::error::CliError;

/// Connection-refused endpoint; commands that never fetch leave it untouched.
const TEST_REMOTE: &str = "http://127.0.0.1:1/posts";

#[test]
fn normalize_text_trims_and_rejects_empty() {
    assert_eq!(normalize_text("  hello  "), Some("hello".to_string()));
    assert_eq!(normalize_text(" \n\t "), None);
}

#[test]
fn normalize_text_keeps_multiline_text() {
    assert_eq!(
        normalize_text("line 1\nline 2\n"),
        Some("line 1\nline 2".to_string())
    );
}

#[test]
fn default_editor_is_defined() {
    assert!(!default_editor().is_empty());
}

#[test]
fn normalize_quote_identifier_rejects_empty() {
    assert!(matches!(
        normalize_quote_identifier(" \n "),
        Err(CliError::EmptyQuoteId)
    ));
    assert_eq!(
        normalize_quote_identifier("  abc123  ").unwrap(),
        "abc123".to_string()
    );
}

#[test]
fn resolve_quote_text_joins_argument_parts() {
    let text = resolve_quote_text(&["Stay".to_string(), "curious.".to_string()]).unwrap();
    assert_eq!(text, "Stay curious.");
}

#[test]
fn resolve_remote_url_prefers_flag_then_default() {
    let resolved = resolve_remote_url(Some("https://api.example.com/quotes".to_string()));
    assert_eq!(resolved, "https://api.example.com/quotes");

    std::env::remove_var("QOTD_REMOTE_URL");
    assert_eq!(resolve_remote_url(None), DEFAULT_ENDPOINT);
}

#[test]
fn format_relative_time_units() {
    let now = 10_000_000;
    assert_eq!(format_relative_time(now - 30_000, now), "just now");
    assert_eq!(format_relative_time(now - 120_000, now), "2m ago");
    assert_eq!(format_relative_time(now - 2 * 60 * 60_000, now), "2h ago");
}

#[test]
fn quote_preview_truncates_with_ellipsis() {
    let quote = Quote::new(
        "This is a very long sentence that should be shortened",
        "Life",
    );
    let preview = quote_preview(&quote, 20);
    assert_eq!(preview, "This is a very lo...");
}

#[test]
fn format_sync_timestamp_returns_utc_label() {
    assert_eq!(format_sync_timestamp(0), "1970-01-01 00:00:00 UTC");
}

#[test]
fn short_quote_id_keeps_first_13_chars() {
    assert_eq!(
        short_quote_id("11111111-1111-7111-8111-111111111111"),
        "11111111-1111"
    );
}

#[test]
fn format_quote_lines_mark_pending_push() {
    let mut settled = Quote::new("Settled words", "Life");
    settled.dirty = false;
    let fresh = Quote::new("Fresh words", "Life");

    let lines = format_quote_lines(&[settled, fresh]);
    assert_eq!(lines.len(), 2);
    assert!(!lines[0].ends_with(" *"));
    assert!(lines[1].ends_with(" *"));
    assert!(lines[1].contains("Fresh words"));
}

#[test]
fn format_sync_conflict_lines_include_key_fields() {
    let conflicts = vec![SyncConflict {
        id: 1,
        quote_id: "11111111-1111-7111-8111-111111111111".to_string(),
        server_id: "42".to_string(),
        reason: "both sides changed since last sync".to_string(),
        local_text: "Local words".to_string(),
        local_category: "Life".to_string(),
        local_updated_at: 200,
        server_text: "Server words".to_string(),
        server_category: "General".to_string(),
        server_stamp: 150,
        resolved_as: RESOLVED_AS_SERVER.to_string(),
        resolved_at: 300,
    }];

    let rendered = format_sync_conflict_lines(&conflicts);
    assert_eq!(rendered.len(), 1);
    assert!(rendered[0].contains("quote=11111111-1111"));
    assert!(rendered[0].contains("server=42"));
    assert!(rendered[0].contains("local=\"Local words\""));
    assert!(rendered[0].contains("kept=\"Server words\""));
}

#[tokio::test(flavor = "current_thread")]
async fn run_add_persists_quote_with_category() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = tmp.path().join("qotd.db");

    run_add(
        &["Stay".to_string(), "curious.".to_string()],
        Some("Life"),
        &db_path,
        TEST_REMOTE,
    )
    .await
    .unwrap();

    let service = open_service(&db_path, TEST_REMOTE).unwrap();
    let quotes = service.list_quotes(Some("Life")).await;
    let added = quotes
        .iter()
        .find(|quote| quote.text == "Stay curious.")
        .unwrap();
    assert!(added.dirty);
}

#[tokio::test(flavor = "current_thread")]
async fn run_edit_updates_text_and_category_via_args() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = tmp.path().join("qotd.db");

    let id = {
        let service = open_service(&db_path, TEST_REMOTE).unwrap();
        let quote = service
            .add_quote("Original words", Some("Life"))
            .await
            .unwrap();
        quote.id.as_str()
    };

    run_edit(
        &id,
        &["Better".to_string(), "words".to_string()],
        None,
        &db_path,
        TEST_REMOTE,
    )
    .await
    .unwrap();

    let service = open_service(&db_path, TEST_REMOTE).unwrap();
    let edited = service.find_quote(&id).await.unwrap();
    assert_eq!(edited.text, "Better words");
    assert_eq!(edited.category, "Life");
    assert!(edited.dirty);
    drop(service);

    // Category-only edits never open the editor
    run_edit(&id, &[], Some("Work"), &db_path, TEST_REMOTE)
        .await
        .unwrap();

    let service = open_service(&db_path, TEST_REMOTE).unwrap();
    assert_eq!(service.find_quote(&id).await.unwrap().category, "Work");
}

#[tokio::test(flavor = "current_thread")]
async fn run_list_saves_category_filter() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = tmp.path().join("qotd.db");

    run_list(Some("Programming"), false, 10, false, &db_path, TEST_REMOTE)
        .await
        .unwrap();

    let service = open_service(&db_path, TEST_REMOTE).unwrap();
    assert_eq!(
        service.category_filter().await,
        Some("Programming".to_string())
    );
}

#[tokio::test(flavor = "current_thread")]
async fn run_import_adds_new_quotes() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = tmp.path().join("qotd.db");
    let payload_path = tmp.path().join("import.json");
    std::fs::write(
        &payload_path,
        r#"[{"text": "Imported line", "category": "Work"}]"#,
    )
    .unwrap();

    run_import(&payload_path, &db_path, TEST_REMOTE)
        .await
        .unwrap();

    let service = open_service(&db_path, TEST_REMOTE).unwrap();
    let imported = service
        .list_quotes(Some("Work"))
        .await
        .into_iter()
        .find(|quote| quote.text == "Imported line")
        .unwrap();
    assert!(imported.dirty);
}

#[tokio::test(flavor = "current_thread")]
async fn run_export_writes_json_file() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = tmp.path().join("qotd.db");
    let output_path = tmp.path().join("quotes-export.json");

    run_export(Some(&output_path), &db_path, TEST_REMOTE)
        .await
        .unwrap();

    let exported = std::fs::read_to_string(&output_path).unwrap();
    assert!(exported.contains("\"text\": \"Simplicity is the soul of efficiency.\""));
    assert!(exported.contains("\"category\": \"Programming\""));
}

#[tokio::test(flavor = "current_thread")]
async fn run_sync_completes_against_unreachable_remote() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = tmp.path().join("qotd.db");

    run_sync(&db_path, TEST_REMOTE).await.unwrap();

    let service = open_service(&db_path, TEST_REMOTE).unwrap();
    assert!(service.last_sync_ms().await.is_some());
}

#[test]
fn run_completions_writes_bash_script_file() {
    let tmp = tempfile::tempdir().unwrap();
    let output_path = tmp.path().join("qotd.bash");

    run_completions(CompletionShell::Bash, Some(&output_path)).unwrap();

    let script = std::fs::read_to_string(&output_path).unwrap();
    assert!(script.contains("_qotd()"));
    assert!(script.contains("complete -F _qotd"));
    assert!(script.contains(" default qotd"));
}
