//! Shared quote service used by every qotd interface.
//!
//! The service owns the database handle, the in-memory collection, and the
//! remote client. All mutable state sits behind one async mutex; the lock
//! is never held across a network round trip.

use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use rand::Rng;
use tokio::sync::{broadcast, Mutex};

use crate::collection::{default_quotes, QuoteCollection};
use crate::db::{
    Database, QuoteRepository, SqliteQuoteRepository, SqliteStateRepository, StateRepository,
};
use crate::error::{Error, Result};
use crate::export::render_quotes_export;
use crate::import::{parse_import, ImportReport};
use crate::models::{Quote, QuoteId, StoreState, SyncConflict};
use crate::remote::RemoteClient;
use crate::util::{normalize_category, normalize_text_option, unix_timestamp_ms};

/// Store change notifications for interested frontends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    /// Collection content changed
    QuotesChanged,
    /// The persisted category filter changed
    FilterChanged,
    /// A sync cycle finished
    SyncCompleted,
}

/// Everything behind the service lock
pub(super) struct ServiceState {
    pub(super) db: Database,
    pub(super) collection: QuoteCollection,
    pub(super) store_state: StoreState,
    /// Quote most recently shown by this process, not persisted
    pub(super) last_viewed: Option<QuoteId>,
}

/// Thread-safe service for collection, store, and sync operations.
#[derive(Clone)]
pub struct QuoteService {
    pub(super) state: Arc<Mutex<ServiceState>>,
    pub(super) remote: RemoteClient,
    pub(super) sync_in_flight: Arc<AtomicBool>,
    pub(super) events: broadcast::Sender<StoreEvent>,
}

impl QuoteService {
    /// Open the service over a database file, creating it if needed.
    ///
    /// An empty store is seeded with the built-in quotes.
    pub fn open(db_path: impl Into<PathBuf>, remote: RemoteClient) -> Result<Self> {
        let db_path = db_path.into();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Self::open_database_with_recovery(&db_path)?;
        Self::from_database(db, remote)
    }

    /// Open an in-memory service (primarily for tests).
    pub fn open_in_memory(remote: RemoteClient) -> Result<Self> {
        Self::from_database(Database::open_in_memory()?, remote)
    }

    fn from_database(db: Database, remote: RemoteClient) -> Result<Self> {
        let mut quotes = SqliteQuoteRepository::new(db.connection()).load_all()?;
        if quotes.is_empty() {
            quotes = default_quotes();
            SqliteQuoteRepository::new(db.connection()).replace_all(&quotes)?;
            tracing::info!("Seeded empty store with {} default quotes", quotes.len());
        }

        let store_state = SqliteStateRepository::new(db.connection()).load()?;
        let (events, _) = broadcast::channel(16);

        Ok(Self {
            state: Arc::new(Mutex::new(ServiceState {
                db,
                collection: QuoteCollection::new(quotes),
                store_state,
                last_viewed: None,
            })),
            remote,
            sync_in_flight: Arc::new(AtomicBool::new(false)),
            events,
        })
    }

    fn open_database_with_recovery(db_path: &Path) -> Result<Database> {
        match Database::open(db_path) {
            Ok(db) => Ok(db),
            Err(error) if Self::is_corrupted_db_error(&error) => {
                tracing::warn!(
                    "Detected corrupted database at {}: {}. Quarantining it and starting fresh.",
                    db_path.display(),
                    error
                );
                Self::quarantine_corrupted_db_files(db_path)?;
                Database::open(db_path)
            }
            Err(error) => Err(error),
        }
    }

    fn is_corrupted_db_error(error: &Error) -> bool {
        let message = error.to_string().to_ascii_lowercase();
        message.contains("file is not a database")
            || message.contains("database disk image is malformed")
    }

    fn quarantine_corrupted_db_files(db_path: &Path) -> Result<()> {
        if db_path.exists() {
            let timestamp = unix_timestamp_ms();
            let base_name = db_path
                .file_name()
                .map_or_else(|| "qotd.db".to_string(), |n| n.to_string_lossy().to_string());
            let backup_path = db_path.with_file_name(format!("{base_name}.corrupt-{timestamp}"));

            std::fs::rename(db_path, &backup_path)?;
            tracing::warn!(
                "Moved corrupted database file from {} to {}",
                db_path.display(),
                backup_path.display()
            );
        }

        // WAL and shm sidecars of the old file are stale once it moves
        let Some(parent) = db_path.parent() else {
            return Ok(());
        };
        let Some(base_name) = db_path.file_name().and_then(|name| name.to_str()) else {
            return Ok(());
        };
        let sidecar_prefix = format!("{base_name}-");

        for entry in std::fs::read_dir(parent)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let file_name = entry.file_name();
            let file_name = file_name.to_string_lossy();
            if file_name.starts_with(&sidecar_prefix) {
                let path = entry.path();
                std::fs::remove_file(&path)?;
                tracing::warn!("Removed stale database sidecar {}", path.display());
            }
        }

        Ok(())
    }

    /// Subscribe to store change events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Endpoint this service syncs against.
    #[must_use]
    pub fn remote_endpoint(&self) -> &str {
        self.remote.endpoint()
    }

    pub(super) fn emit(&self, event: StoreEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    /// Add a quote to the collection. It stays dirty until pushed.
    pub async fn add_quote(&self, text: &str, category: Option<&str>) -> Result<Quote> {
        let text = normalize_text_option(Some(text.to_string()))
            .ok_or_else(|| Error::InvalidInput("quote text cannot be empty".to_string()))?;
        let quote = Quote::new(text, normalize_category(category));

        {
            let mut guard = self.state.lock().await;
            let state = &mut *guard;
            SqliteQuoteRepository::new(state.db.connection()).upsert(&quote)?;
            state.collection.push(quote.clone());
        }

        self.emit(StoreEvent::QuotesChanged);
        Ok(quote)
    }

    /// Edit a quote's text and/or category, marking it for push.
    pub async fn edit_quote(
        &self,
        id: &QuoteId,
        text: Option<&str>,
        category: Option<&str>,
    ) -> Result<Quote> {
        if text.is_none() && category.is_none() {
            return Err(Error::InvalidInput("nothing to update".to_string()));
        }

        let text = match text {
            Some(text) => Some(
                normalize_text_option(Some(text.to_string()))
                    .ok_or_else(|| Error::InvalidInput("quote text cannot be empty".to_string()))?,
            ),
            None => None,
        };
        let category = category.map(|category| normalize_category(Some(category)));

        let updated = {
            let mut guard = self.state.lock().await;
            let state = &mut *guard;
            let quote = state
                .collection
                .quote_by_id_mut(id)
                .ok_or_else(|| Error::NotFound(id.to_string()))?;

            if let Some(text) = text {
                quote.text = text;
            }
            if let Some(category) = category {
                quote.category = category;
            }
            quote.updated_at = unix_timestamp_ms();
            quote.dirty = true;

            let updated = quote.clone();
            SqliteQuoteRepository::new(state.db.connection()).upsert(&updated)?;
            updated
        };

        self.emit(StoreEvent::QuotesChanged);
        Ok(updated)
    }

    /// Resolve a quote by full id or unambiguous id prefix.
    pub async fn find_quote(&self, query: &str) -> Result<Quote> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::InvalidInput("quote id cannot be empty".to_string()));
        }

        let guard = self.state.lock().await;

        if let Ok(id) = query.parse::<QuoteId>() {
            if let Some(quote) = guard.collection.quote_by_id(&id) {
                return Ok(quote.clone());
            }
        }

        let matches: Vec<&Quote> = guard
            .collection
            .iter()
            .filter(|quote| quote.id.as_str().starts_with(query))
            .collect();

        match matches.as_slice() {
            [] => Err(Error::NotFound(query.to_string())),
            [quote] => Ok((*quote).clone()),
            _ => Err(Error::InvalidInput(format!(
                "id prefix '{query}' matches {} quotes",
                matches.len()
            ))),
        }
    }

    /// Pick a random quote, optionally overriding the persisted filter.
    ///
    /// Returns `None` when no quote matches the effective filter.
    pub async fn random_quote(&self, category: Option<&str>) -> Option<Quote> {
        let mut guard = self.state.lock().await;
        let filter = category
            .map(str::to_string)
            .or_else(|| guard.store_state.last_category.clone());

        let picked = {
            let candidates = guard.collection.filtered(filter.as_deref());
            if candidates.is_empty() {
                None
            } else {
                let index = rand::thread_rng().gen_range(0..candidates.len());
                Some(candidates[index].clone())
            }
        };

        if let Some(quote) = &picked {
            guard.last_viewed = Some(quote.id);
        }
        picked
    }

    /// The quote most recently shown by this process.
    pub async fn last_viewed(&self) -> Option<Quote> {
        let guard = self.state.lock().await;
        let id = guard.last_viewed?;
        guard.collection.quote_by_id(&id).cloned()
    }

    /// Quotes matching the given filter, `None` for all. Insertion order.
    pub async fn list_quotes(&self, category: Option<&str>) -> Vec<Quote> {
        let guard = self.state.lock().await;
        guard
            .collection
            .filtered(category)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Distinct categories, sorted.
    pub async fn categories(&self) -> Vec<String> {
        self.state.lock().await.collection.categories()
    }

    /// Distinct categories with quote counts, sorted by category.
    pub async fn category_counts(&self) -> Vec<(String, usize)> {
        self.state.lock().await.collection.category_counts()
    }

    /// The persisted category filter, if any.
    pub async fn category_filter(&self) -> Option<String> {
        self.state.lock().await.store_state.last_category.clone()
    }

    /// Persist the active category filter. `None` clears it.
    pub async fn set_category_filter(&self, category: Option<&str>) -> Result<()> {
        {
            let mut guard = self.state.lock().await;
            let state = &mut *guard;
            state.store_state.last_category = category
                .map(|category| category.trim().to_string())
                .filter(|category| !category.is_empty());
            SqliteStateRepository::new(state.db.connection()).save(&state.store_state)?;
        }

        self.emit(StoreEvent::FilterChanged);
        Ok(())
    }

    /// Import quotes from a JSON payload, skipping duplicates.
    ///
    /// Imported quotes are dirty so the next sync pushes them.
    pub async fn import_quotes(&self, payload: &str) -> Result<ImportReport> {
        let parsed = parse_import(payload, unix_timestamp_ms())?;

        let mut report = ImportReport {
            imported: 0,
            skipped: parsed.dropped,
        };

        {
            let mut guard = self.state.lock().await;
            let state = &mut *guard;
            let repo = SqliteQuoteRepository::new(state.db.connection());

            for imported in parsed.quotes {
                if state
                    .collection
                    .contains_pair(&imported.text, &imported.category)
                {
                    report.skipped += 1;
                    continue;
                }

                let mut quote = Quote::new(imported.text, imported.category);
                quote.updated_at = imported.updated_at;
                repo.upsert(&quote)?;
                state.collection.push(quote);
                report.imported += 1;
            }
        }

        tracing::info!(
            imported = report.imported,
            skipped = report.skipped,
            "Import finished"
        );
        if report.imported > 0 {
            self.emit(StoreEvent::QuotesChanged);
        }
        Ok(report)
    }

    /// Render the full collection as pretty-printed JSON.
    pub async fn export_json(&self) -> Result<String> {
        let guard = self.state.lock().await;
        Ok(render_quotes_export(guard.collection.quotes())?)
    }

    /// List logged sync conflicts, most recent first.
    pub async fn list_conflicts(&self, limit: usize) -> Result<Vec<SyncConflict>> {
        let guard = self.state.lock().await;
        SqliteQuoteRepository::new(guard.db.connection()).list_conflicts(limit)
    }

    /// When the last successful sync finished, Unix milliseconds.
    pub async fn last_sync_ms(&self) -> Option<i64> {
        self.state.lock().await.store_state.last_sync_ms
    }
}
