//! Sync orchestration: fetch, merge, persist, push, timestamp.
//!
//! The phases of one cycle always run in that order. The remote is never
//! called while the service lock is held.

use std::fmt;
use std::sync::atomic::Ordering;

use crate::db::{QuoteRepository, SqliteQuoteRepository, SqliteStateRepository, StateRepository};
use crate::error::Result;
use crate::merge::{merge_remote, MergeStats};
use crate::models::Quote;
use crate::remote::RemoteQuote;
use crate::services::quotes::{QuoteService, StoreEvent};
use crate::util::unix_timestamp_ms;

/// What one finished sync cycle did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub added: usize,
    pub updated: usize,
    pub conflicted: usize,
    pub pushed: usize,
    /// True when the fetch failed and the cycle degraded to push-only
    pub fetch_failed: bool,
}

impl fmt::Display for SyncSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} added, {} updated, {} conflicts logged, {} pushed",
            self.added, self.updated, self.conflicted, self.pushed
        )?;
        if self.fetch_failed {
            write!(f, " (fetch failed, local changes kept)")?;
        }
        Ok(())
    }
}

/// Outcome of a sync request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The cycle ran to completion
    Completed(SyncSummary),
    /// Another cycle was in flight; nothing was touched
    AlreadyRunning,
}

impl QuoteService {
    /// Run one sync cycle against the remote endpoint.
    ///
    /// At most one cycle runs at a time; a call while another is in flight
    /// returns `AlreadyRunning` without touching any state. A failed fetch
    /// degrades the cycle to push-only rather than aborting it.
    pub async fn sync(&self) -> Result<SyncOutcome> {
        if self.sync_in_flight.swap(true, Ordering::SeqCst) {
            tracing::debug!("Sync already in flight, skipping");
            return Ok(SyncOutcome::AlreadyRunning);
        }

        let result = self.run_sync_cycle().await;
        self.sync_in_flight.store(false, Ordering::SeqCst);

        let summary = result?;
        self.emit(StoreEvent::SyncCompleted);
        Ok(SyncOutcome::Completed(summary))
    }

    async fn run_sync_cycle(&self) -> Result<SyncSummary> {
        // Fetch happens before any lock is taken
        let (batch, fetch_failed) = match self.remote.fetch_quotes().await {
            Ok(batch) => (batch, false),
            Err(error) => {
                tracing::warn!("Fetch failed, continuing with local push only: {error}");
                (Vec::new(), true)
            }
        };

        let stats = self.merge_and_persist(&batch).await?;
        let pushed = self.push_dirty_quotes().await?;
        self.record_sync_time().await?;

        let summary = SyncSummary {
            added: stats.added,
            updated: stats.updated,
            conflicted: stats.conflicted,
            pushed,
            fetch_failed,
        };
        tracing::info!(
            added = summary.added,
            updated = summary.updated,
            conflicted = summary.conflicted,
            pushed = summary.pushed,
            fetch_failed = summary.fetch_failed,
            "Sync cycle finished"
        );
        Ok(summary)
    }

    async fn merge_and_persist(&self, batch: &[RemoteQuote]) -> Result<MergeStats> {
        if batch.is_empty() {
            return Ok(MergeStats::default());
        }

        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        let last_sync = state.store_state.last_sync_ms;
        let outcome = merge_remote(&mut state.collection, batch, last_sync, unix_timestamp_ms());

        let repo = SqliteQuoteRepository::new(state.db.connection());
        repo.replace_all(state.collection.quotes())?;
        for conflict in &outcome.conflicts {
            repo.append_conflict(conflict)?;
        }
        drop(guard);

        if outcome.stats.added > 0 || outcome.stats.updated > 0 {
            self.emit(StoreEvent::QuotesChanged);
        }
        Ok(outcome.stats)
    }

    async fn push_dirty_quotes(&self) -> Result<usize> {
        let dirty = {
            let guard = self.state.lock().await;
            guard.collection.dirty_quotes()
        };
        if dirty.is_empty() {
            return Ok(0);
        }

        let mut pushed = 0;
        for quote in dirty {
            // Network call happens outside the lock
            match self.remote.push_quote(&quote).await {
                Ok(server_id) => {
                    self.confirm_pushed(&quote, server_id).await?;
                    pushed += 1;
                }
                Err(error) => {
                    tracing::warn!("Push failed for quote {}, it stays dirty: {error}", quote.id);
                }
            }
        }
        Ok(pushed)
    }

    async fn confirm_pushed(&self, quote: &Quote, server_id: Option<String>) -> Result<()> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        // Take the returned identity only when no other quote claims it
        let assigned = server_id.filter(|id| !state.collection.contains_server_id(id));

        let Some(stored) = state.collection.quote_by_id_mut(&quote.id) else {
            return Ok(());
        };
        if stored.server_id.is_none() {
            if let Some(id) = assigned {
                stored.server_id = Some(id);
            }
        }
        stored.dirty = false;

        let updated = stored.clone();
        SqliteQuoteRepository::new(state.db.connection()).upsert(&updated)?;
        Ok(())
    }

    async fn record_sync_time(&self) -> Result<()> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        state.store_state.last_sync_ms = Some(unix_timestamp_ms());
        SqliteStateRepository::new(state.db.connection()).save(&state.store_state)?;
        Ok(())
    }
}
