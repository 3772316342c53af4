//! Merge engine: folds a fetched remote batch into the local collection.
//!
//! The policy is server wins. Remote content always lands in the collection;
//! when it would overwrite an unpushed local edit made after the last sync,
//! the local side is captured in a conflict record before the overwrite.
//! The engine only mutates the in-memory collection, persistence and
//! conflict logging stay with the caller.

use std::collections::HashMap;

use crate::collection::QuoteCollection;
use crate::models::{Quote, QuoteId, RESOLVED_AS_SERVER, SyncConflict};
use crate::remote::RemoteQuote;

/// The one condition this engine flags: both sides changed since last sync
const CONFLICT_REASON: &str = "both sides changed since last sync";

/// Counters describing what one merge did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Remote quotes not seen before, inserted clean
    pub added: usize,
    /// Known quotes whose content the remote replaced
    pub updated: usize,
    /// Overwrites that clobbered an unpushed local edit
    pub conflicted: usize,
}

/// Result of merging one remote batch
#[derive(Debug, Default)]
pub struct MergeOutcome {
    pub stats: MergeStats,
    /// Conflict records to append to the log, in merge order
    pub conflicts: Vec<SyncConflict>,
}

/// Merge a remote batch into the collection.
///
/// An empty batch is a complete no-op: nothing is touched, not even dirty
/// flags. Quotes without a remote identity are never affected. When the
/// batch carries the same server id twice, the later item wins.
pub fn merge_remote(
    local: &mut QuoteCollection,
    remote: &[RemoteQuote],
    last_sync_ms: Option<i64>,
    now_ms: i64,
) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();
    if remote.is_empty() {
        return outcome;
    }

    // A store that never synced treats every local edit as post-sync
    let last_sync = last_sync_ms.unwrap_or(0);

    let mut by_server_id: HashMap<String, usize> = HashMap::new();
    for (index, quote) in local.iter().enumerate() {
        if let Some(server_id) = &quote.server_id {
            by_server_id.insert(server_id.clone(), index);
        }
    }

    for incoming in remote {
        let Some(&index) = by_server_id.get(&incoming.server_id) else {
            let quote = Quote {
                id: QuoteId::new(),
                server_id: Some(incoming.server_id.clone()),
                text: incoming.text.clone(),
                category: incoming.category.clone(),
                created_at: now_ms,
                updated_at: now_ms,
                dirty: false,
            };
            local.push(quote);
            by_server_id.insert(incoming.server_id.clone(), local.len() - 1);
            outcome.stats.added += 1;
            continue;
        };

        let Some(quote) = local.quote_mut(index) else {
            continue;
        };

        if quote.text == incoming.text && quote.category == incoming.category {
            // Content agrees on both sides; nothing left to push
            quote.dirty = false;
            continue;
        }

        if quote.dirty && quote.updated_at > last_sync {
            outcome.conflicts.push(SyncConflict {
                id: 0,
                quote_id: quote.id.to_string(),
                server_id: incoming.server_id.clone(),
                reason: CONFLICT_REASON.to_string(),
                local_text: quote.text.clone(),
                local_category: quote.category.clone(),
                local_updated_at: quote.updated_at,
                server_text: incoming.text.clone(),
                server_category: incoming.category.clone(),
                server_stamp: incoming.server_stamp,
                resolved_as: RESOLVED_AS_SERVER.to_string(),
                resolved_at: now_ms,
            });
            outcome.stats.conflicted += 1;
        }

        quote.text = incoming.text.clone();
        quote.category = incoming.category.clone();
        quote.updated_at = now_ms;
        quote.dirty = false;
        outcome.stats.updated += 1;
    }

    outcome
}
