//! Service layer for qotd

mod quotes;
mod sync;

pub use quotes::{QuoteService, StoreEvent};
pub use sync::{SyncOutcome, SyncSummary};
