//! Data models for qotd

mod quote;
mod store_state;
mod sync_conflict;

pub use quote::{DEFAULT_CATEGORY, Quote, QuoteId};
pub use store_state::StoreState;
pub use sync_conflict::{RESOLVED_AS_SERVER, SyncConflict};
