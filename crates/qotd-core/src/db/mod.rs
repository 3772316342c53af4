//! Database layer for qotd

mod connection;
mod migrations;
mod repository;
mod state_repository;

pub use connection::Database;
pub use repository::{QuoteRepository, SqliteQuoteRepository};
pub use state_repository::{SqliteStateRepository, StateRepository};
