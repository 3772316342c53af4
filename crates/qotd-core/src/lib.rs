//! qotd-core - Core library for qotd
//!
//! This crate contains the quote models, SQLite store, remote adapter,
//! merge engine, and sync service shared by all qotd interfaces.

pub mod collection;
pub mod db;
pub mod error;
pub mod export;
pub mod import;
pub mod merge;
pub mod models;
pub mod remote;
pub mod services;
pub mod util;

pub use error::{Error, Result};
pub use models::{Quote, QuoteId};
