pub mod connection;
pub mod fixtures;
pub mod migrations;
pub mod query;
pub mod saved_search;

pub use connection::{connect, connect_with_settings, DbPool};
pub use query::SqlQueryEngine;
pub use saved_search::{SavedSearchRecord, SqlSavedSearchStore};
