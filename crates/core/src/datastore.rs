use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::search::{SavedSearchRef, SavedSearchSpec};

/// One result record: column name to scalar value, stable column order.
pub type Row = BTreeMap<String, serde_json::Value>;

/// Largest result set any query engine hands back. The system never
/// streams or summarizes unbounded results.
pub const MAX_RESULT_ROWS: usize = 10;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DatastoreError {
    #[error("query rejected: {0}")]
    Rejected(String),
    #[error("datastore unavailable: {0}")]
    Unavailable(String),
}

/// Read-only query execution seam. Implementations must never mutate the
/// datastore; statements that would are rejected before execution.
/// Returned result sets are cut to [`MAX_RESULT_ROWS`], preserving order.
#[async_trait]
pub trait QueryEngine: Send + Sync {
    async fn run(&self, sql: &str) -> Result<Vec<Row>, DatastoreError>;
}

/// Persistence seam for machine-generated saved searches.
#[async_trait]
pub trait SavedSearchStore: Send + Sync {
    async fn create(&self, spec: &SavedSearchSpec) -> Result<SavedSearchRef, DatastoreError>;
}
