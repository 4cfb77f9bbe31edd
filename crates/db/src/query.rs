use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row as _, TypeInfo, ValueRef};

use askledger_core::datastore::{DatastoreError, QueryEngine, Row, MAX_RESULT_ROWS};

use crate::DbPool;

/// Runs machine-generated SQL against the ledger tables.
///
/// The generating model is strictly a translator and never gets write
/// access, so anything that is not a plain SELECT (or a WITH-prefixed
/// select) is rejected before touching the database.
pub struct SqlQueryEngine {
    pool: DbPool,
}

impl SqlQueryEngine {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QueryEngine for SqlQueryEngine {
    async fn run(&self, sql: &str) -> Result<Vec<Row>, DatastoreError> {
        ensure_read_only(sql)?;

        let rows = sqlx::query(sql).fetch_all(&self.pool).await.map_err(|error| match error {
            sqlx::Error::Database(db_error) => {
                DatastoreError::Rejected(db_error.message().to_string())
            }
            sqlx::Error::ColumnDecode { index, source } => {
                DatastoreError::Rejected(format!("could not decode column {index}: {source}"))
            }
            other => DatastoreError::Unavailable(other.to_string()),
        })?;

        Ok(rows.iter().take(MAX_RESULT_ROWS).map(map_row).collect())
    }
}

fn ensure_read_only(sql: &str) -> Result<(), DatastoreError> {
    let head = sql.trim_start().to_ascii_uppercase();
    if head.starts_with("SELECT") || head.starts_with("WITH") {
        Ok(())
    } else {
        Err(DatastoreError::Rejected(
            "only SELECT statements are allowed against the ledger".to_string(),
        ))
    }
}

/// SQLite values are dynamically typed, so the JSON value is picked from
/// the storage class of each cell. Decoding by probe order would not work:
/// SQLite coerces REAL to INTEGER on demand and would drop the fraction.
fn map_row(row: &SqliteRow) -> Row {
    let mut mapped = Row::new();
    for (index, column) in row.columns().iter().enumerate() {
        mapped.insert(column.name().to_string(), map_value(row, index));
    }
    mapped
}

fn map_value(row: &SqliteRow, index: usize) -> serde_json::Value {
    let Ok(raw) = row.try_get_raw(index) else {
        return serde_json::Value::Null;
    };
    if raw.is_null() {
        return serde_json::Value::Null;
    }

    match raw.type_info().name() {
        "INTEGER" | "BOOLEAN" => {
            row.try_get::<i64, _>(index).map(serde_json::Value::from).unwrap_or_default()
        }
        "REAL" => row.try_get::<f64, _>(index).map(serde_json::Value::from).unwrap_or_default(),
        _ => row.try_get::<String, _>(index).map(serde_json::Value::from).unwrap_or_default(),
    }
}
