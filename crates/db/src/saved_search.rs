use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row as _;
use uuid::Uuid;

use askledger_core::datastore::{DatastoreError, SavedSearchStore};
use askledger_core::search::{SavedSearchRef, SavedSearchSpec};

use crate::DbPool;

/// Persisted form of a saved-search definition, as returned to viewers.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SavedSearchRecord {
    pub id: String,
    pub target: String,
    pub title: String,
    pub filters: Vec<serde_json::Value>,
    pub columns: Vec<String>,
    pub created_at: String,
}

pub struct SqlSavedSearchStore {
    pool: DbPool,
}

impl SqlSavedSearchStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn fetch(&self, id: &str) -> Result<Option<SavedSearchRecord>, DatastoreError> {
        let row = sqlx::query(
            "SELECT id, target, title, filters, columns, created_at
             FROM saved_searches WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| DatastoreError::Unavailable(error.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let filters: Vec<serde_json::Value> =
            serde_json::from_str(&row.get::<String, _>("filters"))
                .map_err(|error| DatastoreError::Unavailable(error.to_string()))?;
        let columns: Vec<String> = serde_json::from_str(&row.get::<String, _>("columns"))
            .map_err(|error| DatastoreError::Unavailable(error.to_string()))?;

        Ok(Some(SavedSearchRecord {
            id: row.get("id"),
            target: row.get("target"),
            title: row.get("title"),
            filters,
            columns,
            created_at: row.get("created_at"),
        }))
    }
}

#[async_trait]
impl SavedSearchStore for SqlSavedSearchStore {
    async fn create(&self, spec: &SavedSearchSpec) -> Result<SavedSearchRef, DatastoreError> {
        spec.validate().map_err(|error| DatastoreError::Rejected(error.to_string()))?;

        let id = Uuid::new_v4().to_string();
        let filters = serde_json::to_string(&spec.filters)
            .map_err(|error| DatastoreError::Rejected(error.to_string()))?;
        let columns = serde_json::to_string(&spec.columns)
            .map_err(|error| DatastoreError::Rejected(error.to_string()))?;

        sqlx::query(
            "INSERT INTO saved_searches (id, target, title, filters, columns, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&spec.target)
        .bind(&spec.title)
        .bind(filters)
        .bind(columns)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|error| match error {
            sqlx::Error::Database(db_error) => {
                DatastoreError::Rejected(db_error.message().to_string())
            }
            other => DatastoreError::Unavailable(other.to_string()),
        })?;

        // Host-relative on purpose: absolute URLs would bake in a domain.
        let location = format!("/searches/{id}");
        Ok(SavedSearchRef { id, location })
    }
}

#[cfg(test)]
mod tests {
    use askledger_core::datastore::{DatastoreError, SavedSearchStore};
    use askledger_core::search::{SavedSearchSpec, TITLE_PREFIX};

    use super::SqlSavedSearchStore;
    use crate::{connect_with_settings, migrations};

    async fn store() -> SqlSavedSearchStore {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        SqlSavedSearchStore::new(pool)
    }

    fn spec() -> SavedSearchSpec {
        SavedSearchSpec {
            target: "customers".to_string(),
            filters: vec![serde_json::json!(["balance", "greaterthan", 0])],
            columns: vec!["entityid".to_string(), "companyname".to_string()],
            title: format!("{TITLE_PREFIX}Customers with open balances"),
        }
    }

    #[tokio::test]
    async fn create_returns_relative_location_and_persists() {
        let store = store().await;
        let reference = store.create(&spec()).await.expect("create should succeed");

        assert!(reference.location.starts_with("/searches/"));
        assert!(!reference.location.contains("://"));
        assert!(reference.location.ends_with(&reference.id));

        let record = store
            .fetch(&reference.id)
            .await
            .expect("fetch should succeed")
            .expect("record should exist");
        assert_eq!(record.title, spec().title);
        assert_eq!(record.columns, spec().columns);
        assert_eq!(record.filters.len(), 1);
    }

    #[tokio::test]
    async fn create_rejects_structurally_invalid_spec() {
        let store = store().await;
        let mut invalid = spec();
        invalid.title = "Untagged title".to_string();

        let error = store.create(&invalid).await.expect_err("should reject");
        assert!(matches!(error, DatastoreError::Rejected(_)));
    }

    #[tokio::test]
    async fn fetch_returns_none_for_unknown_id() {
        let store = store().await;
        let record = store.fetch("no-such-id").await.expect("fetch should succeed");
        assert!(record.is_none());
    }
}
