use sqlx::migrate::{MigrateError, Migrator};

use crate::DbPool;

pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

pub async fn run_pending(pool: &DbPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use sqlx::Row;

    use super::{run_pending, MIGRATOR};
    use crate::connect_with_settings;

    const LEDGER_TABLES: &[&str] = &["customers", "transactions", "saved_searches"];
    const LEDGER_INDEXES: &[&str] =
        &["idx_transactions_entity", "idx_transactions_trandate", "idx_saved_searches_created_at"];

    async fn migrated_pool() -> sqlx::SqlitePool {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        run_pending(&pool).await.expect("run migrations");
        pool
    }

    /// `name -> CREATE statement` for every migration-managed object.
    async fn ledger_schema(pool: &sqlx::SqlitePool) -> BTreeMap<String, String> {
        sqlx::query("SELECT name, IFNULL(sql, '') AS sql FROM sqlite_master")
            .fetch_all(pool)
            .await
            .expect("load schema objects")
            .into_iter()
            .map(|object| (object.get::<String, _>("name"), object.get::<String, _>("sql")))
            .filter(|(name, _)| {
                LEDGER_TABLES.contains(&name.as_str()) || LEDGER_INDEXES.contains(&name.as_str())
            })
            .collect()
    }

    #[tokio::test]
    async fn migrations_create_every_ledger_table_and_index() {
        let pool = migrated_pool().await;
        let schema = ledger_schema(&pool).await;

        for name in LEDGER_TABLES.iter().chain(LEDGER_INDEXES) {
            assert!(schema.contains_key(*name), "`{name}` should exist after migrations");
        }
    }

    #[tokio::test]
    async fn full_undo_removes_everything_the_migrations_created() {
        let pool = migrated_pool().await;

        MIGRATOR.undo(&pool, 0).await.expect("undo migrations");

        assert!(ledger_schema(&pool).await.is_empty());
    }

    #[tokio::test]
    async fn rerunning_after_undo_rebuilds_the_identical_schema() {
        let pool = migrated_pool().await;
        let first_pass = ledger_schema(&pool).await;

        MIGRATOR.undo(&pool, 0).await.expect("undo migrations");
        run_pending(&pool).await.expect("re-run migrations");

        assert_eq!(ledger_schema(&pool).await, first_pass);
    }
}
