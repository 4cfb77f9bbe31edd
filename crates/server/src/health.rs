//! Readiness endpoint, served on its own port so probes keep answering
//! while the chat port is busy.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use tracing::{error, info};

use askledger_db::DbPool;

/// A reachable database is not enough; the assistant can only answer once
/// every ledger table exists.
const REQUIRED_TABLES: &[&str] = &["customers", "transactions", "saved_searches"];

#[derive(Clone)]
pub struct HealthState {
    db_pool: DbPool,
    credential_configured: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Readiness {
    Ready,
    Degraded,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: Readiness,
    pub database: Readiness,
    pub database_detail: String,
    /// Whether POST paths can reach the generation backend at all. The
    /// service still counts as ready without it; GET paths are unaffected.
    pub credential_configured: bool,
    pub checked_at: String,
}

pub fn router(db_pool: DbPool, credential_configured: bool) -> Router {
    Router::new()
        .route("/health", get(health))
        .with_state(HealthState { db_pool, credential_configured })
}

pub async fn spawn(
    bind_address: &str,
    port: u16,
    db_pool: DbPool,
    credential_configured: bool,
) -> std::io::Result<()> {
    let address = format!("{bind_address}:{port}");
    let listener = tokio::net::TcpListener::bind(&address).await?;

    info!(
        event_name = "system.health.start",
        correlation_id = "bootstrap",
        bind_address = %address,
        "health endpoint started"
    );

    tokio::spawn(async move {
        if let Err(failure) = axum::serve(listener, router(db_pool, credential_configured)).await {
            error!(
                event_name = "system.health.error",
                correlation_id = "bootstrap",
                error = %failure,
                "health endpoint server terminated unexpectedly"
            );
        }
    });

    Ok(())
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthReport>) {
    let (database, database_detail) = schema_probe(&state.db_pool).await;

    let report = HealthReport {
        status: database,
        database,
        database_detail,
        credential_configured: state.credential_configured,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = match report.status {
        Readiness::Ready => StatusCode::OK,
        Readiness::Degraded => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status_code, Json(report))
}

async fn schema_probe(pool: &DbPool) -> (Readiness, String) {
    let names =
        REQUIRED_TABLES.iter().map(|table| format!("'{table}'")).collect::<Vec<_>>().join(", ");
    let probe = format!(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ({names})"
    );

    match sqlx::query_scalar::<_, i64>(&probe).fetch_one(pool).await {
        Ok(count) if count == REQUIRED_TABLES.len() as i64 => {
            (Readiness::Ready, "ledger schema present".to_string())
        }
        Ok(count) => (
            Readiness::Degraded,
            format!("{count} of {} ledger tables present", REQUIRED_TABLES.len()),
        ),
        Err(failure) => (Readiness::Degraded, format!("database probe failed: {failure}")),
    }
}

#[cfg(test)]
mod tests {
    use axum::{extract::State, http::StatusCode, Json};

    use askledger_db::{connect_with_settings, migrations};

    use crate::health::{health, HealthState, Readiness};

    #[tokio::test]
    async fn migrated_database_reports_ready() {
        let pool = connect_with_settings("sqlite::memory:", 1, 5).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");

        let (status, Json(report)) =
            health(State(HealthState { db_pool: pool.clone(), credential_configured: true })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(report.status, Readiness::Ready);
        assert_eq!(report.database_detail, "ledger schema present");
        assert!(report.credential_configured);

        pool.close().await;
    }

    #[tokio::test]
    async fn reachable_but_unmigrated_database_reports_degraded() {
        let pool = connect_with_settings("sqlite::memory:", 1, 5).await.expect("connect");

        let (status, Json(report)) =
            health(State(HealthState { db_pool: pool.clone(), credential_configured: true })).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(report.database, Readiness::Degraded);
        assert!(report.database_detail.contains("0 of 3"));

        pool.close().await;
    }

    #[tokio::test]
    async fn unreachable_database_reports_degraded() {
        let pool = connect_with_settings("sqlite::memory:", 1, 5).await.expect("connect");
        pool.close().await;

        let (status, Json(report)) =
            health(State(HealthState { db_pool: pool, credential_configured: false })).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(report.status, Readiness::Degraded);
        assert!(report.database_detail.contains("probe failed"));
        assert!(!report.credential_configured);
    }
}
