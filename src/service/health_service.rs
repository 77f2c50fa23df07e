//! Liveness and database readiness checks.

use serde::Serialize;
use sqlx::PgPool;
use utoipa::ToSchema;

/// Outcome of a health probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    /// Healthy.
    Ok,
    /// Probe failed.
    Fail,
}

/// Probes the process and its database.
#[derive(Debug, Clone)]
pub struct HealthService {
    db: Option<PgPool>,
}

impl HealthService {
    /// Creates a service. `None` means in-memory persistence, which is
    /// always reachable.
    #[must_use]
    pub fn new(db: Option<PgPool>) -> Self {
        Self { db }
    }

    /// The process is up if it can answer.
    #[must_use]
    pub const fn check(&self) -> HealthStatus {
        HealthStatus::Ok
    }

    /// Runs `SELECT 1` against the database.
    pub async fn check_db(&self) -> HealthStatus {
        let Some(pool) = &self.db else {
            return HealthStatus::Ok;
        };
        match sqlx::query("SELECT 1").execute(pool).await {
            Ok(_) => HealthStatus::Ok,
            Err(e) => {
                tracing::warn!(error = %e, "database health check failed");
                HealthStatus::Fail
            }
        }
    }
}
