//! Liveness and storage health reporting

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sefr_shared::types::response::format_uptime;
use sefr_shared::types::{HealthResponse, HealthStatus};

use crate::errors::DomainResult;
use crate::repositories::MemoryStore;
use crate::services::clock::Clock;

/// Something the service cannot work without, checked on every health request
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn ping(&self) -> DomainResult<()>;
}

#[async_trait]
impl HealthProbe for MemoryStore {
    async fn ping(&self) -> DomainResult<()> {
        self.check()
    }
}

pub struct HealthService {
    probe: Arc<dyn HealthProbe>,
    clock: Arc<dyn Clock>,
    started_at: DateTime<Utc>,
    environment: String,
    version: String,
}

impl HealthService {
    pub fn new(
        probe: Arc<dyn HealthProbe>,
        clock: Arc<dyn Clock>,
        environment: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        let started_at = clock.now();
        Self {
            probe,
            clock,
            started_at,
            environment: environment.into(),
            version: version.into(),
        }
    }

    pub async fn check(&self) -> HealthResponse {
        let now = self.clock.now();
        let uptime_seconds = (now - self.started_at).num_seconds().max(0) as u64;

        let (status, database) = match self.probe.ping().await {
            Ok(()) => (HealthStatus::Healthy, "connected"),
            Err(e) => {
                tracing::error!(error = %e, event = "health_check_failed", "Database ping failed");
                (HealthStatus::Unhealthy, "disconnected")
            }
        };

        HealthResponse {
            status,
            database: database.to_string(),
            version: self.version.clone(),
            uptime: format_uptime(uptime_seconds),
            uptime_seconds,
            server_time_utc: now,
            environment: self.environment.clone(),
        }
    }
}
