use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::core::client::cql_executor::CqlExecutor;
use crate::domain::ttl::model::column_ttl_result::ColumnTtlResult;
use crate::domain::ttl::service::multi_column_ttl_scanner::TtlProbeTarget;

/// Explicit context for one cluster connection: created on connect, closed on disconnect.
pub struct ClusterSession {
    pub id: Uuid,
    pub endpoint: String,
    pub username: Option<String>,
    pub connected_at: DateTime<Utc>,
    pub executor: Arc<dyn CqlExecutor>,
    pub last_scan: Option<LastScan>,
}

/// The most recent successful probe on this session, kept for export.
#[derive(Debug, Clone)]
pub struct LastScan {
    pub target: TtlProbeTarget,
    pub results: Vec<ColumnTtlResult>,
    pub scanned_at: DateTime<Utc>,
}

/// What the API reports about a session. Never carries credentials beyond the user name.
#[derive(Debug, Clone, Serialize)]
pub struct ClusterSessionInfo {
    pub session_id: Uuid,
    pub endpoint: String,
    pub username: Option<String>,
    pub connected_at: DateTime<Utc>,
    pub last_scan_at: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for ClusterSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterSession")
            .field("id", &self.id)
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("connected_at", &self.connected_at)
            .field("last_scan", &self.last_scan)
            .finish_non_exhaustive()
    }
}

impl ClusterSession {
    pub fn new(executor: Arc<dyn CqlExecutor>, username: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            endpoint: executor.endpoint(),
            username,
            connected_at: Utc::now(),
            executor,
            last_scan: None,
        }
    }

    pub fn info(&self) -> ClusterSessionInfo {
        ClusterSessionInfo {
            session_id: self.id,
            endpoint: self.endpoint.clone(),
            username: self.username.clone(),
            connected_at: self.connected_at,
            last_scan_at: self.last_scan.as_ref().map(|s| s.scanned_at),
        }
    }
}
