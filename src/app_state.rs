use std::sync::Arc;

use uuid::Uuid;

use crate::config::AppConfig;
use crate::core::client::cql_connector::{CqlConnector, ScyllaConnector};
use crate::core::state::session::cluster_session::ClusterSessionInfo;
use crate::core::state::session::cluster_session_registry::ClusterSessionRegistry;
use crate::domain::ttl::dto::cluster_connect_request::ClusterConnectRequest;
use crate::domain::ttl::dto::ttl_scan_request::TtlScanRequest;
use crate::domain::ttl::model::column_ttl_result::ColumnTtlResult;
use crate::domain::ttl::model::expiry_projection::ExpiryProjection;
use crate::domain::ttl::model::histogram_row::HistogramRow;
use crate::domain::ttl::model::schema_ttl_report::SchemaTtlReport;
use crate::domain::ttl::model::ttl_table_entry::TtlTableEntry;
use crate::domain::ttl::service::live_ttl_service::{self, ExportedScan};
use crate::domain::ttl::service::schema_ttl_extractor::SchemaMatchMode;
use crate::domain::ttl::service::{expiry_projector, file_ttl_service};
use crate::errors::AppResult;

/// Forwards to a session-scoped service function, passing the shared registry first.
macro_rules! delegate_session_service {
    ($(fn $name:ident($($arg:ident : $typ:ty),*) -> $ret:ty => $path:path;)+) => {
        $(
            pub async fn $name(&self, $($arg: $typ),*) -> AppResult<$ret> {
                $path(&self.sessions, $($arg),*).await
            }
        )+
    };
}

const DEFAULT_PROJECTION_TITLE: &str = "TTL Expiry Projection";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub sessions: Arc<ClusterSessionRegistry>,
    pub file_service: Arc<FileService>,
    pub cluster_service: Arc<ClusterService>,
}

pub fn build_app_state(config: AppConfig) -> AppState {
    let connector = Arc::new(ScyllaConnector::new(config.cql.clone()));
    build_app_state_with(config, connector)
}

pub fn build_app_state_with(config: AppConfig, connector: Arc<dyn CqlConnector>) -> AppState {
    let sessions = Arc::new(ClusterSessionRegistry::new());
    AppState {
        file_service: Arc::new(FileService {
            default_mode: config.parser.schema_match_mode,
        }),
        cluster_service: Arc::new(ClusterService {
            connector,
            sessions: sessions.clone(),
        }),
        sessions,
        config: Arc::new(config),
    }
}

/// Stateless parsing of uploaded files.
pub struct FileService {
    default_mode: SchemaMatchMode,
}

impl FileService {
    pub fn parse_schema(&self, bytes: &[u8], mode: Option<SchemaMatchMode>) -> AppResult<SchemaTtlReport> {
        file_ttl_service::parse_schema_upload(bytes, mode.unwrap_or(self.default_mode))
    }

    pub fn parse_histograms(&self, bytes: &[u8]) -> AppResult<Vec<HistogramRow>> {
        file_ttl_service::parse_histogram_upload(bytes)
    }

    pub fn projection(&self, title: Option<&str>) -> ExpiryProjection {
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_PROJECTION_TITLE);
        expiry_projector::simulate_expiry_projection(title)
    }
}

pub struct ClusterService {
    connector: Arc<dyn CqlConnector>,
    sessions: Arc<ClusterSessionRegistry>,
}

impl ClusterService {
    pub async fn connect(&self, req: ClusterConnectRequest) -> AppResult<ClusterSessionInfo> {
        live_ttl_service::connect_session(self.connector.as_ref(), &self.sessions, req).await
    }

    delegate_session_service! {
        fn session_info(id: Uuid) -> ClusterSessionInfo => live_ttl_service::session_info;
        fn disconnect(id: Uuid) -> () => live_ttl_service::disconnect_session;
        fn live_tables(id: Uuid) -> Vec<TtlTableEntry> => live_ttl_service::list_live_ttl_tables;
        fn scan(id: Uuid, req: TtlScanRequest) -> Vec<ColumnTtlResult> => live_ttl_service::scan_session_ttls;
        fn export_last_scan(id: Uuid) -> ExportedScan => live_ttl_service::export_last_scan;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::client::recording_executor::RecordingConnector;

    pub(crate) fn test_state_with(connector: RecordingConnector) -> AppState {
        build_app_state_with(AppConfig::load(), Arc::new(connector))
    }

    pub(crate) fn test_state() -> AppState {
        test_state_with(RecordingConnector::default())
    }

    #[test]
    fn blank_projection_title_falls_back() {
        let state = test_state();
        let projection = state.file_service.projection(Some("   "));
        assert_eq!(projection.title, format!("{} (Simulated)", DEFAULT_PROJECTION_TITLE));
    }

    #[tokio::test]
    async fn cluster_service_shares_the_registry() {
        let state = test_state();
        assert_eq!(state.sessions.len().await, 0);
        assert!(state.cluster_service.session_info(Uuid::new_v4()).await.is_err());
    }
}
