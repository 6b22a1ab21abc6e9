use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::core::client::cql_connector::CqlConnector;
use crate::core::state::session::cluster_session::{ClusterSession, ClusterSessionInfo, LastScan};
use crate::core::state::session::cluster_session_registry::ClusterSessionRegistry;
use crate::domain::ttl::dto::cluster_connect_request::ClusterConnectRequest;
use crate::domain::ttl::dto::ttl_scan_request::TtlScanRequest;
use crate::domain::ttl::model::column_ttl_result::{ColumnTtlResult, TtlScanOutcome};
use crate::domain::ttl::model::ttl_table_entry::TtlTableEntry;
use crate::domain::ttl::service::identifier_guard::CqlIdentifier;
use crate::domain::ttl::service::live_schema_ttl_fetcher::fetch_live_ttl_tables;
use crate::domain::ttl::service::multi_column_ttl_scanner::scan_column_ttls;
use crate::domain::ttl::service::probe_target_catalog::{load_table_columns, resolve_probe_target};
use crate::domain::ttl::service::ttl_scan_exporter::export_scan_results;
use crate::errors::{AppError, AppResult};

pub async fn connect_session(
    connector: &dyn CqlConnector,
    registry: &ClusterSessionRegistry,
    req: ClusterConnectRequest,
) -> AppResult<ClusterSessionInfo> {
    req.validate()?;

    let endpoint = req.into_endpoint();
    let executor = connector.connect(&endpoint).await.map_err(|e| {
        warn!("Connection to {} failed: {}", endpoint.address(), e);
        e
    })?;

    let session = ClusterSession::new(executor, endpoint.username.clone());
    Ok(registry.open(session).await)
}

pub async fn session_info(registry: &ClusterSessionRegistry, id: Uuid) -> AppResult<ClusterSessionInfo> {
    let session = registry.get(id).await?;
    let guard = session.lock().await;
    Ok(guard.info())
}

pub async fn disconnect_session(registry: &ClusterSessionRegistry, id: Uuid) -> AppResult<()> {
    registry.close(id).await
}

pub async fn list_live_ttl_tables(
    registry: &ClusterSessionRegistry,
    id: Uuid,
) -> AppResult<Vec<TtlTableEntry>> {
    let session = registry.get(id).await?;
    let guard = session.lock().await;
    fetch_live_ttl_tables(guard.executor.as_ref()).await
}

/// Allow-list the request against the catalog, then run the single-row probe.
///
/// A missing row surfaces as `NotFound`; a successful probe becomes the session's last scan.
pub async fn scan_session_ttls(
    registry: &ClusterSessionRegistry,
    id: Uuid,
    req: TtlScanRequest,
) -> AppResult<Vec<ColumnTtlResult>> {
    req.validate()?;
    let keyspace = CqlIdentifier::parse(&req.keyspace, "keyspace")?;
    let table = CqlIdentifier::parse(&req.table, "table")?;

    let session = registry.get(id).await?;
    let mut guard = session.lock().await;

    let catalog = load_table_columns(guard.executor.as_ref(), &keyspace, &table).await?;
    let target = resolve_probe_target(&catalog, &req)?;

    match scan_column_ttls(guard.executor.as_ref(), &target).await? {
        TtlScanOutcome::Matched(results) => {
            guard.last_scan = Some(LastScan {
                target,
                results: results.clone(),
                scanned_at: Utc::now(),
            });
            Ok(results)
        }
        TtlScanOutcome::NoMatchingRow => Err(AppError::NotFound(format!(
            "no row in {}.{} where {} = {}",
            target.keyspace, target.table, target.partition_key_column, target.partition_key_value
        ))),
    }
}

/// Delimited-text export of the session's last successful probe.
pub async fn export_last_scan(registry: &ClusterSessionRegistry, id: Uuid) -> AppResult<ExportedScan> {
    let session = registry.get(id).await?;
    let guard = session.lock().await;

    let last = guard
        .last_scan
        .as_ref()
        .ok_or_else(|| AppError::NotFound(format!("session {} has no scan to export", id)))?;

    info!("Exporting {} probed column(s) from session {}", last.results.len(), id);
    Ok(ExportedScan {
        file_name: format!(
            "ttl_scan_{}_{}_{}.csv",
            last.target.keyspace,
            last.target.table,
            last.scanned_at.format("%Y%m%dT%H%M%SZ")
        ),
        body: export_scan_results(&last.results),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedScan {
    pub file_name: String,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::core::client::cql_executor::{BindValue, CqlCell, CqlRow};
    use crate::core::client::recording_executor::{RecordingConnector, RecordingExecutor};
    use crate::domain::ttl::service::ttl_scan_exporter::import_scan_results;

    fn text(s: &str) -> Option<CqlCell> {
        Some(CqlCell::Text(s.into()))
    }

    fn carts_catalog_rows() -> Vec<CqlRow> {
        vec![
            vec![text("cart_id"), text("partition_key"), text("int")],
            vec![text("items"), text("regular"), text("list<text>")],
            vec![text("owner"), text("regular"), text("text")],
            vec![text("coupon"), text("regular"), text("text")],
        ]
    }

    fn connect_req() -> ClusterConnectRequest {
        serde_json::from_value(json!({
            "host": "10.1.2.3",
            "username": "cassandra",
            "password": "cassandra"
        }))
        .unwrap()
    }

    fn scan_req(columns: &[&str]) -> TtlScanRequest {
        serde_json::from_value(json!({
            "keyspace": "shop",
            "table": "carts",
            "partition_key_column": "cart_id",
            "partition_key_value": 7,
            "columns": columns
        }))
        .unwrap()
    }

    async fn connected(executor: Arc<RecordingExecutor>) -> (ClusterSessionRegistry, Uuid) {
        let connector = RecordingConnector::with(executor);
        let registry = ClusterSessionRegistry::new();
        let info = connect_session(&connector, &registry, connect_req()).await.unwrap();
        (registry, info.session_id)
    }

    #[tokio::test]
    async fn connect_failure_is_connection_error() {
        let connector = RecordingConnector::default();
        let registry = ClusterSessionRegistry::new();

        let err = connect_session(&connector, &registry, connect_req()).await.unwrap_err();
        assert!(matches!(err, AppError::ConnectionError(ref m) if m.contains("10.1.2.3:9042")));
        assert_eq!(registry.len().await, 0);
    }

    #[tokio::test]
    async fn scan_checks_catalog_then_issues_one_probe() {
        let executor = Arc::new(
            RecordingExecutor::new()
                .respond(carts_catalog_rows())
                .respond(vec![vec![Some(CqlCell::Int(90)), None, Some(CqlCell::Int(5))]]),
        );
        let (registry, id) = connected(executor.clone()).await;

        let results = scan_session_ttls(&registry, id, scan_req(&["items", "owner", "coupon"]))
            .await
            .unwrap();

        assert_eq!(
            results,
            vec![
                ColumnTtlResult::new("items", Some(90)),
                ColumnTtlResult::new("owner", None),
                ColumnTtlResult::new("coupon", Some(5)),
            ]
        );

        let executed = executor.executed();
        assert_eq!(executed.len(), 2);
        assert!(executed[0].cql.contains("system_schema.columns"));
        assert!(executed[1].cql.starts_with("SELECT TTL(\"items\")"));
        assert_eq!(executed[1].values, vec![BindValue::Int(7)]);

        let exported = export_last_scan(&registry, id).await.unwrap();
        assert!(exported.file_name.starts_with("ttl_scan_shop_carts_"));
        assert_eq!(import_scan_results(&exported.body).unwrap(), results);
    }

    #[tokio::test]
    async fn missing_row_is_not_found_and_keeps_previous_scan_absent() {
        let executor = Arc::new(
            RecordingExecutor::new()
                .respond(carts_catalog_rows())
                .respond(vec![]),
        );
        let (registry, id) = connected(executor).await;

        let err = scan_session_ttls(&registry, id, scan_req(&["items"])).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m.contains("no row")));

        let err = export_last_scan(&registry, id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn rejected_column_never_reaches_probe() {
        let executor = Arc::new(RecordingExecutor::new().respond(carts_catalog_rows()));
        let (registry, id) = connected(executor.clone()).await;

        let err = scan_session_ttls(&registry, id, scan_req(&["password_hash"]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
        assert_eq!(executor.executed().len(), 1);
    }

    #[tokio::test]
    async fn injection_in_identifiers_issues_no_query() {
        let executor = Arc::new(RecordingExecutor::new());
        let (registry, id) = connected(executor.clone()).await;

        let mut req = scan_req(&["items"]);
        req.table = "carts; DROP KEYSPACE shop".into();

        let err = scan_session_ttls(&registry, id, req).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidIdentifier(_)));
        assert!(executor.executed().is_empty());
    }

    #[tokio::test]
    async fn live_tables_and_disconnect() {
        let executor = Arc::new(RecordingExecutor::new().respond(vec![vec![
            text("metrics"),
            text("raw"),
            Some(CqlCell::Int(86400)),
        ]]));
        let (registry, id) = connected(executor).await;

        let tables = list_live_ttl_tables(&registry, id).await.unwrap();
        assert_eq!(tables, vec![TtlTableEntry::default_ttl("metrics", "raw", 86400)]);

        let info = session_info(&registry, id).await.unwrap();
        assert_eq!(info.username.as_deref(), Some("cassandra"));

        disconnect_session(&registry, id).await.unwrap();
        assert!(matches!(
            list_live_ttl_tables(&registry, id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
