use axum::extract::{Path, State};
use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;
use uuid::Uuid;

use crate::api::dto::ApiResponse;
use crate::api::util::json::to_json;
use crate::app_state::AppState;
use crate::core::state::session::cluster_session::ClusterSessionInfo;
use crate::domain::ttl::dto::cluster_connect_request::ClusterConnectRequest;
use crate::domain::ttl::dto::ttl_scan_request::TtlScanRequest;
use crate::domain::ttl::model::column_ttl_result::ColumnTtlResult;
use crate::domain::ttl::model::ttl_table_entry::TtlTableEntry;
use crate::errors::{internal_error, AppError};

pub struct ClusterController;

impl ClusterController {
    pub async fn connect(
        State(state): State<AppState>,
        Json(payload): Json<ClusterConnectRequest>,
    ) -> Result<Json<ApiResponse<ClusterSessionInfo>>, AppError> {
        to_json(state.cluster_service.connect(payload).await)
    }

    pub async fn session_info(
        State(state): State<AppState>,
        Path(id): Path<Uuid>,
    ) -> Result<Json<ApiResponse<ClusterSessionInfo>>, AppError> {
        to_json(state.cluster_service.session_info(id).await)
    }

    pub async fn disconnect(
        State(state): State<AppState>,
        Path(id): Path<Uuid>,
    ) -> Result<Json<ApiResponse<()>>, AppError> {
        to_json(state.cluster_service.disconnect(id).await)
    }

    pub async fn live_tables(
        State(state): State<AppState>,
        Path(id): Path<Uuid>,
    ) -> Result<Json<ApiResponse<Vec<TtlTableEntry>>>, AppError> {
        to_json(state.cluster_service.live_tables(id).await)
    }

    pub async fn scan(
        State(state): State<AppState>,
        Path(id): Path<Uuid>,
        Json(payload): Json<TtlScanRequest>,
    ) -> Result<Json<ApiResponse<Vec<ColumnTtlResult>>>, AppError> {
        to_json(state.cluster_service.scan(id, payload).await)
    }

    /// Last scan of the session as a downloadable CSV attachment.
    pub async fn export_scan(
        State(state): State<AppState>,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let exported = state.cluster_service.export_last_scan(id).await?;

        let disposition = HeaderValue::from_str(&format!(
            "attachment; filename=\"{}\"",
            exported.file_name
        ))
        .map_err(internal_error)?;

        Ok((
            [
                (header::CONTENT_TYPE, HeaderValue::from_static("text/csv; charset=utf-8")),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            exported.body,
        )
            .into_response())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::to_bytes;
    use axum::http::StatusCode;
    use serde_json::json;

    use super::*;
    use crate::app_state::tests::test_state_with;
    use crate::core::client::cql_executor::CqlCell;
    use crate::core::client::recording_executor::{RecordingConnector, RecordingExecutor};

    fn text(s: &str) -> Option<CqlCell> {
        Some(CqlCell::Text(s.into()))
    }

    fn connect_payload() -> ClusterConnectRequest {
        serde_json::from_value(json!({ "host": "10.0.0.5", "port": 9042 })).unwrap()
    }

    #[tokio::test]
    async fn connect_scan_and_export() {
        let executor = Arc::new(
            RecordingExecutor::new()
                .respond(vec![
                    vec![text("user_id"), text("partition_key"), text("text")],
                    vec![text("token"), text("regular"), text("text")],
                ])
                .respond(vec![vec![Some(CqlCell::Int(120))]]),
        );
        let state = test_state_with(RecordingConnector::with(executor));

        let Json(connected) = ClusterController::connect(State(state.clone()), Json(connect_payload()))
            .await
            .unwrap();
        let id = connected.data.unwrap().session_id;

        let scan: TtlScanRequest = serde_json::from_value(json!({
            "keyspace": "auth",
            "table": "sessions",
            "partition_key_column": "user_id",
            "partition_key_value": "u-1",
            "columns": ["token"]
        }))
        .unwrap();
        let Json(scanned) = ClusterController::scan(State(state.clone()), Path(id), Json(scan))
            .await
            .unwrap();
        assert_eq!(scanned.data.unwrap(), vec![ColumnTtlResult::new("token", Some(120))]);

        let response = ClusterController::export_scan(State(state), Path(id)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/csv; charset=utf-8"
        );
        let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
        assert!(disposition.contains("ttl_scan_auth_sessions_"));

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.starts_with("column,ttl_remaining_seconds,is_expiring"));
        assert!(body.contains("token,120,true"));
    }

    #[tokio::test]
    async fn unknown_session_maps_to_404() {
        let state = test_state_with(RecordingConnector::default());
        let err = ClusterController::live_tables(State(state), Path(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unreachable_cluster_maps_to_502() {
        let state = test_state_with(RecordingConnector::default());
        let err = ClusterController::connect(State(state), Json(connect_payload()))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
