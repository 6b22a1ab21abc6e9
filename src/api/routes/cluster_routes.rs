//! Connection-mode routes (e.g., /api/v1/sessions/*)

use axum::{routing::{get, post}, Router};
use crate::api::controller::cluster::ClusterController;
use crate::app_state::AppState;

pub fn cluster_routes() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(ClusterController::connect))
        .route(
            "/sessions/{id}",
            get(ClusterController::session_info).delete(ClusterController::disconnect),
        )
        .route("/sessions/{id}/tables", get(ClusterController::live_tables))
        .route("/sessions/{id}/scan", post(ClusterController::scan))
        .route("/sessions/{id}/scan/export", get(ClusterController::export_scan))
}
