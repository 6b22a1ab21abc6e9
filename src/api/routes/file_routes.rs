//! File-mode routes (e.g., /api/v1/files/*, /api/v1/projection)

use axum::{routing::{get, post}, Router};
use crate::api::controller::file::FileController;
use crate::app_state::AppState;

pub fn file_routes() -> Router<AppState> {
    Router::new()
        .route("/files/schema", post(FileController::parse_schema))
        .route("/files/histograms", post(FileController::parse_histograms))
        .route("/projection", get(FileController::projection))
}
