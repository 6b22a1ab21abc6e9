use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::Json;

use crate::api::dto::ttl_dto::{ProjectionQuery, SchemaUploadQuery};
use crate::api::dto::ApiResponse;
use crate::api::util::json::to_json;
use crate::app_state::AppState;
use crate::domain::ttl::model::expiry_projection::ExpiryProjection;
use crate::domain::ttl::model::histogram_row::HistogramRow;
use crate::domain::ttl::model::schema_ttl_report::SchemaTtlReport;
use crate::errors::AppError;

pub struct FileController;

impl FileController {
    /// Raw schema text in the body; `?mode=greedy` switches to document-wide matching.
    pub async fn parse_schema(
        State(state): State<AppState>,
        Query(q): Query<SchemaUploadQuery>,
        body: Bytes,
    ) -> Result<Json<ApiResponse<SchemaTtlReport>>, AppError> {
        to_json(state.file_service.parse_schema(&body, q.mode))
    }

    pub async fn parse_histograms(
        State(state): State<AppState>,
        body: Bytes,
    ) -> Result<Json<ApiResponse<Vec<HistogramRow>>>, AppError> {
        to_json(state.file_service.parse_histograms(&body))
    }

    pub async fn projection(
        State(state): State<AppState>,
        Query(q): Query<ProjectionQuery>,
    ) -> Result<Json<ApiResponse<ExpiryProjection>>, AppError> {
        to_json(Ok(state.file_service.projection(q.title.as_deref())))
    }
}
