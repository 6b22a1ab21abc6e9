use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;

/// Build the main application router
pub fn app_router(max_upload_bytes: usize) -> Router<AppState> {
    // File-mode and connection-mode subrouters live under /api/v1
    let api_v1 = Router::new()
        .merge(crate::api::routes::file_routes::file_routes())
        .merge(crate::api::routes::cluster_routes::cluster_routes());

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", api_v1)
        .fallback(handler_404)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
}

async fn root() -> &'static str {
    "ttlens is running"
}

async fn health_check() -> &'static str {
    "OK"
}

async fn handler_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        "The requested resource was not found",
    )
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use tower::ServiceExt;

    use super::*;
    use crate::app_state::tests::test_state;

    const TEST_BODY_LIMIT: usize = 256;

    async fn call(method: Method, uri: &str, body: Body) -> (StatusCode, String) {
        let router = app_router(TEST_BODY_LIMIT).with_state(test_state());
        let response = router
            .oneshot(Request::builder().method(method).uri(uri).body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    #[tokio::test]
    async fn health_and_fallback() {
        assert_eq!(call(Method::GET, "/health", Body::empty()).await.0, StatusCode::OK);
        assert_eq!(call(Method::GET, "/nope", Body::empty()).await.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn histogram_upload_returns_envelope() {
        let report = "Percentile  SSTables  Write Latency  Read Latency  Partition Size  Cell Count\n\
                      p50  1  1200  1500  2048  10\n";
        let (status, body) = call(Method::POST, "/api/v1/files/histograms", Body::from(report)).await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["is_successful"], true);
        assert_eq!(json["data"][0]["percentile_label"], "p50");
        assert_eq!(json["data"][0]["partition_size_bytes"], 2048);
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected() {
        let (status, _) = call(Method::POST, "/api/v1/files/schema", Body::from("x".repeat(TEST_BODY_LIMIT + 1))).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn malformed_session_id_is_a_client_error() {
        let (status, _) = call(Method::GET, "/api/v1/sessions/not-a-uuid", Body::empty()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
