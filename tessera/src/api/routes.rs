use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::openapi;
use super::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Checked while the multipart stream is read; overruns become JSON 413
    let max_upload_bytes = state.config.server.max_upload_bytes;

    Router::new()
        .route("/", get(handlers::health_check))
        .route("/ocr", post(handlers::recognize))
        .route("/openapi.json", get(openapi::openapi_json))
        .merge(openapi::redoc_router())
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
