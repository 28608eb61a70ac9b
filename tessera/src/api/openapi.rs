use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::handlers;
use super::response;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tessera OCR API",
        version = "1.0.0",
        description = "Upload an image, get back the recognized text lines with bounding boxes and confidence scores.",
    ),
    paths(
        handlers::health::health_check,
        handlers::ocr::recognize,
    ),
    components(schemas(
        handlers::health::HealthStatus,
        response::OcrLine,
        response::OcrResponse,
        crate::error::ErrorBody,
    )),
    tags(
        (name = "health", description = "Liveness check"),
        (name = "ocr", description = "Text recognition"),
    ),
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
