use axum::{
    extract::multipart::MultipartRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TesseraError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upload error: {0}")]
    Upload(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("OCR error: {0}")]
    Ocr(String),

    #[error("OCR engine initialization failed: {0}")]
    EngineInit(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Wire shape of every failed response: `{"error": "<message>"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

impl TesseraError {
    pub fn status(&self) -> StatusCode {
        match self {
            TesseraError::Validation(_) => StatusCode::BAD_REQUEST,
            TesseraError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short message for clients, without the variant prefix.
    pub fn message(&self) -> String {
        match self {
            TesseraError::Validation(msg)
            | TesseraError::Upload(msg)
            | TesseraError::PayloadTooLarge(msg)
            | TesseraError::InvalidImage(msg)
            | TesseraError::Ocr(msg)
            | TesseraError::EngineInit(msg)
            | TesseraError::Internal(msg) => msg.clone(),
            TesseraError::Config(e) => e.to_string(),
            TesseraError::Http(e) => e.to_string(),
        }
    }
}

impl IntoResponse for TesseraError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorBody {
            error: self.message(),
        });

        (status, body).into_response()
    }
}

impl From<MultipartRejection> for TesseraError {
    fn from(rejection: MultipartRejection) -> Self {
        match rejection {
            MultipartRejection::InvalidBoundary(_) => TesseraError::Validation(
                "Expected `Content-Type: multipart/form-data` with a boundary".to_string(),
            ),
            _ => TesseraError::Validation(rejection.body_text()),
        }
    }
}

/// Render an error with its `source()` chain, outermost first.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}

pub type Result<T> = std::result::Result<T, TesseraError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_maps_to_bad_request() {
        let response = TesseraError::Validation("Missing field".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json, serde_json::json!({ "error": "Missing field" }));
    }

    #[tokio::test]
    async fn test_ocr_failures_map_to_internal_error() {
        for err in [
            TesseraError::Ocr("engine exploded".to_string()),
            TesseraError::InvalidImage("Empty image payload".to_string()),
            TesseraError::Upload("connection reset".to_string()),
        ] {
            let expected = err.message();
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

            let json = body_json(response).await;
            assert_eq!(json["error"], expected);
            assert_eq!(json.as_object().unwrap().len(), 1);
        }
    }

    #[tokio::test]
    async fn test_payload_too_large_maps_to_413() {
        let response =
            TesseraError::PayloadTooLarge("length limit exceeded".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[derive(Debug, Error)]
    #[error("leptonica refused the buffer")]
    struct PixError;

    #[derive(Debug, Error)]
    #[error("failed to set image")]
    struct SetImageError(#[source] PixError);

    #[test]
    fn test_error_chain_includes_sources() {
        assert_eq!(
            error_chain(&SetImageError(PixError)),
            "failed to set image: leptonica refused the buffer"
        );
        assert_eq!(
            error_chain(&TesseraError::Ocr("engine exploded".to_string())),
            "OCR error: engine exploded"
        );
    }
}
