use std::time::Instant;

use axum::extract::State;
use axum::Json;
use tracing::{debug, error, info, warn};

use crate::api::extractors::ImageUpload;
use crate::api::response::{translate, OcrResponse};
use crate::api::state::AppState;
use crate::error::{error_chain, Result, TesseraError};

/// `POST /ocr`
///
/// Runs the engine on the multipart `image` field and returns every detected
/// line keyed by index. No text yields `{}`. Any failure after the request
/// is accepted becomes a 500 with `{"error": "..."}`; nothing partial is
/// ever returned.
#[utoipa::path(
    post,
    path = "/ocr",
    tag = "ocr",
    request_body(content_type = "multipart/form-data", content = String, description = "Multipart form with an `image` file field (PNG, JPEG, BMP, ...)"),
    responses(
        (status = 200, description = "Detected text lines keyed by index", body = OcrResponse),
        (status = 400, description = "Missing `image` field or malformed multipart body", body = crate::error::ErrorBody),
        (status = 413, description = "Upload exceeds the configured size limit"),
        (status = 500, description = "Image could not be read or recognized", body = crate::error::ErrorBody),
    )
)]
pub async fn recognize(
    State(state): State<AppState>,
    upload: std::result::Result<ImageUpload, TesseraError>,
) -> Result<Json<OcrResponse>> {
    let upload = match upload {
        Ok(upload) => upload,
        Err(e @ (TesseraError::Validation(_) | TesseraError::PayloadTooLarge(_))) => {
            warn!(error = %e, "Rejected OCR request");
            return Err(e);
        }
        Err(e) => {
            error!(error = %error_chain(&e), details = ?e, "Failed to read OCR upload");
            return Err(e);
        }
    };

    debug!(
        file_name = upload.file_name.as_deref().unwrap_or("<none>"),
        content_type = upload.content_type.as_deref().unwrap_or("<none>"),
        bytes = upload.bytes.len(),
        "OCR request received"
    );

    let started = Instant::now();
    match run_ocr(&state, &upload.bytes).await {
        Ok(response) => {
            info!(
                engine = state.engine.name(),
                detections = response.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "OCR request completed"
            );
            Ok(Json(response))
        }
        Err(e) => {
            error!(
                engine = state.engine.name(),
                file_name = upload.file_name.as_deref().unwrap_or("<none>"),
                bytes = upload.bytes.len(),
                error = %error_chain(&e),
                details = ?e,
                "OCR request failed"
            );
            Err(e)
        }
    }
}

async fn run_ocr(state: &AppState, image_bytes: &[u8]) -> Result<OcrResponse> {
    let output = tokio::time::timeout(
        state.config.ocr.timeout(),
        state.engine.recognize(image_bytes),
    )
    .await
    .map_err(|_| {
        TesseraError::Ocr(format!(
            "OCR operation timed out after {} seconds",
            state.config.ocr.timeout_secs
        ))
    })??;

    Ok(translate(output.as_ref()))
}
