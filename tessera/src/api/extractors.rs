use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::StatusCode;

use crate::error::TesseraError;

/// Multipart field carrying the image.
pub const IMAGE_FIELD: &str = "image";

/// The `image` file field of a multipart upload, read fully into memory.
///
/// Other fields are ignored; when `image` appears more than once the first
/// occurrence wins. A request without it is rejected with 400.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Bytes,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

impl<S> FromRequest<S> for ImageUpload
where
    S: Send + Sync,
{
    type Rejection = TesseraError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state).await?;

        loop {
            let field = multipart
                .next_field()
                .await
                .map_err(|e| classify(e, |msg| {
                    TesseraError::Validation(format!("Malformed multipart body: {msg}"))
                }))?;

            let Some(field) = field else {
                break;
            };

            if field.name() != Some(IMAGE_FIELD) {
                continue;
            }

            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| classify(e, |msg| {
                    TesseraError::Upload(format!("Failed to read image: {msg}"))
                }))?;

            return Ok(Self {
                bytes,
                file_name,
                content_type,
            });
        }

        Err(TesseraError::Validation(format!(
            "Missing required multipart field: {IMAGE_FIELD}"
        )))
    }
}

/// Body-limit hits surface as multipart errors once the stream is read.
fn classify(err: MultipartError, otherwise: impl FnOnce(String) -> TesseraError) -> TesseraError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        TesseraError::PayloadTooLarge(err.body_text())
    } else {
        otherwise(err.body_text())
    }
}
