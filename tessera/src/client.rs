use std::collections::HashMap;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Client;

use crate::api::extractors::IMAGE_FIELD;
use crate::api::response::OcrLine;
use crate::error::{ErrorBody, Result, TesseraError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Client for a running Tessera service.
#[derive(Clone, Debug)]
pub struct OcrClient {
    client: Client,
    base_url: String,
}

impl OcrClient {
    /// `base_url` is the service root, e.g. `http://127.0.0.1:9003`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .no_proxy()
            .build()
            .map_err(|e| TesseraError::Internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Upload an image and return the detected lines in service order.
    pub async fn recognize(&self, image_bytes: Vec<u8>, file_name: &str) -> Result<Vec<OcrLine>> {
        let mime = mime_guess::from_path(file_name).first_or_octet_stream();
        let part = Part::bytes(image_bytes)
            .file_name(file_name.to_string())
            .mime_str(mime.essence_str())?;
        let form = Form::new().part(IMAGE_FIELD, part);

        let url = format!("{}/ocr", self.base_url);
        tracing::debug!(url = %url, file_name, "Sending OCR request");

        let response = self.client.post(&url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            return Err(TesseraError::Ocr(format!(
                "OCR service returned {status}: {message}"
            )));
        }

        let entries: HashMap<String, OcrLine> = response.json().await?;
        Ok(order_by_index(entries))
    }

    /// Recognized text only, one detected line per output line.
    pub async fn recognize_text(&self, image_bytes: Vec<u8>, file_name: &str) -> Result<String> {
        let lines = self.recognize(image_bytes, file_name).await?;
        Ok(lines
            .into_iter()
            .map(|line| line.rec_txt)
            .collect::<Vec<_>>()
            .join("\n"))
    }

    /// Whether the health endpoint answers with a success status.
    pub async fn is_available(&self) -> bool {
        self.client
            .get(format!("{}/", self.base_url))
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
            .map(|resp| resp.status().is_success())
            .unwrap_or(false)
    }
}

/// JSON objects carry no order; keys are decimal indices.
fn order_by_index(entries: HashMap<String, OcrLine>) -> Vec<OcrLine> {
    let mut indexed: Vec<(u64, OcrLine)> = entries
        .into_iter()
        .map(|(key, line)| (key.parse().unwrap_or(u64::MAX), line))
        .collect();
    indexed.sort_by_key(|(index, _)| *index);
    indexed.into_iter().map(|(_, line)| line).collect()
}
