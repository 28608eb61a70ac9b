// Common test utilities for integration tests
#![allow(dead_code)]

use std::io::Cursor;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use image::{ImageFormat, Rgb, RgbImage};

use tessera::api::{create_router, AppState};
use tessera::config::{Config, OcrConfig, ServerConfig};
use tessera::ocr::{normalize_image, rect_polygon, OcrEngine, OcrOutput};
use tessera::Result;

static INIT: Once = Once::new();

pub const BOUNDARY: &str = "tessera-integration-boundary";

/// Initialize tracing subscriber once for tests
pub fn init_test_logger() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            max_upload_bytes: 2 * 1024 * 1024,
        },
        ocr: OcrConfig {
            home: None,
            engine_config: None,
            timeout_secs: 5,
        },
    }
}

pub fn test_state(engine: Arc<dyn OcrEngine>) -> AppState {
    AppState::new(test_config(), engine)
}

/// Decodes the upload like the real engine, then returns a fixed result.
///
/// Corrupt payloads fail exactly where Tesseract would.
pub struct ScriptedEngine {
    output: Option<OcrOutput>,
    calls: AtomicUsize,
}

impl ScriptedEngine {
    pub fn new(output: Option<OcrOutput>) -> Self {
        Self {
            output,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OcrEngine for ScriptedEngine {
    async fn recognize(&self, image_bytes: &[u8]) -> Result<Option<OcrOutput>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        normalize_image(image_bytes)?;
        Ok(self.output.clone())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Sleeps past any reasonable timeout before answering.
pub struct StalledEngine(pub Duration);

#[async_trait]
impl OcrEngine for StalledEngine {
    async fn recognize(&self, _image_bytes: &[u8]) -> Result<Option<OcrOutput>> {
        tokio::time::sleep(self.0).await;
        Ok(None)
    }

    fn name(&self) -> &str {
        "stalled"
    }
}

/// Two lines of text; the second has no box.
pub fn two_line_output() -> OcrOutput {
    OcrOutput {
        txts: vec!["TEST".to_string(), "second line".to_string()],
        boxes: vec![rect_polygon(12.0, 15.0, 76.0, 20.0)],
        scores: vec![0.955, 0.91],
    }
}

pub fn numbered_output(count: usize) -> OcrOutput {
    let mut output = OcrOutput::default();
    for i in 0..count {
        output.push(
            format!("line {i}"),
            rect_polygon(0.0, i as f32 * 10.0, 50.0, 8.0),
            0.9,
        );
    }
    output
}

/// A small white PNG with a black bar, enough for any decoder.
pub fn sample_png() -> Vec<u8> {
    let img = RgbImage::from_fn(64, 32, |_, y| {
        if (12..20).contains(&y) {
            Rgb([0, 0, 0])
        } else {
            Rgb([255, 255, 255])
        }
    });
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("Failed to encode sample PNG");
    bytes
}

/// An uncompressed BMP, for payloads larger than axum's default body limit.
pub fn sample_bmp(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Bmp)
        .expect("Failed to encode sample BMP");
    bytes
}

/// Build a `multipart/form-data` body with a single file field.
pub fn multipart_body(field: &str, file_name: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn ocr_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/ocr")
        .header("content-length", body.len())
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn image_request(bytes: &[u8]) -> Request<Body> {
    ocr_request(multipart_body("image", "upload.png", bytes))
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Serve the router on an ephemeral port and return its base URL.
pub async fn spawn_server(state: AppState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    let app = create_router(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

// Re-export commonly used crates for convenience
pub use pretty_assertions;
pub use wiremock;
