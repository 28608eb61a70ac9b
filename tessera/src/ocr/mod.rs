//! OCR (Optical Character Recognition) Module
//!
//! Everything between raw upload bytes and recognized text lines.
//!
//! # Architecture
//!
//! - `OcrEngine` trait is the process-wide engine handle injected into the
//!   HTTP layer; tests swap it for stubs
//! - `TesseractEngine` implements it with Tesseract via leptess, serializing
//!   calls behind a mutex on the blocking pool
//! - `EngineSettings` is the engine configuration file (`default_ocr.toml`)
//!
//! # Usage
//!
//! ```rust,ignore
//! let settings = load_engine_settings(&config.ocr)?;
//! let engine = TesseractEngine::new(settings)?;
//! let output = engine.recognize(&image_bytes).await?;
//! ```

mod decode;
mod engine;
mod settings;
mod tesseract;
mod tsv;

pub use decode::normalize_image;
pub use engine::{rect_polygon, OcrEngine, OcrOutput, Point, Polygon};
pub use settings::{load_engine_settings, EngineSettings, GlobalSettings, TesseractSettings};
pub use tesseract::TesseractEngine;
pub use tsv::parse_tsv;
