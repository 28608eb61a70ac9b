//! Tessera: a small HTTP service that runs Tesseract OCR on uploaded images
//! and answers with the recognized lines, their boxes and confidences.

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod ocr;

pub use client::OcrClient;
pub use error::{Result, TesseraError};
