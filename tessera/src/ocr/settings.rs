use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::OcrConfig;
use crate::error::{Result, TesseraError};

/// Tesseract accepts page segmentation modes 0 through 13.
const MAX_PAGE_SEG_MODE: u8 = 13;

/// Contents of the engine configuration file (`default_ocr.toml`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub global: GlobalSettings,
    pub tesseract: TesseractSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GlobalSettings {
    /// Detections scoring below this are dropped.
    pub text_score: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TesseractSettings {
    pub languages: String,
    pub data_path: Option<PathBuf>,
    pub page_seg_mode: Option<u8>,
    pub source_resolution: Option<i32>,
    pub char_whitelist: Option<String>,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self { text_score: 0.5 }
    }
}

impl Default for TesseractSettings {
    fn default() -> Self {
        Self {
            languages: "eng".to_string(),
            data_path: None,
            page_seg_mode: None,
            source_resolution: None,
            char_whitelist: None,
        }
    }
}

impl EngineSettings {
    /// Load and validate a TOML engine configuration.
    ///
    /// A relative `tesseract.data_path` is resolved against the file's directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut settings: EngineSettings = config::Config::builder()
            .add_source(config::File::from(path).format(config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        if let Some(data_path) = settings.tesseract.data_path.take() {
            let resolved = if data_path.is_relative() {
                path.parent()
                    .map(|dir| dir.join(&data_path))
                    .unwrap_or(data_path)
            } else {
                data_path
            };
            settings.tesseract.data_path = Some(resolved);
        }

        if settings
            .tesseract
            .char_whitelist
            .as_deref()
            .is_some_and(str::is_empty)
        {
            settings.tesseract.char_whitelist = None;
        }

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        let score = self.global.text_score;
        if !(0.0..=1.0).contains(&score) {
            return Err(TesseraError::EngineInit(format!(
                "global.text_score must be within 0..=1, got {score}"
            )));
        }

        if self.tesseract.languages.trim().is_empty() {
            return Err(TesseraError::EngineInit(
                "tesseract.languages must not be empty".to_string(),
            ));
        }

        if let Some(psm) = self.tesseract.page_seg_mode {
            if psm > MAX_PAGE_SEG_MODE {
                return Err(TesseraError::EngineInit(format!(
                    "tesseract.page_seg_mode must be within 0..={MAX_PAGE_SEG_MODE}, got {psm}"
                )));
            }
        }

        if let Some(dpi) = self.tesseract.source_resolution {
            if dpi <= 0 {
                return Err(TesseraError::EngineInit(format!(
                    "tesseract.source_resolution must be positive, got {dpi}"
                )));
            }
        }

        Ok(())
    }
}

/// Resolve the engine settings for startup.
///
/// An explicitly configured file must exist. The well-known file under the
/// install root is optional: when absent, engine defaults are used.
pub fn load_engine_settings(config: &OcrConfig) -> Result<EngineSettings> {
    if let Some(path) = &config.engine_config {
        if !path.is_file() {
            return Err(TesseraError::EngineInit(format!(
                "Engine config not found: {}",
                path.display()
            )));
        }
        info!(path = %path.display(), "Using engine config");
        return EngineSettings::from_file(path);
    }

    let path = config.default_engine_config_path();
    if path.is_file() {
        info!(path = %path.display(), "Using engine config");
        EngineSettings::from_file(&path)
    } else {
        warn!(
            path = %path.display(),
            "Engine config not found, using engine defaults"
        );
        Ok(EngineSettings::default())
    }
}
