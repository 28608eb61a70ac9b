use std::sync::Arc;

use async_trait::async_trait;
use leptess::{LepTess, Variable};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{Result, TesseraError};

use super::decode::normalize_image;
use super::engine::{OcrEngine, OcrOutput};
use super::settings::EngineSettings;
use super::tsv::parse_tsv;

/// Tesseract (via leptess) behind a single-slot lock.
///
/// `LepTess` is not thread-safe, so every inference takes the mutex on the
/// blocking pool. The handle itself is cheap to clone.
#[derive(Clone)]
pub struct TesseractEngine {
    tesseract: Arc<Mutex<LepTess>>,
    settings: Arc<EngineSettings>,
}

fn create_tesseract(settings: &EngineSettings) -> Result<LepTess> {
    let tess = &settings.tesseract;
    let data_path = tess.data_path.as_ref().map(|p| p.to_string_lossy().into_owned());

    let mut lt = LepTess::new(data_path.as_deref(), &tess.languages).map_err(|e| {
        TesseraError::EngineInit(format!(
            "Failed to initialize Tesseract with languages '{}' (data path: {}): {e}",
            tess.languages,
            data_path.as_deref().unwrap_or("<system default>")
        ))
    })?;

    if let Some(psm) = tess.page_seg_mode {
        lt.set_variable(Variable::TesseditPagesegMode, &psm.to_string())
            .map_err(|e| TesseraError::EngineInit(format!("Failed to set page_seg_mode: {e}")))?;
    }

    if let Some(whitelist) = &tess.char_whitelist {
        lt.set_variable(Variable::TesseditCharWhitelist, whitelist)
            .map_err(|e| TesseraError::EngineInit(format!("Failed to set char_whitelist: {e}")))?;
    }

    Ok(lt)
}

impl TesseractEngine {
    pub fn new(settings: EngineSettings) -> Result<Self> {
        settings.validate()?;
        let lt = create_tesseract(&settings)?;

        info!(
            languages = %settings.tesseract.languages,
            text_score = settings.global.text_score,
            "Tesseract OCR initialized"
        );

        Ok(Self {
            tesseract: Arc::new(Mutex::new(lt)),
            settings: Arc::new(settings),
        })
    }
}

/// Drop lines scoring below `text_score`; `None` when nothing is left.
fn keep_confident(output: OcrOutput, text_score: f32) -> Option<OcrOutput> {
    let detected = output.len();
    let output = output.retain_min_score(text_score);
    debug!(
        detected,
        kept = output.len(),
        "Tesseract recognition finished"
    );

    if output.is_empty() {
        None
    } else {
        Some(output)
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    async fn recognize(&self, image_bytes: &[u8]) -> Result<Option<OcrOutput>> {
        let bytes = image_bytes.to_vec();
        let tesseract = Arc::clone(&self.tesseract);
        let resolution = self.settings.tesseract.source_resolution;

        let output = tokio::task::spawn_blocking(move || {
            let png = normalize_image(&bytes)?;

            let mut lt = tesseract.blocking_lock();
            lt.set_image_from_mem(&png)
                .map_err(|e| TesseraError::Ocr(format!("Failed to set image: {e}")))?;
            if let Some(dpi) = resolution {
                lt.set_source_resolution(dpi);
            }

            let tsv = lt
                .get_tsv_text(0)
                .map_err(|e| TesseraError::Ocr(format!("Failed to extract text: {e}")))?;

            Ok::<_, TesseraError>(parse_tsv(&tsv))
        })
        .await
        .map_err(|e| TesseraError::Ocr(format!("OCR task panicked: {e}")))??;

        Ok(keep_confident(output, self.settings.global.text_score))
    }

    fn name(&self) -> &str {
        "tesseract"
    }
}
