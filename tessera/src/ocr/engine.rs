use async_trait::async_trait;

use crate::error::Result;

/// A vertex `[x, y]` in image pixel coordinates.
pub type Point = [f32; 2];

/// Polygon vertices in order. Empty when the engine produced no geometry.
pub type Polygon = Vec<Point>;

/// Raw output of one inference call.
///
/// The three sequences are aligned by index. `boxes` may be shorter than
/// `txts`; readers must treat a missing entry as an empty polygon.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OcrOutput {
    pub txts: Vec<String>,
    pub boxes: Vec<Polygon>,
    pub scores: Vec<f32>,
}

impl OcrOutput {
    pub fn len(&self) -> usize {
        self.txts.len().min(self.scores.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn push(&mut self, text: String, polygon: Polygon, score: f32) {
        self.txts.push(text);
        self.boxes.push(polygon);
        self.scores.push(score);
    }

    /// Keep only detections scoring at least `min_score`.
    pub fn retain_min_score(self, min_score: f32) -> Self {
        let mut kept = OcrOutput::default();
        for (i, (text, score)) in self.txts.into_iter().zip(self.scores).enumerate() {
            if score >= min_score {
                let polygon = self.boxes.get(i).cloned().unwrap_or_default();
                kept.push(text, polygon, score);
            }
        }
        kept
    }
}

/// Axis-aligned rectangle as the four corners, clockwise from top-left.
pub fn rect_polygon(left: f32, top: f32, width: f32, height: f32) -> Polygon {
    let right = left + width;
    let bottom = top + height;
    vec![[left, top], [right, top], [right, bottom], [left, bottom]]
}

/// The process-wide OCR engine handle.
///
/// Implementations must be safe to share across request handlers; engines
/// that are not thread-safe serialize calls internally.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Run OCR on encoded image bytes. `Ok(None)` means nothing was detected.
    async fn recognize(&self, image_bytes: &[u8]) -> Result<Option<OcrOutput>>;

    fn name(&self) -> &str;
}
