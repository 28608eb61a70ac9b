//! # OCR Response Shape
//!
//! The `/ocr` endpoint answers with an object keyed by the zero-based
//! detection index, in detection order:
//!
//! ```json
//! {
//!   "0": {"rec_txt": "TEST", "dt_boxes": [[12.0, 15.0], [88.0, 15.0], [88.0, 35.0], [12.0, 35.0]], "score": "0.955"},
//!   "1": {"rec_txt": "...", "dt_boxes": [], "score": "0.91"}
//! }
//! ```
//!
//! Keys are written in numeric order ("9" before "10"), so the map is
//! serialized by hand instead of going through a sorted map type.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use utoipa::openapi::schema::{AdditionalProperties, ObjectBuilder, Ref, Schema};
use utoipa::openapi::RefOr;

use crate::ocr::{OcrOutput, Point};

/// One recognized text line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct OcrLine {
    /// Recognized text, possibly empty.
    pub rec_txt: String,
    /// Polygon vertices as `[x, y]` pairs; empty when the box is unavailable.
    #[schema(value_type = Vec<Vec<f32>>)]
    pub dt_boxes: Vec<Point>,
    /// Confidence in `[0, 1]`, rendered as a decimal string.
    pub score: String,
}

/// Detections in order; serialized as `{"0": line, "1": line, ...}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OcrResponse(pub Vec<OcrLine>);

impl OcrResponse {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn lines(&self) -> &[OcrLine] {
        &self.0
    }
}

impl Serialize for OcrResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (i, line) in self.0.iter().enumerate() {
            map.serialize_entry(&i.to_string(), line)?;
        }
        map.end()
    }
}

impl utoipa::PartialSchema for OcrResponse {
    fn schema() -> RefOr<Schema> {
        ObjectBuilder::new()
            .description(Some(
                "Detections keyed by zero-based index (\"0\", \"1\", ...) in detection order",
            ))
            .additional_properties(Some(AdditionalProperties::RefOr(RefOr::Ref(
                Ref::from_schema_name("OcrLine"),
            ))))
            .into()
    }
}

impl utoipa::ToSchema for OcrResponse {}

/// Confidence as text. Non-finite scores become `0`, others are clamped to `[0, 1]`.
fn format_score(score: f32) -> String {
    let score = if score.is_finite() {
        score.clamp(0.0, 1.0)
    } else {
        0.0
    };
    score.to_string()
}

/// Reshape engine output into the response mapping.
///
/// Texts and scores are paired by index (extra entries in the longer of the
/// two are ignored); a missing box becomes `[]`.
pub fn translate(output: Option<&OcrOutput>) -> OcrResponse {
    let Some(output) = output else {
        return OcrResponse::default();
    };

    let lines = output
        .txts
        .iter()
        .zip(&output.scores)
        .enumerate()
        .map(|(i, (text, score))| OcrLine {
            rec_txt: text.clone(),
            dt_boxes: output.boxes.get(i).cloned().unwrap_or_default(),
            score: format_score(*score),
        })
        .collect();

    OcrResponse(lines)
}
