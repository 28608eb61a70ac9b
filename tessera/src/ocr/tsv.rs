//! Tesseract TSV layout output → text lines.
//!
//! Each TSV row is `level page block par line word left top width height conf text`.
//! Level 4 rows carry the line rectangle, level 5 rows carry the words and
//! their confidences (0-100, `-1` when not applicable).

use std::collections::HashMap;

use super::engine::{rect_polygon, OcrOutput};

const LEVEL_LINE: u8 = 4;
const LEVEL_WORD: u8 = 5;
const COLUMNS: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct LineKey {
    page: u32,
    block: u32,
    par: u32,
    line: u32,
}

#[derive(Debug)]
struct TsvRow<'a> {
    level: u8,
    key: LineKey,
    left: f32,
    top: f32,
    width: f32,
    height: f32,
    conf: f32,
    text: &'a str,
}

impl<'a> TsvRow<'a> {
    /// `None` for the header row and anything that is not a layout row.
    fn parse(row: &'a str) -> Option<Self> {
        let cols: Vec<&str> = row.splitn(COLUMNS, '\t').collect();
        if cols.len() < COLUMNS - 1 {
            return None;
        }

        Some(Self {
            level: cols[0].trim().parse().ok()?,
            key: LineKey {
                page: cols[1].trim().parse().ok()?,
                block: cols[2].trim().parse().ok()?,
                par: cols[3].trim().parse().ok()?,
                line: cols[4].trim().parse().ok()?,
            },
            left: cols[6].trim().parse().ok()?,
            top: cols[7].trim().parse().ok()?,
            width: cols[8].trim().parse().ok()?,
            height: cols[9].trim().parse().ok()?,
            conf: cols[10].trim().parse().ok()?,
            text: cols.get(11).copied().unwrap_or(""),
        })
    }
}

#[derive(Debug, Default)]
struct LineAccumulator {
    rect: Option<(f32, f32, f32, f32)>,
    words: Vec<String>,
    confs: Vec<f32>,
}

/// Group word rows into lines, in the order Tesseract reports them.
///
/// Lines without any recognized word are dropped. A line whose level-4 row
/// is missing keeps its text but gets an empty polygon.
pub fn parse_tsv(tsv: &str) -> OcrOutput {
    let mut index: HashMap<LineKey, usize> = HashMap::new();
    let mut lines: Vec<LineAccumulator> = Vec::new();

    for row in tsv.lines().filter_map(TsvRow::parse) {
        if row.level != LEVEL_LINE && row.level != LEVEL_WORD {
            continue;
        }

        let slot = *index.entry(row.key).or_insert_with(|| {
            lines.push(LineAccumulator::default());
            lines.len() - 1
        });
        let line = &mut lines[slot];

        if row.level == LEVEL_LINE {
            line.rect = Some((row.left, row.top, row.width, row.height));
            continue;
        }

        let word = row.text.trim();
        if word.is_empty() {
            continue;
        }
        line.words.push(word.to_string());
        line.confs.push(row.conf.max(0.0));
    }

    let mut output = OcrOutput::default();
    for line in lines {
        if line.words.is_empty() {
            continue;
        }

        let mean = line.confs.iter().sum::<f32>() / line.confs.len() as f32;
        let score = (mean / 100.0).clamp(0.0, 1.0);
        let polygon = line
            .rect
            .map(|(left, top, width, height)| rect_polygon(left, top, width, height))
            .unwrap_or_default();

        output.push(line.words.join(" "), polygon, score);
    }

    output
}
