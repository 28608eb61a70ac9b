use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};

use crate::error::{Result, TesseraError};

/// Validate uploaded bytes and re-encode them as PNG for Leptonica.
///
/// Leptonica only understands a subset of formats and handles alpha poorly,
/// so every upload is decoded here, composited onto white when it carries an
/// alpha channel, and written back out as PNG.
pub fn normalize_image(bytes: &[u8]) -> Result<Vec<u8>> {
    if bytes.is_empty() {
        return Err(TesseraError::InvalidImage("Empty image payload".to_string()));
    }

    if let Some(kind) = infer::get(bytes) {
        if kind.matcher_type() != infer::MatcherType::Image {
            return Err(TesseraError::InvalidImage(format!(
                "Unsupported content type: {}",
                kind.mime_type()
            )));
        }
    }

    let img = ImageReader::new(std::io::Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| TesseraError::InvalidImage(format!("Failed to read image: {e}")))?
        .decode()
        .map_err(|e| TesseraError::InvalidImage(format!("Failed to decode image: {e}")))?;

    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(TesseraError::InvalidImage(format!(
            "Image has no pixels: {width}x{height}"
        )));
    }

    let img = flatten(img);

    let mut output = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut output), ImageFormat::Png)
        .map_err(|e| TesseraError::InvalidImage(format!("Failed to encode image: {e}")))?;

    Ok(output)
}

/// Drop alpha (blending onto white) and reduce to 8-bit channels.
fn flatten(img: DynamicImage) -> DynamicImage {
    if img.color().has_alpha() {
        let rgba = img.to_rgba8();
        return DynamicImage::ImageRgb8(image::RgbImage::from_fn(
            rgba.width(),
            rgba.height(),
            |x, y| {
                let [r, g, b, a] = rgba.get_pixel(x, y).0;
                let alpha = a as f32 / 255.0;
                let blend = |c: u8| (c as f32 * alpha + 255.0 * (1.0 - alpha)).round() as u8;
                image::Rgb([blend(r), blend(g), blend(b)])
            },
        ));
    }

    match img {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => img,
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    }
}
