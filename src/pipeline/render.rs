//! PDF rasterization: render the first page to JPEG bytes via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async
//! contexts. `tokio::task::spawn_blocking` moves the work onto a dedicated
//! thread-pool thread so the async caller simply awaits completion — the
//! render is synchronous from the pipeline's perspective.
//!
//! ## First page only
//!
//! Only page 1 is ever rasterized. Social posts and strategy one-pagers are
//! single-page documents; pages beyond the first are silently ignored (see
//! the known-limitations note in the crate docs).
//!
//! The rendering bitmap is sized to the scaled page dimensions and owned by
//! a single call: page sizes vary per document, so it is dropped when
//! encoding completes and never reused.

use crate::error::AnalyzeError;
use image::codecs::jpeg::JpegEncoder;
use pdfium_render::prelude::*;
use std::io::Cursor;
use tracing::debug;

/// Rasterize the first page of a PDF into JPEG bytes.
///
/// `scale` multiplies the page's native point dimensions; `quality` is the
/// JPEG quality factor (1–100).
pub async fn render_first_page(
    bytes: Vec<u8>,
    name: String,
    scale: f32,
    quality: u8,
) -> Result<Vec<u8>, AnalyzeError> {
    let result = tokio::task::spawn_blocking(move || {
        render_first_page_blocking(&bytes, &name, scale, quality)
    })
    .await
    .map_err(|e| AnalyzeError::Internal(format!("Render task panicked: {}", e)))?;

    result
}

/// Blocking implementation of first-page rendering.
fn render_first_page_blocking(
    bytes: &[u8],
    name: &str,
    scale: f32,
    quality: u8,
) -> Result<Vec<u8>, AnalyzeError> {
    // Downloads and caches the shared library on first use (no-op when the
    // `bundled` binary already extracted it).
    let pdfium = pdfium_auto::bind_pdfium_silent()
        .map_err(|e| AnalyzeError::PdfiumBindingFailed(e.to_string()))?;

    // Covers zero-byte and truncated input: pdfium refuses to parse either.
    let document =
        pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .map_err(|e| AnalyzeError::DecodeFailure {
                name: name.to_string(),
                detail: format!("{:?}", e),
            })?;

    let pages = document.pages();
    if pages.len() == 0 {
        return Err(AnalyzeError::DecodeFailure {
            name: name.to_string(),
            detail: "document has no pages".to_string(),
        });
    }
    debug!("PDF loaded: {} pages, using page 1 only", pages.len());

    let page = pages.get(0).map_err(|e| AnalyzeError::DecodeFailure {
        name: name.to_string(),
        detail: format!("{:?}", e),
    })?;

    let render_config = PdfRenderConfig::new().scale_page_by_factor(scale);

    let bitmap =
        page.render_with_config(&render_config)
            .map_err(|e| AnalyzeError::RenderSurfaceUnavailable {
                name: name.to_string(),
                detail: format!("{:?}", e),
            })?;

    let image = bitmap.as_image();
    debug!(
        "Rendered page 1 → {}x{} px at scale {}",
        image.width(),
        image.height(),
        scale
    );

    // JPEG has no alpha channel; pdfium hands back RGBA.
    let rgb = image::DynamicImage::ImageRgb8(image.to_rgb8());

    let mut buf = Vec::new();
    let mut cursor = Cursor::new(&mut buf);
    let encoder = JpegEncoder::new_with_quality(&mut cursor, quality);
    rgb.write_with_encoder(encoder)
        .map_err(|e| AnalyzeError::Internal(format!("JPEG encoding failed: {}", e)))?;

    debug!("Encoded page 1 → {} bytes JPEG (q{})", buf.len(), quality);
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn jpeg_encode_flattens_alpha() {
        let img =
            image::DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([0, 128, 255, 255])));
        let rgb = image::DynamicImage::ImageRgb8(img.to_rgb8());

        let mut buf = Vec::new();
        let mut cursor = Cursor::new(&mut buf);
        let encoder = JpegEncoder::new_with_quality(&mut cursor, 85);
        rgb.write_with_encoder(encoder).expect("encode should succeed");

        let decoded = image::load_from_memory(&buf).expect("valid JPEG");
        assert_eq!(decoded.width(), 8);
        assert_eq!(decoded.height(), 8);
    }
}
