//! Ingestion normalizer: [`SourceFile`] → [`CanonicalPayload`].
//!
//! Dispatch is driven by the declared media type, classified once into a
//! closed [`FileKind`] and then matched exhaustively:
//!
//! - PDF documents are rasterized (first page only) to JPEG; the output
//!   MIME type is always `image/jpeg` regardless of the source.
//! - Images pass through byte-for-byte, preserving the declared MIME type
//!   exactly — no re-encoding, no pixel transformation.
//! - Anything else fails with `UnsupportedFileType` before any processing:
//!   no partial output, no fallback.
//!
//! No size ceiling is enforced here; that guidance belongs to the shell.

use crate::config::AnalyzeConfig;
use crate::error::AnalyzeError;
use crate::pipeline::encode::{encode_payload, CanonicalPayload};
use crate::pipeline::input::SourceFile;
use crate::pipeline::render;
use tracing::info;

/// MIME type of the PDF document format.
pub const PDF_MIME: &str = "application/pdf";

/// Output MIME type for rasterized PDF pages.
pub const JPEG_MIME: &str = "image/jpeg";

/// What kind of upload the declared media type describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// A PDF document; must be rasterized before analysis.
    Pdf,
    /// Any `image/*` subtype; passed through unchanged.
    Image,
    /// Everything else; rejected.
    Unsupported,
}

impl FileKind {
    /// Classify a declared media type.
    ///
    /// The filename plays no part here; a spoofed extension on a
    /// non-image type still classifies as `Unsupported`.
    pub fn classify(media_type: &str) -> FileKind {
        if media_type == PDF_MIME {
            FileKind::Pdf
        } else if media_type.starts_with("image/") {
            FileKind::Image
        } else {
            FileKind::Unsupported
        }
    }
}

/// Normalize an upload into exactly one [`CanonicalPayload`].
///
/// This is the ingestion normalizer: the only component between the raw
/// upload and the analysis client. It owns the per-call rendering surface
/// for PDFs and releases it before returning.
///
/// # Errors
/// - [`AnalyzeError::UnsupportedFileType`] — declared type is neither PDF
///   nor an image subtype.
/// - [`AnalyzeError::DecodeFailure`] — unparseable or empty content.
/// - [`AnalyzeError::RenderSurfaceUnavailable`] — the rasterization target
///   could not be acquired.
pub async fn normalize(
    source: SourceFile,
    config: &AnalyzeConfig,
) -> Result<CanonicalPayload, AnalyzeError> {
    let kind = FileKind::classify(&source.media_type);

    match kind {
        FileKind::Pdf => {
            info!("Normalizing PDF '{}' ({} bytes)", source.name, source.bytes.len());
            let jpeg = render::render_first_page(
                source.bytes,
                source.name.clone(),
                config.scale,
                config.jpeg_quality,
            )
            .await?;
            Ok(encode_payload(&jpeg, JPEG_MIME, source.name))
        }
        FileKind::Image => {
            if source.bytes.is_empty() {
                return Err(AnalyzeError::DecodeFailure {
                    name: source.name,
                    detail: "image has no readable bytes".to_string(),
                });
            }
            info!(
                "Normalizing image '{}' ({}, {} bytes, pass-through)",
                source.name,
                source.media_type,
                source.bytes.len()
            );
            Ok(encode_payload(&source.bytes, source.media_type, source.name))
        }
        FileKind::Unsupported => Err(AnalyzeError::UnsupportedFileType {
            name: source.name,
            media_type: source.media_type,
        }),
    }
}
