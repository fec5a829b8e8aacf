//! Error types for the socialsense library.
//!
//! Everything is fatal here: the pipeline handles exactly one file per call,
//! so any failure terminates that attempt and is reported to the caller as a
//! single [`AnalyzeError`]. Nothing is retried internally — recovery means
//! the user picks a file and tries again.
//!
//! The four conditions an end user can actually hit are
//! [`AnalyzeError::UnsupportedFileType`], [`AnalyzeError::DecodeFailure`],
//! [`AnalyzeError::RenderSurfaceUnavailable`], and
//! [`AnalyzeError::AnalysisFailed`]. The rest cover input resolution,
//! configuration, and environment problems.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the socialsense library.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is not a valid file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    // ── Normalization errors ──────────────────────────────────────────────
    /// Declared media type is neither a PDF nor an image subtype.
    ///
    /// Rejected before any processing, based on the declared MIME type
    /// alone (never on the filename).
    #[error("Unsupported file type '{media_type}' for '{name}'\nUpload a PDF or an image (PNG, JPEG, WebP, GIF).")]
    UnsupportedFileType { name: String, media_type: String },

    /// The file claims to be a PDF but cannot be parsed, or claims to be
    /// an image but has no readable content.
    #[error("Could not decode '{name}': {detail}\nThe file may be empty, truncated, or corrupt.")]
    DecodeFailure { name: String, detail: String },

    /// The rasterization target for a PDF page could not be acquired.
    #[error("Could not allocate a rendering surface for '{name}': {detail}")]
    RenderSurfaceUnavailable { name: String, detail: String },

    // ── Analysis errors ───────────────────────────────────────────────────
    /// The analysis service call failed or returned unparseable data.
    ///
    /// Carries only a generic user-facing message; the underlying service
    /// error is logged at ERROR level, never surfaced verbatim.
    #[error("{message}")]
    AnalysisFailed { message: String },

    /// The configured provider is not initialised (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output report file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
PDFium is normally downloaded automatically on first run.\n\
If the auto-download failed, you can:\n\
  • Check your internet connection and try again.\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AnalyzeError {
    /// The generic user-facing message for analysis-stage failures.
    ///
    /// The actual service error must already have been logged by the caller.
    pub(crate) fn analysis_failed() -> Self {
        AnalyzeError::AnalysisFailed {
            message: "Failed to analyze the content. Please ensure the file is clear and try again."
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_type_names_the_mime() {
        let e = AnalyzeError::UnsupportedFileType {
            name: "notes.docx".into(),
            media_type: "application/msword".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("application/msword"), "got: {msg}");
        assert!(msg.contains("notes.docx"));
    }

    #[test]
    fn decode_failure_display() {
        let e = AnalyzeError::DecodeFailure {
            name: "post.pdf".into(),
            detail: "document has no pages".into(),
        };
        assert!(e.to_string().contains("post.pdf"));
        assert!(e.to_string().contains("no pages"));
    }

    #[test]
    fn analysis_failed_message_is_generic() {
        let e = AnalyzeError::analysis_failed();
        let msg = e.to_string();
        assert!(!msg.contains("HTTP"), "must not leak transport detail: {msg}");
        assert!(msg.contains("try again"));
    }

    #[test]
    fn download_timeout_display() {
        let e = AnalyzeError::DownloadTimeout {
            url: "https://example.com/post.png".into(),
            secs: 30,
        };
        assert!(e.to_string().contains("30s"));
    }
}
