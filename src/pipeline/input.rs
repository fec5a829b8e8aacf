//! Input resolution: turn a user-supplied path or URL into a [`SourceFile`].
//!
//! The declared media type drives everything downstream: the normalizer
//! dispatches on it, never on the filename or the content's magic bytes.
//! For local files the declared type comes from the extension (the CLI
//! analogue of a browser's `File.type`); for URLs it comes from the
//! `Content-Type` response header, falling back to the URL's extension.
//!
//! Empty files are deliberately NOT rejected here — a zero-byte upload must
//! fail at the decode stage, not earlier.

use crate::error::AnalyzeError;
use std::path::Path;
use tracing::{debug, info};

/// A user-supplied file, read fully into memory.
///
/// Transient: held only for the duration of normalization and discarded
/// once the canonical payload is produced.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Raw file content.
    pub bytes: Vec<u8>,
    /// Declared media type, e.g. `image/png` or `application/pdf`.
    pub media_type: String,
    /// Display name, carried through unmodified.
    pub name: String,
}

impl SourceFile {
    pub fn new(bytes: Vec<u8>, media_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            bytes,
            media_type: media_type.into(),
            name: name.into(),
        }
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Map a file extension to a declared media type.
///
/// Unknown extensions map to `application/octet-stream`, which the
/// classifier rejects as unsupported.
pub fn media_type_for_extension(path: &str) -> &'static str {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Resolve the input string to a [`SourceFile`].
///
/// If the input is a URL, download it; if it is a local path, read it.
pub async fn resolve_input(input: &str, timeout_secs: u64) -> Result<SourceFile, AnalyzeError> {
    if is_url(input) {
        download_url(input, timeout_secs).await
    } else {
        read_local(input).await
    }
}

/// Read a local file, deriving the declared media type from its extension.
async fn read_local(path_str: &str) -> Result<SourceFile, AnalyzeError> {
    let path = Path::new(path_str);

    let bytes = match tokio::fs::read(path).await {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(AnalyzeError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(AnalyzeError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
    };

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path_str)
        .to_string();
    let media_type = media_type_for_extension(path_str).to_string();

    debug!("Resolved local file: {} ({media_type}, {} bytes)", path.display(), bytes.len());
    Ok(SourceFile::new(bytes, media_type, name))
}

/// Download a URL into memory.
///
/// The declared media type is taken from the `Content-Type` header when the
/// server provides one, otherwise from the URL's extension.
async fn download_url(url: &str, timeout_secs: u64) -> Result<SourceFile, AnalyzeError> {
    info!("Downloading content from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| AnalyzeError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            AnalyzeError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            AnalyzeError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(AnalyzeError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let name = extract_filename(url);

    let media_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        // "image/png; charset=binary" → "image/png"
        .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| media_type_for_extension(&name).to_string());

    let bytes = response
        .bytes()
        .await
        .map_err(|e| AnalyzeError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?
        .to_vec();

    info!("Downloaded {} bytes ({media_type})", bytes.len());
    Ok(SourceFile::new(bytes, media_type, name))
}

/// Extract a reasonable display name from the URL path.
fn extract_filename(url: &str) -> String {
    if let Ok(parsed) = reqwest::Url::parse(url) {
        if let Some(mut segments) = parsed.path_segments() {
            if let Some(last) = segments.next_back() {
                if !last.is_empty() {
                    return last.to_string();
                }
            }
        }
    }

    "download".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/post.png"));
        assert!(is_url("http://example.com/post.png"));
        assert!(!is_url("/tmp/post.png"));
        assert!(!is_url("post.png"));
        assert!(!is_url(""));
    }

    #[test]
    fn extension_mapping() {
        assert_eq!(media_type_for_extension("post.PNG"), "image/png");
        assert_eq!(media_type_for_extension("deck.pdf"), "application/pdf");
        assert_eq!(media_type_for_extension("photo.jpeg"), "image/jpeg");
        assert_eq!(media_type_for_extension("photo.jpg"), "image/jpeg");
        assert_eq!(media_type_for_extension("sticker.webp"), "image/webp");
        assert_eq!(
            media_type_for_extension("notes.docx"),
            "application/octet-stream"
        );
        assert_eq!(
            media_type_for_extension("no_extension"),
            "application/octet-stream"
        );
    }

    #[test]
    fn filename_from_url() {
        assert_eq!(
            extract_filename("https://cdn.example.com/uploads/post.png"),
            "post.png"
        );
        assert_eq!(extract_filename("https://example.com/"), "download");
    }

    #[tokio::test]
    async fn missing_local_file_is_not_found() {
        let err = resolve_input("/definitely/not/a/real/file.png", 5)
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyzeError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn local_file_keeps_name_and_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("post.png");
        std::fs::write(&path, b"not really a png").unwrap();

        let source = resolve_input(path.to_str().unwrap(), 5).await.unwrap();
        assert_eq!(source.name, "post.png");
        assert_eq!(source.media_type, "image/png");
        assert_eq!(source.bytes, b"not really a png");
    }

    #[tokio::test]
    async fn empty_local_file_is_not_rejected_here() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.pdf");
        std::fs::write(&path, b"").unwrap();

        // Zero-byte content must survive input resolution and fail at the
        // decode stage instead.
        let source = resolve_input(path.to_str().unwrap(), 5).await.unwrap();
        assert!(source.bytes.is_empty());
        assert_eq!(source.media_type, "application/pdf");
    }
}
