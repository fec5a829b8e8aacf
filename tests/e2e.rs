//! End-to-end integration tests for socialsense.
//!
//! Normalization tests that only touch the image path run everywhere.
//! Tests that open a PDF need the pdfium shared library, and the live
//! analysis test makes a real LLM API call; both are gated behind the
//! `E2E_ENABLED` environment variable so they do not run in CI unless
//! explicitly requested.
//!
//! Run with:
//!   E2E_ENABLED=1 cargo test --test e2e -- --nocapture

use base64::{engine::general_purpose::STANDARD, Engine as _};
use socialsense::{analyze, normalize, AnalyzeConfig, AnalyzeError, Sentiment, SourceFile};

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Skip this test unless E2E_ENABLED is set.
macro_rules! e2e_skip_unless_enabled {
    () => {
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
    };
}

/// Build a valid PDF in memory, one empty page per `(width, height)` entry
/// (dimensions in points). Offsets in the xref table are computed while the
/// body is assembled, so the document parses strictly.
fn minimal_pdf(pages: &[(f32, f32)]) -> Vec<u8> {
    let mut body = String::from("%PDF-1.4\n");
    let mut offsets: Vec<usize> = Vec::new();

    let kids: String = (0..pages.len())
        .map(|i| format!("{} 0 R", i + 3))
        .collect::<Vec<_>>()
        .join(" ");

    offsets.push(body.len());
    body.push_str("1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");

    offsets.push(body.len());
    body.push_str(&format!(
        "2 0 obj\n<< /Type /Pages /Kids [{kids}] /Count {} >>\nendobj\n",
        pages.len()
    ));

    for (i, (w, h)) in pages.iter().enumerate() {
        offsets.push(body.len());
        body.push_str(&format!(
            "{} 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {w} {h}] >>\nendobj\n",
            i + 3
        ));
    }

    let xref_start = body.len();
    body.push_str(&format!("xref\n0 {}\n", offsets.len() + 1));
    body.push_str("0000000000 65535 f \n");
    for off in &offsets {
        body.push_str(&format!("{off:010} 00000 n \n"));
    }
    body.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_start}\n%%EOF\n",
        offsets.len() + 1
    ));

    body.into_bytes()
}

/// Encode a small solid-colour RGB image as PNG bytes.
fn tiny_png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([240, 90, 40]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
        .expect("PNG encoding should succeed");
    buf
}

// ── Normalization: image path (no pdfium, no network) ────────────────────────

#[tokio::test]
async fn png_passes_through_untouched() {
    let config = AnalyzeConfig::default();
    let png = tiny_png(6, 4);
    let source = SourceFile::new(png.clone(), "image/png", "draft_post.png");

    let payload = normalize(source, &config).await.expect("normalize");

    assert_eq!(payload.mime_type, "image/png");
    assert_eq!(payload.name, "draft_post.png");

    // Byte-exact pass-through: no re-encoding, no pixel transformation.
    let decoded = STANDARD.decode(&payload.encoded_data).expect("valid base64");
    assert_eq!(decoded, png);

    // Pure payload, never a data URI.
    assert!(!payload.encoded_data.starts_with("data:"));
    assert!(!payload.encoded_data.contains(','));
}

#[tokio::test]
async fn image_mime_is_preserved_exactly() {
    let config = AnalyzeConfig::default();
    for mime in ["image/png", "image/jpeg", "image/webp", "image/gif"] {
        let source = SourceFile::new(vec![1, 2, 3], mime, "post");
        let payload = normalize(source, &config).await.expect("normalize");
        assert_eq!(payload.mime_type, mime);
    }
}

#[tokio::test]
async fn unsupported_type_produces_no_payload() {
    let config = AnalyzeConfig::default();
    let source = SourceFile::new(b"%!PS-Adobe".to_vec(), "application/postscript", "old.ps");

    let err = normalize(source, &config).await.unwrap_err();
    assert!(
        matches!(err, AnalyzeError::UnsupportedFileType { .. }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn empty_image_fails_at_decode_stage() {
    let config = AnalyzeConfig::default();
    let source = SourceFile::new(Vec::new(), "image/png", "empty.png");

    let err = normalize(source, &config).await.unwrap_err();
    assert!(matches!(err, AnalyzeError::DecodeFailure { .. }), "got: {err:?}");
}

// ── Normalization: PDF path (needs the pdfium shared library) ────────────────

#[tokio::test]
async fn pdf_normalizes_to_scaled_jpeg() {
    e2e_skip_unless_enabled!();

    let config = AnalyzeConfig::default();
    let pdf = minimal_pdf(&[(200.0, 100.0)]);
    let source = SourceFile::new(pdf, "application/pdf", "one_pager.pdf");

    let payload = normalize(source, &config).await.expect("normalize");

    // PDF output MIME is always JPEG, regardless of source.
    assert_eq!(payload.mime_type, "image/jpeg");
    assert_eq!(payload.name, "one_pager.pdf");

    let jpeg = STANDARD.decode(&payload.encoded_data).expect("valid base64");
    assert_eq!(
        image::guess_format(&jpeg).expect("recognisable format"),
        image::ImageFormat::Jpeg
    );

    // 200x100 pt page at the default 1.5 scale.
    let img = image::load_from_memory(&jpeg).expect("decodable JPEG");
    assert_eq!((img.width(), img.height()), (300, 150));
}

#[tokio::test]
async fn multi_page_pdf_uses_page_one_only() {
    e2e_skip_unless_enabled!();

    let config = AnalyzeConfig::default();
    // Page 1 is 160x90; the four later pages are much larger. Output
    // dimensions must reflect page 1 alone.
    let pdf = minimal_pdf(&[
        (160.0, 90.0),
        (640.0, 640.0),
        (640.0, 640.0),
        (640.0, 640.0),
        (640.0, 640.0),
    ]);
    let source = SourceFile::new(pdf, "application/pdf", "deck.pdf");

    let payload = normalize(source, &config).await.expect("normalize");
    assert_eq!(payload.mime_type, "image/jpeg");

    let jpeg = STANDARD.decode(&payload.encoded_data).unwrap();
    let img = image::load_from_memory(&jpeg).expect("decodable JPEG");
    assert_eq!((img.width(), img.height()), (240, 135));
}

#[tokio::test]
async fn landscape_pdf_still_becomes_jpeg() {
    e2e_skip_unless_enabled!();

    let config = AnalyzeConfig::default();
    let pdf = minimal_pdf(&[(400.0, 200.0)]);
    let source = SourceFile::new(pdf, "application/pdf", "wide.pdf");

    let payload = normalize(source, &config).await.expect("normalize");
    assert_eq!(payload.mime_type, "image/jpeg");

    let jpeg = STANDARD.decode(&payload.encoded_data).unwrap();
    let img = image::load_from_memory(&jpeg).unwrap();
    assert_eq!((img.width(), img.height()), (600, 300));
}

#[tokio::test]
async fn custom_scale_is_applied() {
    e2e_skip_unless_enabled!();

    let config = AnalyzeConfig::builder().scale(2.0).build().unwrap();
    let pdf = minimal_pdf(&[(100.0, 50.0)]);
    let source = SourceFile::new(pdf, "application/pdf", "small.pdf");

    let payload = normalize(source, &config).await.expect("normalize");
    let jpeg = STANDARD.decode(&payload.encoded_data).unwrap();
    let img = image::load_from_memory(&jpeg).unwrap();
    assert_eq!((img.width(), img.height()), (200, 100));
}

#[tokio::test]
async fn zero_byte_pdf_is_a_decode_failure() {
    e2e_skip_unless_enabled!();

    let config = AnalyzeConfig::default();
    let source = SourceFile::new(Vec::new(), "application/pdf", "empty.pdf");

    let err = normalize(source, &config).await.unwrap_err();
    assert!(matches!(err, AnalyzeError::DecodeFailure { .. }), "got: {err:?}");
}

#[tokio::test]
async fn truncated_pdf_is_a_decode_failure() {
    e2e_skip_unless_enabled!();

    let config = AnalyzeConfig::default();
    let mut pdf = minimal_pdf(&[(200.0, 100.0)]);
    pdf.truncate(40); // cut off mid-object, before any xref

    let source = SourceFile::new(pdf, "application/pdf", "broken.pdf");
    let err = normalize(source, &config).await.unwrap_err();
    assert!(matches!(err, AnalyzeError::DecodeFailure { .. }), "got: {err:?}");
}

#[tokio::test]
async fn garbage_claiming_to_be_pdf_is_a_decode_failure() {
    e2e_skip_unless_enabled!();

    let config = AnalyzeConfig::default();
    let source = SourceFile::new(b"this is not a pdf at all".to_vec(), "application/pdf", "fake.pdf");

    let err = normalize(source, &config).await.unwrap_err();
    assert!(matches!(err, AnalyzeError::DecodeFailure { .. }), "got: {err:?}");
}

// ── Full pipeline (needs a live LLM API key) ─────────────────────────────────

#[tokio::test]
async fn analyze_png_live() {
    e2e_skip_unless_enabled!();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("post.png");
    std::fs::write(&path, tiny_png(256, 256)).unwrap();

    let config = AnalyzeConfig::default();
    let output = analyze(path.to_str().unwrap(), &config)
        .await
        .expect("live analysis should succeed");

    assert_eq!(output.mime_type, "image/png");
    assert_eq!(output.file_name, "post.png");

    let a = &output.analysis;
    assert!((0.0..=100.0).contains(&a.engagement_score));
    assert!(matches!(
        a.sentiment,
        Sentiment::Positive | Sentiment::Neutral | Sentiment::Negative
    ));
    assert!(!a.strengths.is_empty());
    assert!(!a.improvements.is_empty());
    assert!(!a.suggested_rewrites.is_empty());
    assert!(!a.hashtags.is_empty());
    assert!(output.stats.input_tokens > 0, "should have consumed tokens");

    println!(
        "[live] score {:.0}, sentiment {}, {} in / {} out tokens",
        a.engagement_score, a.sentiment, output.stats.input_tokens, output.stats.output_tokens
    );
}

#[tokio::test]
async fn analyze_pdf_live() {
    e2e_skip_unless_enabled!();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("campaign.pdf");
    std::fs::write(&path, minimal_pdf(&[(300.0, 200.0)])).unwrap();

    let config = AnalyzeConfig::default();
    let output = analyze(path.to_str().unwrap(), &config)
        .await
        .expect("live analysis should succeed");

    // The payload the service saw was the rasterized page.
    assert_eq!(output.mime_type, "image/jpeg");
    assert!((0.0..=100.0).contains(&output.analysis.engagement_score));
}

#[tokio::test]
async fn analyze_nonexistent_file_fails_cleanly() {
    let config = AnalyzeConfig::default();
    let err = analyze("/definitely/not/a/real/file.png", &config)
        .await
        .unwrap_err();
    // Input resolution fails before any provider or network work.
    assert!(matches!(err, AnalyzeError::FileNotFound { .. }), "got: {err:?}");
}
