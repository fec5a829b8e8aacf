//! # socialsense
//!
//! Analyze social media posts — screenshots, draft images, or strategy PDFs —
//! with a Vision Language Model (VLM).
//!
//! ## What it does
//!
//! Given an image or PDF, socialsense normalizes it into a single canonical
//! base64 payload, sends it to a vision model in one multimodal request, and
//! returns a structured report: extracted text, a 0–100 engagement score,
//! sentiment, three strengths, three improvement suggestions, two rewrites of
//! the main hook, and five hashtags.
//!
//! ## Pipeline Overview
//!
//! ```text
//! image / PDF
//!  │
//!  ├─ 1. Input     resolve local file or download from URL
//!  ├─ 2. Classify  declared MIME type → PDF | image | unsupported
//!  ├─ 3. Rasterize PDF only: first page → JPEG via pdfium (spawn_blocking)
//!  ├─ 4. Encode    bytes → base64 canonical payload
//!  ├─ 5. Analyze   one VLM call — no retries, no streaming
//!  └─ 6. Parse     strict JSON → AnalysisResult
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use socialsense::{analyze, AnalyzeConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from GEMINI_API_KEY / OPENAI_API_KEY / ANTHROPIC_API_KEY
//!     let config = AnalyzeConfig::default();
//!     let output = analyze("post.png", &config).await?;
//!     println!("score: {:.0}/100", output.analysis.engagement_score);
//!     println!("sentiment: {}", output.analysis.sentiment);
//!     for h in &output.analysis.hashtags {
//!         println!("  {h}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature   | Default | Description |
//! |-----------|---------|-------------|
//! | `cli`     | on      | Enables the `socialsense` binary (clap + anyhow + tracing-subscriber) |
//! | `bundled` | on      | Embeds the pdfium shared library in the binary at compile time |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! socialsense = { version = "0.1", default-features = false }
//! ```
//!
//! ## Known limitations
//!
//! - **Multi-page PDFs use page 1 only.** Pages beyond the first are silently
//!   ignored — social content analysis is a one-page affair, and the tool
//!   never warns about the rest. Split the document if later pages matter.
//! - **No timeout on the analysis call.** If the provider hangs, the call
//!   hangs; only URL downloads have a configurable timeout. Interactive use
//!   recovers by aborting and retrying manually.
//! - **One file per call.** No batching, queuing, or retry logic; each
//!   failure is terminal for that attempt.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod analyze;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use analyze::{analyze, analyze_source, analyze_sync};
pub use config::{AnalyzeConfig, AnalyzeConfigBuilder, DEFAULT_JPEG_QUALITY, DEFAULT_RENDER_SCALE};
pub use error::AnalyzeError;
pub use output::{AnalysisOutput, AnalysisResult, AnalysisStats, Sentiment};
pub use pipeline::encode::CanonicalPayload;
pub use pipeline::ingest::{normalize, FileKind};
pub use pipeline::input::SourceFile;
