//! Pipeline stages for content analysis.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable and lets us swap an
//! implementation (e.g. the rendering backend) without touching the others.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ ingest ──▶ (render) ──▶ encode ──▶ llm ──▶ parse
//! (path/URL) (classify)  (pdfium)   (base64)   (VLM)   (JSON)
//! ```
//!
//! 1. [`input`]  — resolve the user-supplied path or URL into a [`input::SourceFile`]
//! 2. [`ingest`] — classify the declared media type and normalize to a
//!    canonical payload; PDFs detour through [`render`]
//! 3. [`render`] — rasterise the first PDF page; runs in `spawn_blocking`
//!    because pdfium is not async-safe
//! 4. [`encode`] — base64-wrap the image bytes for the multimodal request body
//! 5. [`llm`]    — the single analysis call; the only stage with network I/O
//! 6. [`parse`]  — strict-JSON parse of the model output into an
//!    [`crate::output::AnalysisResult`]
//!
//! The pipeline is strictly linear: each stage either returns the next
//! stage's input or short-circuits the whole run with an
//! [`crate::error::AnalyzeError`]. Normalization for a file always completes
//! before its analysis call starts.

pub mod encode;
pub mod ingest;
pub mod input;
pub mod llm;
pub mod parse;
pub mod render;
