//! Prompts for the content-analysis request.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — tuning the analysis behaviour (e.g. how
//!    hashtags are picked) requires editing exactly one place.
//!
//! 2. **Testability** — unit tests can inspect prompts directly without a
//!    live model, making prompt regressions easy to catch.
//!
//! Callers can override the system prompt via
//! [`crate::config::AnalyzeConfig::system_prompt`]; the constants here are
//! used only when no override is provided.

/// Default system prompt for the analysis call.
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are an expert social media strategist and content analyst. You are given \
a single image of a social media post (or a rasterized page of a strategy \
document). You read it as a human would and produce a precise, actionable \
assessment. You always respond with a single JSON object and nothing else: \
no prose, no markdown fences, no commentary.";

/// The fixed instruction sent alongside the image.
///
/// The numbered requirements and exact list counts are part of the output
/// contract; [`crate::pipeline::parse`] expects a response shaped by them.
pub const ANALYSIS_INSTRUCTION: &str = "\
Analyze this social media content.
1. Extract all visible text accurately (OCR).
2. Provide an engagement score (0-100).
3. Identify the sentiment: one of Positive, Neutral, or Negative.
4. List 3 key strengths of the content.
5. List 3 specific improvements to increase engagement (likes, shares, comments).
6. Provide 2 better versions/rewrites of the main hook or caption.
7. Suggest 5 trending relevant hashtags.

The response must be a single valid JSON object conforming to this schema, \
with every field present:";

/// The response schema, declared to the model as part of the user message.
///
/// Field names here are the wire contract; they must stay in sync with
/// [`crate::output::AnalysisResult`]'s serde renames.
pub const RESPONSE_SCHEMA: &str = r#"{
  "type": "object",
  "properties": {
    "extractedText":     { "type": "string" },
    "engagementScore":   { "type": "number" },
    "sentiment":         { "type": "string", "enum": ["Positive", "Neutral", "Negative"] },
    "strengths":         { "type": "array", "items": { "type": "string" } },
    "improvements":      { "type": "array", "items": { "type": "string" } },
    "suggestedRewrites": { "type": "array", "items": { "type": "string" } },
    "hashtags":          { "type": "array", "items": { "type": "string" } }
  },
  "required": ["extractedText", "engagementScore", "sentiment", "strengths",
               "improvements", "suggestedRewrites", "hashtags"]
}"#;

/// Assemble the full user-message text: instruction plus inline schema.
pub fn analysis_request_text() -> String {
    format!("{}\n{}", ANALYSIS_INSTRUCTION, RESPONSE_SCHEMA)
}
