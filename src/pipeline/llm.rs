//! The analysis call: one multimodal request to the vision model.
//!
//! This module is intentionally thin — all prompt engineering lives in
//! [`crate::prompts`] and all response interpretation in
//! [`crate::pipeline::parse`], so the network boundary stays a single
//! opaque request/response exchange.
//!
//! There is deliberately no retry loop, no streaming, and no timeout here:
//! one upload means one call, and a failure is terminal for that attempt.
//! The full provider error is logged for diagnostics; callers only ever see
//! the generic analysis-failure message.

use crate::config::AnalyzeConfig;
use crate::error::AnalyzeError;
use crate::pipeline::encode::CanonicalPayload;
use crate::prompts::{analysis_request_text, DEFAULT_SYSTEM_PROMPT};
use edgequake_llm::{ChatMessage, CompletionOptions, ImageData, LLMProvider};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error};

/// Raw outcome of the analysis call, before parsing.
pub struct AnalysisResponse {
    /// The model's text output (expected: one JSON object).
    pub content: String,
    /// Prompt tokens consumed.
    pub input_tokens: u64,
    /// Completion tokens produced.
    pub output_tokens: u64,
    /// Wall-clock duration of the call.
    pub duration_ms: u64,
}

/// Send one canonical payload to the analysis service.
///
/// ## Message Layout
///
/// 1. **System message** — the analyst role prompt (or a caller override)
/// 2. **User message** — the fixed instruction text plus the payload as a
///    base64 image attachment with `detail: "high"` so fine caption text
///    survives the provider's image tiling
pub async fn request_analysis(
    provider: &Arc<dyn LLMProvider>,
    payload: &CanonicalPayload,
    config: &AnalyzeConfig,
) -> Result<AnalysisResponse, AnalyzeError> {
    let start = Instant::now();

    let system_prompt = config
        .system_prompt
        .as_deref()
        .unwrap_or(DEFAULT_SYSTEM_PROMPT);

    let image = ImageData::new(payload.encoded_data.clone(), payload.mime_type.clone())
        .with_detail("high");

    let messages = vec![
        ChatMessage::system(system_prompt),
        ChatMessage::user_with_images(analysis_request_text(), vec![image]),
    ];

    let options = build_options(config);

    match provider.chat(&messages, Some(&options)).await {
        Ok(response) => {
            let duration = start.elapsed();
            debug!(
                "Analysis call: {} input tokens, {} output tokens, {:?}",
                response.prompt_tokens, response.completion_tokens, duration
            );

            Ok(AnalysisResponse {
                content: response.content,
                input_tokens: response.prompt_tokens as u64,
                output_tokens: response.completion_tokens as u64,
                duration_ms: duration.as_millis() as u64,
            })
        }
        Err(e) => {
            // Full detail for diagnostics only; the user gets the generic message.
            error!("Analysis service error for '{}': {}", payload.name, e);
            Err(AnalyzeError::analysis_failed())
        }
    }
}

/// Build `CompletionOptions` from the analysis config.
fn build_options(config: &AnalyzeConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(config.temperature),
        max_tokens: Some(config.max_tokens),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_options_defaults() {
        let config = AnalyzeConfig::default();
        let opts = build_options(&config);
        assert_eq!(opts.temperature, Some(0.2));
        assert_eq!(opts.max_tokens, Some(2048));
    }
}
