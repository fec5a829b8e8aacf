//! Top-level analysis entry points.
//!
//! The pipeline is a linear sequence of awaited stages: resolve the input,
//! normalize it to a canonical payload, make the single analysis call, and
//! parse the response. Each stage either yields the next stage's input or
//! short-circuits the run with an [`AnalyzeError`]. Normalization always
//! completes before the analysis call starts; there is exactly one
//! in-flight pipeline per call.

use crate::config::AnalyzeConfig;
use crate::error::AnalyzeError;
use crate::output::{AnalysisOutput, AnalysisStats};
use crate::pipeline::{ingest, input, llm, parse};
use edgequake_llm::{LLMProvider, ProviderFactory};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Analyze a social media post given a file path or HTTP/HTTPS URL.
///
/// This is the primary entry point for the library.
///
/// # Errors
/// - Input errors: file not found, permission denied, download failure
/// - [`AnalyzeError::UnsupportedFileType`] for non-image/non-PDF uploads
/// - [`AnalyzeError::DecodeFailure`] for empty or corrupt content
/// - [`AnalyzeError::AnalysisFailed`] when the service call fails or
///   returns data outside the declared schema
pub async fn analyze(
    input_str: impl AsRef<str>,
    config: &AnalyzeConfig,
) -> Result<AnalysisOutput, AnalyzeError> {
    let input_str = input_str.as_ref();
    info!("Starting analysis: {}", input_str);

    let source = input::resolve_input(input_str, config.download_timeout_secs).await?;
    analyze_source(source, config).await
}

/// Analyze an in-memory upload.
///
/// Use this when the file content comes from somewhere other than the
/// filesystem — an HTTP form body, a message queue, a test fixture. The
/// declared media type on the [`input::SourceFile`] drives dispatch exactly
/// as it would for a path input.
pub async fn analyze_source(
    source: input::SourceFile,
    config: &AnalyzeConfig,
) -> Result<AnalysisOutput, AnalyzeError> {
    let total_start = Instant::now();

    // ── Step 1: Resolve provider ─────────────────────────────────────────
    let provider = resolve_provider(config)?;

    // ── Step 2: Normalize to a canonical payload ─────────────────────────
    let normalize_start = Instant::now();
    let payload = ingest::normalize(source, config).await?;
    let normalize_duration_ms = normalize_start.elapsed().as_millis() as u64;
    debug!(
        "Normalized '{}' → {} ({} base64 bytes) in {}ms",
        payload.name,
        payload.mime_type,
        payload.encoded_data.len(),
        normalize_duration_ms
    );

    // ── Step 3: One analysis call ────────────────────────────────────────
    let response = llm::request_analysis(&provider, &payload, config).await?;

    // ── Step 4: Parse and validate the response ──────────────────────────
    let analysis = parse::parse_analysis(&response.content)?;

    let stats = AnalysisStats {
        normalize_duration_ms,
        llm_duration_ms: response.duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        input_tokens: response.input_tokens,
        output_tokens: response.output_tokens,
    };

    info!(
        "Analysis complete for '{}': score {:.0}, {} sentiment, {}ms total",
        payload.name, analysis.engagement_score, analysis.sentiment, stats.total_duration_ms
    );

    Ok(AnalysisOutput {
        analysis,
        file_name: payload.name,
        mime_type: payload.mime_type,
        stats,
    })
}

/// Synchronous wrapper around [`analyze`].
///
/// Creates a temporary tokio runtime internally.
pub fn analyze_sync(
    input_str: impl AsRef<str>,
    config: &AnalyzeConfig,
) -> Result<AnalysisOutput, AnalyzeError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| AnalyzeError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(analyze(input_str, config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Instantiate a named provider with the given model.
fn create_vision_provider(
    provider_name: &str,
    model: &str,
) -> Result<Arc<dyn LLMProvider>, AnalyzeError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        AnalyzeError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

/// Default vision model per provider.
fn default_model_for(provider_name: &str) -> &'static str {
    match provider_name {
        "gemini" => "gemini-2.5-flash",
        "anthropic" => "claude-haiku-4-20250514",
        _ => "gpt-4.1-mini",
    }
}

/// Resolve the LLM provider, from most-specific to least-specific.
///
/// The fallback chain lets library users and CLI users each set exactly as
/// much or as little as they need:
///
/// 1. **Pre-built provider** (`config.provider`) — the caller constructed
///    and configured the provider entirely; used as-is. Useful in tests or
///    when the caller needs custom middleware.
///
/// 2. **Named provider + model** (`config.provider_name`) — reads the
///    corresponding API key (`GEMINI_API_KEY`, `OPENAI_API_KEY`, …) from
///    the environment.
///
/// 3. **Environment pair** (`EDGEQUAKE_LLM_PROVIDER` + `EDGEQUAKE_MODEL`) —
///    a provider/model choice made at the execution-environment level.
///
/// 4. **Gemini preference** — when `GEMINI_API_KEY` is present, Gemini is
///    picked even if other keys exist; it is the service this tool was
///    built against.
///
/// 5. **Full auto-detection** — the factory scans all known API-key
///    variables and picks the first available provider.
fn resolve_provider(config: &AnalyzeConfig) -> Result<Arc<dyn LLMProvider>, AnalyzeError> {
    // 1) User-provided provider takes priority
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    // 2) Provider name + model
    if let Some(ref name) = config.provider_name {
        let model = config
            .model
            .as_deref()
            .unwrap_or_else(|| default_model_for(name));
        return create_vision_provider(name, model);
    }

    // 3) Honour EDGEQUAKE_LLM_PROVIDER + EDGEQUAKE_MODEL when both set
    if let (Ok(prov), Ok(model)) = (
        std::env::var("EDGEQUAKE_LLM_PROVIDER"),
        std::env::var("EDGEQUAKE_MODEL"),
    ) {
        if !prov.is_empty() && !model.is_empty() {
            return create_vision_provider(&prov, &model);
        }
    }

    // 4) Prefer Gemini when its key is present
    if let Ok(gemini_key) = std::env::var("GEMINI_API_KEY") {
        if !gemini_key.is_empty() {
            let model = config
                .model
                .as_deref()
                .unwrap_or_else(|| default_model_for("gemini"));
            return create_vision_provider("gemini", model);
        }
    }

    // 5) Full auto-detection
    let (llm_provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| AnalyzeError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be auto-detected from environment.\n\
                Set GEMINI_API_KEY, OPENAI_API_KEY, or ANTHROPIC_API_KEY,\n\
                or configure a provider explicitly.\nError: {}",
                e
            ),
        })?;

    Ok(llm_provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_models_cover_known_providers() {
        assert_eq!(default_model_for("gemini"), "gemini-2.5-flash");
        assert!(default_model_for("openai").starts_with("gpt-"));
        assert!(default_model_for("anthropic").starts_with("claude-"));
        // Unknown providers fall back to an OpenAI-compatible default.
        assert!(default_model_for("ollama").starts_with("gpt-"));
    }
}
