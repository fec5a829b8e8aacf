//! Configuration for content analysis.
//!
//! All behaviour is controlled through [`AnalyzeConfig`], built via its
//! [`AnalyzeConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share configs, log them, and diff two runs.

use crate::error::AnalyzeError;
use edgequake_llm::LLMProvider;
use std::fmt;
use std::sync::Arc;

/// Upscaling factor applied to a PDF page's native point size when
/// rasterizing. 1.5× keeps small caption text legible for the vision model
/// without ballooning the payload.
pub const DEFAULT_RENDER_SCALE: f32 = 1.5;

/// JPEG quality used when serializing the rasterized page (1–100).
pub const DEFAULT_JPEG_QUALITY: u8 = 85;

/// Configuration for a content analysis run.
///
/// Built via [`AnalyzeConfig::builder()`] or [`AnalyzeConfig::default()`].
///
/// # Example
/// ```rust
/// use socialsense::AnalyzeConfig;
///
/// let config = AnalyzeConfig::builder()
///     .model("gemini-2.5-flash")
///     .temperature(0.2)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct AnalyzeConfig {
    /// PDF rasterization scale relative to the page's point size.
    /// Range: 0.5–4.0. Default: 1.5.
    pub scale: f32,

    /// JPEG quality for the rasterized PDF page (1–100). Default: 85.
    ///
    /// Pass-through images are never re-encoded, so this only affects the
    /// PDF path.
    pub jpeg_quality: u8,

    /// LLM model identifier, e.g. "gemini-2.5-flash", "gpt-4.1-mini".
    /// If None, uses the provider's default vision model.
    pub model: Option<String>,

    /// LLM provider name (e.g. "gemini", "openai", "anthropic").
    /// If None along with `provider`, the provider is auto-detected from
    /// API-key environment variables.
    pub provider_name: Option<String>,

    /// Pre-constructed LLM provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Sampling temperature for the analysis completion. Default: 0.2.
    ///
    /// Low temperature keeps the extracted text faithful to what is on the
    /// image while leaving a little room for the rewrite suggestions.
    pub temperature: f32,

    /// Maximum tokens the model may generate. Default: 2048.
    ///
    /// The structured report (text extraction plus fourteen short list
    /// items) fits comfortably; text-dense screenshots may need more.
    pub max_tokens: usize,

    /// Custom system prompt. If None, uses the built-in default.
    pub system_prompt: Option<String>,

    /// Download timeout for URL inputs in seconds. Default: 120.
    ///
    /// This is the only timeout in the pipeline. The analysis call itself
    /// has none: if the service hangs, the operation hangs, and the caller
    /// decides when to give up.
    pub download_timeout_secs: u64,
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        Self {
            scale: DEFAULT_RENDER_SCALE,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            model: None,
            provider_name: None,
            provider: None,
            temperature: 0.2,
            max_tokens: 2048,
            system_prompt: None,
            download_timeout_secs: 120,
        }
    }
}

impl fmt::Debug for AnalyzeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyzeConfig")
            .field("scale", &self.scale)
            .field("jpeg_quality", &self.jpeg_quality)
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .finish()
    }
}

impl AnalyzeConfig {
    /// Create a new builder for `AnalyzeConfig`.
    pub fn builder() -> AnalyzeConfigBuilder {
        AnalyzeConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`AnalyzeConfig`].
#[derive(Debug)]
pub struct AnalyzeConfigBuilder {
    config: AnalyzeConfig,
}

impl AnalyzeConfigBuilder {
    pub fn scale(mut self, scale: f32) -> Self {
        self.config.scale = scale.clamp(0.5, 4.0);
        self
    }

    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.config.jpeg_quality = quality.clamp(1, 100);
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<AnalyzeConfig, AnalyzeError> {
        let c = &self.config;
        if !(0.5..=4.0).contains(&c.scale) {
            return Err(AnalyzeError::InvalidConfig(format!(
                "Render scale must be 0.5–4.0, got {}",
                c.scale
            )));
        }
        if c.jpeg_quality == 0 || c.jpeg_quality > 100 {
            return Err(AnalyzeError::InvalidConfig(format!(
                "JPEG quality must be 1–100, got {}",
                c.jpeg_quality
            )));
        }
        if c.max_tokens == 0 {
            return Err(AnalyzeError::InvalidConfig(
                "max_tokens must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}
