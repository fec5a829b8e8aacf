//! CLI binary for socialsense.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `AnalyzeConfig` and renders the analysis report.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use socialsense::{analyze, AnalysisOutput, AnalyzeConfig, Sentiment};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Analyze a screenshot of a post
  socialsense post.png

  # Analyze the first page of a strategy PDF
  socialsense campaign_deck.pdf

  # Analyze an image from a URL, save the report as JSON
  socialsense https://cdn.example.com/draft.png --json -o report.json

  # Use a specific model
  socialsense --provider openai --model gpt-4.1 post.jpg

  # Sharper PDF rasterization for small caption text
  socialsense --scale 2.0 one_pager.pdf

SUPPORTED PROVIDERS & MODELS:
  Provider     Model                      Vision
  ─────────    ─────────────────────────  ──────
  gemini       gemini-2.5-flash (default) ✓
  gemini       gemini-2.5-pro             ✓
  openai       gpt-4.1-mini               ✓
  openai       gpt-4.1                    ✓
  anthropic    claude-haiku-4-20250514    ✓
  ollama       llava, llama3.2-vision     ✓

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY          Google Gemini API key (preferred when set)
  OPENAI_API_KEY          OpenAI API key
  ANTHROPIC_API_KEY       Anthropic API key
  EDGEQUAKE_LLM_PROVIDER  Override provider (gemini, openai, anthropic, ollama)
  EDGEQUAKE_MODEL         Override model ID
  PDFIUM_LIB_PATH         Path to an existing libpdfium — skips auto-download

SETUP:
  1. Set API key:     export GEMINI_API_KEY=...
  2. Analyze:         socialsense post.png

  PDFium (~30 MB) is needed only for PDF inputs; it is bundled into the
  binary by default, or downloaded and cached automatically on first use.

FILE SUPPORT:
  Images (PNG, JPEG, WebP, GIF, BMP) are sent as-is. PDFs are rasterized —
  first page only — before analysis. Anything else is rejected. Files over
  ~10 MB work but upload slowly; screenshots rarely get near that.
"#;

/// Analyze social media post images and PDFs with Vision LLMs.
#[derive(Parser, Debug)]
#[command(
    name = "socialsense",
    version,
    about = "Analyze social media post images and PDFs with Vision LLMs",
    long_about = "Analyze a social media post (screenshot, draft image, or strategy PDF) with a \
Vision Language Model: text extraction, engagement scoring, sentiment, strengths, improvement \
suggestions, caption rewrites, and hashtags. Supports Google Gemini, OpenAI, Anthropic, Azure \
OpenAI, and any OpenAI-compatible endpoint (Ollama, vLLM, LiteLLM, etc.).",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local image/PDF path or HTTP/HTTPS URL.
    input: String,

    /// Write the report to this file instead of stdout.
    #[arg(short, long, env = "SOCIALSENSE_OUTPUT")]
    output: Option<PathBuf>,

    /// LLM model ID (e.g. gemini-2.5-flash, gpt-4.1-mini).
    #[arg(long, env = "EDGEQUAKE_MODEL")]
    model: Option<String>,

    /// LLM provider: gemini, openai, anthropic, ollama, azure.
    #[arg(
        long,
        env = "EDGEQUAKE_PROVIDER",
        long_help = "LLM provider. Auto-detected from API key env vars if not set.\n\
          Supported: gemini, openai, anthropic, azure, ollama, or any OpenAI-compatible URL."
    )]
    provider: Option<String>,

    /// PDF rasterization scale (0.5–4.0).
    #[arg(long, env = "SOCIALSENSE_SCALE", default_value_t = 1.5)]
    scale: f32,

    /// JPEG quality for rasterized PDF pages (1–100).
    #[arg(long, env = "SOCIALSENSE_JPEG_QUALITY", default_value_t = 85,
          value_parser = clap::value_parser!(u8).range(1..=100))]
    jpeg_quality: u8,

    /// Path to a text file containing a custom system prompt.
    #[arg(long, env = "SOCIALSENSE_SYSTEM_PROMPT")]
    system_prompt: Option<PathBuf>,

    /// Max LLM output tokens.
    #[arg(long, env = "SOCIALSENSE_MAX_TOKENS", default_value_t = 2048)]
    max_tokens: usize,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "SOCIALSENSE_TEMPERATURE", default_value_t = 0.2)]
    temperature: f32,

    /// Output the full report as JSON instead of the terminal view.
    #[arg(long, env = "SOCIALSENSE_JSON")]
    json: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "SOCIALSENSE_NO_SPINNER")]
    no_spinner: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "SOCIALSENSE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and the report itself.
    #[arg(short, long, env = "SOCIALSENSE_QUIET")]
    quiet: bool,

    /// HTTP download timeout in seconds (URL inputs).
    #[arg(long, env = "SOCIALSENSE_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the spinner is active; the
    // spinner provides all the feedback that matters to the user.
    let show_spinner = !cli.quiet && !cli.no_spinner && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_spinner {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Ensure the PDFium engine is available for PDF inputs ─────────────
    // Only PDFs need pdfium; skip the bootstrap entirely for image inputs
    // so `socialsense post.png` works offline with no library setup.
    let is_pdf_input = cli.input.to_ascii_lowercase().ends_with(".pdf");
    if is_pdf_input {
        ensure_pdfium(cli.quiet).await?;
    }

    // ── Build config ─────────────────────────────────────────────────────
    let config = build_config(&cli).await?;

    // ── Run the pipeline behind a spinner ────────────────────────────────
    let spinner = if show_spinner {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_message("Analyzing content…");
        bar.enable_steady_tick(Duration::from_millis(80));
        Some(bar)
    } else {
        None
    };

    let result = analyze(&cli.input, &config).await;

    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }

    let output = result.context("Analysis failed")?;

    // ── Emit the report ──────────────────────────────────────────────────
    let rendered = if cli.json {
        serde_json::to_string_pretty(&output).context("Failed to serialise output")?
    } else {
        render_report(&output)
    };

    if let Some(ref output_path) = cli.output {
        write_atomic(output_path, &rendered).await?;
        if !cli.quiet {
            eprintln!(
                "{} report written to {}",
                green("✔"),
                bold(&output_path.display().to_string())
            );
        }
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(rendered.as_bytes())
            .context("Failed to write to stdout")?;
        if !rendered.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
    }

    if !cli.quiet && !cli.json {
        eprintln!(
            "   {} tokens in  /  {} tokens out  —  {}ms total",
            dim(&output.stats.input_tokens.to_string()),
            dim(&output.stats.output_tokens.to_string()),
            output.stats.total_duration_ms,
        );
    }

    Ok(())
}

/// Download or extract the pdfium library before any PDF is opened.
async fn ensure_pdfium(quiet: bool) -> Result<()> {
    // When compiled with `--features bundled`, the pdfium shared library was
    // embedded at compile time; extraction (if needed) is instant.
    #[cfg(feature = "bundled")]
    {
        tokio::task::block_in_place(|| pdfium_auto::ensure_pdfium_bundled())
            .context("Failed to extract bundled PDFium engine")?;
    }

    #[cfg(not(feature = "bundled"))]
    if !pdfium_auto::is_pdfium_cached() {
        if !quiet {
            let dl_bar = ProgressBar::new(0);
            dl_bar.set_style(
                ProgressStyle::with_template(
                    "{spinner:.cyan} {prefix:.bold}  \
                     [{bar:42.green/238}] {bytes}/{total_bytes}  ETA {eta_precise}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▉▊▋▌▍▎▏  ")
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
            );
            dl_bar.set_prefix("PDF engine");
            dl_bar.set_message("Connecting…");
            dl_bar.enable_steady_tick(Duration::from_millis(80));

            let bar = dl_bar.clone();
            tokio::task::block_in_place(|| {
                pdfium_auto::ensure_pdfium_library(Some(&|downloaded, total| {
                    if let Some(t) = total {
                        if bar.length().unwrap_or(0) != t {
                            bar.set_length(t);
                        }
                    }
                    bar.set_position(downloaded);
                }))
            })
            .context("Failed to download PDFium engine")?;

            dl_bar.finish_with_message("ready ✓");
        } else {
            tokio::task::block_in_place(|| pdfium_auto::ensure_pdfium_library(None))
                .context("Failed to download PDFium engine")?;
        }
    }

    let _ = quiet;
    Ok(())
}

/// Map CLI args to `AnalyzeConfig`.
async fn build_config(cli: &Cli) -> Result<AnalyzeConfig> {
    let system_prompt = if let Some(ref path) = cli.system_prompt {
        Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read system prompt from {:?}", path))?,
        )
    } else {
        None
    };

    let mut builder = AnalyzeConfig::builder()
        .scale(cli.scale)
        .jpeg_quality(cli.jpeg_quality)
        .max_tokens(cli.max_tokens)
        .temperature(cli.temperature)
        .download_timeout_secs(cli.download_timeout);

    if let Some(ref model) = cli.model {
        builder = builder.model(model.clone());
    }
    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider.clone());
    }
    if let Some(prompt) = system_prompt {
        builder = builder.system_prompt(prompt);
    }

    builder.build().context("Invalid configuration")
}

/// Atomic write: temp file + rename, so an interrupted run never leaves a
/// partial report behind.
async fn write_atomic(path: &PathBuf, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }
    }

    let tmp_path = path.with_extension("tmp");
    tokio::fs::write(&tmp_path, content)
        .await
        .with_context(|| format!("Failed to write {:?}", tmp_path))?;
    tokio::fs::rename(&tmp_path, path)
        .await
        .with_context(|| format!("Failed to move report into place at {:?}", path))?;

    Ok(())
}

/// Render the analysis as a readable terminal report.
fn render_report(output: &AnalysisOutput) -> String {
    let a = &output.analysis;
    let mut report = String::new();

    report.push_str(&format!(
        "\n{} {}  {}\n\n",
        cyan("◆"),
        bold(&output.file_name),
        dim(&output.mime_type)
    ));

    let score = a.engagement_score;
    let score_str = format!("{score:.0}/100");
    let colored_score = if score >= 70.0 {
        green(&score_str)
    } else if score >= 40.0 {
        yellow(&score_str)
    } else {
        red(&score_str)
    };
    let sentiment = match a.sentiment {
        Sentiment::Positive => green("Positive"),
        Sentiment::Neutral => yellow("Neutral"),
        Sentiment::Negative => red("Negative"),
    };
    report.push_str(&format!(
        "  {}  {}    {}  {}\n",
        bold("Engagement"),
        colored_score,
        bold("Sentiment"),
        sentiment
    ));

    if !a.extracted_text.trim().is_empty() {
        report.push_str(&format!("\n{}\n", bold("Extracted text")));
        for line in a.extracted_text.lines() {
            report.push_str(&format!("  {}\n", dim(line)));
        }
    }

    push_list(&mut report, "Strengths", &a.strengths, "✓", green);
    push_list(&mut report, "Improvements", &a.improvements, "→", yellow);
    push_list(&mut report, "Suggested rewrites", &a.suggested_rewrites, "“", cyan);

    if !a.hashtags.is_empty() {
        report.push_str(&format!("\n{}\n  {}\n", bold("Hashtags"), a.hashtags.join("  ")));
    }

    report
}

fn push_list(report: &mut String, title: &str, items: &[String], marker: &str, color: fn(&str) -> String) {
    if items.is_empty() {
        return;
    }
    report.push_str(&format!("\n{}\n", bold(title)));
    for item in items {
        report.push_str(&format!("  {} {}\n", color(marker), item));
    }
}
