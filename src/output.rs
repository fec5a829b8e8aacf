//! Output types: the structured analysis report and run statistics.
//!
//! [`AnalysisResult`] mirrors the wire schema declared to the analysis
//! service field-for-field (camelCase on the wire), so the model's JSON
//! deserializes directly into it. Everything here is serde-serializable so
//! the CLI's `--json` mode can emit the whole [`AnalysisOutput`] verbatim.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall sentiment of the analyzed post.
///
/// The service is instructed to pick exactly one of these three; lowercase
/// and uppercase spellings are accepted at the parse boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    #[serde(alias = "positive", alias = "POSITIVE")]
    Positive,
    #[serde(alias = "neutral", alias = "NEUTRAL")]
    Neutral,
    #[serde(alias = "negative", alias = "NEGATIVE")]
    Negative,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "Positive"),
            Sentiment::Neutral => write!(f, "Neutral"),
            Sentiment::Negative => write!(f, "Negative"),
        }
    }
}

/// The structured report produced by the analysis service.
///
/// All fields are required on the wire; a response missing any of them
/// fails the parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// All text visible in the post, extracted OCR-style.
    pub extracted_text: String,
    /// Predicted engagement score, 0–100 inclusive.
    pub engagement_score: f64,
    /// Overall sentiment classification.
    pub sentiment: Sentiment,
    /// Key strengths of the content (the prompt asks for exactly 3).
    pub strengths: Vec<String>,
    /// Specific suggestions to increase engagement (exactly 3).
    pub improvements: Vec<String>,
    /// Rewrite variants of the main hook or caption (exactly 2).
    pub suggested_rewrites: Vec<String>,
    /// Trending relevant hashtags (exactly 5).
    pub hashtags: Vec<String>,
}

/// Timing and token accounting for one analysis run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisStats {
    /// Time spent normalizing the upload (read, rasterize, encode).
    pub normalize_duration_ms: u64,
    /// Time spent in the analysis service call (including parsing).
    pub llm_duration_ms: u64,
    /// End-to-end wall-clock time.
    pub total_duration_ms: u64,
    /// Prompt tokens consumed by the analysis call.
    pub input_tokens: u64,
    /// Completion tokens produced by the analysis call.
    pub output_tokens: u64,
}

/// Everything `analyze` returns: the report plus provenance and stats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOutput {
    /// The structured analysis report.
    pub analysis: AnalysisResult,
    /// Display name of the analyzed file, carried through unmodified.
    pub file_name: String,
    /// MIME type of the payload that was actually sent to the service
    /// (`image/jpeg` for PDFs, the declared type for images).
    pub mime_type: String,
    /// Timing and token statistics.
    pub stats: AnalysisStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_round_trips_camel_case() {
        let json = r##"{
            "extractedText": "Launch day! 🚀",
            "engagementScore": 78,
            "sentiment": "Positive",
            "strengths": ["a", "b", "c"],
            "improvements": ["d", "e", "f"],
            "suggestedRewrites": ["g", "h"],
            "hashtags": ["#one", "#two", "#three", "#four", "#five"]
        }"##;

        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.engagement_score, 78.0);
        assert_eq!(result.sentiment, Sentiment::Positive);
        assert_eq!(result.hashtags.len(), 5);

        let back = serde_json::to_string(&result).unwrap();
        assert!(back.contains("extractedText"));
        assert!(back.contains("suggestedRewrites"));
    }

    #[test]
    fn sentiment_accepts_lowercase() {
        let s: Sentiment = serde_json::from_str("\"negative\"").unwrap();
        assert_eq!(s, Sentiment::Negative);
    }

    #[test]
    fn sentiment_rejects_unknown_category() {
        let s: Result<Sentiment, _> = serde_json::from_str("\"Mixed\"");
        assert!(s.is_err());
    }

    #[test]
    fn sentiment_display() {
        assert_eq!(Sentiment::Neutral.to_string(), "Neutral");
    }
}
