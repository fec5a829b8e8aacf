//! Response parsing: model text → validated [`AnalysisResult`].
//!
//! Even a model told "no markdown fences" sometimes wraps its JSON in
//! ` ```json … ``` ` anyway, so an outer fence is stripped before parsing.
//! Beyond that the response must deserialize against the declared schema
//! exactly — every field present, sentiment one of the three categories,
//! engagement score within 0–100.
//!
//! Any failure here is an analysis failure: the detail (and the offending
//! response) is logged, and the caller gets the generic user-facing message.

use crate::error::AnalyzeError;
use crate::output::AnalysisResult;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::error;

static RE_OUTER_FENCES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```(?:json)?\s*\n?(.*?)\n?```\s*$").unwrap());

/// Strip an outer ```` ```json ```` fence, if present.
fn strip_json_fences(input: &str) -> &str {
    match RE_OUTER_FENCES.captures(input) {
        Some(caps) => caps.get(1).map_or(input, |m| m.as_str()),
        None => input,
    }
}

/// Parse and validate the analysis service's response text.
pub fn parse_analysis(raw: &str) -> Result<AnalysisResult, AnalyzeError> {
    let cleaned = strip_json_fences(raw.trim());

    let result: AnalysisResult = serde_json::from_str(cleaned).map_err(|e| {
        error!("Unparseable analysis response: {e}; raw output: {raw:?}");
        AnalyzeError::analysis_failed()
    })?;

    validate(&result)?;
    Ok(result)
}

/// Boundary validation of the deserialized result.
///
/// Rejects rather than clamps: a score outside 0–100 means the service did
/// not honour the schema, and fabricating a value would hide that.
fn validate(result: &AnalysisResult) -> Result<(), AnalyzeError> {
    let score = result.engagement_score;
    if !score.is_finite() || !(0.0..=100.0).contains(&score) {
        error!("Analysis response out of contract: engagementScore = {score}");
        return Err(AnalyzeError::analysis_failed());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::Sentiment;

    const VALID: &str = r##"{
        "extractedText": "New drop this Friday!",
        "engagementScore": 82,
        "sentiment": "Positive",
        "strengths": ["clear hook", "strong visual", "urgency"],
        "improvements": ["add a CTA", "tag collaborators", "post at peak hours"],
        "suggestedRewrites": ["Friday. Be there.", "The drop you waited for lands Friday."],
        "hashtags": ["#drop", "#friday", "#newrelease", "#style", "#limited"]
    }"##;

    #[test]
    fn parses_bare_json() {
        let result = parse_analysis(VALID).unwrap();
        assert_eq!(result.engagement_score, 82.0);
        assert_eq!(result.sentiment, Sentiment::Positive);
        assert_eq!(result.strengths.len(), 3);
        assert_eq!(result.suggested_rewrites.len(), 2);
        assert_eq!(result.hashtags.len(), 5);
    }

    #[test]
    fn parses_fenced_json() {
        let fenced = format!("```json\n{VALID}\n```");
        let result = parse_analysis(&fenced).unwrap();
        assert_eq!(result.extracted_text, "New drop this Friday!");
    }

    #[test]
    fn parses_fenced_json_without_language_tag() {
        let fenced = format!("```\n{VALID}\n```");
        assert!(parse_analysis(&fenced).is_ok());
    }

    #[test]
    fn parses_with_surrounding_whitespace() {
        let padded = format!("\n\n  {VALID}  \n");
        assert!(parse_analysis(&padded).is_ok());
    }

    #[test]
    fn missing_field_fails() {
        let json = r#"{"extractedText": "x", "engagementScore": 50}"#;
        let err = parse_analysis(json).unwrap_err();
        assert!(matches!(err, AnalyzeError::AnalysisFailed { .. }));
    }

    #[test]
    fn non_json_fails() {
        let err = parse_analysis("I'm sorry, I can't see any image.").unwrap_err();
        assert!(matches!(err, AnalyzeError::AnalysisFailed { .. }));
    }

    #[test]
    fn out_of_range_score_fails() {
        let json = VALID.replace("82", "140");
        let err = parse_analysis(&json).unwrap_err();
        assert!(matches!(err, AnalyzeError::AnalysisFailed { .. }));
    }

    #[test]
    fn negative_score_fails() {
        let json = VALID.replace("82", "-3");
        assert!(parse_analysis(&json).is_err());
    }

    #[test]
    fn boundary_scores_pass() {
        assert!(parse_analysis(&VALID.replace("82", "0")).is_ok());
        assert!(parse_analysis(&VALID.replace("82", "100")).is_ok());
    }

    #[test]
    fn unknown_sentiment_fails() {
        let json = VALID.replace("Positive", "Enthusiastic");
        assert!(parse_analysis(&json).is_err());
    }

    #[test]
    fn lowercase_sentiment_accepted() {
        let json = VALID.replace("Positive", "positive");
        let result = parse_analysis(&json).unwrap();
        assert_eq!(result.sentiment, Sentiment::Positive);
    }
}
