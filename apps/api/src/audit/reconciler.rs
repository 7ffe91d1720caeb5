//! Result Reconciler: merges extractor narrative with the computed breakdown
//! into one complete `AnalysisResult`.
//!
//! Flow: locate JSON block → parse → coerce `signals` → score → classify →
//!       merge feedback → derive keyword display → build.
//!
//! Scores come only from `score_signals`. Any score the extractor put in its
//! JSON (`overallScore`, `atsScore`, ...) is never read.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::audit::extraction::{parse_extraction, strip_json_block, ExtractionError};
use crate::audit::feedback::{CriticalIssue, Feedback, Improvement, PriorityAction, Vocabulary};
use crate::audit::scoring::{score_signals, ScoreBreakdown, ScoringConfig};
use crate::audit::signals::Signals;
use crate::audit::status::{classify, KeywordDensity, Verdict};

/// Top-level fields an extractor sometimes volunteers. Ignored on purpose.
const EXTRACTOR_SCORE_FIELDS: &[&str] = &[
    "overallScore",
    "atsScore",
    "contentScore",
    "keywordScore",
    "finalScore",
    "score",
    "status",
    "scoreBand",
    "breakdown",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegradedReason {
    SignalsMissing,
}

/// Whether the scores in a result were computed or are still defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Integrity {
    Complete,
    Degraded { reason: DegradedReason },
}

/// Keyword view for display; field names differ from the raw signal shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordsDisplay {
    pub present: Vec<String>,
    pub missing: Vec<String>,
    pub density: KeywordDensity,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub overall_score: u32,
    /// Parsing sub-score, promoted for display.
    pub ats_score: u32,
    pub content_score: u32,
    pub keyword_score: u32,
    pub status: Verdict,
    pub score_band: String,
    pub breakdown: ScoreBreakdown,
    /// The normalized signals that were scored.
    pub signals: Signals,
    pub strengths: Vec<String>,
    pub critical_issues: Vec<CriticalIssue>,
    pub improvements: Vec<Improvement>,
    pub keywords: KeywordsDisplay,
    pub priority_actions: Vec<PriorityAction>,
    pub vocabulary: Vocabulary,
    pub integrity: Integrity,
}

impl Default for AnalysisResult {
    /// Safe fallback: zero scores, lowest tier, empty narrative, marked degraded.
    fn default() -> Self {
        let status = classify(0);
        Self {
            overall_score: 0,
            ats_score: 0,
            content_score: 0,
            keyword_score: 0,
            status: status.label,
            score_band: status.band,
            breakdown: ScoreBreakdown::default(),
            signals: Signals::default(),
            strengths: Vec::new(),
            critical_issues: Vec::new(),
            improvements: Vec::new(),
            keywords: KeywordsDisplay::default(),
            priority_actions: Vec::new(),
            vocabulary: Vocabulary::default(),
            integrity: Integrity::Degraded {
                reason: DegradedReason::SignalsMissing,
            },
        }
    }
}

impl AnalysisResult {
    pub fn is_degraded(&self) -> bool {
        matches!(self.integrity, Integrity::Degraded { .. })
    }
}

/// Builds an `AnalysisResult` from the safe default by explicit override steps.
/// Each step replaces whole fields; nothing is shallow-merged.
#[derive(Debug, Default)]
pub struct AnalysisResultBuilder {
    result: AnalysisResult,
}

impl AnalysisResultBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs computed scores, status, and the keyword display derived from them.
    pub fn scores(mut self, signals: Signals, breakdown: ScoreBreakdown) -> Self {
        let status = classify(breakdown.final_score);
        let density = KeywordDensity::from_keyword_score(breakdown.keyword_score);

        let r = &mut self.result;
        r.overall_score = breakdown.final_score;
        r.ats_score = breakdown.parsing_score;
        r.content_score = breakdown.content_score;
        r.keyword_score = breakdown.keyword_score;
        r.status = status.label;
        r.score_band = status.band;
        r.keywords = KeywordsDisplay {
            present: signals.keywords.found.clone(),
            missing: signals.keywords.missing.clone(),
            density,
            recommendation: density.recommendation().to_string(),
        };
        r.breakdown = breakdown;
        r.signals = signals;
        r.integrity = Integrity::Complete;
        self
    }

    pub fn feedback(mut self, feedback: Feedback) -> Self {
        let r = &mut self.result;
        r.strengths = feedback.strengths;
        r.critical_issues = feedback.critical_issues;
        r.improvements = feedback.improvements;
        r.priority_actions = feedback.priority_actions;
        r.vocabulary = feedback.vocabulary;
        self
    }

    pub fn build(self) -> AnalysisResult {
        self.result
    }
}

/// A reconciled audit: display text plus the complete result.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub text: String,
    pub result: AnalysisResult,
}

/// Reconciles raw extractor text into a complete result.
///
/// - no fenced JSON block, unparseable block, or non-object block →
///   `ExtractionError::MalformedExtraction`
/// - `signals` with the wrong shape → `ExtractionError::InvalidSignals`
/// - `signals` absent or null → `Ok` with default scores, marked degraded
pub fn reconcile(raw_text: &str, config: &ScoringConfig) -> Result<Reconciled, ExtractionError> {
    let object = match parse_extraction(raw_text) {
        Ok(object) => object,
        Err(e) => {
            warn!("Extractor output rejected: {e}");
            return Err(e);
        }
    };
    note_ignored_scores(&object);

    let mut builder = AnalysisResultBuilder::new();

    match object.get("signals") {
        None | Some(Value::Null) => {
            warn!("Extractor output has no signals; returning degraded result");
        }
        Some(value) => {
            // Normalized here as well so the result carries the exact signals scored.
            let signals = Signals::from_value(value)
                .inspect_err(|e| warn!("Extractor signals rejected: {e}"))?
                .normalized();
            let breakdown = score_signals(&signals, config);
            debug!(
                final_score = breakdown.final_score,
                parsing = breakdown.parsing_score,
                content = breakdown.content_score,
                keyword = breakdown.keyword_score,
                "Scored extracted signals"
            );
            builder = builder.scores(signals, breakdown);
        }
    }

    let result = builder.feedback(Feedback::from_extraction(&object)).build();

    Ok(Reconciled {
        text: strip_json_block(raw_text),
        result,
    })
}

fn note_ignored_scores(object: &Map<String, Value>) {
    let volunteered: Vec<&str> = EXTRACTOR_SCORE_FIELDS
        .iter()
        .copied()
        .filter(|f| object.contains_key(*f))
        .collect();
    if !volunteered.is_empty() {
        debug!("Ignoring extractor-supplied score fields: {}", volunteered.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::scoring::SubScore;
    use serde_json::json;

    fn fenced(value: Value) -> String {
        format!(
            "Here is the audit.\n```json\n{}\n```\nLet me know if you have questions.",
            serde_json::to_string_pretty(&value).unwrap()
        )
    }

    fn extractor_payload() -> Value {
        json!({
            "signals": {
                "parsing": {
                    "isReadable": true,
                    "hasTables": true,
                    "hasMultiColumns": false,
                    "hasGraphics": false,
                    "hasStandardHeaders": true,
                    "hasContactInHeader": false
                },
                "content": {
                    "totalBulletPoints": 10,
                    "bulletsWithMetrics": 5,
                    "actionVerbsCount": 7,
                    "weakWordsCount": 1,
                    "spellingErrors": 0,
                    "missingSections": []
                },
                "keywords": { "found": ["Python", "SQL", "Airflow"], "missing": ["dbt"] }
            },
            "strengths": ["Quantified impact in most bullets"],
            "criticalIssues": [{ "title": "Skills table", "severity": "high" }],
            "improvements": [],
            "priorityActions": [{ "rank": 1, "action": "Convert the skills table to a list" }]
        })
    }

    #[test]
    fn test_reconciles_complete_result() {
        let reconciled = reconcile(&fenced(extractor_payload()), &ScoringConfig::default()).unwrap();
        let r = &reconciled.result;

        // parsing 80, content 90, keyword 75 → round(24 + 36 + 22.5) = 83
        assert_eq!(r.ats_score, 80);
        assert_eq!(r.content_score, 90);
        assert_eq!(r.keyword_score, 75);
        assert_eq!(r.overall_score, 83);
        assert_eq!(r.status, Verdict::LikelyPass);
        assert_eq!(r.score_band, "75-89");
        assert_eq!(r.breakdown.final_score, r.overall_score);
        assert_eq!(r.integrity, Integrity::Complete);
        assert_eq!(r.strengths.len(), 1);
        assert_eq!(r.critical_issues[0].title, "Skills table");
        assert_eq!(r.priority_actions.len(), 1);
        assert_eq!(
            reconciled.text,
            "Here is the audit.\n\nLet me know if you have questions."
        );
    }

    #[test]
    fn test_keyword_display_is_rebuilt_from_signals() {
        let reconciled = reconcile(&fenced(extractor_payload()), &ScoringConfig::default()).unwrap();
        let keywords = &reconciled.result.keywords;
        assert_eq!(keywords.present, vec!["Python", "SQL", "Airflow"]);
        assert_eq!(keywords.missing, vec!["dbt"]);
        assert_eq!(keywords.density, KeywordDensity::High);
        assert_eq!(keywords.recommendation, "Good keyword matching.");
    }

    #[test]
    fn test_extractor_scores_are_ignored() {
        let mut payload = extractor_payload();
        payload["overallScore"] = json!(99);
        payload["atsScore"] = json!(100);
        payload["status"] = json!("Strong Pass");
        payload["keywords"] = json!({ "present": ["Everything"], "density": "High" });

        let reconciled = reconcile(&fenced(payload), &ScoringConfig::default()).unwrap();
        assert_eq!(reconciled.result.overall_score, 83);
        assert_eq!(reconciled.result.ats_score, 80);
        assert_eq!(reconciled.result.status, Verdict::LikelyPass);
        assert_eq!(reconciled.result.keywords.present, vec!["Python", "SQL", "Airflow"]);
    }

    #[test]
    fn test_missing_block_is_malformed_extraction() {
        let err = reconcile("Sorry, I can't help with that.", &ScoringConfig::default()).unwrap_err();
        assert!(matches!(err, ExtractionError::MalformedExtraction(_)));
    }

    #[test]
    fn test_broken_json_is_malformed_extraction() {
        let err = reconcile("```json\n{\"signals\": \n```", &ScoringConfig::default()).unwrap_err();
        assert!(matches!(err, ExtractionError::MalformedExtraction(_)));
    }

    #[test]
    fn test_wrong_signal_shape_is_invalid_signals() {
        let payload = json!({ "signals": { "parsing": { "isReadable": "definitely" } } });
        let err = reconcile(&fenced(payload), &ScoringConfig::default()).unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidSignals(_)));
    }

    #[test]
    fn test_missing_signals_is_degraded_not_successful() {
        let payload = json!({ "strengths": ["Readable fonts"], "overallScore": 95 });
        let reconciled = reconcile(&fenced(payload), &ScoringConfig::default()).unwrap();
        let r = &reconciled.result;
        assert!(r.is_degraded());
        assert_eq!(
            r.integrity,
            Integrity::Degraded {
                reason: DegradedReason::SignalsMissing
            }
        );
        assert_eq!(r.overall_score, 0);
        assert_eq!(r.status, Verdict::AtsReject);
        assert_eq!(r.strengths, vec!["Readable fonts"]);
    }

    #[test]
    fn test_null_signals_is_degraded() {
        let reconciled =
            reconcile(&fenced(json!({ "signals": null })), &ScoringConfig::default()).unwrap();
        assert!(reconciled.result.is_degraded());
    }

    #[test]
    fn test_empty_signals_object_scores_pessimistically() {
        let reconciled =
            reconcile(&fenced(json!({ "signals": {} })), &ScoringConfig::default()).unwrap();
        let r = &reconciled.result;
        assert!(!r.is_degraded());
        assert_eq!(r.ats_score, 0);
        assert_eq!(r.keyword_score, 50);
        assert_eq!(r.status, Verdict::AtsReject);
        assert!(r.strengths.is_empty());
        assert!(r.improvements.is_empty());
    }

    #[test]
    fn test_result_signals_are_normalized() {
        let mut payload = extractor_payload();
        payload["signals"]["content"]["missingSections"] = json!(["Summary", "summary"]);
        let reconciled = reconcile(&fenced(payload), &ScoringConfig::default()).unwrap();
        assert_eq!(reconciled.result.signals.content.missing_sections, vec!["Summary"]);
    }

    #[test]
    fn test_audit_trail_replays_through_reconciler() {
        let config = ScoringConfig::default();
        let reconciled = reconcile(&fenced(extractor_payload()), &config).unwrap();
        let b = &reconciled.result.breakdown;
        assert_eq!(b.replay(SubScore::Parsing, &config), reconciled.result.ats_score);
        assert_eq!(b.replay(SubScore::Content, &config), reconciled.result.content_score);
    }

    #[test]
    fn test_reconcile_is_deterministic() {
        let text = fenced(extractor_payload());
        let config = ScoringConfig::default();
        assert_eq!(reconcile(&text, &config).unwrap(), reconcile(&text, &config).unwrap());
    }

    #[test]
    fn test_default_result_is_fully_populated_and_degraded() {
        let r = AnalysisResult::default();
        assert!(r.is_degraded());
        assert_eq!(r.status, Verdict::AtsReject);
        assert_eq!(r.score_band, "<60");
        let value = serde_json::to_value(&r).unwrap();
        for field in [
            "overallScore",
            "atsScore",
            "contentScore",
            "status",
            "scoreBand",
            "breakdown",
            "signals",
            "strengths",
            "criticalIssues",
            "improvements",
            "keywords",
            "priorityActions",
        ] {
            assert!(!value[field].is_null(), "{field} missing from default result");
        }
        assert_eq!(value["integrity"]["state"], "degraded");
        assert_eq!(value["integrity"]["reason"], "signals_missing");
    }

    #[test]
    fn test_builder_steps_are_order_independent() {
        let signals = Signals::from_value(&extractor_payload()["signals"]).unwrap().normalized();
        let breakdown = score_signals(&signals, &ScoringConfig::default());
        let feedback = Feedback {
            strengths: vec!["Tight summary".to_string()],
            ..Feedback::default()
        };

        let a = AnalysisResultBuilder::new()
            .scores(signals.clone(), breakdown.clone())
            .feedback(feedback.clone())
            .build();
        let b = AnalysisResultBuilder::new()
            .feedback(feedback)
            .scores(signals, breakdown)
            .build();
        assert_eq!(a, b);
    }
}
