//! Qualitative feedback supplied by the extractor: strengths, critical issues,
//! rewrites, ranked actions and vocabulary hints.
//!
//! The extractor is trusted for narrative only. Items are decoded one at a
//! time; a malformed item is dropped and logged instead of failing the audit.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Severity {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl From<String> for Severity {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "critical" => Severity::Critical,
            "high" => Severity::High,
            "low" => Severity::Low,
            _ => Severity::Medium,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CriticalIssue {
    pub title: String,
    /// Estimated score impact in points.
    pub impact: i32,
    pub severity: Severity,
    pub explanation: String,
    pub fix: String,
}

/// A concrete before/after rewrite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Improvement {
    pub section: String,
    pub before: String,
    pub after: String,
    pub impact: i32,
    pub reasoning: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PriorityAction {
    pub rank: u32,
    pub action: String,
    pub impact: String,
    pub urgency: String,
    pub time_estimate: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Vocabulary {
    pub weak_words: Vec<String>,
    pub suggested_verbs: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feedback {
    pub strengths: Vec<String>,
    pub critical_issues: Vec<CriticalIssue>,
    pub improvements: Vec<Improvement>,
    pub priority_actions: Vec<PriorityAction>,
    pub vocabulary: Vocabulary,
}

impl Feedback {
    /// Pulls the qualitative fields out of the parsed extractor object.
    /// Absent fields become empty; score fields are never read here.
    pub fn from_extraction(object: &Map<String, Value>) -> Self {
        let mut priority_actions: Vec<PriorityAction> =
            decode_items(object, "priorityActions");
        priority_actions.sort_by_key(|a| a.rank);

        let vocabulary = match object.get("vocabulary") {
            None | Some(Value::Null) => Vocabulary::default(),
            Some(value) => Vocabulary::deserialize(value).unwrap_or_else(|e| {
                warn!("Dropping malformed vocabulary from extractor: {e}");
                Vocabulary::default()
            }),
        };

        Feedback {
            strengths: decode_items(object, "strengths"),
            critical_issues: decode_items(object, "criticalIssues"),
            improvements: decode_items(object, "improvements"),
            priority_actions,
            vocabulary,
        }
    }
}

fn decode_items<T: DeserializeOwned>(object: &Map<String, Value>, field: &str) -> Vec<T> {
    let items = match object.get(field) {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(items)) => items,
        Some(_) => {
            warn!("Extractor field '{field}' is not an array; ignoring it");
            return Vec::new();
        }
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match T::deserialize(item) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!("Dropping malformed {field}[{index}] from extractor: {e}");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn test_decodes_full_feedback() {
        let feedback = Feedback::from_extraction(&object(json!({
            "strengths": ["Used 'Architected' instead of 'Built'"],
            "criticalIssues": [{
                "title": "Contact Info in Header",
                "severity": "critical",
                "explanation": "Headers are often stripped by parsers.",
                "fix": "Move email/phone to the main body text."
            }],
            "improvements": [{
                "section": "Experience",
                "before": "Responsible for API design",
                "after": "Designed and deployed RESTful APIs serving 10k+ daily users",
                "impact": 15,
                "reasoning": "Adds metrics and strong action verb."
            }],
            "priorityActions": [{
                "rank": 1,
                "action": "Remove 2-column layout",
                "impact": "High",
                "urgency": "Critical",
                "timeEstimate": "15 mins"
            }],
            "vocabulary": { "weakWords": ["Responsible for"], "suggestedVerbs": ["Spearheaded"] }
        })));

        assert_eq!(feedback.strengths.len(), 1);
        assert_eq!(feedback.critical_issues[0].severity, Severity::Critical);
        assert_eq!(feedback.critical_issues[0].impact, 0);
        assert_eq!(feedback.improvements[0].impact, 15);
        assert_eq!(feedback.priority_actions[0].time_estimate, "15 mins");
        assert_eq!(feedback.vocabulary.suggested_verbs, vec!["Spearheaded"]);
    }

    #[test]
    fn test_absent_fields_default_to_empty() {
        let feedback = Feedback::from_extraction(&object(json!({ "signals": {} })));
        assert_eq!(feedback, Feedback::default());
    }

    #[test]
    fn test_malformed_items_are_dropped_individually() {
        let feedback = Feedback::from_extraction(&object(json!({
            "strengths": ["Clear summary", 42, null, "Strong verbs"],
            "improvements": [
                { "section": "Skills", "impact": "lots" },
                { "section": "Summary", "impact": 5 }
            ]
        })));
        assert_eq!(feedback.strengths, vec!["Clear summary", "Strong verbs"]);
        assert_eq!(feedback.improvements.len(), 1);
        assert_eq!(feedback.improvements[0].section, "Summary");
    }

    #[test]
    fn test_non_array_field_is_ignored() {
        let feedback =
            Feedback::from_extraction(&object(json!({ "strengths": "Everything is great" })));
        assert!(feedback.strengths.is_empty());
    }

    #[test]
    fn test_priority_actions_sorted_by_rank() {
        let feedback = Feedback::from_extraction(&object(json!({
            "priorityActions": [
                { "rank": 3, "action": "c" },
                { "rank": 1, "action": "a" },
                { "rank": 2, "action": "b" }
            ]
        })));
        let actions: Vec<_> = feedback.priority_actions.iter().map(|a| a.action.as_str()).collect();
        assert_eq!(actions, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_severity_is_case_insensitive() {
        let issue: CriticalIssue = serde_json::from_value(json!({ "severity": "HIGH" })).unwrap();
        assert_eq!(issue.severity, Severity::High);
        let issue: CriticalIssue = serde_json::from_value(json!({ "severity": "urgent" })).unwrap();
        assert_eq!(issue.severity, Severity::Medium);
        assert_eq!(serde_json::to_value(Severity::Low).unwrap(), "low");
    }

    #[test]
    fn test_malformed_vocabulary_falls_back_to_default() {
        let feedback = Feedback::from_extraction(&object(json!({ "vocabulary": ["weak"] })));
        assert_eq!(feedback.vocabulary, Vocabulary::default());
    }
}
