//! Signal Schema: the facts an extractor must report about a résumé.
//!
//! Signals are untrusted. `Signals::from_value` is the boundary: it coerces the
//! extractor's untyped JSON into typed signals, and `normalized` removes the
//! duplicates and impossible counts the scorer must not double-penalize.
//!
//! Missing or `null` fields take pessimistic zero defaults (`false`, `0`, empty list).
//! `isReadable` and `hasStandardHeaders` defaulting to `false` means an absent
//! parsing block can only lower a score. Wrong types are rejected.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::audit::extraction::ExtractionError;

/// Boolean facts about how the document is laid out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParsingSignals {
    #[serde(deserialize_with = "null_as_default")]
    pub is_readable: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub has_tables: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub has_multi_columns: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub has_graphics: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub has_standard_headers: bool,
    /// Email/phone located in the header or footer margin.
    #[serde(deserialize_with = "null_as_default")]
    pub has_contact_in_header: bool,
}

/// Counts describing the written content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentSignals {
    #[serde(deserialize_with = "null_as_default")]
    pub total_bullet_points: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub bullets_with_metrics: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub action_verbs_count: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub weak_words_count: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub spelling_errors: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub missing_sections: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordSignals {
    #[serde(deserialize_with = "null_as_default")]
    pub found: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Signals {
    #[serde(deserialize_with = "null_as_default")]
    pub parsing: ParsingSignals,
    #[serde(deserialize_with = "null_as_default")]
    pub content: ContentSignals,
    #[serde(deserialize_with = "null_as_default")]
    pub keywords: KeywordSignals,
}

impl Signals {
    /// Coerces the extractor's `signals` value into typed signals.
    pub fn from_value(value: &Value) -> Result<Self, ExtractionError> {
        Signals::deserialize(value).map_err(|e| ExtractionError::InvalidSignals(e.to_string()))
    }

    /// Returns a copy safe to score:
    /// - `missingSections` and both keyword lists are trimmed and deduplicated
    ///   case-insensitively (first spelling wins, blanks dropped)
    /// - a keyword reported as both found and missing counts as found
    /// - `bulletsWithMetrics` never exceeds `totalBulletPoints`
    pub fn normalized(&self) -> Self {
        let mut content = self.content.clone();
        content.bullets_with_metrics = content.bullets_with_metrics.min(content.total_bullet_points);
        content.missing_sections = dedup_labels(&content.missing_sections, &HashSet::new());

        let found = dedup_labels(&self.keywords.found, &HashSet::new());
        let found_keys: HashSet<String> = found.iter().map(|k| k.to_lowercase()).collect();
        let missing = dedup_labels(&self.keywords.missing, &found_keys);

        Signals {
            parsing: self.parsing.clone(),
            content,
            keywords: KeywordSignals { found, missing },
        }
    }
}

/// Trims, drops blanks, and removes case-insensitive duplicates and anything in `exclude`.
fn dedup_labels(labels: &[String], exclude: &HashSet<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    labels
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .filter(|l| {
            let key = l.to_lowercase();
            !exclude.contains(&key) && seen.insert(key)
        })
        .map(String::from)
        .collect()
}

/// Extractors emit `null` for "nothing to report"; treat it like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
