//! Deterministic Scoring: turns extracted signals into a score breakdown.
//!
//! Pure function of `(Signals, ScoringConfig)`: no clock, no randomness, no I/O.
//! The extractor reports facts; only this module turns facts into numbers.
//!
//! Sub-scores:
//! - parsing: starts at 100, gated to 0 when the text is unreadable, otherwise
//!   flat deductions per layout issue
//! - content: starts at a neutral base, tiered metric-ratio bonus/penalty,
//!   capped weak-word penalty, per-section and flag-based spelling penalties
//! - keyword: found / (found + missing) × 100, neutral when both are empty
//!
//! Every non-zero adjustment lands in `penalties` or `bonuses` in evaluation
//! order, so `replay` can rebuild each discrete sub-score from the ledger.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::audit::signals::{ContentSignals, KeywordSignals, ParsingSignals, Signals};

/// Starting value of the parsing sub-score, also reported as `baseScore`.
pub const PARSING_BASE: u32 = 100;

const SCORE_MAX: i64 = 100;

// ────────────────────────────────────────────────────────────────────────────
// Configuration
// ────────────────────────────────────────────────────────────────────────────

/// Weights of the final convex combination. Must sum to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubScoreWeights {
    pub parsing: f64,
    pub content: f64,
    pub keyword: f64,
}

impl Default for SubScoreWeights {
    fn default() -> Self {
        Self {
            parsing: 0.3,
            content: 0.4,
            keyword: 0.3,
        }
    }
}

/// Flat deduction magnitudes for layout issues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingRules {
    pub tables: u32,
    pub multi_columns: u32,
    pub graphics: u32,
    pub non_standard_headers: u32,
    pub contact_in_header: u32,
}

impl Default for ParsingRules {
    fn default() -> Self {
        Self {
            tables: 20,
            multi_columns: 15,
            graphics: 10,
            non_standard_headers: 15,
            contact_in_header: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentRules {
    pub base: u32,
    /// Metric ratio strictly above this earns `high_metric_bonus`.
    pub high_metric_ratio: f64,
    /// Metric ratio strictly above this (but not the high one) earns `mid_metric_bonus`.
    pub mid_metric_ratio: f64,
    pub high_metric_bonus: u32,
    pub mid_metric_bonus: u32,
    pub low_metric_penalty: u32,
    /// Weak phrases tolerated before any deduction.
    pub weak_word_allowance: u32,
    pub weak_word_points: u32,
    pub weak_word_cap: u32,
    pub missing_section_penalty: u32,
    pub spelling_penalty: u32,
}

impl Default for ContentRules {
    fn default() -> Self {
        Self {
            base: 70,
            high_metric_ratio: 0.4,
            mid_metric_ratio: 0.2,
            high_metric_bonus: 20,
            mid_metric_bonus: 10,
            low_metric_penalty: 10,
            weak_word_allowance: 3,
            weak_word_points: 2,
            weak_word_cap: 10,
            missing_section_penalty: 10,
            spelling_penalty: 5,
        }
    }
}

/// Every magnitude, threshold and weight the scorer uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: SubScoreWeights,
    pub parsing: ParsingRules,
    pub content: ContentRules,
    /// Keyword score when the extractor reported no keywords at all.
    pub keyword_neutral_score: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: SubScoreWeights::default(),
            parsing: ParsingRules::default(),
            content: ContentRules::default(),
            keyword_neutral_score: 50,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ScoringConfigError {
    #[error("sub-score weights must be finite and non-negative")]
    NegativeWeight,

    #[error("sub-score weights must sum to 1.0, got {0}")]
    WeightSum(f64),

    #[error("metric ratio thresholds must satisfy 0 <= mid ({mid}) <= high ({high}) <= 1")]
    RatioThresholds { mid: f64, high: f64 },

    #[error("{field} must be within 0..=100, got {value}")]
    OutOfRange { field: &'static str, value: u32 },
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), ScoringConfigError> {
        let w = &self.weights;
        let weights = [w.parsing, w.content, w.keyword];
        if weights.iter().any(|x| !x.is_finite() || *x < 0.0) {
            return Err(ScoringConfigError::NegativeWeight);
        }
        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(ScoringConfigError::WeightSum(sum));
        }

        let (mid, high) = (self.content.mid_metric_ratio, self.content.high_metric_ratio);
        if !(0.0..=1.0).contains(&mid) || !(0.0..=1.0).contains(&high) || mid > high {
            return Err(ScoringConfigError::RatioThresholds { mid, high });
        }

        for (field, value) in [
            ("content.base", self.content.base),
            ("keyword_neutral_score", self.keyword_neutral_score),
        ] {
            if value > 100 {
                return Err(ScoringConfigError::OutOfRange { field, value });
            }
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Output
// ────────────────────────────────────────────────────────────────────────────

/// The sub-score an adjustment was applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubScore {
    Parsing,
    Content,
}

/// One audit-trail entry: why, by how much, and where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreAdjustment {
    pub reason: String,
    pub points: i32,
    pub sub_score: SubScore,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub base_score: u32,
    pub parsing_score: u32,
    pub content_score: u32,
    pub keyword_score: u32,
    pub final_score: u32,
    pub penalties: Vec<ScoreAdjustment>,
    pub bonuses: Vec<ScoreAdjustment>,
}

impl ScoreBreakdown {
    /// Rebuilds a discrete sub-score from its starting value and recorded deltas.
    pub fn replay(&self, sub_score: SubScore, config: &ScoringConfig) -> u32 {
        let start = match sub_score {
            SubScore::Parsing => PARSING_BASE,
            SubScore::Content => config.content.base,
        };
        let delta: i64 = self
            .penalties
            .iter()
            .chain(&self.bonuses)
            .filter(|a| a.sub_score == sub_score)
            .map(|a| i64::from(a.points))
            .sum();
        clamp_score(i64::from(start) + delta)
    }
}

#[derive(Default)]
struct Ledger {
    penalties: Vec<ScoreAdjustment>,
    bonuses: Vec<ScoreAdjustment>,
}

impl Ledger {
    /// Records a non-zero adjustment and returns the recorded value for the running total.
    fn apply(&mut self, sub_score: SubScore, reason: impl Into<String>, points: i64) -> i64 {
        let points = points.clamp(i64::from(i32::MIN), i64::from(i32::MAX));
        if points == 0 {
            return 0;
        }
        let entry = ScoreAdjustment {
            reason: reason.into(),
            points: points as i32,
            sub_score,
        };
        if points < 0 {
            self.penalties.push(entry);
        } else {
            self.bonuses.push(entry);
        }
        points
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring
// ────────────────────────────────────────────────────────────────────────────

/// Scores signals. Total over every well-typed input.
///
/// Takes raw signals and normalizes them itself; already-normalized input is
/// left unchanged.
pub fn score_signals(signals: &Signals, config: &ScoringConfig) -> ScoreBreakdown {
    let signals = signals.normalized();
    let mut ledger = Ledger::default();

    let parsing_score = score_parsing(&signals.parsing, &config.parsing, &mut ledger);
    let content_score = score_content(&signals.content, &config.content, &mut ledger);
    let keyword_score = score_keywords(&signals.keywords, config.keyword_neutral_score);

    let w = &config.weights;
    let weighted = f64::from(parsing_score) * w.parsing
        + f64::from(content_score) * w.content
        + f64::from(keyword_score) * w.keyword;
    let final_score = clamp_score(weighted.round() as i64);

    let breakdown = ScoreBreakdown {
        base_score: PARSING_BASE,
        parsing_score,
        content_score,
        keyword_score,
        final_score,
        penalties: ledger.penalties,
        bonuses: ledger.bonuses,
    };
    debug_assert_eq!(breakdown.replay(SubScore::Parsing, config), parsing_score);
    debug_assert_eq!(breakdown.replay(SubScore::Content, config), content_score);
    breakdown
}

fn score_parsing(parsing: &ParsingSignals, rules: &ParsingRules, ledger: &mut Ledger) -> u32 {
    let mut score = i64::from(PARSING_BASE);

    // Unreadable text zeroes the sub-score; the layout flags are moot.
    if !parsing.is_readable {
        score += ledger.apply(
            SubScore::Parsing,
            "Document Text Not Selectable/Readable",
            -i64::from(PARSING_BASE),
        );
        return clamp_score(score);
    }

    let checks = [
        (parsing.has_tables, rules.tables, "Tables Detected (Parsing Risk)"),
        (parsing.has_multi_columns, rules.multi_columns, "Multi-column Layout Detected"),
        (parsing.has_graphics, rules.graphics, "Graphics/Icons Detected"),
        (
            !parsing.has_standard_headers,
            rules.non_standard_headers,
            "Non-Standard Section Headers",
        ),
        (
            parsing.has_contact_in_header,
            rules.contact_in_header,
            "Contact Info in Header/Footer",
        ),
    ];
    for (flagged, points, reason) in checks {
        if flagged {
            score += ledger.apply(SubScore::Parsing, reason, -i64::from(points));
        }
    }

    clamp_score(score)
}

fn score_content(content: &ContentSignals, rules: &ContentRules, ledger: &mut Ledger) -> u32 {
    let mut score = i64::from(rules.base);

    let ratio = metric_ratio(content);
    score += if ratio > rules.high_metric_ratio {
        ledger.apply(
            SubScore::Content,
            format!(
                "High Metric Density (>{:.0}% bullets quantified)",
                rules.high_metric_ratio * 100.0
            ),
            i64::from(rules.high_metric_bonus),
        )
    } else if ratio > rules.mid_metric_ratio {
        ledger.apply(
            SubScore::Content,
            "Good Metric Usage",
            i64::from(rules.mid_metric_bonus),
        )
    } else {
        ledger.apply(
            SubScore::Content,
            "Low Metric Density (Few numbers/results)",
            -i64::from(rules.low_metric_penalty),
        )
    };

    let weak = content.weak_words_count;
    if weak > rules.weak_word_allowance {
        let deduct = (u64::from(weak) * u64::from(rules.weak_word_points))
            .min(u64::from(rules.weak_word_cap));
        score += ledger.apply(
            SubScore::Content,
            format!("Weak Action Verbs ({weak} instances)"),
            -(deduct as i64),
        );
    }

    for section in &content.missing_sections {
        score += ledger.apply(
            SubScore::Content,
            format!("Missing Critical Section: {section}"),
            -i64::from(rules.missing_section_penalty),
        );
    }

    // One flat deduction: OCR-noisy error counts would otherwise dominate.
    if content.spelling_errors > 0 {
        score += ledger.apply(
            SubScore::Content,
            "Spelling/Grammar Errors Detected",
            -i64::from(rules.spelling_penalty),
        );
    }

    clamp_score(score)
}

fn score_keywords(keywords: &KeywordSignals, neutral: u32) -> u32 {
    let found = keywords.found.len();
    let total = found + keywords.missing.len();
    if total == 0 {
        return neutral.min(SCORE_MAX as u32);
    }
    clamp_score((found as f64 / total as f64 * 100.0).round() as i64)
}

/// Fraction of bullets carrying a quantified result; 0 when there are no bullets.
pub fn metric_ratio(content: &ContentSignals) -> f64 {
    if content.total_bullet_points == 0 {
        return 0.0;
    }
    let with_metrics = content.bullets_with_metrics.min(content.total_bullet_points);
    f64::from(with_metrics) / f64::from(content.total_bullet_points)
}

fn clamp_score(score: i64) -> u32 {
    score.clamp(0, SCORE_MAX) as u32
}
