use serde::{Deserialize, Serialize};

/// Verdict tier for a final score. Bands are non-overlapping and cover 0–100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "Strong Pass")]
    StrongPass,
    #[serde(rename = "Likely Pass")]
    LikelyPass,
    #[serde(rename = "Borderline")]
    Borderline,
    #[default]
    #[serde(rename = "ATS Reject")]
    AtsReject,
}

impl Verdict {
    pub fn band(self) -> &'static str {
        match self {
            Verdict::StrongPass => "90-100",
            Verdict::LikelyPass => "75-89",
            Verdict::Borderline => "60-74",
            Verdict::AtsReject => "<60",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusInfo {
    pub label: Verdict,
    pub band: String,
}

/// Maps a final score to its tier, highest band first.
pub fn classify(final_score: u32) -> StatusInfo {
    let label = match final_score {
        s if s >= 90 => Verdict::StrongPass,
        s if s >= 75 => Verdict::LikelyPass,
        s if s >= 60 => Verdict::Borderline,
        _ => Verdict::AtsReject,
    };
    StatusInfo {
        label,
        band: label.band().to_string(),
    }
}

/// How well the résumé covers role keywords, derived from the keyword sub-score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeywordDensity {
    High,
    Moderate,
    #[default]
    Low,
}

impl KeywordDensity {
    pub fn from_keyword_score(keyword_score: u32) -> Self {
        match keyword_score {
            s if s > 70 => KeywordDensity::High,
            s if s > 40 => KeywordDensity::Moderate,
            _ => KeywordDensity::Low,
        }
    }

    pub fn recommendation(self) -> &'static str {
        match self {
            KeywordDensity::High => "Good keyword matching.",
            KeywordDensity::Moderate => {
                "Decent coverage; add a few more role-specific hard skills."
            }
            KeywordDensity::Low => "Add more hard skills from the job description.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(classify(100).label, Verdict::StrongPass);
        assert_eq!(classify(90).label, Verdict::StrongPass);
        assert_eq!(classify(89).label, Verdict::LikelyPass);
        assert_eq!(classify(75).label, Verdict::LikelyPass);
        assert_eq!(classify(74).label, Verdict::Borderline);
        assert_eq!(classify(60).label, Verdict::Borderline);
        assert_eq!(classify(59).label, Verdict::AtsReject);
        assert_eq!(classify(0).label, Verdict::AtsReject);
    }

    #[test]
    fn test_every_score_maps_into_its_band() {
        for score in 0..=100u32 {
            let status = classify(score);
            assert_eq!(status.band, status.label.band());
            let inside = match status.band.as_str() {
                "<60" => score < 60,
                band => {
                    let (lo, hi) = band.split_once('-').unwrap();
                    (lo.parse().unwrap()..=hi.parse().unwrap()).contains(&score)
                }
            };
            assert!(inside, "score {score} outside band {}", status.band);
        }
    }

    #[test]
    fn test_labels_serialize_as_display_text() {
        let value = serde_json::to_value(classify(80)).unwrap();
        assert_eq!(value["label"], "Likely Pass");
        assert_eq!(value["band"], "75-89");
        assert_eq!(serde_json::to_value(Verdict::AtsReject).unwrap(), "ATS Reject");
    }

    #[test]
    fn test_keyword_density_thresholds() {
        assert_eq!(KeywordDensity::from_keyword_score(71), KeywordDensity::High);
        assert_eq!(KeywordDensity::from_keyword_score(70), KeywordDensity::Moderate);
        assert_eq!(KeywordDensity::from_keyword_score(41), KeywordDensity::Moderate);
        assert_eq!(KeywordDensity::from_keyword_score(40), KeywordDensity::Low);
        assert_eq!(KeywordDensity::from_keyword_score(0), KeywordDensity::Low);
    }

    #[test]
    fn test_recommendation_follows_density() {
        assert_eq!(KeywordDensity::High.recommendation(), "Good keyword matching.");
        assert!(KeywordDensity::Low.recommendation().contains("hard skills"));
    }
}
