//! Multi-factor compliance risk scoring
//!
//! Combines supply-chain questionnaire points, declared-geography risk and
//! isotopic-overlap signals into a single score and tier. All tables are
//! immutable configuration (`RiskCatalog`) so alternate risk catalogs can
//! be supplied without code changes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::engine::overlap::{OverlapAnalysis, ReferenceProfile};

/// Questionnaire answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum Answer {
    Yes,
    No,
    #[default]
    Unknown,
}

impl std::fmt::Display for Answer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Answer::Yes => write!(f, "yes"),
            Answer::No => write!(f, "no"),
            Answer::Unknown => write!(f, "unknown"),
        }
    }
}

impl std::str::FromStr for Answer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yes" | "y" => Ok(Answer::Yes),
            "no" | "n" => Ok(Answer::No),
            "unknown" | "u" => Ok(Answer::Unknown),
            _ => Err(format!("Invalid answer: {}. Use yes, no, or unknown", s)),
        }
    }
}

/// Points awarded per answer for one question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerPoints {
    pub yes: i32,
    pub no: i32,
    pub unknown: i32,
}

impl AnswerPoints {
    fn for_answer(&self, answer: Answer) -> i32 {
        match answer {
            Answer::Yes => self.yes,
            Answer::No => self.no,
            Answer::Unknown => self.unknown,
        }
    }
}

/// One supply-chain transparency question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub points: AnswerPoints,
}

/// Immutable scoring configuration: questionnaire, geographic risk table
/// (keyed by ISO 3166-1 alpha-2 code) and high-risk reference profiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskCatalog {
    pub questions: Vec<Question>,
    pub geographic_risk: BTreeMap<String, i32>,
    pub reference_profiles: Vec<ReferenceProfile>,
}

impl Default for RiskCatalog {
    fn default() -> Self {
        let question = |id: &str, prompt: &str, yes: i32, no: i32, unknown: i32| Question {
            id: id.to_string(),
            prompt: prompt.to_string(),
            points: AnswerPoints { yes, no, unknown },
        };
        let reference = |name: &str, mean: f64, min: f64, max: f64| ReferenceProfile {
            name: name.to_string(),
            mean,
            min,
            max,
        };
        Self {
            questions: vec![
                question(
                    "q1",
                    "Do you have supply chain documentation down to the raw fiber source?",
                    0,
                    15,
                    10,
                ),
                question(
                    "q2",
                    "Have all tier 1 and tier 2 suppliers been audited in the last 12 months?",
                    0,
                    25,
                    15,
                ),
                question(
                    "q3",
                    "Is the declared cotton origin certified by an independent third party?",
                    0,
                    10,
                    5,
                ),
                question(
                    "q4",
                    "Do you hold isotopic baseline data from prior shipments of this supplier?",
                    0,
                    5,
                    3,
                ),
            ],
            geographic_risk: BTreeMap::from(
                [
                    ("CN", 100),
                    ("TM", 70),
                    ("UZ", 60),
                    ("PK", 40),
                    ("VN", 30),
                    ("EG", 30),
                    ("IN", 25),
                    ("TR", 20),
                    ("BR", 10),
                    ("US", 5),
                    ("AU", 5),
                ]
                .map(|(code, pts)| (code.to_string(), pts)),
            ),
            reference_profiles: vec![
                reference("Xinjiang", 31.5, 28.0, 35.0),
                reference("Uzbekistan", 30.0, 27.0, 33.0),
                reference("Turkmenistan", 31.0, 28.5, 34.0),
                reference("Tajikistan", 29.5, 26.5, 32.5),
            ],
        }
    }
}

/// Normalize a declared country name to an ISO 3166-1 alpha-2 code.
///
/// Unmatched names are "no data", never a substring guess.
pub fn normalize_country(raw: &str) -> Option<&'static str> {
    let name = raw.trim().to_lowercase();
    let code = match name.as_str() {
        "cn" | "china" | "prc" | "people's republic of china" => "CN",
        "tm" | "turkmenistan" => "TM",
        "uz" | "uzbekistan" => "UZ",
        "tj" | "tajikistan" => "TJ",
        "pk" | "pakistan" => "PK",
        "vn" | "vietnam" | "viet nam" => "VN",
        "eg" | "egypt" => "EG",
        "in" | "india" => "IN",
        "tr" | "turkey" | "turkiye" => "TR",
        "br" | "brazil" => "BR",
        "us" | "usa" | "united states" | "united states of america" => "US",
        "au" | "australia" => "AU",
        _ => return None,
    };
    Some(code)
}

/// Risk tier derived from the total score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskTier {
    /// Fixed tier thresholds, inclusive on the lower tier
    pub fn from_total(total: i32) -> Self {
        match total {
            t if t <= 30 => RiskTier::Low,
            t if t <= 60 => RiskTier::Medium,
            t if t <= 100 => RiskTier::High,
            _ => RiskTier::Critical,
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskTier::Low => write!(f, "low"),
            RiskTier::Medium => write!(f, "medium"),
            RiskTier::High => write!(f, "high"),
            RiskTier::Critical => write!(f, "critical"),
        }
    }
}

impl std::str::FromStr for RiskTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(RiskTier::Low),
            "medium" => Ok(RiskTier::Medium),
            "high" => Ok(RiskTier::High),
            "critical" => Ok(RiskTier::Critical),
            _ => Err(format!(
                "Invalid risk tier: {}. Use low, medium, high, or critical",
                s
            )),
        }
    }
}

/// Per-factor score contributions; `total` is their exact sum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub supply_chain: i32,
    pub geographic: i32,
    pub isotope: i32,
}

/// The combined risk assessment result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskResult {
    pub total: i32,
    pub tier: RiskTier,
    pub breakdown: ScoreBreakdown,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlap: Option<OverlapAnalysis>,
}

/// Overlap-magnitude and distance signals both apply, summed independently
fn isotope_score(overlap: &OverlapAnalysis) -> i32 {
    let overlap_bonus = if overlap.overlap_percent > 80.0 {
        60
    } else if overlap.overlap_percent > 50.0 {
        30
    } else if overlap.overlap_percent > 20.0 {
        15
    } else {
        0
    };
    let distance_bonus = if overlap.distance_sd < 0.5 {
        40
    } else if overlap.distance_sd < 1.0 {
        20
    } else if overlap.distance_sd > 2.0 {
        -10
    } else {
        0
    };
    overlap_bonus + distance_bonus
}

/// Score a shipment. Missing answers default to unknown, an unmatched or
/// empty country scores 0, and an absent overlap analysis omits the
/// isotope term; well-typed input never fails.
pub fn score(
    answers: &BTreeMap<String, Answer>,
    declared_country: Option<&str>,
    overlap: Option<&OverlapAnalysis>,
    catalog: &RiskCatalog,
) -> RiskResult {
    let supply_chain = catalog
        .questions
        .iter()
        .map(|q| {
            let answer = answers.get(&q.id).copied().unwrap_or_default();
            q.points.for_answer(answer)
        })
        .sum();

    let geographic = declared_country
        .and_then(normalize_country)
        .and_then(|code| catalog.geographic_risk.get(code))
        .copied()
        .unwrap_or(0);

    let isotope = overlap.map(isotope_score).unwrap_or(0);

    let total = supply_chain + geographic + isotope;
    RiskResult {
        total,
        tier: RiskTier::from_total(total),
        breakdown: ScoreBreakdown {
            supply_chain,
            geographic,
            isotope,
        },
        overlap: overlap.cloned(),
    }
}
