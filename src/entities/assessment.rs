//! Assessment record - a scored shipment with optional mitigation protocol

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::identity::AssessmentId;
use crate::engine::overlap::IsotopeProfile;
use crate::engine::protocol::ProtocolPair;
use crate::engine::score::{Answer, RiskResult};

/// How the declared origin was supplied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum InputMethod {
    /// Country/region lookup through the isoscape service
    #[default]
    Country,
    /// Direct δ18O summary entry
    D18o,
}

impl std::fmt::Display for InputMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputMethod::Country => write!(f, "country"),
            InputMethod::D18o => write!(f, "d18o"),
        }
    }
}

/// A persisted risk assessment (YAML on disk)
///
/// Regenerating a score or a protocol produces a new record; existing
/// records are never patched in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    /// Unique identifier (ASMT-xxx)
    pub id: AssessmentId,

    /// Product label (style number, shipment reference, etc.)
    pub product: String,

    /// How the declared origin was supplied
    #[serde(default)]
    pub input_method: InputMethod,

    /// Declared country of origin, as entered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared_country: Option<String>,

    /// Declared sub-national region, as entered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared_region: Option<String>,

    /// Declared δ18O profile (looked up or entered directly)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared_profile: Option<IsotopeProfile>,

    /// Questionnaire answers by question id
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub answers: BTreeMap<String, Answer>,

    /// The computed risk score
    pub risk: RiskResult,

    /// Generated testing protocols, when mitigation was run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mitigation: Option<ProtocolPair>,

    /// Creation timestamp
    pub created: DateTime<Utc>,

    /// Author (who ran the assessment)
    pub author: String,
}

impl Assessment {
    /// Create a new assessment around a computed risk result
    pub fn new(product: String, risk: RiskResult, author: String) -> Self {
        Self {
            id: AssessmentId::new(),
            product,
            input_method: InputMethod::default(),
            declared_country: None,
            declared_region: None,
            declared_profile: None,
            answers: BTreeMap::new(),
            risk,
            mitigation: None,
            created: Utc::now(),
            author,
        }
    }

    /// File name this record is stored under
    pub fn file_name(&self) -> String {
        format!("{}.yaml", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::score::{score, Answer, RiskCatalog};

    fn sample_assessment() -> Assessment {
        let answers: BTreeMap<String, Answer> = [("q1", Answer::No), ("q2", Answer::Unknown)]
            .map(|(id, a)| (id.to_string(), a))
            .into();
        let risk = score(
            &answers,
            Some("China"),
            None,
            &RiskCatalog::default(),
        );
        let mut assessment =
            Assessment::new("PO-4471".to_string(), risk, "test".to_string());
        assessment.declared_country = Some("China".to_string());
        assessment.answers = answers;
        assessment
    }

    #[test]
    fn test_assessment_creation() {
        let assessment = sample_assessment();
        assert!(assessment.id.to_string().starts_with("ASMT-"));
        assert_eq!(assessment.product, "PO-4471");
        assert_eq!(assessment.input_method, InputMethod::Country);
        assert!(assessment.mitigation.is_none());
    }

    #[test]
    fn test_assessment_roundtrip() {
        let assessment = sample_assessment();
        let yaml = serde_yml::to_string(&assessment).unwrap();
        let parsed: Assessment = serde_yml::from_str(&yaml).unwrap();

        assert_eq!(parsed.id, assessment.id);
        assert_eq!(parsed.risk, assessment.risk);
        assert_eq!(parsed.answers, assessment.answers);
        assert_eq!(parsed.declared_country, assessment.declared_country);
    }

    #[test]
    fn test_input_method_serializes_lowercase() {
        let mut assessment = sample_assessment();
        assessment.input_method = InputMethod::D18o;
        let yaml = serde_yml::to_string(&assessment).unwrap();
        assert!(yaml.contains("input_method: d18o"));
    }

    #[test]
    fn test_file_name_uses_id() {
        let assessment = sample_assessment();
        assert_eq!(
            assessment.file_name(),
            format!("{}.yaml", assessment.id)
        );
    }
}
