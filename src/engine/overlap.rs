//! Isotopic overlap analysis
//!
//! Compares a declared δ18O profile against a catalog of known high-risk
//! reference profiles: how much of the declared range the reference
//! intersects, and how many standard deviations apart the means sit.
//! Pure interval geometry; the reference set is configuration data.

use serde::{Deserialize, Serialize};

use crate::engine::EngineError;

/// A δ18O profile in per-mille units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IsotopeProfile {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub sd: f64,
}

impl IsotopeProfile {
    /// Build a validated profile. When `sd` is absent it is estimated as
    /// a quarter of the range.
    pub fn new(mean: f64, min: f64, max: f64, sd: Option<f64>) -> Result<Self, EngineError> {
        if min > max {
            return Err(EngineError::ProfileRange { min, max });
        }
        if mean < min || mean > max {
            return Err(EngineError::ProfileMean { mean, min, max });
        }
        let sd = sd.unwrap_or((max - min) / 4.0);
        if sd <= 0.0 {
            return Err(EngineError::ProfileSd { sd });
        }
        Ok(Self { mean, min, max, sd })
    }

    /// Width of the expected range, floored at 1 so overlap fractions on
    /// degenerate ranges stay defined
    fn range_width(&self) -> f64 {
        let width = self.max - self.min;
        if width == 0.0 {
            1.0
        } else {
            width
        }
    }
}

/// A named high-risk region profile from the reference catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceProfile {
    pub name: String,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Result of comparing a declared profile against the reference catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlapAnalysis {
    /// Largest share of the declared range covered by any reference, 0-100
    pub overlap_percent: f64,

    /// Reference whose mean is nearest in standardized distance
    pub closest_high_risk: String,

    /// Overlap percent of that closest reference, 0-100
    pub closest_overlap_percent: f64,

    /// Standardized distance to the closest reference, in declared SDs
    pub distance_sd: f64,

    /// True when every reference mean sits more than 2 SD away
    pub separable: bool,
}

/// Share of the declared range covered by its intersection with the
/// reference range, clamped to 0-100.
fn overlap_percent(declared: &IsotopeProfile, reference: &ReferenceProfile) -> f64 {
    let intersection =
        (declared.max.min(reference.max) - declared.min.max(reference.min)).max(0.0);
    (intersection / declared.range_width() * 100.0).clamp(0.0, 100.0)
}

/// Compare a declared profile against every reference profile.
///
/// The closest reference is the one with minimum standardized distance;
/// ties keep the first reference in input order. Returns `None` when the
/// reference set is empty.
pub fn analyze(
    declared: &IsotopeProfile,
    references: &[ReferenceProfile],
) -> Option<OverlapAnalysis> {
    let mut max_overlap = 0.0_f64;
    let mut closest: Option<(&ReferenceProfile, f64, f64)> = None;

    for reference in references {
        let overlap = overlap_percent(declared, reference);
        let distance = (declared.mean - reference.mean).abs() / declared.sd;

        if overlap > max_overlap {
            max_overlap = overlap;
        }
        match closest {
            Some((_, best_distance, _)) if distance >= best_distance => {}
            _ => closest = Some((reference, distance, overlap)),
        }
    }

    let (reference, distance_sd, closest_overlap) = closest?;
    Some(OverlapAnalysis {
        overlap_percent: max_overlap,
        closest_high_risk: reference.name.clone(),
        closest_overlap_percent: closest_overlap,
        distance_sd,
        separable: distance_sd > 2.0,
    })
}
