//! Decoder for the external geography/isotope lookup service
//!
//! The isoscape service answers with array-wrapped scalars (R vector
//! serialization), e.g. `{"mean":[24.8],"min":[21.2],...}`, or with
//! `{"error": "..."}` when no data exists for the query. An error or a
//! malformed summary degrades to "no profile"; it is never fatal.

use serde::Deserialize;

use crate::engine::IsotopeProfile;

/// Raw response body from the isoscape lookup endpoint
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct IsoscapeResponse {
    pub error: Option<String>,
    pub mean: Vec<f64>,
    pub min: Vec<f64>,
    pub max: Vec<f64>,
    pub sd: Vec<f64>,
    pub median: Vec<f64>,
    pub q25: Vec<f64>,
    pub q75: Vec<f64>,
    pub n_pixels: Vec<u64>,
    pub spam_filtered: Vec<bool>,
}

impl IsoscapeResponse {
    /// Extract a validated isotope profile, or `None` when the service
    /// reported an error or returned an unusable summary
    pub fn profile(&self) -> Option<IsotopeProfile> {
        if self.error.is_some() {
            return None;
        }
        let mean = *self.mean.first()?;
        let min = *self.min.first()?;
        let max = *self.max.first()?;
        let sd = self.sd.first().copied().filter(|sd| *sd > 0.0);
        IsotopeProfile::new(mean, min, max, sd).ok()
    }
}

/// Parse a raw service response body into a profile. Undecodable JSON is
/// treated the same as a service error.
pub fn parse_profile(body: &str) -> Option<IsotopeProfile> {
    serde_json::from_str::<IsoscapeResponse>(body)
        .ok()
        .and_then(|response| response.profile())
}
