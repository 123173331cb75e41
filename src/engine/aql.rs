//! ANSI/ASQ Z1.4-2018 acceptance-sampling lookup (General Inspection Level II)

use serde::{Deserialize, Serialize};

/// Acceptable Quality Limit selected for a protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum Aql {
    /// AQL 1.0 - full sampling
    #[default]
    Strict,
    /// AQL 2.5 - reduced sampling (60% of the standard sample size)
    Reduced,
    /// AQL 4.0 - minimal sampling (30% of the standard sample size)
    Minimal,
}

impl Aql {
    /// The nominal AQL value as printed on protocols
    pub fn value(&self) -> f64 {
        match self {
            Aql::Strict => 1.0,
            Aql::Reduced => 2.5,
            Aql::Minimal => 4.0,
        }
    }

    /// Sample-size multiplier applied on top of the AQL 1.0 table
    pub fn sample_multiplier(&self) -> f64 {
        match self {
            Aql::Strict => 1.0,
            Aql::Reduced => 0.6,
            Aql::Minimal => 0.3,
        }
    }
}

impl std::fmt::Display for Aql {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// One row of the sampling plan for a lot-size range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AqlRow {
    /// Smallest lot size covered by this tier
    pub lot_range_min: u32,

    /// Largest lot size covered by this tier (u32::MAX for the open tier)
    pub lot_range_max: u32,

    /// Units to sample, already adjusted for the requested AQL
    pub sample_size: u32,

    /// Accept the lot when failures <= accept_number
    pub accept_number: u32,

    /// Reject the lot when failures >= reject_number
    pub reject_number: u32,
}

/// AQL 1.0 base table: (range min, range max, sample size, accept number).
/// Reject number is accept + 1 in every tier.
const BASE_TABLE: [(u32, u32, u32, u32); 13] = [
    (2, 8, 2, 0),
    (9, 15, 3, 0),
    (16, 25, 5, 0),
    (26, 50, 8, 0),
    (51, 90, 13, 0),
    (91, 150, 20, 0),
    (151, 280, 32, 1),
    (281, 500, 50, 1),
    (501, 1200, 80, 2),
    (1201, 3200, 125, 3),
    (3201, 10000, 200, 5),
    (10001, 35000, 315, 7),
    (35001, u32::MAX, 500, 10),
];

/// Static lookup table mapping lot-size ranges to sampling plans
pub struct AqlTable;

impl AqlTable {
    /// Resolve the sampling plan for a lot.
    ///
    /// Lot sizes outside the defined ranges clamp to the nearest tier, so
    /// the lookup always returns a row. Lower-rigor AQLs scale the sample
    /// size (ceil, minimum 2) without touching the accept/reject pair.
    pub fn lookup(lot_size: u32, aql: Aql) -> AqlRow {
        let (lot_range_min, lot_range_max, base_sample, accept) = BASE_TABLE
            .iter()
            .copied()
            .find(|&(min, max, _, _)| lot_size >= min && lot_size <= max)
            .unwrap_or_else(|| {
                if lot_size < BASE_TABLE[0].0 {
                    BASE_TABLE[0]
                } else {
                    BASE_TABLE[BASE_TABLE.len() - 1]
                }
            });

        let sample_size =
            ((base_sample as f64 * aql.sample_multiplier()).ceil() as u32).max(2);

        AqlRow {
            lot_range_min,
            lot_range_max,
            sample_size,
            accept_number: accept,
            reject_number: accept + 1,
        }
    }
}
