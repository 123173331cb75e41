//! Risk Scoring & Statistical Testing-Protocol Engine
//!
//! Pure, synchronous functions over immutable inputs: no I/O, no shared
//! state. Callers pass plain data structures in and receive plain data
//! structures out.

pub mod aql;
pub mod combinatorics;
pub mod overlap;
pub mod pooling;
pub mod power;
pub mod protocol;
pub mod score;

use thiserror::Error;

pub use aql::{Aql, AqlRow, AqlTable};
pub use overlap::{analyze, IsotopeProfile, OverlapAnalysis, ReferenceProfile};
pub use pooling::PoolingPlan;
pub use protocol::{
    generate, ColorSizeProtocol, LotParameters, ProtocolPair, SamplingRigor, TestingProtocol,
};
pub use score::{score, Answer, Question, RiskCatalog, RiskResult, RiskTier};

/// Errors reported for invalid engine inputs.
///
/// Degenerate-but-well-typed situations (tiny lots, missing geography
/// lookups, defect rates that defeat pooling) are clamped or degraded
/// instead, and never surface here.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("lot size must be positive")]
    InvalidLotSize,

    #[error("color count must be positive")]
    InvalidColorCount,

    #[error("size count must be positive")]
    InvalidSizeCount,

    #[error("isotope profile min {min} exceeds max {max}")]
    ProfileRange { min: f64, max: f64 },

    #[error("isotope profile mean {mean} outside range {min}..{max}")]
    ProfileMean { mean: f64, min: f64, max: f64 },

    #[error("isotope profile standard deviation must be positive (got {sd})")]
    ProfileSd { sd: f64 },
}
