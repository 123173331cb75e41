//! Testing-protocol generation
//!
//! Orchestrates the AQL table, Dorfman pooling, detection power and the
//! cost model into two alternative protocols: the AQL-based plan and the
//! simpler color-by-size plan. Both are returned together so a caller can
//! present either without recomputation.

use serde::{Deserialize, Serialize};

use crate::engine::aql::{Aql, AqlTable};
use crate::engine::pooling::{self, PoolingPlan};
use crate::engine::power;
use crate::engine::score::RiskTier;
use crate::engine::EngineError;

/// Assumed lot contamination rate for pooling and power calculations
pub const EXPECTED_DEFECT_RATE: f64 = 0.05;

/// Flat lab cost per δ18O test, in dollars
pub const COST_PER_TEST: u64 = 300;

/// Sampling rigor chosen by the operator (drives AQL selection)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplingRigor {
    Low,
    Medium,
    High,
}

impl SamplingRigor {
    /// The AQL level this rigor maps to
    pub fn aql(&self) -> Aql {
        match self {
            SamplingRigor::Low => Aql::Minimal,
            SamplingRigor::Medium => Aql::Reduced,
            SamplingRigor::High => Aql::Strict,
        }
    }

    /// Recommended rigor for a risk tier; high and critical assessments
    /// both require full sampling
    pub fn default_for(tier: RiskTier) -> Self {
        match tier {
            RiskTier::Low => SamplingRigor::Low,
            RiskTier::Medium => SamplingRigor::Medium,
            RiskTier::High | RiskTier::Critical => SamplingRigor::High,
        }
    }
}

impl std::fmt::Display for SamplingRigor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SamplingRigor::Low => write!(f, "low"),
            SamplingRigor::Medium => write!(f, "medium"),
            SamplingRigor::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for SamplingRigor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(SamplingRigor::Low),
            "medium" => Ok(SamplingRigor::Medium),
            "high" => Ok(SamplingRigor::High),
            _ => Err(format!("Invalid sampling rigor: {}. Use low, medium, or high", s)),
        }
    }
}

/// Shipment parameters supplied by the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotParameters {
    /// Units in the shipment
    pub lot_size: u32,

    /// Distinct colors (each may come from a different fabric source)
    pub colors: u32,

    /// Distinct sizes/SKUs
    pub sizes: u32,
}

/// Lab cost of a protocol, with and without pooling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestingCost {
    pub unpooled: u64,
    pub pooled: u64,
}

impl TestingCost {
    fn from_tests(unpooled_tests: u32, pooled_tests: u32) -> Self {
        Self {
            unpooled: unpooled_tests as u64 * COST_PER_TEST,
            pooled: pooled_tests as u64 * COST_PER_TEST,
        }
    }
}

/// Accept/reject thresholds from the AQL row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionThresholds {
    /// Accept the lot when failed samples <= accept
    pub accept: u32,

    /// Reject the lot when failed samples >= reject
    pub reject: u32,
}

/// The AQL-based testing protocol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestingProtocol {
    pub lot_size: u32,
    pub colors: u32,
    pub sizes: u32,

    /// Nominal AQL value (1.0, 2.5 or 4.0)
    pub aql: f64,

    /// Reporting-only confidence percent, driven by the risk tier
    pub confidence_percent: u8,

    pub samples_per_color: u32,
    pub total_samples: u32,
    pub pooling: PoolingPlan,

    /// Probability (percent, capped at 99) of detecting a 5%-contaminated lot
    pub power: u8,

    pub cost: TestingCost,
    pub decision: DecisionThresholds,
}

/// The alternative color-by-size protocol, pooled independently
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorSizeProtocol {
    pub samples: u32,

    /// Sizes actually drawn from (low risk spreads one sample per color
    /// over at most 2 sizes; otherwise every size is covered)
    pub sizes_used: u32,

    pub pooling: PoolingPlan,
    pub cost: TestingCost,
}

/// Both protocols for one shipment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolPair {
    pub risk_tier: RiskTier,
    pub sampling_rigor: SamplingRigor,
    pub aql_protocol: TestingProtocol,
    pub color_size_protocol: ColorSizeProtocol,
}

/// Reporting confidence percent per risk tier
fn confidence_percent(tier: RiskTier) -> u8 {
    match tier {
        RiskTier::Low => 1,
        RiskTier::Medium => 2,
        RiskTier::High | RiskTier::Critical => 4,
    }
}

/// Generate both testing protocols for a shipment.
///
/// Invalid lot parameters are reported before any computation; tier and
/// rigor are independent inputs (the tier sets the reported confidence,
/// the rigor sets the AQL).
pub fn generate(
    lot: LotParameters,
    tier: RiskTier,
    rigor: SamplingRigor,
) -> Result<ProtocolPair, EngineError> {
    if lot.lot_size == 0 {
        return Err(EngineError::InvalidLotSize);
    }
    if lot.colors == 0 {
        return Err(EngineError::InvalidColorCount);
    }
    if lot.sizes == 0 {
        return Err(EngineError::InvalidSizeCount);
    }

    let aql = rigor.aql();
    let row = AqlTable::lookup(lot.lot_size, aql);

    let samples_per_color = row.sample_size;
    let total_samples = samples_per_color * lot.colors;
    let pooling = pooling::plan(total_samples, lot.colors, EXPECTED_DEFECT_RATE);
    let power = power::power(samples_per_color, lot.lot_size, EXPECTED_DEFECT_RATE);

    let aql_protocol = TestingProtocol {
        lot_size: lot.lot_size,
        colors: lot.colors,
        sizes: lot.sizes,
        aql: aql.value(),
        confidence_percent: confidence_percent(tier),
        samples_per_color,
        total_samples,
        cost: TestingCost::from_tests(total_samples, pooling.tests_required),
        pooling,
        power,
        decision: DecisionThresholds {
            accept: row.accept_number,
            reject: row.reject_number,
        },
    };

    let (samples, sizes_used) = match tier {
        // One sample per color, spread over at most two sizes
        RiskTier::Low => (lot.colors, lot.sizes.min(2)),
        // Every color crossed with every size
        _ => (lot.colors * lot.sizes, lot.sizes),
    };
    let cs_pooling = pooling::plan(samples, lot.colors, EXPECTED_DEFECT_RATE);
    let color_size_protocol = ColorSizeProtocol {
        samples,
        sizes_used,
        cost: TestingCost::from_tests(samples, cs_pooling.tests_required),
        pooling: cs_pooling,
    };

    Ok(ProtocolPair {
        risk_tier: tier,
        sampling_rigor: rigor,
        aql_protocol,
        color_size_protocol,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lot(lot_size: u32, colors: u32, sizes: u32) -> LotParameters {
        LotParameters {
            lot_size,
            colors,
            sizes,
        }
    }

    #[test]
    fn test_invalid_inputs_are_rejected() {
        assert!(matches!(
            generate(lot(0, 3, 5), RiskTier::Medium, SamplingRigor::Medium),
            Err(EngineError::InvalidLotSize)
        ));
        assert!(matches!(
            generate(lot(500, 0, 5), RiskTier::Medium, SamplingRigor::Medium),
            Err(EngineError::InvalidColorCount)
        ));
        assert!(matches!(
            generate(lot(500, 3, 0), RiskTier::Medium, SamplingRigor::Medium),
            Err(EngineError::InvalidSizeCount)
        ));
    }

    #[test]
    fn test_high_rigor_protocol_for_mid_lot() {
        let pair = generate(lot(5000, 3, 5), RiskTier::High, SamplingRigor::High).unwrap();
        let p = &pair.aql_protocol;
        assert_eq!(p.aql, 1.0);
        assert_eq!(p.confidence_percent, 4);
        assert_eq!(p.samples_per_color, 200);
        assert_eq!(p.total_samples, 600);
        assert_eq!(p.decision.accept, 5);
        assert_eq!(p.decision.reject, 6);
        // 200/color, pool size 4, 50 pools/color * 3, ceil(150 + 30) tests
        assert_eq!(p.pooling.pools, 150);
        assert_eq!(p.pooling.tests_required, 180);
        assert_eq!(p.cost.unpooled, 600 * COST_PER_TEST);
        assert_eq!(p.cost.pooled, 180 * COST_PER_TEST);
        assert!(p.power <= 99);
    }

    #[test]
    fn test_confidence_is_tier_driven_not_rigor_driven() {
        let low = generate(lot(500, 2, 3), RiskTier::Low, SamplingRigor::High).unwrap();
        let critical = generate(lot(500, 2, 3), RiskTier::Critical, SamplingRigor::Low).unwrap();
        assert_eq!(low.aql_protocol.confidence_percent, 1);
        assert_eq!(critical.aql_protocol.confidence_percent, 4);
        // and the AQL follows the rigor, not the tier
        assert_eq!(low.aql_protocol.aql, 1.0);
        assert_eq!(critical.aql_protocol.aql, 4.0);
    }

    #[test]
    fn test_low_rigor_shrinks_samples() {
        let high = generate(lot(1000, 2, 4), RiskTier::Medium, SamplingRigor::High).unwrap();
        let medium = generate(lot(1000, 2, 4), RiskTier::Medium, SamplingRigor::Medium).unwrap();
        let low = generate(lot(1000, 2, 4), RiskTier::Medium, SamplingRigor::Low).unwrap();
        assert_eq!(high.aql_protocol.samples_per_color, 80);
        assert_eq!(medium.aql_protocol.samples_per_color, 48);
        assert_eq!(low.aql_protocol.samples_per_color, 24);
    }

    #[test]
    fn test_color_size_protocol_low_tier() {
        let pair = generate(lot(5000, 6, 5), RiskTier::Low, SamplingRigor::Low).unwrap();
        let cs = &pair.color_size_protocol;
        assert_eq!(cs.samples, 6);
        assert_eq!(cs.sizes_used, 2);
        assert_eq!(cs.cost.unpooled, 6 * COST_PER_TEST);
    }

    #[test]
    fn test_color_size_protocol_covers_all_sizes_above_low() {
        for tier in [RiskTier::Medium, RiskTier::High, RiskTier::Critical] {
            let pair = generate(lot(5000, 6, 5), tier, SamplingRigor::High).unwrap();
            assert_eq!(pair.color_size_protocol.samples, 30);
            assert_eq!(pair.color_size_protocol.sizes_used, 5);
        }
    }

    #[test]
    fn test_low_tier_single_size_shipment() {
        let pair = generate(lot(100, 4, 1), RiskTier::Low, SamplingRigor::Low).unwrap();
        assert_eq!(pair.color_size_protocol.sizes_used, 1);
    }

    #[test]
    fn test_default_rigor_from_tier() {
        assert_eq!(SamplingRigor::default_for(RiskTier::Low), SamplingRigor::Low);
        assert_eq!(
            SamplingRigor::default_for(RiskTier::Medium),
            SamplingRigor::Medium
        );
        assert_eq!(SamplingRigor::default_for(RiskTier::High), SamplingRigor::High);
        assert_eq!(
            SamplingRigor::default_for(RiskTier::Critical),
            SamplingRigor::High
        );
    }

    #[test]
    fn test_generate_is_pure() {
        let a = generate(lot(750, 3, 4), RiskTier::Medium, SamplingRigor::Medium).unwrap();
        let b = generate(lot(750, 3, 4), RiskTier::Medium, SamplingRigor::Medium).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_protocol_serializes_to_json() {
        let pair = generate(lot(5000, 3, 5), RiskTier::High, SamplingRigor::High).unwrap();
        let json = serde_json::to_string(&pair).unwrap();
        assert!(json.contains("\"aql\":1.0"));
        let parsed: ProtocolPair = serde_json::from_str(&json).unwrap();
        assert_eq!(pair, parsed);
    }
}
