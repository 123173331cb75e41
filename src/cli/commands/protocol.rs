//! `cot protocol` command - AQL and color/size testing-protocol generation

use clap::Args;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::PathBuf;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::engine::protocol::{
    generate, ColorSizeProtocol, LotParameters, ProtocolPair, SamplingRigor, TestingProtocol,
    EXPECTED_DEFECT_RATE,
};
use crate::engine::score::RiskTier;
use crate::entities::Assessment;

#[derive(Args, Debug)]
pub struct ProtocolArgs {
    /// Units in the shipment
    #[arg(long, short = 'l')]
    pub lot_size: u32,

    /// Distinct colors in the shipment
    #[arg(long, default_value_t = 1)]
    pub colors: u32,

    /// Distinct sizes/SKUs in the shipment
    #[arg(long, default_value_t = 1)]
    pub sizes: u32,

    /// Risk tier driving the reported confidence level
    #[arg(long, short = 't')]
    pub tier: Option<RiskTier>,

    /// Sampling rigor driving the AQL (default: derived from the tier)
    #[arg(long, short = 'r')]
    pub rigor: Option<SamplingRigor>,

    /// Take the tier from a saved assessment instead of --tier
    #[arg(long, conflicts_with = "tier")]
    pub assessment: Option<PathBuf>,

    /// Write the generated protocols back into the assessment record
    #[arg(long, short = 's', requires = "assessment")]
    pub save: bool,
}

pub fn run(args: ProtocolArgs, global: &GlobalOpts) -> Result<()> {
    let mut assessment: Option<(PathBuf, Assessment)> = None;

    let tier = match (&args.assessment, args.tier) {
        (Some(path), _) => {
            let content = fs::read_to_string(path).into_diagnostic()?;
            let loaded: Assessment = serde_yml::from_str(&content).into_diagnostic()?;
            let tier = loaded.risk.tier;
            assessment = Some((path.clone(), loaded));
            tier
        }
        (None, Some(tier)) => tier,
        (None, None) => {
            return Err(miette::miette!(
                "Provide either --tier or --assessment to set the risk tier"
            ))
        }
    };

    let rigor = args.rigor.unwrap_or_else(|| SamplingRigor::default_for(tier));

    let lot = LotParameters {
        lot_size: args.lot_size,
        colors: args.colors,
        sizes: args.sizes,
    };
    let pair = generate(lot, tier, rigor).map_err(|e| miette::miette!("{}", e))?;

    match global.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&pair).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&pair).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Tsv => {
            println!(
                "{}\t{}\t{}\t{}\t{}\t{}",
                pair.aql_protocol.total_samples,
                pair.aql_protocol.pooling.tests_required,
                pair.aql_protocol.power,
                pair.aql_protocol.cost.pooled,
                pair.aql_protocol.decision.accept,
                pair.aql_protocol.decision.reject
            );
        }
        OutputFormat::Auto => print_styled(&pair, global.quiet),
    }

    if args.save {
        if let Some((path, mut record)) = assessment {
            record.mitigation = Some(pair);
            let yaml = serde_yml::to_string(&record).into_diagnostic()?;
            fs::write(&path, yaml).into_diagnostic()?;
            if !global.quiet {
                println!();
                println!(
                    "{} Updated assessment {}",
                    style("✓").green(),
                    style(&record.id.to_string()).cyan()
                );
                println!("   {}", style(path.display()).dim());
            }
        }
    }

    Ok(())
}

fn print_styled(pair: &ProtocolPair, quiet: bool) {
    let aql = &pair.aql_protocol;

    if quiet {
        println!(
            "{} {} {} {}",
            aql.total_samples, aql.pooling.tests_required, aql.decision.accept, aql.decision.reject
        );
        return;
    }

    println!("{}", style("─".repeat(60)).dim());
    println!(
        "Testing protocol for lot of {} ({} colors, {} sizes)",
        style(aql.lot_size).cyan(),
        aql.colors,
        aql.sizes
    );
    println!(
        "Risk tier: {}   Sampling rigor: {}   AQL: {}",
        style(pair.risk_tier.to_string()).yellow(),
        style(pair.sampling_rigor.to_string()).yellow(),
        aql.aql
    );
    println!("{}", style("─".repeat(60)).dim());

    print_aql_protocol(aql);
    print_color_size_protocol(&pair.color_size_protocol);
}

fn print_aql_protocol(aql: &TestingProtocol) {
    println!();
    println!("   {} Protocol:", style("AQL Acceptance").bold());
    println!(
        "     Samples: {} per color, {} total",
        aql.samples_per_color, aql.total_samples
    );
    println!(
        "     Pooling: {} pools, {} lab tests ({}% savings)",
        aql.pooling.pools, aql.pooling.tests_required, aql.pooling.savings_percent
    );
    println!(
        "     Detection power: {}% at {:.0}% contamination",
        aql.power,
        EXPECTED_DEFECT_RATE * 100.0
    );
    println!(
        "     Cost: ${} unpooled / ${} pooled",
        aql.cost.unpooled, aql.cost.pooled
    );
    println!(
        "     Decision: accept at ≤{} failures, reject at ≥{}",
        style(aql.decision.accept).green(),
        style(aql.decision.reject).red()
    );
    println!(
        "     Reported confidence level: {}%",
        aql.confidence_percent
    );
}

fn print_color_size_protocol(cs: &ColorSizeProtocol) {
    println!();
    println!("   {} Protocol:", style("Color/Size Coverage").bold());
    println!(
        "     Samples: {} across {} sizes",
        cs.samples, cs.sizes_used
    );
    println!(
        "     Pooling: {} pools, {} lab tests ({}% savings)",
        cs.pooling.pools, cs.pooling.tests_required, cs.pooling.savings_percent
    );
    println!(
        "     Cost: ${} unpooled / ${} pooled",
        cs.cost.unpooled, cs.cost.pooled
    );
}
