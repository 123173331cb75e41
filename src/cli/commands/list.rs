//! `cot list` command - tabulate saved assessments

use clap::Args;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs;
use tabled::{builder::Builder, settings::Style};
use walkdir::WalkDir;

use crate::cli::helpers::{format_short_id, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::engine::score::RiskTier;
use crate::entities::Assessment;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Filter by risk tier
    #[arg(long, short = 't')]
    pub tier: Option<RiskTier>,

    /// Show only the N most recent assessments
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Print only the number of matching assessments
    #[arg(long)]
    pub count: bool,
}

pub fn run(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let dir = config.assessments_dir();

    if !dir.exists() {
        if args.count {
            println!("0");
        } else {
            println!("No assessments found.");
        }
        return Ok(());
    }

    let mut assessments: Vec<Assessment> = Vec::new();
    for entry in WalkDir::new(&dir).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if path.extension().is_some_and(|e| e == "yaml") {
            let content = fs::read_to_string(path).into_diagnostic()?;
            if let Ok(assessment) = serde_yml::from_str::<Assessment>(&content) {
                assessments.push(assessment);
            }
        }
    }

    let mut assessments: Vec<Assessment> = assessments
        .into_iter()
        .filter(|a| args.tier.is_none_or(|tier| a.risk.tier == tier))
        .collect();

    // Most recent first
    assessments.sort_by(|a, b| b.created.cmp(&a.created));

    if let Some(limit) = args.limit {
        assessments.truncate(limit);
    }

    if args.count {
        println!("{}", assessments.len());
        return Ok(());
    }

    if assessments.is_empty() {
        println!("No assessments found.");
        return Ok(());
    }

    match global.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&assessments).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&assessments).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Tsv => {
            for a in &assessments {
                println!(
                    "{}\t{}\t{}\t{}\t{}\t{}",
                    a.id,
                    a.product,
                    a.declared_country.as_deref().unwrap_or(""),
                    a.risk.total,
                    a.risk.tier,
                    a.created.format("%Y-%m-%d")
                );
            }
        }
        OutputFormat::Auto => {
            let mut builder = Builder::default();
            builder.push_record(["ID", "PRODUCT", "COUNTRY", "TOTAL", "TIER", "CREATED"]);
            for a in &assessments {
                builder.push_record([
                    format_short_id(&a.id),
                    truncate_str(&a.product, 24),
                    a.declared_country.clone().unwrap_or_default(),
                    a.risk.total.to_string(),
                    a.risk.tier.to_string(),
                    a.created.format("%Y-%m-%d").to_string(),
                ]);
            }
            println!("{}", builder.build().with(Style::markdown()));

            if !global.quiet {
                println!();
                println!("{} assessments", style(assessments.len()).cyan());
            }
        }
    }

    Ok(())
}
