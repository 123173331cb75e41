//! `cot score` command - multi-factor origin risk scoring

use clap::Args;
use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use miette::{IntoDiagnostic, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{isoscape, Config};
use crate::engine::overlap::{analyze, IsotopeProfile, OverlapAnalysis};
use crate::engine::score::{score, Answer, RiskCatalog, RiskResult, RiskTier};
use crate::entities::{Assessment, InputMethod};

#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Product label (style number, shipment reference, etc.)
    #[arg(long, short = 'p', default_value = "assessment")]
    pub product: String,

    /// Questionnaire answer as id=value (e.g. --answer q1=yes), repeatable
    #[arg(long, short = 'a')]
    pub answer: Vec<String>,

    /// Declared country of origin
    #[arg(long, short = 'c')]
    pub country: Option<String>,

    /// Declared sub-national region (recorded, not scored)
    #[arg(long)]
    pub region: Option<String>,

    /// Declared δ18O mean (requires --d18o-min and --d18o-max)
    #[arg(long, requires_all = ["d18o_min", "d18o_max"])]
    pub d18o_mean: Option<f64>,

    /// Declared δ18O range minimum
    #[arg(long)]
    pub d18o_min: Option<f64>,

    /// Declared δ18O range maximum
    #[arg(long)]
    pub d18o_max: Option<f64>,

    /// Declared δ18O standard deviation (estimated from the range if absent)
    #[arg(long)]
    pub d18o_sd: Option<f64>,

    /// Saved isoscape response body (JSON) to take the declared profile from
    #[arg(long)]
    pub profile_json: Option<PathBuf>,

    /// Ask the questionnaire interactively
    #[arg(long, short = 'i')]
    pub interactive: bool,

    /// Save the assessment record to the assessments directory
    #[arg(long, short = 's')]
    pub save: bool,
}

pub fn run(args: ScoreArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let catalog = config
        .load_catalog(global.catalog.as_deref())
        .map_err(|e| miette::miette!("{}", e))?;

    let mut answers = parse_answers(&args.answer)?;

    if args.interactive {
        ask_questionnaire(&catalog, &mut answers)?;
    }

    let (declared_profile, input_method) = declared_profile(&args)?;

    let overlap: Option<OverlapAnalysis> = declared_profile
        .as_ref()
        .and_then(|profile| analyze(profile, &catalog.reference_profiles));

    let result = score(
        &answers,
        args.country.as_deref(),
        overlap.as_ref(),
        &catalog,
    );

    match global.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&result).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&result).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Tsv => {
            println!(
                "{}\t{}\t{}\t{}\t{}",
                result.total,
                result.tier,
                result.breakdown.supply_chain,
                result.breakdown.geographic,
                result.breakdown.isotope
            );
        }
        OutputFormat::Auto => print_styled(&args, &result, global.quiet),
    }

    if args.save {
        let mut assessment = Assessment::new(args.product.clone(), result, config.author());
        assessment.input_method = input_method;
        assessment.declared_country = args.country.clone();
        assessment.declared_region = args.region.clone();
        assessment.declared_profile = declared_profile;
        assessment.answers = answers;

        let dir = config.assessments_dir();
        fs::create_dir_all(&dir).into_diagnostic()?;
        let path = dir.join(assessment.file_name());
        let yaml = serde_yml::to_string(&assessment).into_diagnostic()?;
        fs::write(&path, yaml).into_diagnostic()?;

        if !global.quiet {
            println!();
            println!(
                "{} Saved assessment {}",
                style("✓").green(),
                style(&assessment.id.to_string()).cyan()
            );
            println!("   {}", style(path.display()).dim());
        }
    }

    Ok(())
}

/// Parse repeated `id=value` answer flags
fn parse_answers(raw: &[String]) -> Result<BTreeMap<String, Answer>> {
    let mut answers = BTreeMap::new();
    for entry in raw {
        let (id, value) = entry
            .split_once('=')
            .ok_or_else(|| miette::miette!("Invalid answer '{}'. Use id=value, e.g. q1=yes", entry))?;
        let answer: Answer = value
            .parse()
            .map_err(|e: String| miette::miette!("{}", e))?;
        answers.insert(id.to_string(), answer);
    }
    Ok(answers)
}

/// Prompt for any questions not already answered on the command line
fn ask_questionnaire(
    catalog: &RiskCatalog,
    answers: &mut BTreeMap<String, Answer>,
) -> Result<()> {
    let theme = ColorfulTheme::default();
    let choices = [Answer::Yes, Answer::No, Answer::Unknown];

    for question in &catalog.questions {
        if answers.contains_key(&question.id) {
            continue;
        }
        let labels: Vec<String> = choices.iter().map(|a| a.to_string()).collect();
        let selection = Select::with_theme(&theme)
            .with_prompt(&question.prompt)
            .items(&labels)
            .default(2)
            .interact()
            .into_diagnostic()?;
        answers.insert(question.id.clone(), choices[selection]);
    }
    Ok(())
}

/// Build the declared isotope profile from whichever input was given.
///
/// Direct δ18O values win over a saved isoscape response; a response that
/// decodes to no usable profile degrades to country-only scoring.
fn declared_profile(args: &ScoreArgs) -> Result<(Option<IsotopeProfile>, InputMethod)> {
    if let (Some(mean), Some(min), Some(max)) = (args.d18o_mean, args.d18o_min, args.d18o_max) {
        let profile =
            IsotopeProfile::new(mean, min, max, args.d18o_sd).map_err(|e| miette::miette!("{}", e))?;
        return Ok((Some(profile), InputMethod::D18o));
    }

    if let Some(ref path) = args.profile_json {
        let body = fs::read_to_string(path).into_diagnostic()?;
        let profile = isoscape::parse_profile(&body);
        if profile.is_none() {
            eprintln!(
                "{} No usable profile in {}; scoring without isotope data",
                style("!").yellow(),
                path.display()
            );
        }
        return Ok((profile, InputMethod::Country));
    }

    Ok((None, InputMethod::Country))
}

fn tier_styled(tier: RiskTier) -> console::StyledObject<String> {
    let text = tier.to_string();
    match tier {
        RiskTier::Low => style(text).green(),
        RiskTier::Medium => style(text).yellow(),
        RiskTier::High => style(text).red(),
        RiskTier::Critical => style(text).red().bold(),
    }
}

fn print_styled(args: &ScoreArgs, result: &RiskResult, quiet: bool) {
    if quiet {
        println!("{} {}", result.total, result.tier);
        return;
    }

    println!("{}", style("─".repeat(60)).dim());
    println!(
        "{}: {}",
        style("Product").bold(),
        style(&args.product).yellow()
    );
    if let Some(ref country) = args.country {
        println!("{}: {}", style("Declared origin").bold(), country);
    }
    println!("{}", style("─".repeat(60)).dim());
    println!(
        "   {}: {}",
        style("Supply chain").bold(),
        result.breakdown.supply_chain
    );
    println!(
        "   {}: {}",
        style("Geographic").bold(),
        result.breakdown.geographic
    );
    println!(
        "   {}: {}",
        style("Isotope").bold(),
        result.breakdown.isotope
    );

    if let Some(ref overlap) = result.overlap {
        println!();
        println!(
            "   Closest high-risk profile: {} ({:.1}% overlap, {:.2} SD away)",
            style(&overlap.closest_high_risk).cyan(),
            overlap.closest_overlap_percent,
            overlap.distance_sd
        );
        if overlap.separable {
            println!(
                "   {} Declared origin is isotopically separable",
                style("✓").green()
            );
        }
    }

    println!();
    println!(
        "   {}: {} ({})",
        style("Total").bold(),
        style(result.total).cyan(),
        tier_styled(result.tier)
    );
}
