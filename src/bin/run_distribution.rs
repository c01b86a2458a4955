//! Compute a waterfall distribution from a capital-account ledger CSV
//!
//! Outputs a per-investor allocation CSV and prints a tier-by-tier summary.

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use waterfall_engine::format::{format_currency, format_percent};
use waterfall_engine::structure::structure_by_name;
use waterfall_engine::{account, WaterfallEngine, WaterfallStructure};

#[derive(Parser, Debug)]
#[command(name = "run_distribution", about = "Waterfall distribution calculator")]
struct Args {
    /// Capital account ledger CSV
    #[arg(long)]
    accounts: PathBuf,

    /// Cash amount to distribute
    #[arg(long)]
    amount: f64,

    /// Built-in template name (standard | american)
    #[arg(long, default_value = "standard")]
    template: String,

    /// JSON structure file; overrides --template
    #[arg(long)]
    structure: Option<PathBuf>,

    /// Fund inception date
    #[arg(long, default_value = "2020-01-01")]
    fund_start: NaiveDate,

    /// Distribution event date (defaults to today)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Per-investor allocation output CSV
    #[arg(long, default_value = "distribution_output.csv")]
    output: PathBuf,

    /// Print the full distribution as JSON instead of the summary table
    #[arg(long)]
    json: bool,

    /// Additional amounts to preview alongside --amount (comma-separated)
    #[arg(long, value_delimiter = ',')]
    preview: Vec<f64>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    let accounts = account::load_accounts(&args.accounts)
        .map_err(|e| anyhow!("failed to load accounts from {}: {e}", args.accounts.display()))?;
    println!("Loaded {} capital accounts in {:?}", accounts.len(), start.elapsed());

    let structure: WaterfallStructure = match &args.structure {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open structure file {}", path.display()))?;
            serde_json::from_reader(file)
                .with_context(|| format!("failed to parse structure file {}", path.display()))?
        }
        None => structure_by_name(&args.template)
            .ok_or_else(|| anyhow!("unknown template '{}'", args.template))?,
    };

    let engine = WaterfallEngine::new(structure)?;
    let distribution_date = args.date.unwrap_or_else(|| chrono::Utc::now().date_naive());

    let calc_start = Instant::now();
    let dist = engine.distribute(args.amount, &accounts, args.fund_start, distribution_date)?;
    println!("Calculated distribution in {:?}", calc_start.elapsed());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&dist)?);
    } else {
        println!(
            "\nWaterfall: {} | Amount: {} | Date: {}",
            engine.structure().name,
            format_currency(dist.total_distributable),
            distribution_date,
        );
        println!(
            "{:<5} {:<22} {:>16} {:>16} {:>16} {:>16}",
            "Tier", "Name", "Distributed", "LP", "GP", "Remaining"
        );
        for tier in &dist.tier_distributions {
            println!(
                "{:<5} {:<22} {:>16} {:>16} {:>16} {:>16}",
                tier.order,
                tier.tier_name,
                format_currency(tier.amount_distributed),
                format_currency(tier.lp_amount),
                format_currency(tier.gp_amount),
                format_currency(tier.remaining_after),
            );
        }
        println!(
            "\nTo investors: {}  To GP: {}  Undistributed: {}",
            format_currency(dist.total_to_investors()),
            format_currency(dist.gp_allocation.total_amount),
            format_currency(dist.undistributed()),
        );
    }

    // Per-investor allocation CSV, one column per tier
    let mut file = File::create(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;
    let tier_ids: Vec<&str> = dist
        .tier_distributions
        .iter()
        .map(|t| t.tier_id.as_str())
        .collect();
    writeln!(
        file,
        "investor_id,investor_name,ownership_percent,{},total_allocation",
        tier_ids.join(",")
    )?;
    for alloc in &dist.investor_allocations {
        let tier_amounts: Vec<String> = alloc
            .tier_allocations
            .iter()
            .map(|t| format!("{:.2}", t.amount))
            .collect();
        writeln!(
            file,
            "{},{},{},{},{:.2}",
            alloc.investor_id,
            alloc.investor_name,
            format_percent(alloc.ownership_percent),
            tier_amounts.join(","),
            alloc.total_allocation,
        )?;
    }
    println!("Output written to {}", args.output.display());

    if !args.preview.is_empty() {
        let previews =
            engine.preview_many(&args.preview, &accounts, args.fund_start, distribution_date)?;
        println!("\nPreview:");
        println!(
            "{:>16} {:>16} {:>16} {:>16}",
            "Amount", "To LPs", "To GP", "Undistributed"
        );
        for preview in &previews {
            println!(
                "{:>16} {:>16} {:>16} {:>16}",
                format_currency(preview.total_distributable),
                format_currency(preview.total_to_investors()),
                format_currency(preview.gp_allocation.total_amount),
                format_currency(preview.undistributed()),
            );
        }
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
