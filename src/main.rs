//! Business Projection CLI
//!
//! Command-line interface for running a single business projection

use anyhow::{Context, Result};
use business_projection::business::{load_records, Overrides, RecordBook};
use business_projection::{ScenarioRunner, SimulationRequest, SimulationStore};
use clap::Parser;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "business_projection", version, about = "Project a business's finances under a strategy")]
struct Cli {
    /// JSON file with business and strategy records
    #[arg(long)]
    records: Option<PathBuf>,

    /// JSON request file; flags below override its fields
    #[arg(long)]
    request: Option<PathBuf>,

    #[arg(long)]
    business: Option<String>,

    #[arg(long)]
    strategy: Option<String>,

    /// Scenario tag (startup, manufacturing, retail, generic)
    #[arg(long)]
    scenario: Option<String>,

    #[arg(long)]
    periods: Option<u32>,

    /// JSON file with override levers
    #[arg(long)]
    overrides: Option<PathBuf>,

    /// Apply revenue noise each period
    #[arg(long)]
    stochastic: bool,

    /// Seed for stochastic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Write per-period rows to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Store the result with its identifiers and write the store to this JSON file
    #[arg(long)]
    save: Option<PathBuf>,

    /// Print the full result document as JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn build_request(cli: &Cli) -> Result<SimulationRequest> {
    let mut request = match &cli.request {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening request {}", path.display()))?;
            serde_json::from_reader(file).with_context(|| format!("parsing request {}", path.display()))?
        }
        None => SimulationRequest::default(),
    };

    if let Some(business) = &cli.business {
        request.business_id = Some(business.clone());
    }
    if let Some(strategy) = &cli.strategy {
        request.strategy_id = Some(strategy.clone());
    }
    if let Some(scenario) = &cli.scenario {
        request.scenario = scenario.clone();
    }
    if let Some(periods) = cli.periods {
        request.periods = periods;
    }
    if let Some(path) = &cli.overrides {
        let file = File::open(path).with_context(|| format!("opening overrides {}", path.display()))?;
        let overrides: Overrides =
            serde_json::from_reader(file).with_context(|| format!("parsing overrides {}", path.display()))?;
        request.overrides = overrides;
    }
    if cli.stochastic {
        request.stochastic = true;
    }
    if cli.seed.is_some() {
        request.seed = cli.seed;
    }

    Ok(request)
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let request = build_request(&cli)?;
    if !request.overrides.is_empty() {
        log::info!("Applying overrides: {:?}", request.overrides);
    }

    let records = match &cli.records {
        Some(path) => load_records(path).with_context(|| format!("loading records {}", path.display()))?,
        None => RecordBook::new(),
    };

    let runner = ScenarioRunner::new(records);
    let mut store = SimulationStore::new();
    let stored = runner.run_and_store(&request, &mut store).context("simulation failed")?;
    let result = stored.result;

    if let Some(path) = &cli.save {
        store.save_to_path(path).with_context(|| format!("saving results to {}", path.display()))?;
        log::info!("Saved simulation {} to {}", stored.id, path.display());
    }

    if let Some(path) = &cli.csv {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        result.write_csv(BufWriter::new(file))?;
    }

    if cli.json {
        println!("{}", result.to_json_pretty()?);
        return Ok(());
    }

    println!("Business Projection v0.1.0");
    println!("==========================\n");
    println!("Scenario: {}", result.meta.scenario);
    println!("  Starting Revenue: ${:.2}", result.meta.starting_revenue);
    println!("  Starting Cost: ${:.2}", result.meta.starting_cost);
    println!("  Initial Investment: ${:.2}", result.meta.initial_investment);
    println!();

    println!("{:>6} {:>14} {:>14} {:>14} {:>12} {:>12} {:>14} {:>14}",
        "Period", "Revenue", "Cost", "Profit", "Investment", "DebtPmt", "Cash", "CumProfit");
    println!("{}", "-".repeat(108));

    for row in &result.results {
        println!("{:>6} {:>14.2} {:>14.2} {:>14.2} {:>12.2} {:>12.2} {:>14.2} {:>14.2}",
            row.period,
            row.revenue,
            row.cost,
            row.profit,
            row.investment,
            row.debt_payment,
            row.cash_balance,
            row.cumulative_profit,
        );
    }

    let kpis = &result.kpis;
    let summary = result.summary();
    println!("\nKPIs:");
    println!("  Total Net Profit: ${:.2}", kpis.total_net_profit);
    println!("  ROI: {}", format_ratio(kpis.roi));
    println!("  IRR (per period): {}", format_ratio(kpis.irr));
    match kpis.break_even_period {
        Some(period) => println!("  Break-even Period: {}", period),
        None => println!("  Break-even Period: not reached"),
    }
    println!("  Risk Index (profit std dev): {:.2}", kpis.risk_index);
    println!("  Mean Profit: ${:.2}", kpis.profit_mean);
    println!("  Final Cash: ${:.2}", summary.final_cash);
    println!("  Total Debt Paid: ${:.2}", summary.total_debt_paid);
    println!("  Debt Remaining: ${:.2}", summary.debt_remaining);

    if let Some(path) = &cli.csv {
        println!("\nPer-period results written to: {}", path.display());
    }

    Ok(())
}

fn format_ratio(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}%", v * 100.0),
        None => "n/a".to_string(),
    }
}
