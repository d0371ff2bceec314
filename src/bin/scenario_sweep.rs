//! Run one request under every registered scenario and compare KPIs
//!
//! Accepts config via environment variables:
//!   RECORDS_PATH, BUSINESS_ID, STRATEGY_ID, PERIODS, STOCHASTIC, SEED
//! Pass --json to print the full result documents instead of the table.

use anyhow::{Context, Result};
use business_projection::business::{load_records, RecordBook};
use business_projection::{ScenarioRunner, SimulationRequest};
use std::env;
use std::time::Instant;

struct SweepRow {
    scenario: String,
    total_net_profit: f64,
    roi: Option<f64>,
    irr: Option<f64>,
    break_even_period: Option<u32>,
    risk_index: f64,
    final_cash: f64,
}

fn main() -> Result<()> {
    env_logger::init();

    let json_output = env::args().any(|arg| arg == "--json");
    let start = Instant::now();

    let periods: u32 = env::var("PERIODS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(36);

    let seed: Option<u64> = env::var("SEED")
        .ok()
        .and_then(|s| s.parse().ok());

    let stochastic = env::var("STOCHASTIC")
        .map(|s| s == "1" || s.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    let records = match env::var("RECORDS_PATH") {
        Ok(path) => load_records(&path).with_context(|| format!("loading records {}", path))?,
        Err(_) => RecordBook::new(),
    };

    let request = SimulationRequest {
        business_id: env::var("BUSINESS_ID").ok(),
        strategy_id: env::var("STRATEGY_ID").ok(),
        periods,
        stochastic,
        seed,
        ..Default::default()
    };

    let runner = ScenarioRunner::new(records);
    let tags = runner.registry().tags();
    let results = runner.run_scenarios(&request, &tags).context("scenario sweep failed")?;

    let rows: Vec<SweepRow> = results
        .iter()
        .map(|result| SweepRow {
            scenario: result.meta.scenario.clone(),
            total_net_profit: result.kpis.total_net_profit,
            roi: result.kpis.roi,
            irr: result.kpis.irr,
            break_even_period: result.kpis.break_even_period,
            risk_index: result.kpis.risk_index,
            final_cash: result.summary().final_cash,
        })
        .collect();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    println!("Scenario sweep: {} scenarios x {} periods", rows.len(), periods);
    println!("{:>14} {:>16} {:>10} {:>10} {:>10} {:>14} {:>16}",
        "Scenario", "TotalProfit", "ROI", "IRR", "BreakEven", "RiskIndex", "FinalCash");
    println!("{}", "-".repeat(96));

    for row in &rows {
        println!("{:>14} {:>16.2} {:>10} {:>10} {:>10} {:>14.2} {:>16.2}",
            row.scenario,
            row.total_net_profit,
            row.roi.map(|v| format!("{:.4}", v)).unwrap_or_else(|| "n/a".to_string()),
            row.irr.map(|v| format!("{:.4}", v)).unwrap_or_else(|| "n/a".to_string()),
            row.break_even_period.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string()),
            row.risk_index,
            row.final_cash,
        );
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
