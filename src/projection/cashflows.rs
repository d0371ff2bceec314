//! Result document structures for projections

use crate::business::Overrides;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::io::Write;
use super::debt::DebtBalance;

/// Version of the serialized result layout
pub const RESULT_SCHEMA_VERSION: u32 = 1;

/// Outputs of one simulated period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodRecord {
    /// 1-indexed
    pub period: u32,
    pub revenue: f64,
    pub cost: f64,
    /// Revenue minus cost, before financing and investments
    pub profit: f64,
    pub investment: f64,
    pub debt_payment: f64,
    pub net_cash_flow: f64,
    pub cash_balance: f64,
    pub cumulative_profit: f64,
    pub debts: Vec<DebtBalance>,
}

/// Inputs a result was produced from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationMeta {
    pub schema_version: u32,
    pub periods: u32,
    pub scenario: String,
    pub overrides: Overrides,
    pub initial_investment: f64,
    pub starting_revenue: f64,
    pub starting_cost: f64,
    pub starting_cash: f64,
    pub stochastic: bool,
    pub seed: Option<u64>,
}

/// Summary KPIs over the whole horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationKpis {
    /// Sum of pre-financing profit
    pub total_net_profit: f64,
    #[serde(rename = "ROI")]
    pub roi: Option<f64>,
    #[serde(rename = "IRR")]
    pub irr: Option<f64>,
    pub break_even_period: Option<u32>,
    pub risk_index: f64,
    pub profit_std_dev: f64,
    pub profit_mean: f64,
    /// `cash_flows[0]` is `-initial_investment`, then one entry per period
    pub cash_flows: Vec<f64>,
}

/// Complete projection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub meta: SimulationMeta,
    pub results: Vec<PeriodRecord>,
    pub kpis: SimulationKpis,
}

impl SimulationResult {
    /// Get summary statistics
    pub fn summary(&self) -> SimulationSummary {
        let last = self.results.last();
        SimulationSummary {
            total_periods: self.results.len() as u32,
            total_revenue: self.results.iter().map(|r| r.revenue).sum(),
            total_cost: self.results.iter().map(|r| r.cost).sum(),
            total_investment: self.results.iter().map(|r| r.investment).sum(),
            total_debt_paid: self.results.iter().map(|r| r.debt_payment).sum(),
            final_cash: last.map(|r| r.cash_balance).unwrap_or(self.meta.starting_cash),
            final_cumulative_profit: last.map(|r| r.cumulative_profit).unwrap_or(0.0),
            debt_remaining: last
                .map(|r| r.debts.iter().map(|d| d.remaining).sum())
                .unwrap_or(0.0),
        }
    }

    /// Write one flat CSV row per period
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for record in &self.results {
            csv_writer.serialize(CsvRow::from(record))?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub total_periods: u32,
    pub total_revenue: f64,
    pub total_cost: f64,
    pub total_investment: f64,
    pub total_debt_paid: f64,
    pub final_cash: f64,
    pub final_cumulative_profit: f64,
    pub debt_remaining: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CsvRow {
    period: u32,
    revenue: f64,
    cost: f64,
    profit: f64,
    investment: f64,
    debt_payment: f64,
    net_cash_flow: f64,
    cash_balance: f64,
    cumulative_profit: f64,
    debt_remaining: f64,
}

impl From<&PeriodRecord> for CsvRow {
    fn from(record: &PeriodRecord) -> Self {
        Self {
            period: record.period,
            revenue: record.revenue,
            cost: record.cost,
            profit: record.profit,
            investment: record.investment,
            debt_payment: record.debt_payment,
            net_cash_flow: record.net_cash_flow,
            cash_balance: record.cash_balance,
            cumulative_profit: record.cumulative_profit,
            debt_remaining: record.debts.iter().map(|d| d.remaining).sum(),
        }
    }
}

/// One period of the simple growth-only projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimplePeriodRecord {
    pub period: u32,
    pub revenue: f64,
    pub cost: f64,
    pub profit: f64,
}
