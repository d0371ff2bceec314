//! Business and strategy records supplied to the projection engine

use serde::{Deserialize, Serialize};

/// Terms of a single debt facility.
///
/// `annual_rate` is applied as a flat per-period rate. No periods-per-year
/// conversion happens anywhere in the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtTerms {
    /// Amount borrowed
    pub principal: f64,

    /// Interest rate charged per period
    #[serde(default)]
    pub annual_rate: f64,

    /// Number of periods over which the payment is levelled
    #[serde(default)]
    pub periods_to_repay: i32,

    /// First period (1-indexed) in which the debt is serviced
    #[serde(default = "default_start_period")]
    pub start_period: u32,
}

fn default_start_period() -> u32 {
    1
}

impl DebtTerms {
    pub fn new(principal: f64, annual_rate: f64, periods_to_repay: i32, start_period: u32) -> Self {
        Self {
            principal,
            annual_rate,
            periods_to_repay,
            start_period,
        }
    }
}

/// A one-off investment outflow booked in a single period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneTimeInvestment {
    /// Period (1-indexed) in which the outflow happens
    pub period: u32,
    pub amount: f64,
}

/// Financial snapshot of a business at the start of the projection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessSnapshot {
    /// Revenue per period
    #[serde(default)]
    pub revenue: f64,

    /// Cost per period
    #[serde(default)]
    pub cost: f64,

    /// Up-front investment (CF0 of the IRR series)
    #[serde(default)]
    pub initial_investment: f64,

    /// Opening cash balance
    #[serde(default)]
    pub cash_balance: f64,

    #[serde(default)]
    pub debts: Vec<DebtTerms>,
}

/// Growth assumptions of a strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyParams {
    /// Fractional revenue growth per period
    #[serde(default)]
    pub growth_rate: f64,

    /// Fractional cost growth per period
    #[serde(default)]
    pub cost_rate: f64,
}

impl StrategyParams {
    pub fn new(growth_rate: f64, cost_rate: f64) -> Self {
        Self { growth_rate, cost_rate }
    }
}
