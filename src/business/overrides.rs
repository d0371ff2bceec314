//! Override levers and resolution of effective projection inputs

use serde::{Deserialize, Serialize};
use super::{BusinessSnapshot, DebtTerms, OneTimeInvestment, StrategyParams};

/// Default revenue lift per unit of marketing spend
pub const DEFAULT_MARKETING_MULTIPLIER: f64 = 2.0;

/// Sparse set of levers that supersede or adjust snapshot/strategy values.
///
/// Every field is optional; an absent field falls back to the snapshot,
/// then the strategy, then a neutral default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_investment: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cash_balance: Option<f64>,

    /// Replaces the strategy growth rate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth_rate: Option<f64>,
    /// Replaces the strategy cost rate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_rate: Option<f64>,
    /// Added on top of the effective growth rate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth_rate_delta: Option<f64>,
    /// Added on top of the effective cost rate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_rate_delta: Option<f64>,

    /// Replaces the snapshot debts entirely when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debts: Option<Vec<DebtTerms>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_time_investments: Option<Vec<OneTimeInvestment>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketing_per_period: Option<f64>,
    /// Fractional price change applied every period
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_delta_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketing_multiplier: Option<f64>,
}

impl Overrides {
    pub fn is_empty(&self) -> bool {
        *self == Overrides::default()
    }
}

/// Effective inputs after applying the override chain
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedInputs {
    pub revenue: f64,
    pub cost: f64,
    pub initial_investment: f64,
    pub cash_balance: f64,
    pub growth_rate: f64,
    pub cost_rate: f64,
    pub growth_rate_delta: f64,
    pub cost_rate_delta: f64,
    pub debts: Vec<DebtTerms>,
    pub one_time_investments: Vec<OneTimeInvestment>,
    pub marketing_per_period: f64,
    pub price_delta_percent: f64,
    pub marketing_multiplier: f64,
}

impl ResolvedInputs {
    /// Resolve overrides against the snapshot and strategy.
    /// Neither input is modified; debts and investments are cloned.
    pub fn resolve(business: &BusinessSnapshot, strategy: &StrategyParams, overrides: &Overrides) -> Self {
        Self {
            revenue: overrides.revenue.unwrap_or(business.revenue),
            cost: overrides.cost.unwrap_or(business.cost),
            initial_investment: overrides.initial_investment.unwrap_or(business.initial_investment),
            cash_balance: overrides.cash_balance.unwrap_or(business.cash_balance),
            growth_rate: overrides.growth_rate.unwrap_or(strategy.growth_rate),
            cost_rate: overrides.cost_rate.unwrap_or(strategy.cost_rate),
            growth_rate_delta: overrides.growth_rate_delta.unwrap_or(0.0),
            cost_rate_delta: overrides.cost_rate_delta.unwrap_or(0.0),
            debts: overrides.debts.clone().unwrap_or_else(|| business.debts.clone()),
            one_time_investments: overrides.one_time_investments.clone().unwrap_or_default(),
            marketing_per_period: overrides.marketing_per_period.unwrap_or(0.0),
            price_delta_percent: overrides.price_delta_percent.unwrap_or(0.0),
            marketing_multiplier: overrides.marketing_multiplier.unwrap_or(DEFAULT_MARKETING_MULTIPLIER),
        }
    }

    /// Total one-time investment scheduled for exactly this period
    pub fn investment_for_period(&self, period: u32) -> f64 {
        self.one_time_investments
            .iter()
            .filter(|inv| inv.period == period)
            .map(|inv| inv.amount)
            .sum()
    }
}
