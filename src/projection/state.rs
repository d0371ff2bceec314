//! Running state carried from one period to the next

use crate::business::ResolvedInputs;
use super::debt::{DebtBalance, DebtState};

/// Working copies owned by a single projection run
#[derive(Debug, Clone)]
pub struct ProjectionState {
    /// Current period (1-indexed, 0 before the first advance)
    pub period: u32,

    pub revenue: f64,

    pub cost: f64,

    /// Cash after financing and investments
    pub cash: f64,

    /// Running sum of pre-financing profit
    pub cumulative_profit: f64,

    pub debts: Vec<DebtState>,
}

impl ProjectionState {
    /// Initialize state at projection start
    pub fn from_inputs(inputs: &ResolvedInputs) -> Self {
        Self {
            period: 0,
            revenue: inputs.revenue,
            cost: inputs.cost,
            cash: inputs.cash_balance,
            cumulative_profit: 0.0,
            debts: inputs.debts.iter().cloned().map(DebtState::new).collect(),
        }
    }

    pub fn advance_period(&mut self) {
        self.period += 1;
    }

    /// Value copies of every debt balance at this point
    pub fn debt_balances(&self) -> Vec<DebtBalance> {
        self.debts.iter().map(DebtState::balance).collect()
    }

    pub fn total_debt_remaining(&self) -> f64 {
        self.debts.iter().map(|d| d.remaining).sum()
    }
}
