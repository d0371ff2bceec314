//! Core projection engine for period-by-period business projections

use crate::business::{BusinessSnapshot, Overrides, ResolvedInputs, StrategyParams};
use crate::scenario::{ScenarioProfile, ScenarioRegistry, GENERIC_SCENARIO};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use super::cashflows::{
    PeriodRecord, SimplePeriodRecord, SimulationKpis, SimulationMeta, SimulationResult,
    RESULT_SCHEMA_VERSION,
};
use super::debt::service_debts;
use super::irr::compute_irr;
use super::kpi::{compute_break_even, compute_risk_index, compute_roi};
use super::state::ProjectionState;

/// Configuration for a projection run
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionConfig {
    /// Number of periods to project
    pub periods: u32,

    /// Scenario tag looked up in the registry
    pub scenario: String,

    /// Apply uniform revenue noise each period
    pub stochastic: bool,

    /// Seed for the noise source. Without one, stochastic runs draw from OS
    /// entropy and are not reproducible.
    pub seed: Option<u64>,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            periods: 12,
            scenario: GENERIC_SCENARIO.to_string(),
            stochastic: false,
            seed: None,
        }
    }
}

/// Main projection engine
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    profile: ScenarioProfile,
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Create an engine, resolving the configured scenario tag in `registry`
    pub fn new(registry: &ScenarioRegistry, config: ProjectionConfig) -> Self {
        let profile = registry.resolve(&config.scenario);
        Self { profile, config }
    }

    /// Create an engine with an explicit scenario profile
    pub fn with_profile(profile: ScenarioProfile, config: ProjectionConfig) -> Self {
        Self { profile, config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    pub fn profile(&self) -> ScenarioProfile {
        self.profile
    }

    /// Run the projection, seeding the noise source from `config.seed`
    pub fn project(
        &self,
        business: &BusinessSnapshot,
        strategy: &StrategyParams,
        overrides: &Overrides,
    ) -> SimulationResult {
        let mut rng = match self.config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        self.project_with_rng(business, strategy, overrides, &mut rng)
    }

    /// Run the projection drawing noise from the supplied random source
    pub fn project_with_rng<R: Rng + ?Sized>(
        &self,
        business: &BusinessSnapshot,
        strategy: &StrategyParams,
        overrides: &Overrides,
        rng: &mut R,
    ) -> SimulationResult {
        let inputs = ResolvedInputs::resolve(business, strategy, overrides);
        let mut state = ProjectionState::from_inputs(&inputs);

        log::info!(
            "Projecting {} periods (scenario={}, stochastic={}, debts={})",
            self.config.periods,
            self.config.scenario,
            self.config.stochastic,
            state.debts.len()
        );

        let capacity = self.config.periods as usize;
        let mut results = Vec::with_capacity(capacity);
        let mut cash_flows = Vec::with_capacity(capacity + 1);
        cash_flows.push(-inputs.initial_investment);

        for _period in 1..=self.config.periods {
            state.advance_period();
            let record = self.calculate_period(&inputs, &mut state, rng);
            cash_flows.push(record.net_cash_flow);
            results.push(record);
        }

        let kpis = Self::calculate_kpis(&results, cash_flows, inputs.initial_investment);

        log::info!(
            "Projection complete: total profit={:.2}, final cash={:.2}, debt remaining={:.2}, IRR={:?}, break-even={:?}",
            kpis.total_net_profit,
            state.cash,
            state.total_debt_remaining(),
            kpis.irr,
            kpis.break_even_period
        );

        SimulationResult {
            meta: SimulationMeta {
                schema_version: RESULT_SCHEMA_VERSION,
                periods: self.config.periods,
                scenario: self.config.scenario.clone(),
                overrides: overrides.clone(),
                initial_investment: inputs.initial_investment,
                starting_revenue: inputs.revenue,
                starting_cost: inputs.cost,
                starting_cash: inputs.cash_balance,
                stochastic: self.config.stochastic,
                seed: self.config.seed,
            },
            results,
            kpis,
        }
    }

    /// Advance revenue, cost, debts and cash by one period.
    /// The order of steps matters: each one compounds on the previous.
    fn calculate_period<R: Rng + ?Sized>(
        &self,
        inputs: &ResolvedInputs,
        state: &mut ProjectionState,
        rng: &mut R,
    ) -> PeriodRecord {
        let period = state.period;

        let growth_rate = inputs.growth_rate + inputs.growth_rate_delta + self.profile.growth_rate_boost;
        let cost_rate = inputs.cost_rate + inputs.cost_rate_delta;

        // Revenue: growth, then price change on the grown figure, then marketing lift
        state.revenue *= 1.0 + growth_rate;
        state.revenue *= 1.0 + inputs.price_delta_percent;
        if inputs.marketing_per_period > 0.0 {
            state.revenue += inputs.marketing_per_period * inputs.marketing_multiplier;
        }

        if self.config.stochastic {
            let u: f64 = rng.gen();
            let noise = (u * 2.0 - 1.0) * self.profile.cost_volatility * state.revenue;
            state.revenue = (state.revenue + noise).max(0.0);
        }

        // Marketing spend is booked in full as cost
        state.cost *= 1.0 + cost_rate;
        state.cost += inputs.marketing_per_period;

        let investment = inputs.investment_for_period(period);
        let profit = state.revenue - state.cost;
        let debt_payment = service_debts(&mut state.debts, period);
        let net_cash_flow = profit - investment - debt_payment;

        state.cash += net_cash_flow;
        state.cumulative_profit += profit;

        log::debug!(
            "Period {}: revenue={:.2} cost={:.2} profit={:.2} investment={:.2} debt_payment={:.2} cash={:.2}",
            period,
            state.revenue,
            state.cost,
            profit,
            investment,
            debt_payment,
            state.cash
        );

        PeriodRecord {
            period,
            revenue: state.revenue,
            cost: state.cost,
            profit,
            investment,
            debt_payment,
            net_cash_flow,
            cash_balance: state.cash,
            cumulative_profit: state.cumulative_profit,
            debts: state.debt_balances(),
        }
    }

    fn calculate_kpis(results: &[PeriodRecord], cash_flows: Vec<f64>, initial_investment: f64) -> SimulationKpis {
        let profits: Vec<f64> = results.iter().map(|r| r.profit).collect();
        let cumulative: Vec<f64> = results.iter().map(|r| r.cumulative_profit).collect();

        let total_net_profit: f64 = profits.iter().sum();
        let risk = compute_risk_index(&profits);

        SimulationKpis {
            total_net_profit,
            roi: compute_roi(total_net_profit, initial_investment),
            irr: compute_irr(&cash_flows),
            break_even_period: compute_break_even(&cumulative, initial_investment),
            risk_index: risk.risk_index,
            profit_std_dev: risk.std,
            profit_mean: risk.mean,
            cash_flows,
        }
    }
}

/// Growth-only projection: no debts, investments, marketing, pricing or noise.
pub fn run_simulation(
    business: &BusinessSnapshot,
    strategy: &StrategyParams,
    periods: u32,
) -> Vec<SimplePeriodRecord> {
    let mut revenue = business.revenue;
    let mut cost = business.cost;

    (1..=periods)
        .map(|period| {
            revenue *= 1.0 + strategy.growth_rate;
            cost *= 1.0 + strategy.cost_rate;
            SimplePeriodRecord {
                period,
                revenue,
                cost,
                profit: revenue - cost,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::business::{DebtTerms, OneTimeInvestment};
    use crate::projection::irr::npv_at_rate;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use proptest::prelude::*;

    fn test_business() -> BusinessSnapshot {
        BusinessSnapshot {
            revenue: 1000.0,
            cost: 500.0,
            initial_investment: 0.0,
            cash_balance: 0.0,
            debts: Vec::new(),
        }
    }

    fn engine(periods: u32, scenario: &str, stochastic: bool, seed: Option<u64>) -> ProjectionEngine {
        let config = ProjectionConfig {
            periods,
            scenario: scenario.to_string(),
            stochastic,
            seed,
        };
        ProjectionEngine::new(&ScenarioRegistry::with_defaults(), config)
    }

    #[test]
    fn test_simple_simulation() {
        let results = run_simulation(&test_business(), &StrategyParams::new(0.1, 0.05), 2);

        assert_eq!(results.len(), 2);
        assert_relative_eq!(results[0].revenue, 1100.0, max_relative = 1e-12);
        assert_relative_eq!(results[0].cost, 525.0, max_relative = 1e-12);
        assert_relative_eq!(results[0].profit, 575.0, max_relative = 1e-12);
        assert_relative_eq!(results[1].revenue, 1210.0, max_relative = 1e-12);
        assert_relative_eq!(results[1].cost, 551.25, max_relative = 1e-12);
        assert_relative_eq!(results[1].profit, 658.75, max_relative = 1e-12);
    }

    #[test]
    fn test_advanced_matches_simple_when_levers_neutral() {
        let business = test_business();
        let strategy = StrategyParams::new(0.1, 0.05);

        let simple = run_simulation(&business, &strategy, 24);
        let advanced = engine(24, GENERIC_SCENARIO, false, None).project(&business, &strategy, &Overrides::default());

        assert_eq!(advanced.results.len(), simple.len());
        for (a, s) in advanced.results.iter().zip(&simple) {
            assert_eq!(a.period, s.period);
            assert_eq!(a.revenue, s.revenue);
            assert_eq!(a.cost, s.cost);
            assert_eq!(a.profit, s.profit);
        }
    }

    #[test]
    fn test_period_numbering_and_cashflow_length() {
        let result = engine(7, GENERIC_SCENARIO, false, None)
            .project(&test_business(), &StrategyParams::new(0.02, 0.01), &Overrides::default());

        assert_eq!(result.results.len(), 7);
        assert_eq!(result.kpis.cash_flows.len(), 8);
        for (idx, record) in result.results.iter().enumerate() {
            assert_eq!(record.period, idx as u32 + 1);
        }
    }

    #[test]
    fn test_zero_periods() {
        let result = engine(0, GENERIC_SCENARIO, false, None)
            .project(&test_business(), &StrategyParams::default(), &Overrides::default());

        assert!(result.results.is_empty());
        assert_eq!(result.kpis.cash_flows, vec![0.0]);
        assert_eq!(result.kpis.total_net_profit, 0.0);
        assert_eq!(result.kpis.break_even_period, None);
    }

    #[test]
    fn test_scenario_boost_applies_to_growth() {
        let registry = ScenarioRegistry::with_defaults();
        let boost = registry.resolve("startup").growth_rate_boost;

        let result = engine(1, "startup", false, None)
            .project(&test_business(), &StrategyParams::new(0.1, 0.0), &Overrides::default());

        assert_relative_eq!(result.results[0].revenue, 1000.0 * (1.1 + boost), max_relative = 1e-12);
        assert_eq!(result.meta.scenario, "startup");
    }

    #[test]
    fn test_explicit_profile() {
        let config = ProjectionConfig { periods: 1, ..Default::default() };
        let e = ProjectionEngine::with_profile(ScenarioProfile::new(0.2, 0.0), config);
        assert_eq!(e.profile().growth_rate_boost, 0.2);
        assert_eq!(e.config().periods, 1);

        let result = e.project(&test_business(), &StrategyParams::default(), &Overrides::default());
        assert_relative_eq!(result.results[0].revenue, 1200.0, max_relative = 1e-12);
    }

    #[test]
    fn test_pricing_and_marketing_levers() {
        let overrides = Overrides {
            price_delta_percent: Some(0.05),
            marketing_per_period: Some(100.0),
            growth_rate_delta: Some(0.1),
            cost_rate_delta: Some(0.05),
            ..Default::default()
        };
        let result = engine(1, GENERIC_SCENARIO, false, None)
            .project(&test_business(), &StrategyParams::default(), &overrides);
        let record = &result.results[0];

        // 1000 * 1.1 * 1.05 + 100 * 2
        assert_relative_eq!(record.revenue, 1355.0, max_relative = 1e-12);
        // 500 * 1.05 + 100
        assert_relative_eq!(record.cost, 625.0, max_relative = 1e-12);
        assert_relative_eq!(record.profit, 730.0, max_relative = 1e-12);
    }

    #[test]
    fn test_non_positive_marketing_adds_no_revenue() {
        let overrides = Overrides {
            marketing_per_period: Some(0.0),
            marketing_multiplier: Some(5.0),
            ..Default::default()
        };
        let result = engine(1, GENERIC_SCENARIO, false, None)
            .project(&test_business(), &StrategyParams::default(), &overrides);
        assert_eq!(result.results[0].revenue, 1000.0);
        assert_eq!(result.results[0].cost, 500.0);
    }

    #[test]
    fn test_investments_debt_and_cash() {
        let business = BusinessSnapshot {
            revenue: 1000.0,
            cost: 500.0,
            initial_investment: 1000.0,
            cash_balance: 200.0,
            debts: vec![DebtTerms::new(1200.0, 0.0, 4, 2)],
        };
        let overrides = Overrides {
            one_time_investments: Some(vec![OneTimeInvestment { period: 3, amount: 400.0 }]),
            ..Default::default()
        };
        let result = engine(4, GENERIC_SCENARIO, false, None)
            .project(&business, &StrategyParams::default(), &overrides);

        let payments: Vec<f64> = result.results.iter().map(|r| r.debt_payment).collect();
        assert_eq!(payments, vec![0.0, 300.0, 300.0, 300.0]);

        let investments: Vec<f64> = result.results.iter().map(|r| r.investment).collect();
        assert_eq!(investments, vec![0.0, 0.0, 400.0, 0.0]);

        let net: Vec<f64> = result.results.iter().map(|r| r.net_cash_flow).collect();
        assert_eq!(net, vec![500.0, 200.0, -200.0, 200.0]);
        assert_eq!(result.results[3].cash_balance, 200.0 + 700.0);

        // Cumulative profit ignores financing
        assert_eq!(result.results[3].cumulative_profit, 2000.0);
        assert_eq!(result.kpis.total_net_profit, 2000.0);
        assert_eq!(result.kpis.cash_flows, vec![-1000.0, 500.0, 200.0, -200.0, 200.0]);
        assert_eq!(result.kpis.roi, Some(2.0));
        assert_eq!(result.kpis.break_even_period, Some(2));
        // IRR is taken over CF0 plus every period: NPV vanishes at it
        let irr = result.kpis.irr.unwrap();
        assert!(irr < 0.0, "flows sum to -300, expected negative IRR, got {}", irr);
        assert_abs_diff_eq!(npv_at_rate(&result.kpis.cash_flows, irr), 0.0, epsilon = 1e-4);

        // Balances are copies taken at the time of each period
        let remaining: Vec<f64> = result.results.iter().map(|r| r.debts[0].remaining).collect();
        assert_eq!(remaining, vec![1200.0, 900.0, 600.0, 300.0]);
    }

    #[test]
    fn test_overridden_debts_replace_snapshot_debts() {
        let business = BusinessSnapshot {
            debts: vec![DebtTerms::new(5000.0, 0.02, 10, 1)],
            ..test_business()
        };
        let overrides = Overrides {
            debts: Some(Vec::new()),
            ..Default::default()
        };
        let result = engine(3, GENERIC_SCENARIO, false, None)
            .project(&business, &StrategyParams::default(), &overrides);

        assert!(result.results.iter().all(|r| r.debts.is_empty() && r.debt_payment == 0.0));
        // Caller's snapshot is untouched
        assert_eq!(business.debts[0].principal, 5000.0);
    }

    #[test]
    fn test_no_investment_gives_null_roi_and_break_even() {
        let result = engine(5, GENERIC_SCENARIO, false, None)
            .project(&test_business(), &StrategyParams::new(0.1, 0.05), &Overrides::default());

        assert_eq!(result.kpis.roi, None);
        assert_eq!(result.kpis.break_even_period, None);
        // All flows non-negative: no sign change, IRR undetermined
        assert_eq!(result.kpis.irr, None);
    }

    #[test]
    fn test_deterministic_runs_are_identical() {
        let overrides = Overrides {
            marketing_per_period: Some(50.0),
            debts: Some(vec![DebtTerms::new(2000.0, 0.015, 8, 1)]),
            ..Default::default()
        };
        let e = engine(12, "retail", false, None);
        let first = serde_json::to_vec(&e.project(&test_business(), &StrategyParams::new(0.03, 0.02), &overrides)).unwrap();
        let second = serde_json::to_vec(&e.project(&test_business(), &StrategyParams::new(0.03, 0.02), &overrides)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_seeded_stochastic_runs_reproduce() {
        let e = engine(12, "startup", true, Some(7));
        let first = e.project(&test_business(), &StrategyParams::new(0.05, 0.02), &Overrides::default());
        let second = e.project(&test_business(), &StrategyParams::new(0.05, 0.02), &Overrides::default());
        assert_eq!(first, second);
        assert_eq!(first.meta.seed, Some(7));
        assert!(first.meta.stochastic);

        let other = engine(12, "startup", true, Some(8))
            .project(&test_business(), &StrategyParams::new(0.05, 0.02), &Overrides::default());
        assert_ne!(first.results, other.results);
    }

    #[test]
    fn test_noise_is_bounded_by_volatility() {
        let registry = ScenarioRegistry::with_defaults();
        let volatility = registry.resolve("startup").cost_volatility;
        let result = engine(1, "startup", true, Some(42))
            .project(&test_business(), &StrategyParams::default(), &Overrides::default());

        let revenue = result.results[0].revenue;
        assert!(revenue >= 1000.0 * (1.0 - volatility) - 1e-9);
        assert!(revenue <= 1000.0 * (1.0 + volatility) + 1e-9);
    }

    #[test]
    fn test_injected_rng() {
        let e = engine(6, "manufacturing", true, None);
        let mut rng_a = ChaCha8Rng::seed_from_u64(99);
        let mut rng_b = ChaCha8Rng::seed_from_u64(99);
        let a = e.project_with_rng(&test_business(), &StrategyParams::default(), &Overrides::default(), &mut rng_a);
        let b = e.project_with_rng(&test_business(), &StrategyParams::default(), &Overrides::default(), &mut rng_b);
        assert_eq!(a.results, b.results);
    }

    proptest! {
        #[test]
        fn prop_projection_invariants(
            periods in 1u32..40,
            revenue in 0.0f64..1_000_000.0,
            cost in 0.0f64..1_000_000.0,
            growth in -0.5f64..0.5,
            cost_rate in -0.5f64..0.5,
            principal in 0.0f64..100_000.0,
            rate in 0.0f64..0.2,
            term in 1i32..60,
            start in 1u32..10,
            investment in 0.0f64..50_000.0,
        ) {
            let business = BusinessSnapshot {
                revenue,
                cost,
                initial_investment: investment,
                cash_balance: 0.0,
                debts: vec![DebtTerms::new(principal, rate, term, start)],
            };
            let result = engine(periods, GENERIC_SCENARIO, false, None)
                .project(&business, &StrategyParams::new(growth, cost_rate), &Overrides::default());

            prop_assert_eq!(result.results.len(), periods as usize);
            prop_assert_eq!(result.kpis.cash_flows.len(), periods as usize + 1);
            prop_assert_eq!(result.kpis.cash_flows[0], -investment);

            let mut running = 0.0;
            let mut previous_remaining = principal;
            for (idx, record) in result.results.iter().enumerate() {
                prop_assert_eq!(record.period, idx as u32 + 1);
                running += record.profit;
                prop_assert_eq!(record.cumulative_profit, running);

                let remaining = record.debts[0].remaining;
                prop_assert!(remaining >= 0.0);
                prop_assert!(remaining <= previous_remaining);
                previous_remaining = remaining;
            }
        }
    }
}
