//! Scenario registry and runner
//!
//! The runner resolves business/strategy identifiers once through a
//! [`RecordLookup`], then runs any number of projections over those inputs.

use crate::business::{BusinessSnapshot, Overrides, RecordLookup, StrategyParams};
use crate::error::{RecordKind, Result, SimulationError};
use crate::projection::{ProjectionConfig, ProjectionEngine, SimulationResult};
use crate::store::{SimulationStore, StoredSimulation};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tag of the fallback scenario
pub const GENERIC_SCENARIO: &str = "generic";

/// Growth and volatility adjustments of a scenario
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioProfile {
    /// Added to the strategy growth rate every period
    pub growth_rate_boost: f64,
    /// Amplitude of the uniform revenue noise in stochastic runs
    pub cost_volatility: f64,
}

impl ScenarioProfile {
    pub const fn new(growth_rate_boost: f64, cost_volatility: f64) -> Self {
        Self { growth_rate_boost, cost_volatility }
    }
}

/// Mapping from scenario tag to profile. Always contains `generic`.
#[derive(Debug, Clone)]
pub struct ScenarioRegistry {
    profiles: BTreeMap<String, ScenarioProfile>,
}

impl ScenarioRegistry {
    /// Registry holding only the generic profile
    pub fn new() -> Self {
        let mut profiles = BTreeMap::new();
        profiles.insert(GENERIC_SCENARIO.to_string(), ScenarioProfile::new(0.0, 0.05));
        Self { profiles }
    }

    /// Built-in startup, manufacturing, retail and generic profiles
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("startup", ScenarioProfile::new(0.05, 0.2));
        registry.register("manufacturing", ScenarioProfile::new(0.01, 0.05));
        registry.register("retail", ScenarioProfile::new(0.02, 0.1));
        registry
    }

    /// Add or replace a profile
    pub fn register(&mut self, tag: impl Into<String>, profile: ScenarioProfile) {
        self.profiles.insert(tag.into(), profile);
    }

    /// Profile for `tag`, falling back to generic for unknown tags
    pub fn resolve(&self, tag: &str) -> ScenarioProfile {
        match self.profiles.get(tag) {
            Some(profile) => *profile,
            None => {
                log::warn!("Unknown scenario '{}', using {}", tag, GENERIC_SCENARIO);
                self.generic()
            }
        }
    }

    pub fn generic(&self) -> ScenarioProfile {
        self.profiles
            .get(GENERIC_SCENARIO)
            .copied()
            .unwrap_or(ScenarioProfile::new(0.0, 0.05))
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.profiles.contains_key(tag)
    }

    /// Registered tags in sorted order
    pub fn tags(&self) -> Vec<&str> {
        self.profiles.keys().map(String::as_str).collect()
    }
}

impl Default for ScenarioRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Request document accepted by the runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRequest {
    #[serde(default)]
    pub business_id: Option<String>,

    #[serde(default)]
    pub strategy_id: Option<String>,

    #[serde(default = "default_scenario")]
    pub scenario: String,

    #[serde(default = "default_periods")]
    pub periods: u32,

    #[serde(default)]
    pub overrides: Overrides,

    #[serde(default)]
    pub stochastic: bool,

    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_scenario() -> String {
    GENERIC_SCENARIO.to_string()
}

fn default_periods() -> u32 {
    12
}

impl Default for SimulationRequest {
    fn default() -> Self {
        Self {
            business_id: None,
            strategy_id: None,
            scenario: default_scenario(),
            periods: default_periods(),
            overrides: Overrides::default(),
            stochastic: false,
            seed: None,
        }
    }
}

impl SimulationRequest {
    pub fn config(&self) -> ProjectionConfig {
        ProjectionConfig {
            periods: self.periods,
            scenario: self.scenario.clone(),
            stochastic: self.stochastic,
            seed: self.seed,
        }
    }
}

/// Runs projections against records supplied by a lookup
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(load_records("records.json")?);
/// let request = SimulationRequest {
///     business_id: Some("acme".into()),
///     strategy_id: Some("expand".into()),
///     ..Default::default()
/// };
/// let result = runner.run(&request)?;
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner<L> {
    records: L,
    registry: ScenarioRegistry,
}

impl<L> ScenarioRunner<L>
where
    L: RecordLookup<BusinessSnapshot> + RecordLookup<StrategyParams>,
{
    /// Create runner with the built-in scenario registry
    pub fn new(records: L) -> Self {
        Self::with_registry(records, ScenarioRegistry::with_defaults())
    }

    pub fn with_registry(records: L, registry: ScenarioRegistry) -> Self {
        Self { records, registry }
    }

    pub fn registry(&self) -> &ScenarioRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ScenarioRegistry {
        &mut self.registry
    }

    /// Resolve the request's identifiers. Absent identifiers give empty
    /// records; supplied ones that do not resolve are an error.
    pub fn resolve_inputs(&self, request: &SimulationRequest) -> Result<(BusinessSnapshot, StrategyParams)> {
        let business = match &request.business_id {
            Some(id) => RecordLookup::<BusinessSnapshot>::fetch(&self.records, id)
                .ok_or_else(|| SimulationError::not_found(RecordKind::Business, id))?,
            None => BusinessSnapshot::default(),
        };
        let strategy = match &request.strategy_id {
            Some(id) => RecordLookup::<StrategyParams>::fetch(&self.records, id)
                .ok_or_else(|| SimulationError::not_found(RecordKind::Strategy, id))?,
            None => StrategyParams::default(),
        };
        Ok((business, strategy))
    }

    /// Run a single projection
    pub fn run(&self, request: &SimulationRequest) -> Result<SimulationResult> {
        let (business, strategy) = self.resolve_inputs(request)?;
        let engine = ProjectionEngine::new(&self.registry, request.config());
        Ok(engine.project(&business, &strategy, &request.overrides))
    }

    /// Run the same request under several scenarios in parallel.
    /// Results come back in the order of `tags`.
    pub fn run_scenarios(&self, request: &SimulationRequest, tags: &[&str]) -> Result<Vec<SimulationResult>> {
        if tags.is_empty() {
            return Err(SimulationError::InvalidRequest("no scenarios given".to_string()));
        }
        let (business, strategy) = self.resolve_inputs(request)?;
        let registry = &self.registry;

        let results = tags
            .par_iter()
            .map(|tag| {
                let config = ProjectionConfig {
                    scenario: tag.to_string(),
                    ..request.config()
                };
                ProjectionEngine::new(registry, config).project(&business, &strategy, &request.overrides)
            })
            .collect();

        Ok(results)
    }

    /// Run a projection and persist it alongside the identifiers used
    pub fn run_and_store(&self, request: &SimulationRequest, store: &mut SimulationStore) -> Result<StoredSimulation> {
        let result = self.run(request)?;
        Ok(store.save(request.business_id.clone(), request.strategy_id.clone(), result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::business::RecordBook;

    fn test_records() -> RecordBook {
        let mut book = RecordBook::new();
        book.insert_business(
            "acme",
            BusinessSnapshot {
                revenue: 1000.0,
                cost: 500.0,
                initial_investment: 1500.0,
                cash_balance: 100.0,
                debts: Vec::new(),
            },
        );
        book.insert_strategy("expand", StrategyParams::new(0.1, 0.05));
        book
    }

    fn test_request() -> SimulationRequest {
        SimulationRequest {
            business_id: Some("acme".to_string()),
            strategy_id: Some("expand".to_string()),
            periods: 6,
            ..Default::default()
        }
    }

    #[test]
    fn test_registry_fallback() {
        let registry = ScenarioRegistry::with_defaults();
        assert!(registry.contains("startup"));
        assert_eq!(registry.resolve("unheard-of"), registry.generic());
        assert_eq!(registry.tags(), vec!["generic", "manufacturing", "retail", "startup"]);
    }

    #[test]
    fn test_register_custom_and_replace_generic() {
        let mut registry = ScenarioRegistry::new();
        registry.register("biotech", ScenarioProfile::new(0.08, 0.3));
        registry.register(GENERIC_SCENARIO, ScenarioProfile::new(0.0, 0.01));

        assert_eq!(registry.resolve("biotech"), ScenarioProfile::new(0.08, 0.3));
        assert_eq!(registry.resolve("retail"), ScenarioProfile::new(0.0, 0.01));
    }

    #[test]
    fn test_run_resolves_records() {
        let runner = ScenarioRunner::new(test_records());
        let result = runner.run(&test_request()).unwrap();

        assert_eq!(result.results.len(), 6);
        assert_eq!(result.meta.initial_investment, 1500.0);
        assert_eq!(result.meta.starting_cash, 100.0);
        assert!(result.kpis.roi.is_some());
    }

    #[test]
    fn test_missing_business_is_not_found() {
        let runner = ScenarioRunner::new(test_records());
        let request = SimulationRequest {
            business_id: Some("globex".to_string()),
            ..test_request()
        };

        match runner.run(&request) {
            Err(SimulationError::NotFound { kind, id }) => {
                assert_eq!(kind, RecordKind::Business);
                assert_eq!(id, "globex");
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_strategy_is_not_found() {
        let runner = ScenarioRunner::new(test_records());
        let request = SimulationRequest {
            strategy_id: Some("retreat".to_string()),
            ..test_request()
        };
        assert!(matches!(
            runner.run(&request),
            Err(SimulationError::NotFound { kind: RecordKind::Strategy, .. })
        ));
    }

    #[test]
    fn test_absent_ids_use_overrides() {
        let runner = ScenarioRunner::new(RecordBook::new());
        let request = SimulationRequest {
            periods: 2,
            overrides: Overrides {
                revenue: Some(1000.0),
                cost: Some(500.0),
                growth_rate: Some(0.1),
                cost_rate: Some(0.05),
                ..Default::default()
            },
            ..Default::default()
        };
        let result = runner.run(&request).unwrap();

        approx::assert_relative_eq!(result.results[1].profit, 658.75, max_relative = 1e-12);
        assert_eq!(result.meta.overrides, request.overrides);
    }

    #[test]
    fn test_run_scenarios_keeps_order() {
        let runner = ScenarioRunner::new(test_records());
        let tags = ["startup", "generic", "retail"];
        let results = runner.run_scenarios(&test_request(), &tags).unwrap();

        assert_eq!(results.len(), 3);
        for (result, tag) in results.iter().zip(tags) {
            assert_eq!(result.meta.scenario, tag);
        }
        // Startup boost grows revenue faster than generic
        assert!(results[0].results[5].revenue > results[1].results[5].revenue);
    }

    #[test]
    fn test_run_scenarios_requires_tags() {
        let runner = ScenarioRunner::new(test_records());
        assert!(matches!(
            runner.run_scenarios(&test_request(), &[]),
            Err(SimulationError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_run_and_store() {
        let runner = ScenarioRunner::new(test_records());
        let mut store = SimulationStore::new();
        let stored = runner.run_and_store(&test_request(), &mut store).unwrap();

        assert_eq!(stored.business_id.as_deref(), Some("acme"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(stored.id).map(|s| &s.result), Some(&stored.result));
    }

    #[test]
    fn test_request_from_json_defaults() {
        let request: SimulationRequest = serde_json::from_str(r#"{"businessId": "acme"}"#).unwrap();
        assert_eq!(request.scenario, GENERIC_SCENARIO);
        assert_eq!(request.periods, 12);
        assert!(request.overrides.is_empty());
        assert!(!request.stochastic);
    }
}
