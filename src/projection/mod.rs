//! Projection engine, debt servicing and KPI calculators

mod state;
mod engine;
mod cashflows;
pub mod debt;
pub mod irr;
pub mod kpi;

pub use state::ProjectionState;
pub use engine::{ProjectionEngine, ProjectionConfig, run_simulation};
pub use cashflows::{
    PeriodRecord, SimplePeriodRecord, SimulationKpis, SimulationMeta, SimulationResult,
    SimulationSummary, RESULT_SCHEMA_VERSION,
};
pub use debt::{DebtBalance, DebtState};
pub use irr::{compute_irr, compute_irr_with};
pub use kpi::{compute_break_even, compute_risk_index, compute_roi, RiskSummary};
