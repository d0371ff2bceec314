//! Business Projection - period-by-period financial projection engine for business strategies
//!
//! This library provides:
//! - Revenue/cost projections with growth, pricing, marketing and scenario levers
//! - Level-payment debt servicing and one-time investment scheduling
//! - Summary KPIs (ROI, IRR, break-even period, profit volatility)
//! - Record lookup, multi-scenario runs and result storage

pub mod error;
pub mod business;
pub mod projection;
pub mod scenario;
pub mod store;

// Re-export commonly used types
pub use error::{SimulationError, RecordKind};
pub use business::{BusinessSnapshot, StrategyParams, DebtTerms, Overrides, RecordBook, RecordLookup};
pub use projection::{ProjectionEngine, ProjectionConfig, SimulationResult, PeriodRecord, run_simulation};
pub use scenario::{ScenarioRunner, ScenarioRegistry, ScenarioProfile, SimulationRequest};
pub use store::{SimulationStore, StoredSimulation};
