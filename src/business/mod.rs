//! Business snapshots, strategies, override levers and record loading

mod data;
mod overrides;
pub mod loader;

pub use data::{BusinessSnapshot, StrategyParams, DebtTerms, OneTimeInvestment};
pub use overrides::{Overrides, ResolvedInputs, DEFAULT_MARKETING_MULTIPLIER};
pub use loader::{RecordLookup, RecordBook, load_records, load_records_from_reader};
