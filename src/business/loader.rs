//! Record lookup and loading of business/strategy records from JSON
//!
//! The engine never talks to storage directly. Callers hand it a
//! [`RecordLookup`] implementation; [`RecordBook`] is the in-memory one.

use super::{BusinessSnapshot, StrategyParams};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Fetch a record by identifier
pub trait RecordLookup<T> {
    fn fetch(&self, id: &str) -> Option<T>;
}

/// In-memory record collection.
///
/// JSON layout:
/// ```json
/// {
///   "businesses": { "acme": { "revenue": 1000, "cost": 500 } },
///   "strategies": { "expand": { "growthRate": 0.1, "costRate": 0.05 } }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordBook {
    #[serde(default)]
    pub businesses: HashMap<String, BusinessSnapshot>,
    #[serde(default)]
    pub strategies: HashMap<String, StrategyParams>,
}

impl RecordBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_business(&mut self, id: impl Into<String>, business: BusinessSnapshot) {
        self.businesses.insert(id.into(), business);
    }

    pub fn insert_strategy(&mut self, id: impl Into<String>, strategy: StrategyParams) {
        self.strategies.insert(id.into(), strategy);
    }
}

impl RecordLookup<BusinessSnapshot> for RecordBook {
    fn fetch(&self, id: &str) -> Option<BusinessSnapshot> {
        self.businesses.get(id).cloned()
    }
}

impl RecordLookup<StrategyParams> for RecordBook {
    fn fetch(&self, id: &str) -> Option<StrategyParams> {
        self.strategies.get(id).copied()
    }
}

/// Load records from a JSON file
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<RecordBook> {
    let file = File::open(path.as_ref())?;
    let book = load_records_from_reader(BufReader::new(file))?;
    log::info!(
        "Loaded {} businesses and {} strategies from {}",
        book.businesses.len(),
        book.strategies.len(),
        path.as_ref().display()
    );
    Ok(book)
}

/// Load records from any reader (e.g., string buffer, network stream)
pub fn load_records_from_reader<R: Read>(reader: R) -> Result<RecordBook> {
    Ok(serde_json::from_reader(reader)?)
}
