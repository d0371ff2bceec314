//! In-memory store for finished simulations

use crate::error::Result;
use crate::projection::SimulationResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// A simulation result with the identifiers it was produced from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSimulation {
    pub id: u64,
    pub business_id: Option<String>,
    pub strategy_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub result: SimulationResult,
}

/// Assigns sequential identifiers and keeps results in insertion order
#[derive(Debug, Clone, Default)]
pub struct SimulationStore {
    next_id: u64,
    simulations: BTreeMap<u64, StoredSimulation>,
}

impl SimulationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a result and return the stored record
    pub fn save(
        &mut self,
        business_id: Option<String>,
        strategy_id: Option<String>,
        result: SimulationResult,
    ) -> StoredSimulation {
        self.next_id += 1;
        let stored = StoredSimulation {
            id: self.next_id,
            business_id,
            strategy_id,
            created_at: Utc::now(),
            result,
        };
        log::debug!("Stored simulation {}", stored.id);
        self.simulations.insert(stored.id, stored.clone());
        stored
    }

    pub fn get(&self, id: u64) -> Option<&StoredSimulation> {
        self.simulations.get(&id)
    }

    pub fn len(&self) -> usize {
        self.simulations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.simulations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StoredSimulation> {
        self.simulations.values()
    }

    /// Write every stored simulation as a JSON array
    pub fn write_json<W: Write>(&self, writer: W) -> Result<()> {
        let all: Vec<&StoredSimulation> = self.iter().collect();
        serde_json::to_writer_pretty(writer, &all)?;
        Ok(())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_json(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
