//! Error types for record lookup, loading and export

use std::fmt;
use thiserror::Error;

/// Kind of input record a lookup was made for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Business,
    Strategy,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Business => write!(f, "business"),
            RecordKind::Strategy => write!(f, "strategy"),
        }
    }
}

/// Errors raised around a simulation run.
///
/// KPI degeneracies (no IRR bracket, zero initial investment) are not errors;
/// they surface as `None` fields in the result document.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// A supplied identifier did not resolve to a record
    #[error("{kind} not found: {id}")]
    NotFound { kind: RecordKind, id: String },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),
}

impl SimulationError {
    pub fn not_found(kind: RecordKind, id: impl Into<String>) -> Self {
        SimulationError::NotFound { kind, id: id.into() }
    }
}

pub type Result<T> = std::result::Result<T, SimulationError>;
