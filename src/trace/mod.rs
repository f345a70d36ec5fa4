//! Trace records and the requests synthesized from them

pub mod reader;

pub use reader::TraceReader;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("failed to read trace: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed trace: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: invalid {column} cell {cell:?}: {reason}")]
    Distribution {
        row: usize,
        column: &'static str,
        cell: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VmType {
    Regular,
    Evictable,
}

impl VmType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VmType::Regular => "regular",
            VmType::Evictable => "evictable",
        }
    }
}

impl fmt::Display for VmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Empirical sample set decoded from a distribution cell
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution(Vec<f64>);

impl Distribution {
    pub fn new(values: Vec<f64>) -> Self {
        Distribution(values)
    }

    /// Decode a numeric sequence literal.
    ///
    /// Accepts a JSON array (`[0.5, 1]`), a parenthesized tuple (`(0.5, 1)`)
    /// or a bare comma-separated list (`0.5,1`).
    pub fn parse(cell: &str) -> Result<Self, String> {
        let cell = cell.trim();
        if cell.starts_with('[') {
            return serde_json::from_str::<Vec<f64>>(cell)
                .map(Distribution)
                .map_err(|e| e.to_string());
        }

        let inner = match cell.strip_prefix('(') {
            Some(rest) => rest
                .strip_suffix(')')
                .ok_or_else(|| "unterminated tuple".to_string())?,
            None => cell,
        };

        inner
            .split(',')
            .map(str::trim)
            // Python allows a trailing comma in tuples: (0.5,)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<f64>().map_err(|e| format!("{s:?}: {e}")))
            .collect::<Result<Vec<_>, _>>()
            .map(Distribution)
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TraceRow {
    /// Fractional day of trace
    pub time: f64,
    pub request_count: f64,
    pub regular_vm_count: f64,
    pub evictable_vm_count: f64,
    pub lifetime_distribution: Distribution,
    pub vcpu_distribution: Distribution,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VmRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub vm_type: VmType,
    pub lifetime: f64,
    pub vcpu: u32,
}

impl VmRequest {
    pub fn request_name(time: f64, vm_type: VmType, index: usize) -> String {
        format!("VM-{}-{}-{}", time, vm_type, index)
    }
}
