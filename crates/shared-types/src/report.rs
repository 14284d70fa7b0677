use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A document written for one input row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowOutput {
    /// Zero-based position of the row in the input.
    pub row: usize,
    pub path: PathBuf,
    /// Number of object-list annex pages included.
    pub annex_pages: usize,
}

/// A row that was skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowFailure {
    pub row: usize,
    pub label: String,
    pub error: String,
}

/// Outcome of a whole batch, in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub outputs: Vec<RowOutput>,
    pub failures: Vec<RowFailure>,
}

impl BatchSummary {
    /// Output paths in input order, ready for packaging.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.outputs.iter().map(|o| o.path.clone()).collect()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
