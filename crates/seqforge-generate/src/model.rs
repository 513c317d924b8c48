use serde::{Deserialize, Serialize};

/// Summary of one record collection run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Elements pulled from the record sequence, seed included.
    pub records_pulled: u64,
    pub accepted: u64,
    pub rejected: u64,
    pub duration_ms: u64,
}

impl GenerationReport {
    /// Share of pulled records that were accepted.
    pub fn acceptance_rate(&self) -> f64 {
        if self.records_pulled == 0 {
            0.0
        } else {
            self.accepted as f64 / self.records_pulled as f64
        }
    }
}
