use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Options for the generation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Directory where run directories are created.
    pub out_dir: PathBuf,
    /// Requested size of the run; cohort sizes are derived from it.
    pub num_records: u64,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("runs"),
            num_records: 100,
        }
    }
}

/// Rows built by one cohort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CohortReport {
    pub name: String,
    pub table: String,
    pub rows: u64,
}

impl CohortReport {
    pub fn new(name: String, table: &str, rows: usize) -> Self {
        Self {
            name,
            table: table.to_string(),
            rows: rows as u64,
        }
    }
}

/// Summary of one output table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableReport {
    pub table: String,
    pub sf_object: String,
    pub rows: u64,
    pub bytes_written: u64,
}

/// Report for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub num_records: u64,
    pub tables: Vec<TableReport>,
    pub cohorts: Vec<CohortReport>,
    pub rows_total: u64,
    pub bytes_written: u64,
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl GenerationReport {
    pub fn new(run_id: String, num_records: u64) -> Self {
        Self {
            run_id,
            num_records,
            tables: Vec::new(),
            cohorts: Vec::new(),
            rows_total: 0,
            bytes_written: 0,
            duration_ms: 0,
            failure: None,
        }
    }

    pub fn table(&self, name: &str) -> Option<&TableReport> {
        self.tables.iter().find(|table| table.table == name)
    }

    pub fn record_table(&mut self, table: TableReport) {
        self.rows_total += table.rows;
        self.bytes_written += table.bytes_written;
        self.tables.push(table);
    }

    pub fn record_failure(&mut self, message: String) {
        self.failure = Some(message);
    }
}
