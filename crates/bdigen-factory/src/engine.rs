use std::path::{Path, PathBuf};
use std::time::Instant;

use bdigen_core::BoundSchema;
use tracing::{info, warn};

use crate::driver::DataFactory;
use crate::errors::FactoryError;
use crate::factories::Factories;
use crate::model::{GenerateOptions, GenerationReport, TableReport};
use crate::output::csv::write_table_csv;
use crate::store::MemoryStore;

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub run_dir: PathBuf,
    pub report: GenerationReport,
    /// Every built row, for callers that persist the run elsewhere.
    pub store: MemoryStore,
}

/// Entry point for generating a cohort layout against a bound mapping.
#[derive(Debug, Clone)]
pub struct GenerationEngine {
    options: GenerateOptions,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    /// Generate into a fresh `<timestamp>__run_<id>` directory under `out_dir`.
    pub fn run(&self, schema: &BoundSchema) -> Result<GenerationResult, FactoryError> {
        let run_id = uuid::Uuid::new_v4().to_string();
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%SZ").to_string();
        let run_dir = self
            .options
            .out_dir
            .join(format!("{timestamp}__run_{run_id}"));
        self.run_in(&run_dir, &run_id, schema)
    }

    /// Generate into an existing or to-be-created run directory.
    pub fn run_in(
        &self,
        run_dir: &Path,
        run_id: &str,
        schema: &BoundSchema,
    ) -> Result<GenerationResult, FactoryError> {
        let start = Instant::now();
        std::fs::create_dir_all(run_dir)?;
        std::fs::write(
            run_dir.join("bound_schema.json"),
            serde_json::to_vec_pretty(schema)?,
        )?;

        let mut report = GenerationReport::new(run_id.to_string(), self.options.num_records);

        info!(
            event = "generation_started",
            run_id = %run_id,
            num_records = self.options.num_records,
            tables = schema.tables.len()
        );

        let outcome = self.generate(run_dir, schema, &mut report);
        report.duration_ms = start.elapsed().as_millis() as u64;

        let report_path = run_dir.join("generation_report.json");
        let write_report = |report: &GenerationReport| -> Result<(), FactoryError> {
            std::fs::write(&report_path, serde_json::to_vec_pretty(report)?)?;
            Ok(())
        };

        match outcome {
            Ok(store) => {
                write_report(&report)?;
                info!(
                    event = "generation_completed",
                    run_id = %run_id,
                    rows = report.rows_total,
                    bytes_written = report.bytes_written,
                    duration_ms = report.duration_ms
                );
                Ok(GenerationResult {
                    run_dir: run_dir.to_path_buf(),
                    report,
                    store,
                })
            }
            Err(err) => {
                report.record_failure(err.to_string());
                write_report(&report)?;
                warn!(event = "generation_failed", run_id = %run_id, error = %err);
                Err(err)
            }
        }
    }

    fn generate(
        &self,
        run_dir: &Path,
        schema: &BoundSchema,
        report: &mut GenerationReport,
    ) -> Result<MemoryStore, FactoryError> {
        let factories = Factories::new(schema)?;
        let mut store = MemoryStore::new();

        report.cohorts =
            DataFactory::new(self.options.num_records).generate(&factories, &mut store)?;

        for handle in &schema.tables {
            let rows = store.rows(&handle.table);
            let csv_path = run_dir.join(format!("{}.csv", handle.table));
            let bytes_written = write_table_csv(&csv_path, handle, rows)?;

            info!(
                event = "table_written",
                table = %handle.table,
                sf_object = %handle.sf_object,
                rows = rows.len(),
                bytes_written
            );

            report.record_table(TableReport {
                table: handle.table.clone(),
                sf_object: handle.sf_object.clone(),
                rows: rows.len() as u64,
                bytes_written,
            });
        }

        Ok(store)
    }
}
