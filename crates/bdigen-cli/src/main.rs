mod registry;
mod settings;

use std::path::PathBuf;
use std::time::Instant;

use bdigen_core::{Error as CoreError, bind, load_mapping, redact_connection_string};
use bdigen_deploy::{
    BusinessProcessOptions, DeployError, DirectoryDeployer, JsonFileDescribe,
    SynthesizeBusinessProcess,
};
use bdigen_factory::{FactoryError, GenerateOptions, GenerationEngine, SqlStore};
use clap::{Args, Parser, Subcommand};
use registry::{RunCommand, RunContext, init_logging, start_run};
use settings::{
    DEFAULT_MAPPING, DEFAULT_NUM_RECORDS, DEFAULT_RUN_DIR, GenerateSettings, SettingsError,
    load_settings,
};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
    #[error("mapping error: {0}")]
    Core(#[from] CoreError),
    #[error("generation error: {0}")]
    Factory(#[from] FactoryError),
    #[error("deploy error: {0}")]
    Deploy(#[from] DeployError),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Parser, Debug)]
#[command(name = "bdigen", version, about = "Batch data import test data generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the cohort layout, write CSVs and optionally load a database.
    Generate(GenerateArgs),
    /// Stage a business process and record type package for deployment.
    BusinessProcess(BusinessProcessArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Database connection string (sqlite:// or postgres://).
    #[arg(long, value_name = "CONNECTION_STRING")]
    database_url: Option<String>,
    /// Mapping file describing objects, tables and columns.
    #[arg(long)]
    mapping: Option<PathBuf>,
    /// Size of the run; cohort sizes derive from it.
    #[arg(long)]
    num_records: Option<u64>,
    /// Output directory for runs.
    #[arg(long)]
    run_dir: Option<PathBuf>,
    /// Settings file (defaults to ./bdigen.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write CSVs only, even when a database is configured.
    #[arg(long, default_value_t = false)]
    no_persist: bool,
}

#[derive(Args, Debug)]
struct BusinessProcessArgs {
    /// Name of the business process.
    #[arg(long)]
    business_process_name: String,
    /// Unique developer name of the record type (letters, digits, underscores).
    #[arg(long)]
    record_type_developer_name: String,
    /// Label of the record type.
    #[arg(long)]
    record_type_label: String,
    /// Object that receives the record type and business process.
    #[arg(long)]
    sobject: String,
    /// Saved Opportunity describe result (JSON).
    #[arg(long)]
    describe: Option<PathBuf>,
    /// Directory where deploy packages are staged.
    #[arg(long)]
    deploy_dir: Option<PathBuf>,
    /// Output directory for runs.
    #[arg(long, default_value = DEFAULT_RUN_DIR)]
    run_dir: PathBuf,
    /// Settings file (defaults to ./bdigen.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => run_generate(args).await,
        Command::BusinessProcess(args) => run_business_process(args).await,
    }
}

/// Values `generate` runs with after merging flags over `bdigen.toml`.
#[derive(Debug, Clone, PartialEq)]
struct ResolvedGenerate {
    mapping: PathBuf,
    num_records: u64,
    run_dir: PathBuf,
    database_url: Option<String>,
}

/// Flags win over settings, settings over built-in defaults.
/// `--no-persist` drops any database URL, wherever it came from.
fn resolve_generate(args: &GenerateArgs, settings: GenerateSettings) -> ResolvedGenerate {
    let database_url = if args.no_persist {
        None
    } else {
        args.database_url.clone().or(settings.database_url)
    };

    ResolvedGenerate {
        mapping: args
            .mapping
            .clone()
            .or(settings.mapping)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MAPPING)),
        num_records: args
            .num_records
            .or(settings.num_records)
            .unwrap_or(DEFAULT_NUM_RECORDS),
        run_dir: args
            .run_dir
            .clone()
            .or(settings.run_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RUN_DIR)),
        database_url,
    }
}

async fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let settings = load_settings(args.config.as_deref())?.generate;
    let ResolvedGenerate {
        mapping: mapping_path,
        num_records,
        run_dir,
        database_url,
    } = resolve_generate(&args, settings);

    let schema = bind(&load_mapping(&mapping_path)?)?;

    let run_id = Uuid::new_v4().to_string();
    let run_ctx = RunContext {
        run_id: run_id.clone(),
        started_at: chrono::Utc::now(),
        run_dir: run_dir.clone(),
        command: RunCommand::Generate {
            mapping: mapping_path.clone(),
            num_records,
            persist: database_url.is_some(),
        },
        connection: database_url.as_deref().map(redact_connection_string),
    };

    let run_paths = start_run(&run_ctx)?;
    init_logging(Some(&run_paths.logs_path))?;

    tracing::info!(
        event = "run_started",
        run_id = %run_id,
        command = "generate",
        mapping = %mapping_path.display(),
        num_records
    );
    let timer = Instant::now();

    // Connect and check the target tables before building anything so a
    // populated database fails fast.
    let store = match database_url.as_deref() {
        Some(url) => {
            let store = SqlStore::connect(url).await?;
            store.prepare(&schema).await?;
            tracing::info!(event = "database_ready", tables = schema.tables.len());
            Some(store)
        }
        None => None,
    };

    let engine = GenerationEngine::new(GenerateOptions {
        out_dir: run_dir,
        num_records,
    });
    let result = engine.run_in(&run_paths.root, &run_id, &schema)?;

    if let Some(store) = store {
        store.write_all(&schema, &result.store).await?;
        store.close().await;
    }

    tracing::info!(
        event = "run_finished",
        status = "success",
        rows = result.report.rows_total,
        run_dir = %result.run_dir.display(),
        duration_ms = timer.elapsed().as_millis() as u64
    );

    Ok(())
}

async fn run_business_process(args: BusinessProcessArgs) -> Result<(), CliError> {
    let settings = load_settings(args.config.as_deref())?.business_process;

    let describe_path = args.describe.or(settings.describe).ok_or_else(|| {
        CliError::InvalidConfig(
            "an Opportunity describe file is required (--describe or [business_process].describe)"
                .to_string(),
        )
    })?;
    let deploy_dir = args
        .deploy_dir
        .or(settings.deploy_dir)
        .unwrap_or_else(|| PathBuf::from("deploys"));

    let options = BusinessProcessOptions {
        business_process_name: args.business_process_name,
        record_type_developer_name: args.record_type_developer_name,
        record_type_label: args.record_type_label,
        sobject: args.sobject,
    };
    let task = SynthesizeBusinessProcess::new(options)?;

    let run_id = Uuid::new_v4().to_string();
    let run_ctx = RunContext {
        run_id: run_id.clone(),
        started_at: chrono::Utc::now(),
        run_dir: args.run_dir,
        command: RunCommand::BusinessProcess {
            business_process_name: task.options().business_process_name.clone(),
            record_type_developer_name: task.options().record_type_developer_name.clone(),
            sobject: task.options().sobject.clone(),
            describe: describe_path.clone(),
            deploy_dir: deploy_dir.clone(),
        },
        connection: None,
    };

    let run_paths = start_run(&run_ctx)?;
    init_logging(Some(&run_paths.logs_path))?;
    tracing::info!(event = "run_started", run_id = %run_id, command = "business_process");
    let timer = Instant::now();

    let receipt = task
        .run(
            &JsonFileDescribe::new(describe_path),
            &DirectoryDeployer::new(deploy_dir),
        )
        .await?;

    tracing::info!(
        event = "run_finished",
        status = "success",
        deploy_id = %receipt.deploy_id,
        files = receipt.files.len(),
        duration_ms = timer.elapsed().as_millis() as u64
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate_args(argv: &[&str]) -> GenerateArgs {
        let cli = Cli::try_parse_from(std::iter::once("bdigen").chain(argv.iter().copied()))
            .expect("parse arguments");
        match cli.command {
            Command::Generate(args) => args,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    fn file_settings() -> GenerateSettings {
        GenerateSettings {
            database_url: Some("sqlite://from-file.db?mode=rwc".to_string()),
            mapping: Some(PathBuf::from("custom/mapping.yml")),
            num_records: Some(40),
            run_dir: Some(PathBuf::from("file-runs")),
        }
    }

    #[test]
    fn flags_override_settings_file() {
        let args = generate_args(&[
            "generate",
            "--database-url",
            "postgres://bdi@localhost/bdi",
            "--num-records",
            "200",
            "--run-dir",
            "flag-runs",
        ]);

        let resolved = resolve_generate(&args, file_settings());

        assert_eq!(
            resolved.database_url.as_deref(),
            Some("postgres://bdi@localhost/bdi")
        );
        assert_eq!(resolved.num_records, 200);
        assert_eq!(resolved.run_dir, PathBuf::from("flag-runs"));
        assert_eq!(resolved.mapping, PathBuf::from("custom/mapping.yml"));
    }

    #[test]
    fn settings_file_fills_missing_flags() {
        let resolved = resolve_generate(&generate_args(&["generate"]), file_settings());
        assert_eq!(
            resolved,
            ResolvedGenerate {
                mapping: PathBuf::from("custom/mapping.yml"),
                num_records: 40,
                run_dir: PathBuf::from("file-runs"),
                database_url: Some("sqlite://from-file.db?mode=rwc".to_string()),
            }
        );

        let defaults =
            resolve_generate(&generate_args(&["generate"]), GenerateSettings::default());
        assert_eq!(defaults.mapping, PathBuf::from(DEFAULT_MAPPING));
        assert_eq!(defaults.num_records, DEFAULT_NUM_RECORDS);
        assert_eq!(defaults.run_dir, PathBuf::from(DEFAULT_RUN_DIR));
        assert_eq!(defaults.database_url, None);
    }

    #[test]
    fn no_persist_drops_database_from_any_source() {
        let args = generate_args(&["generate", "--no-persist"]);
        let from_file = resolve_generate(&args, file_settings());
        assert_eq!(from_file.database_url, None);
        assert_eq!(from_file.num_records, 40);

        let from_flag = resolve_generate(
            &generate_args(&[
                "generate",
                "--no-persist",
                "--database-url",
                "sqlite://flag.db",
            ]),
            GenerateSettings::default(),
        );
        assert_eq!(from_flag.database_url, None);
    }
}
