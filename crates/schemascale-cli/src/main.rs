mod layout;
mod registry;
mod settings;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use schemascale_core::{Error as CoreError, Schema, validate_schema};
use schemascale_enlarge::{EnlargeError, EnlargementEngine, ScaleConfig, load_candidate_words};
use schemascale_report::{ReportError, build_report, write_report};
use schemascale_sqlite::{SqliteError, introspect_sqlite, materialize};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use layout::{DataLayout, ScaledLayout};
use registry::{
    DatabaseSummary, RunContext, RunOptions, RunSummary, init_run_logging, start_run,
    write_schema, write_summary,
};
use settings::resolve_scale_config;

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("enlarge error: {0}")]
    Enlarge(#[from] EnlargeError),
    #[error("sqlite error: {0}")]
    Sqlite(#[from] SqliteError),
    #[error("report error: {0}")]
    Report(#[from] ReportError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Parser, Debug)]
#[command(name = "schemascale", version, about = "Schema enlargement for text-to-SQL benchmarks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Enlarge every database of a dataset to a target table count.
    Enlarge(EnlargeArgs),
    /// Read a SQLite file into a schema object.
    Introspect(IntrospectArgs),
}

#[derive(Args, Debug)]
struct EnlargeArgs {
    /// Data directory holding schemas/, candidates/ and datasets/.
    #[arg(long, default_value = "data")]
    data: PathBuf,
    /// Dataset name (e.g. spider).
    #[arg(long)]
    dataset: String,
    /// Total number of tables per database after enlargement.
    #[arg(long)]
    target_size: usize,
    /// Enable family generation and join competition.
    #[arg(long, default_value_t = false)]
    level2: bool,
    /// Optional TOML file with ScaleConfig overrides.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Restrict the run to these database ids.
    #[arg(long = "db", value_name = "DB_ID")]
    databases: Vec<String>,
    /// Write schemas and reports only; leave SQLite files alone.
    #[arg(long, default_value_t = false)]
    skip_materialize: bool,
    /// Output directory for runs.
    #[arg(long, default_value = "runs")]
    run_dir: PathBuf,
}

#[derive(Args, Debug)]
struct IntrospectArgs {
    /// SQLite database file.
    #[arg(long)]
    db_file: PathBuf,
    #[arg(long)]
    dataset: String,
    #[arg(long)]
    db_id: String,
    /// Optional output path for the schema JSON.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output directory for runs.
    #[arg(long, default_value = "runs")]
    run_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Enlarge(args) => run_enlarge(args).await,
        Command::Introspect(args) => run_introspect(args).await,
    }
}

async fn run_enlarge(args: EnlargeArgs) -> Result<(), CliError> {
    let EnlargeArgs {
        data,
        dataset,
        target_size,
        level2,
        config,
        databases,
        skip_materialize,
        run_dir,
    } = args;

    let scale = resolve_scale_config(config.as_deref(), target_size, level2)?;
    let layout = DataLayout::new(&data, &dataset);
    let scaled = layout.scaled_for(&scale);

    let databases = if databases.is_empty() {
        layout.list_db_ids()?
    } else {
        databases
    };
    if databases.is_empty() {
        return Err(CliError::InvalidConfig(format!(
            "no schemas found under {}",
            layout.schemas_dir().display()
        )));
    }

    let run_id = Uuid::new_v4().to_string();
    let run_ctx = RunContext {
        run_id: run_id.clone(),
        started_at: chrono::Utc::now(),
        run_dir,
        options: RunOptions::Enlarge {
            data_dir: data,
            dataset: dataset.clone(),
            scaled_tag: scaled.tag().to_string(),
            databases: databases.clone(),
            materialize: !skip_materialize,
            scale: scale.clone(),
        },
    };

    let run_paths = start_run(&run_ctx)?;
    init_run_logging(&run_paths.logs_path)?;

    info!(
        event = "run_started",
        run_id = %run_id,
        command = "enlarge",
        dataset = %dataset,
        tag = %scaled.tag(),
        databases = databases.len(),
        seed = scale.seed
    );

    let timer = Instant::now();
    let engine = EnlargementEngine::new(scale.clone());
    let mut summaries = Vec::with_capacity(databases.len());

    for db_id in &databases {
        let summary = enlarge_database(&engine, &scale, &layout, &scaled, db_id, skip_materialize)
            .await
            .inspect_err(|err| {
                warn!(event = "run_failed", db_id = %db_id, error = %err);
            })?;
        summaries.push(summary);
    }

    let duration_ms = timer.elapsed().as_millis() as u64;
    write_summary(
        &run_paths,
        &RunSummary {
            run_id,
            status: "success".to_string(),
            duration_ms,
            databases: summaries,
        },
    )?;
    info!(event = "run_finished", status = "success", duration_ms = duration_ms);

    Ok(())
}

/// One database, start to finish, with its own generation state.
async fn enlarge_database(
    engine: &EnlargementEngine,
    scale: &ScaleConfig,
    layout: &DataLayout,
    scaled: &ScaledLayout,
    db_id: &str,
    skip_materialize: bool,
) -> Result<DatabaseSummary, CliError> {
    let original = Schema::from_json_file(&layout.schema_path(db_id))?;
    let words = load_candidate_words(&layout.candidates_path(db_id))?;

    let outcome = engine.run(&original, words)?;
    let schema_path = scaled.schema_path(db_id);
    outcome.schema.write_json_file(&schema_path)?;
    info!(
        event = "database_enlarged",
        db_id = %db_id,
        tables_original = original.tables.len(),
        tables_total = outcome.schema.tables.len(),
        created = outcome.synthetic_count(),
        path = %schema_path.display()
    );

    let db_path = if skip_materialize {
        None
    } else {
        let materialized = materialize(
            &layout.source_db_path(db_id),
            &scaled.db_path(db_id),
            &original,
            &outcome.schema,
        )
        .await?;
        info!(
            event = "database_materialized",
            db_id = %db_id,
            created = materialized.created_tables.len(),
            path = %materialized.db_path.display()
        );
        Some(materialized.db_path)
    };

    let report = build_report(&original, &outcome.schema, scale, Some(&outcome))?;
    let report_path = scaled.metadata_path(db_id);
    write_report(&report_path, &report)?;
    info!(event = "report_written", db_id = %db_id, path = %report_path.display());

    Ok(DatabaseSummary {
        db_id: db_id.to_string(),
        tables_original: original.tables.len(),
        tables_total: outcome.schema.tables.len(),
        quota_met: outcome.quota_met(),
        schema_path,
        db_path,
        report_path,
        schema_fingerprint: report.schema_fingerprint,
    })
}

async fn run_introspect(args: IntrospectArgs) -> Result<(), CliError> {
    let IntrospectArgs {
        db_file,
        dataset,
        db_id,
        out,
        run_dir,
    } = args;

    if !db_file.is_file() {
        return Err(CliError::InvalidConfig(format!(
            "database file not found: {}",
            db_file.display()
        )));
    }

    let run_id = Uuid::new_v4().to_string();
    let run_ctx = RunContext {
        run_id: run_id.clone(),
        started_at: chrono::Utc::now(),
        run_dir,
        options: RunOptions::Introspect {
            db_file: db_file.clone(),
            dataset: dataset.clone(),
            db_id: db_id.clone(),
            out: out.clone(),
        },
    };

    let run_paths = start_run(&run_ctx)?;
    init_run_logging(&run_paths.logs_path)?;

    info!(event = "run_started", run_id = %run_id, command = "introspect", db_id = %db_id);
    let timer = Instant::now();

    let schema = introspect_sqlite(&db_file, &dataset, &db_id).await?;
    validate_schema(&schema)?;
    info!(
        event = "introspection_finished",
        db_id = %db_id,
        tables = schema.tables.len(),
        foreign_keys = schema.foreign_key_count()
    );

    write_schema(&run_paths, &schema, out.as_deref())?;
    info!(event = "schema_written", path = %run_paths.schema_path.display());

    let duration_ms = timer.elapsed().as_millis() as u64;
    info!(event = "run_finished", status = "success", duration_ms = duration_ms);

    Ok(())
}
