use std::fs::{OpenOptions, create_dir_all};
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, Utc};
use serde::Serialize;

use schemascale_core::Schema;
use schemascale_enlarge::ScaleConfig;

use super::{RegistryError, RegistryResult};

/// Command-specific settings recorded in `config.json`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum RunOptions {
    Enlarge {
        data_dir: PathBuf,
        dataset: String,
        scaled_tag: String,
        databases: Vec<String>,
        materialize: bool,
        scale: ScaleConfig,
    },
    Introspect {
        db_file: PathBuf,
        dataset: String,
        db_id: String,
        out: Option<PathBuf>,
    },
}

/// Metadata captured at run start.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub run_dir: PathBuf,
    pub options: RunOptions,
}

/// JSON config written to each run directory.
#[derive(Debug, Serialize)]
pub struct RunConfig {
    pub run_id: String,
    pub started_at: String,
    #[serde(flatten)]
    pub options: RunOptions,
    pub git: GitInfo,
}

/// Git metadata for reproducibility.
#[derive(Debug, Serialize)]
pub struct GitInfo {
    pub commit: Option<String>,
    pub dirty: Option<bool>,
}

/// Paths for run artifacts.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub root: PathBuf,
    pub schema_path: PathBuf,
    pub logs_path: PathBuf,
    pub summary_path: PathBuf,
}

/// Per-database line of the run summary.
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseSummary {
    pub db_id: String,
    pub tables_original: usize,
    pub tables_total: usize,
    pub quota_met: bool,
    pub schema_path: PathBuf,
    pub db_path: Option<PathBuf>,
    pub report_path: PathBuf,
    pub schema_fingerprint: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub status: String,
    pub duration_ms: u64,
    pub databases: Vec<DatabaseSummary>,
}

pub fn start_run(ctx: &RunContext) -> RegistryResult<RunPaths> {
    let timestamp = ctx.started_at.format("%Y-%m-%dT%H-%M-%SZ").to_string();
    let root = ctx.run_dir.join(format!("{timestamp}__run_{}", ctx.run_id));

    create_dir_all(&root)?;

    let config_path = root.join("config.json");
    let logs_path = root.join("logs.ndjson");

    let config = RunConfig {
        run_id: ctx.run_id.clone(),
        started_at: ctx.started_at.to_rfc3339(),
        options: ctx.options.clone(),
        git: collect_git_info(),
    };

    write_json(&config_path, &config)?;

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&logs_path)?;

    Ok(RunPaths {
        schema_path: root.join("schema.json"),
        summary_path: root.join("summary.json"),
        logs_path,
        root,
    })
}

/// Store an introspected schema in the run directory and, optionally, at `out_path`.
pub fn write_schema(
    paths: &RunPaths,
    schema: &Schema,
    out_path: Option<&Path>,
) -> RegistryResult<()> {
    schema.write_json_file(&paths.schema_path)?;

    if let Some(out_path) = out_path {
        schema.write_json_file(out_path)?;
    }

    Ok(())
}

pub fn write_summary(paths: &RunPaths, summary: &RunSummary) -> RegistryResult<()> {
    write_json(&paths.summary_path, summary)
}

pub fn collect_git_info() -> GitInfo {
    let commit = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
            } else {
                None
            }
        })
        .filter(|value| !value.is_empty());

    let dirty = Command::new("git")
        .args(["status", "--porcelain"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| !output.stdout.is_empty());

    GitInfo { commit, dirty }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> RegistryResult<()> {
    let file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)?;
    serde_json::to_writer_pretty(file, value).map_err(RegistryError::from)
}
