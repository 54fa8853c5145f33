use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use schemascale_core::{Schema, schema_fingerprint};
use schemascale_enlarge::{EnlargementOutcome, ScaleConfig};

use crate::classify::{TableCategory, classify_table};
use crate::errors::ReportError;

/// Per-database metadata written next to an enlarged schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleReport {
    pub dataset: String,
    pub db_id: String,
    pub target_total_tables: usize,
    pub seed: u64,
    pub ratios: RatioSettings,
    pub apply_family_generation: bool,
    pub apply_join_competition: bool,
    pub counts: TableCounts,
    /// Exact counts from the run itself, when the report was built from one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<CreatedCounts>,
    /// SHA-256 of the enlarged schema JSON.
    pub schema_fingerprint: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioSettings {
    pub entity: f64,
    pub join: f64,
    pub meta: f64,
}

/// Table and foreign key counts; `*_est` fields come from name heuristics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCounts {
    pub tables_original: usize,
    pub tables_total: usize,
    pub tables_synthetic: usize,
    pub tables_synthetic_entity_est: usize,
    pub tables_synthetic_join_est: usize,
    pub tables_synthetic_meta_est: usize,
    pub foreign_keys_original: usize,
    pub foreign_keys_total: usize,
    pub foreign_keys_synthetic_only: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedCounts {
    pub entity_requested: i64,
    pub join_requested: i64,
    pub meta_requested: i64,
    pub entity: usize,
    pub family: usize,
    pub bridge: usize,
    pub join: usize,
    pub meta: usize,
    pub anchor_links: usize,
}

impl CreatedCounts {
    pub fn from_outcome(outcome: &EnlargementOutcome) -> Self {
        Self {
            entity_requested: outcome.requested.entity,
            join_requested: outcome.requested.join,
            meta_requested: outcome.requested.meta,
            entity: outcome.entity_tables.len() - outcome.bridge_tables.len(),
            family: outcome.family_tables.len(),
            bridge: outcome.bridge_tables.len(),
            join: outcome.join_tables.len(),
            meta: outcome.meta_tables.len(),
            anchor_links: outcome.anchor_links_used,
        }
    }
}

/// Summarize an enlarged schema against its original.
pub fn build_report(
    original: &Schema,
    enlarged: &Schema,
    config: &ScaleConfig,
    outcome: Option<&EnlargementOutcome>,
) -> Result<ScaleReport, ReportError> {
    let synthetic: Vec<_> = enlarged.tables_not_in(original).collect();

    let mut entity_est = 0;
    let mut join_est = 0;
    let mut meta_est = 0;
    for table in &synthetic {
        match classify_table(&table.name) {
            TableCategory::Entity => entity_est += 1,
            TableCategory::Join => join_est += 1,
            TableCategory::Meta => meta_est += 1,
        }
    }

    let counts = TableCounts {
        tables_original: original.tables.len(),
        tables_total: enlarged.tables.len(),
        tables_synthetic: synthetic.len(),
        tables_synthetic_entity_est: entity_est,
        tables_synthetic_join_est: join_est,
        tables_synthetic_meta_est: meta_est,
        foreign_keys_original: original.foreign_key_count(),
        foreign_keys_total: enlarged.foreign_key_count(),
        foreign_keys_synthetic_only: synthetic.iter().map(|table| table.foreign_keys.len()).sum(),
    };

    Ok(ScaleReport {
        dataset: enlarged.dataset.clone(),
        db_id: enlarged.db_id.clone(),
        target_total_tables: config.target_total_tables,
        seed: config.seed,
        ratios: RatioSettings {
            entity: config.ratio_entity,
            join: config.ratio_join,
            meta: config.ratio_meta,
        },
        apply_family_generation: config.apply_family_generation,
        apply_join_competition: config.apply_join_competition,
        counts,
        created: outcome.map(CreatedCounts::from_outcome),
        schema_fingerprint: schema_fingerprint(enlarged)?,
    })
}

/// Write the report as pretty JSON, creating parent directories.
pub fn write_report(path: &Path, report: &ScaleReport) -> Result<(), ReportError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(report)?)?;
    info!(
        db_id = %report.db_id,
        tables_total = report.counts.tables_total,
        path = %path.display(),
        "report written"
    );
    Ok(())
}
