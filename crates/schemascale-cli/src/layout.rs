use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use schemascale_enlarge::ScaleConfig;

/// Input side of a data directory for one dataset.
#[derive(Debug, Clone)]
pub struct DataLayout {
    root: PathBuf,
    dataset: String,
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>, dataset: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            dataset: dataset.into(),
        }
    }

    pub fn schemas_dir(&self) -> PathBuf {
        self.root.join("schemas").join(&self.dataset)
    }

    pub fn schema_path(&self, db_id: &str) -> PathBuf {
        self.schemas_dir().join(format!("{db_id}.json"))
    }

    pub fn candidates_path(&self, db_id: &str) -> PathBuf {
        self.root
            .join("candidates")
            .join(&self.dataset)
            .join(format!("{db_id}.json"))
    }

    pub fn source_db_path(&self, db_id: &str) -> PathBuf {
        database_path(&self.root, &self.dataset, db_id)
    }

    /// Database ids with a schema file, sorted.
    pub fn list_db_ids(&self) -> io::Result<Vec<String>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(self.schemas_dir())? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }

    pub fn scaled(&self, target: usize, family: bool) -> ScaledLayout {
        ScaledLayout {
            root: self.root.clone(),
            tag: scaled_tag(&self.dataset, target, family),
        }
    }

    /// Output layout for a run config; only family generation marks the tag.
    pub fn scaled_for(&self, config: &ScaleConfig) -> ScaledLayout {
        self.scaled(config.target_total_tables, config.apply_family_generation)
    }
}

/// Output side: everything written for one `<dataset>_<target>[_f]` tag.
#[derive(Debug, Clone)]
pub struct ScaledLayout {
    root: PathBuf,
    tag: String,
}

impl ScaledLayout {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn schema_path(&self, db_id: &str) -> PathBuf {
        self.root
            .join("schemas")
            .join(&self.tag)
            .join(format!("{db_id}.json"))
    }

    pub fn db_path(&self, db_id: &str) -> PathBuf {
        database_path(&self.root, &self.tag, db_id)
    }

    pub fn metadata_path(&self, db_id: &str) -> PathBuf {
        self.root
            .join("metadata")
            .join(&self.tag)
            .join(format!("{db_id}.json"))
    }
}

/// `<dataset>_<target>`, with an `_f` suffix when family generation is on.
pub fn scaled_tag(dataset: &str, target: usize, family: bool) -> String {
    if family {
        format!("{dataset}_{target}_f")
    } else {
        format!("{dataset}_{target}")
    }
}

fn database_path(root: &Path, dataset: &str, db_id: &str) -> PathBuf {
    root.join("datasets")
        .join(dataset)
        .join("database")
        .join(db_id)
        .join(format!("{db_id}.sqlite"))
}
