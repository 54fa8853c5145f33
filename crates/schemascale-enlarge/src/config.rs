use serde::{Deserialize, Serialize};

use crate::errors::EnlargeError;

/// Configuration for one enlargement run.
///
/// Column counts include the primary key column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleConfig {
    /// Total table count (original + synthetic) to aim for.
    pub target_total_tables: usize,
    pub ratio_entity: f64,
    pub ratio_join: f64,
    /// Informational only: meta tables absorb whatever entity and join leave over.
    pub ratio_meta: f64,

    /// Derive some entity tables from original tables ("level 2").
    pub apply_family_generation: bool,
    /// Chance an entity table becomes a family member of an original table.
    pub orig_prob: f64,
    /// Share of a base table's non-key columns a family member reuses.
    pub family_reuse_ratio: f64,
    /// Add bridge tables along original foreign keys ("level 2").
    pub apply_join_competition: bool,

    pub entity_min_cols: usize,
    pub entity_max_cols: usize,
    pub meta_min_cols: usize,
    pub meta_max_cols: usize,

    /// Maximum foreign keys from synthetic entity tables into original tables.
    pub max_anchor_links: usize,
    /// Chance a plain entity table links to an original anchor table.
    pub entity_fk_prob: f64,
    /// Chance a meta table gets a weak foreign key to an entity table.
    pub meta_fk_prob: f64,

    pub seed: u64,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            target_total_tables: 100,
            ratio_entity: 0.60,
            ratio_join: 0.25,
            ratio_meta: 0.15,
            apply_family_generation: false,
            orig_prob: 0.4,
            family_reuse_ratio: 0.6,
            apply_join_competition: false,
            entity_min_cols: 6,
            entity_max_cols: 12,
            meta_min_cols: 5,
            meta_max_cols: 8,
            max_anchor_links: 5,
            entity_fk_prob: 0.0,
            meta_fk_prob: 0.10,
            seed: 42,
        }
    }
}

impl ScaleConfig {
    /// Config for a target size with both level 2 features toggled together.
    pub fn for_target(target_total_tables: usize, level2: bool) -> Self {
        Self {
            target_total_tables,
            apply_family_generation: level2,
            apply_join_competition: level2,
            ..Self::default()
        }
    }

    /// True when any level 2 feature is enabled.
    pub fn is_level2(&self) -> bool {
        self.apply_family_generation || self.apply_join_competition
    }

    pub fn validate(&self) -> Result<(), EnlargeError> {
        for (key, value) in [
            ("orig_prob", self.orig_prob),
            ("family_reuse_ratio", self.family_reuse_ratio),
            ("entity_fk_prob", self.entity_fk_prob),
            ("meta_fk_prob", self.meta_fk_prob),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(EnlargeError::InvalidConfig(format!(
                    "{key} must be within [0, 1], got {value}"
                )));
            }
        }

        for (key, value) in [
            ("ratio_entity", self.ratio_entity),
            ("ratio_join", self.ratio_join),
            ("ratio_meta", self.ratio_meta),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(EnlargeError::InvalidConfig(format!(
                    "{key} must be a non-negative number, got {value}"
                )));
            }
        }

        for (kind, min, max) in [
            ("entity", self.entity_min_cols, self.entity_max_cols),
            ("meta", self.meta_min_cols, self.meta_max_cols),
        ] {
            if min == 0 {
                return Err(EnlargeError::InvalidConfig(format!(
                    "{kind}_min_cols must be at least 1 (the primary key)"
                )));
            }
            if min > max {
                return Err(EnlargeError::InvalidConfig(format!(
                    "{kind}_min_cols ({min}) exceeds {kind}_max_cols ({max})"
                )));
            }
        }

        Ok(())
    }
}
