use serde::{Deserialize, Serialize};

use schemascale_core::Schema;

use crate::config::ScaleConfig;

/// Per-category table counts.
///
/// Counts are signed: the meta share is the remainder after rounding the
/// entity and join shares and can go negative for unusual ratios. A negative
/// request generates nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quota {
    pub entity: i64,
    pub join: i64,
    pub meta: i64,
}

impl Quota {
    /// Split `max(0, target - original_count)` new tables across the categories.
    pub fn for_run(original_count: usize, config: &ScaleConfig) -> Self {
        let new_total = config.target_total_tables.saturating_sub(original_count) as i64;
        let entity = round_share(new_total, config.ratio_entity);
        let join = round_share(new_total, config.ratio_join);
        Self {
            entity,
            join,
            meta: new_total - entity - join,
        }
    }

    pub fn total(&self) -> i64 {
        self.entity + self.join + self.meta
    }
}

fn round_share(total: i64, ratio: f64) -> i64 {
    (total as f64 * ratio).round_ties_even() as i64
}

/// Result of one enlargement run.
#[derive(Debug, Clone)]
pub struct EnlargementOutcome {
    /// Original tables followed by the synthetic tables in creation order.
    pub schema: Schema,
    pub requested: Quota,
    /// Tables actually created; bridge tables are counted separately.
    pub created: Quota,
    pub entity_tables: Vec<String>,
    pub family_tables: Vec<String>,
    pub bridge_tables: Vec<String>,
    pub join_tables: Vec<String>,
    pub meta_tables: Vec<String>,
    pub anchor_links_used: usize,
}

impl EnlargementOutcome {
    /// Number of synthetic tables added to the original schema.
    pub fn synthetic_count(&self) -> usize {
        self.entity_tables.len() + self.join_tables.len() + self.meta_tables.len()
    }

    /// True when every category reached its requested count.
    pub fn quota_met(&self) -> bool {
        self.created.entity >= self.requested.entity.max(0)
            && self.created.join >= self.requested.join.max(0)
            && self.created.meta >= self.requested.meta.max(0)
    }
}
