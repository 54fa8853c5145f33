use serde::{Deserialize, Serialize};

use schemascale_enlarge::factory::{META_SUFFIXES, NAME_SEPARATOR};

/// Estimated category of a synthetic table, judged by its name alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableCategory {
    Entity,
    Join,
    Meta,
}

/// Meta tables end in a meta suffix; any other name containing a separator
/// counts as a join table; the rest are entities.
///
/// This is an approximation: family members, bridge tables, disambiguated
/// meta names (`audit_log_2`) and candidate words with a separator all land
/// in the join bucket.
pub fn classify_table(name: &str) -> TableCategory {
    if META_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)) {
        TableCategory::Meta
    } else if name.contains(NAME_SEPARATOR) {
        TableCategory::Join
    } else {
        TableCategory::Entity
    }
}
