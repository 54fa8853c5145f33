//! Family/anchor resolution: tie synthetic entity tables to original tables.
//!
//! A family member takes its name and a sample of its columns from an
//! original base table; an anchor link is a foreign key from a plain entity
//! table into an original table's primary key.

use rand::Rng;
use rand::seq::IndexedRandom;
use rand::seq::index;
use rand_chacha::ChaCha8Rng;

use schemascale_core::{Column, Schema, Table};

use crate::config::ScaleConfig;
use crate::errors::EnlargeError;
use crate::factory::NAME_SEPARATOR;
use crate::state::GenerationState;

/// Foreign key target inside the original schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorLink {
    pub table: String,
    pub column: String,
}

/// Pick the base table of a family member uniformly from the original tables.
pub fn choose_family_base<'a>(original: &'a Schema, rng: &mut ChaCha8Rng) -> Option<&'a Table> {
    original.tables.choose(rng)
}

/// Name of a family member derived from `base`.
pub fn family_table_name(base: &str, word: &str) -> String {
    format!("{base}{NAME_SEPARATOR}{word}")
}

/// Sample a share of the base table's non-key columns, keeping their order.
///
/// At least one column is requested (`max(1, round(n * ratio))`), capped at
/// the number of non-key columns available.
pub fn sample_family_columns(base: &Table, reuse_ratio: f64, rng: &mut ChaCha8Rng) -> Vec<Column> {
    let candidates: Vec<&Column> = base.non_key_columns().collect();
    let wanted = ((candidates.len() as f64 * reuse_ratio).round_ties_even() as usize).max(1);
    let amount = wanted.min(candidates.len());
    if amount == 0 {
        return Vec::new();
    }

    let mut picked = index::sample(rng, candidates.len(), amount).into_vec();
    picked.sort_unstable();
    picked
        .into_iter()
        .map(|idx| reused_column(candidates[idx]))
        .collect()
}

/// Copy name and declared type verbatim; the copy is a nullable non-key column.
fn reused_column(column: &Column) -> Column {
    Column {
        name: column.name.clone(),
        declared_type: column.declared_type.clone(),
        type_group: column.type_group,
        not_null: false,
        pk_ordinal: 0,
    }
}

/// Draw whether a plain entity table links to an original anchor table.
///
/// The random stream is only touched when anchor links are enabled, so runs
/// with `entity_fk_prob == 0` are unaffected by this feature.
pub fn draw_anchor_link(
    state: &mut GenerationState,
    original: &Schema,
    config: &ScaleConfig,
    rng: &mut ChaCha8Rng,
) -> Result<Option<AnchorLink>, EnlargeError> {
    if config.entity_fk_prob <= 0.0 {
        return Ok(None);
    }
    if rng.random::<f64>() >= config.entity_fk_prob {
        return Ok(None);
    }
    resolve_anchor(state, original, config)
}

/// First original table (by name) with a primary key, while the link budget lasts.
pub fn resolve_anchor(
    state: &mut GenerationState,
    original: &Schema,
    config: &ScaleConfig,
) -> Result<Option<AnchorLink>, EnlargeError> {
    if state.anchor_links_used >= config.max_anchor_links {
        return Ok(None);
    }

    let mut tables: Vec<&Table> = original.tables.iter().collect();
    tables.sort_by(|left, right| left.name.cmp(&right.name));

    for table in tables {
        let Some(pk) = table.primary_keys.first() else {
            continue;
        };
        if !table.has_column(pk) {
            return Err(EnlargeError::InvalidSchema(format!(
                "anchor table {}.{} declares primary key {pk} but has no such column",
                original.db_id, table.name
            )));
        }
        state.anchor_links_used += 1;
        return Ok(Some(AnchorLink {
            table: table.name.clone(),
            column: pk.clone(),
        }));
    }

    Ok(None)
}
