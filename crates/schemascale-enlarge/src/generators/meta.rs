use rand::Rng;
use rand::seq::IndexedRandom;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use schemascale_core::ForeignKey;

use crate::config::ScaleConfig;
use crate::factory::{
    META_ATTR_TEMPLATES, META_FILLER_PREFIX, META_SUFFIXES, build_table, entity_pk_name,
    fill_columns, has_column, key_column, reference_column,
};
use crate::state::GenerationState;

/// Build a meta table from `base_word` and return its name.
///
/// Random draws happen in a fixed order: suffix, column count, weak link
/// chance, linked entity.
pub fn make_meta_table(
    state: &mut GenerationState,
    config: &ScaleConfig,
    rng: &mut ChaCha8Rng,
    base_word: &str,
) -> String {
    let suffix = META_SUFFIXES[rng.random_range(0..META_SUFFIXES.len())];
    let table_name = free_meta_name(state, base_word, suffix);
    state.used_names.claim(&table_name);

    let pk = entity_pk_name(base_word);
    let n_cols = rng.random_range(config.meta_min_cols..=config.meta_max_cols);

    let mut columns = vec![key_column(pk.clone(), 1)];
    let mut foreign_keys = Vec::new();

    if !state.entity_tables.is_empty() && rng.random::<f64>() < config.meta_fk_prob {
        if let Some(entity) = state.entity_tables.choose(rng) {
            let entity_pk = entity_pk_name(entity);
            if entity_pk != pk && !has_column(&columns, &entity_pk) {
                columns.push(reference_column(entity_pk.clone()));
                foreign_keys.push(ForeignKey::new(entity.as_str(), &entity_pk, &entity_pk));
            }
        }
    }

    fill_columns(&mut columns, n_cols, META_ATTR_TEMPLATES, META_FILLER_PREFIX);

    debug!(
        table = %table_name,
        columns = columns.len(),
        weak_link = !foreign_keys.is_empty(),
        "meta table generated"
    );

    state.push_table(build_table(table_name.clone(), columns, vec![pk], foreign_keys));
    state.meta_tables.push(table_name.clone());
    table_name
}

/// `<base><suffix>`, or `<base><suffix>_<k>` for the first free `k >= 2`.
fn free_meta_name(state: &GenerationState, base_word: &str, suffix: &str) -> String {
    let name = format!("{base_word}{suffix}");
    if !state.used_names.contains(&name) {
        return name;
    }
    let mut k = 2;
    loop {
        let candidate = format!("{name}_{k}");
        if !state.used_names.contains(&candidate) {
            return candidate;
        }
        k += 1;
    }
}
