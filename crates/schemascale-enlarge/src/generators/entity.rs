use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use schemascale_core::{ForeignKey, Schema, Table};

use crate::anchor::{draw_anchor_link, sample_family_columns};
use crate::config::ScaleConfig;
use crate::errors::EnlargeError;
use crate::factory::{
    ENTITY_ATTR_TEMPLATES, ENTITY_FILLER_PREFIX, NAME_SEPARATOR, build_table, entity_pk_name,
    fill_columns, has_column, key_column, reference_column,
};
use crate::state::GenerationState;

/// Build an entity table named `table_name` and register it for join pairing.
///
/// With a `base` table the entity is a family member: it reuses a sample of
/// the base's non-key columns verbatim and gets no template columns.
/// Otherwise it is filled from the entity template and, when anchor links are
/// enabled, may reference an original table.
pub fn make_entity_table(
    state: &mut GenerationState,
    original: &Schema,
    config: &ScaleConfig,
    rng: &mut ChaCha8Rng,
    table_name: &str,
    base: Option<&Table>,
) -> Result<(), EnlargeError> {
    let pk = entity_pk_name(table_name);

    let mut n_cols = rng.random_range(config.entity_min_cols..=config.entity_max_cols);
    // one column fewer for separator names, never below the minimum
    if table_name.contains(NAME_SEPARATOR) {
        n_cols = n_cols.saturating_sub(1).max(config.entity_min_cols);
    }

    let mut columns = vec![key_column(pk.clone(), 1)];
    let mut foreign_keys = Vec::new();

    match base {
        Some(base) => {
            for column in sample_family_columns(base, config.family_reuse_ratio, rng) {
                if column.name.eq_ignore_ascii_case(&pk) {
                    continue;
                }
                columns.push(column);
            }
        }
        None => {
            // the anchor column counts towards n_cols; a key-only table gets none
            let link = if n_cols >= 2 {
                draw_anchor_link(state, original, config, rng)?
            } else {
                None
            };
            let reserved = usize::from(link.is_some());
            fill_columns(
                &mut columns,
                n_cols - reserved,
                ENTITY_ATTR_TEMPLATES,
                ENTITY_FILLER_PREFIX,
            );

            if let Some(link) = link {
                if !has_column(&columns, &link.column) {
                    columns.push(reference_column(link.column.clone()));
                    foreign_keys.push(ForeignKey::new(&link.table, &link.column, &link.column));
                }
            }
            // tops up when the anchor column was already present
            fill_columns(
                &mut columns,
                n_cols,
                ENTITY_ATTR_TEMPLATES,
                ENTITY_FILLER_PREFIX,
            );
        }
    }

    debug!(
        table = table_name,
        columns = columns.len(),
        family = base.map(|table| table.name.as_str()),
        "entity table generated"
    );

    state.push_table(build_table(table_name, columns, vec![pk], foreign_keys));
    state.entity_tables.push(table_name.to_string());
    if base.is_some() {
        state.family_tables.push(table_name.to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use schemascale_core::{Column, validate_schema};

    use super::*;

    fn original() -> Schema {
        let mut singer = Table::new("singer");
        singer.columns = vec![
            Column::new("Singer_ID", "int").primary_key(1),
            Column::new("Name", "text"),
            Column::new("Country", "text"),
        ];
        singer.primary_keys = vec!["Singer_ID".to_string()];
        let mut schema = Schema::new("spider", "db");
        schema.tables.push(singer);
        schema
    }

    #[test]
    fn plain_entity_has_synthetic_key_and_template_columns() {
        let original = original();
        let mut state = GenerationState::new(&original);
        let config = ScaleConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        make_entity_table(&mut state, &original, &config, &mut rng, "venue", None).unwrap();

        let table = state.schema.table("venue").expect("venue created");
        assert_eq!(table.primary_keys, ["venue_id"]);
        assert_eq!(table.columns[0].name, "venue_id");
        assert_eq!(table.columns[0].pk_ordinal, 1);
        assert!(table.columns.len() >= config.entity_min_cols);
        assert!(table.columns.len() <= config.entity_max_cols);
        assert_eq!(table.columns[1].name, "name");
        assert!(table.foreign_keys.is_empty());
        assert_eq!(state.entity_tables, ["venue"]);
        validate_schema(&state.schema).unwrap();
    }

    #[test]
    fn family_member_reuses_base_columns_only() {
        let original = original();
        let mut state = GenerationState::new(&original);
        let config = ScaleConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let base = original.table("singer").unwrap();

        make_entity_table(&mut state, &original, &config, &mut rng, "singer_tour", Some(base))
            .unwrap();

        let table = state.schema.table("singer_tour").expect("family created");
        assert_eq!(table.primary_keys, ["singer_tour_id"]);
        for column in &table.columns[1..] {
            let source = base.column(&column.name).expect("reused from base");
            assert_eq!(source.declared_type, column.declared_type);
        }
        assert!(table.columns.len() >= 2);
        assert_eq!(state.family_tables, ["singer_tour"]);
    }

    #[test]
    fn anchor_link_adds_reference_to_original_key() {
        let original = original();
        let mut state = GenerationState::new(&original);
        let config = ScaleConfig {
            entity_fk_prob: 1.0,
            max_anchor_links: 1,
            ..ScaleConfig::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        make_entity_table(&mut state, &original, &config, &mut rng, "venue", None).unwrap();
        make_entity_table(&mut state, &original, &config, &mut rng, "arena", None).unwrap();

        let venue = state.schema.table("venue").unwrap();
        assert_eq!(venue.foreign_keys, [ForeignKey::new("singer", "Singer_ID", "Singer_ID")]);
        assert!(venue.has_column("Singer_ID"));
        assert!(state.schema.table("arena").unwrap().foreign_keys.is_empty());
        assert_eq!(state.anchor_links_used, 1);
    }

    #[test]
    fn anchor_column_stays_within_column_range() {
        let original = original();
        let config = ScaleConfig {
            entity_fk_prob: 1.0,
            entity_min_cols: 6,
            entity_max_cols: 6,
            ..ScaleConfig::default()
        };

        for seed in 0..8 {
            let mut state = GenerationState::new(&original);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            make_entity_table(&mut state, &original, &config, &mut rng, "venue", None).unwrap();

            let venue = state.schema.table("venue").unwrap();
            assert_eq!(venue.columns.len(), 6);
            assert_eq!(venue.columns.last().unwrap().name, "Singer_ID");
            assert_eq!(venue.foreign_keys.len(), 1);
        }
    }

    #[test]
    fn key_only_entity_skips_anchor_link() {
        let original = original();
        let mut state = GenerationState::new(&original);
        let config = ScaleConfig {
            entity_fk_prob: 1.0,
            entity_min_cols: 1,
            entity_max_cols: 1,
            ..ScaleConfig::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        make_entity_table(&mut state, &original, &config, &mut rng, "venue", None).unwrap();

        let venue = state.schema.table("venue").unwrap();
        assert_eq!(venue.columns.len(), 1);
        assert!(venue.foreign_keys.is_empty());
        assert_eq!(state.anchor_links_used, 0);
    }
}
