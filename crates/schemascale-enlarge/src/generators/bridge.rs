use tracing::debug;

use schemascale_core::{ForeignKey, Schema, Table};

use crate::factory::{build_table, entity_pk_name, key_column, reference_column};
use crate::state::GenerationState;

pub fn bridge_table_name(source: &str, target: &str) -> String {
    format!("{source}_{target}_bridge")
}

/// Add a bridge table re-pointing one original relationship.
///
/// `source` is the referencing table and `source_column` its local column;
/// `target`/`target_column` is the referenced key. Returns `false` when the
/// bridge name is taken.
pub fn make_join_bridge(
    state: &mut GenerationState,
    source: &str,
    target: &str,
    source_column: &str,
    target_column: &str,
) -> bool {
    let table_name = bridge_table_name(source, target);
    if !state.used_names.claim(&table_name) {
        debug!(table = %table_name, "bridge table skipped, name taken");
        return false;
    }

    let pk = entity_pk_name(&table_name);
    let source_local = format!("{source_column}_fk1");
    let target_local = format!("{target_column}_fk2");

    let columns = vec![
        key_column(pk.clone(), 1),
        reference_column(source_local.clone()),
        reference_column(target_local.clone()),
    ];
    let foreign_keys = vec![
        ForeignKey::new(source, source_column, source_local),
        ForeignKey::new(target, target_column, target_local),
    ];

    state.push_table(build_table(table_name.clone(), columns, vec![pk], foreign_keys));
    state.entity_tables.push(table_name.clone());
    state.bridge_tables.push(table_name);
    true
}

/// Run [`make_join_bridge`] over every original foreign key, walking the
/// original tables in name order. Returns the number of bridges created.
pub fn make_join_bridges(state: &mut GenerationState, original: &Schema) -> usize {
    let mut tables: Vec<&Table> = original.tables.iter().collect();
    tables.sort_by(|left, right| left.name.cmp(&right.name));

    let mut created = 0;
    for table in tables {
        for fk in &table.foreign_keys {
            if make_join_bridge(
                state,
                &table.name,
                &fk.source_table,
                &fk.target_column,
                &fk.source_column,
            ) {
                created += 1;
            }
        }
    }
    created
}
