use tracing::debug;

use schemascale_core::ForeignKey;

use crate::factory::{build_table, entity_pk_name, key_column};
use crate::state::GenerationState;

/// Canonical join name for an unordered pair of tables.
pub fn join_table_name(left: &str, right: &str) -> String {
    let (first, second) = if left <= right {
        (left, right)
    } else {
        (right, left)
    };
    format!("{first}_{second}")
}

/// Create the join table between two entity tables.
///
/// Returns `false` without touching the state when the canonical name is
/// already taken.
pub fn make_join_table(state: &mut GenerationState, left: &str, right: &str) -> bool {
    let (first, second) = if left <= right {
        (left, right)
    } else {
        (right, left)
    };
    let table_name = join_table_name(first, second);
    if !state.used_names.claim(&table_name) {
        debug!(table = %table_name, "join table skipped, name taken");
        return false;
    }

    let first_pk = entity_pk_name(first);
    let second_pk = entity_pk_name(second);
    let columns = vec![key_column(first_pk.clone(), 1), key_column(second_pk.clone(), 2)];
    let foreign_keys = vec![
        ForeignKey::new(first, &first_pk, &first_pk),
        ForeignKey::new(second, &second_pk, &second_pk),
    ];

    state.push_table(build_table(
        table_name.clone(),
        columns,
        vec![first_pk, second_pk],
        foreign_keys,
    ));
    state.join_tables.push(table_name);
    true
}
