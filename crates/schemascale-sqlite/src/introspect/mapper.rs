use schemascale_core::{Column, ForeignKey, Table};

use super::queries::{RawColumn, RawForeignKey};

/// Declared types keep SQLite's spelling: types it recognizes come back in
/// canonical upper case (`int` as `INT`), anything else as written.
pub fn map_table(name: String, raw: Vec<RawColumn>) -> Table {
    let mut keyed: Vec<(i64, String)> = raw
        .iter()
        .filter(|column| column.pk > 0)
        .map(|column| (column.pk, column.name.clone()))
        .collect();
    keyed.sort();

    let columns = raw
        .into_iter()
        .map(|column| {
            let mut mapped = Column::new(column.name, column.declared_type.unwrap_or_default());
            mapped.not_null = column.not_null;
            mapped.pk_ordinal = u32::try_from(column.pk).unwrap_or(0);
            mapped
        })
        .collect();

    Table {
        name,
        columns,
        primary_keys: keyed.into_iter().map(|(_, name)| name).collect(),
        foreign_keys: Vec::new(),
    }
}

/// One entry per referencing column, in constraint order.
///
/// `REFERENCES parent` without a column list points at the parent's primary
/// key; `tables` is searched (case-insensitively) to resolve it.
pub fn map_foreign_keys(mut raw: Vec<RawForeignKey>, tables: &[Table]) -> Vec<ForeignKey> {
    raw.sort_by_key(|fk| (fk.id, fk.seq));
    raw.into_iter()
        .map(|fk| {
            let referenced = match fk.to {
                Some(column) => column,
                None => implicit_reference(tables, &fk.table, fk.seq).unwrap_or_default(),
            };
            ForeignKey::new(fk.table, referenced, fk.from)
        })
        .collect()
}

fn implicit_reference(tables: &[Table], parent: &str, seq: i64) -> Option<String> {
    let position = usize::try_from(seq).ok()?;
    tables
        .iter()
        .find(|table| table.name.eq_ignore_ascii_case(parent))
        .and_then(|table| table.primary_keys.get(position))
        .cloned()
}
