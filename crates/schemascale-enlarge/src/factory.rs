//! Column and table builders shared by the generators.

use schemascale_core::{Column, ForeignKey, Table};

/// Attribute template for plain entity tables, applied in order.
pub const ENTITY_ATTR_TEMPLATES: &[(&str, &str)] = &[
    ("name", "TEXT"),
    ("description", "TEXT"),
    ("content", "TEXT"),
    ("type", "TEXT"),
    ("status", "TEXT"),
    ("created_at", "TIMESTAMP"),
    ("updated_at", "TIMESTAMP"),
    ("count", "INT"),
    ("year", "INT"),
];

/// Attribute template for meta tables, applied in order.
pub const META_ATTR_TEMPLATES: &[(&str, &str)] = &[
    ("key", "TEXT"),
    ("value", "TEXT"),
    ("timestamp", "TIMESTAMP"),
    ("flag", "INT"),
    ("status", "TEXT"),
];

/// Name suffixes that mark meta tables.
pub const META_SUFFIXES: [&str; 4] = ["_log", "_entry", "_state", "_snapshot"];

pub const ENTITY_FILLER_PREFIX: &str = "attr";
pub const META_FILLER_PREFIX: &str = "meta";

/// Declared type of every synthetic key column.
pub const KEY_TYPE: &str = "INT";
/// Declared type of filler columns.
pub const FILLER_TYPE: &str = "TEXT";

/// Separator between name parts; its presence marks family and join names.
pub const NAME_SEPARATOR: char = '_';

/// Synthetic primary key column name of a table.
pub fn entity_pk_name(table: &str) -> String {
    format!("{table}_id")
}

/// `INT NOT NULL` key column at the given key position.
pub fn key_column(name: impl Into<String>, ordinal: u32) -> Column {
    Column::new(name, KEY_TYPE).primary_key(ordinal)
}

/// Nullable `INT` column used as the local side of a foreign key.
pub fn reference_column(name: impl Into<String>) -> Column {
    Column::new(name, KEY_TYPE)
}

/// Grow `columns` to `target` entries: template attributes first (skipping
/// names already present), then `<prefix>_<i>` filler columns.
pub fn fill_columns(
    columns: &mut Vec<Column>,
    target: usize,
    templates: &[(&str, &str)],
    filler_prefix: &str,
) {
    for (name, declared_type) in templates {
        if columns.len() >= target {
            break;
        }
        if has_column(columns, name) {
            continue;
        }
        columns.push(Column::new(*name, *declared_type));
    }

    let mut index = 1;
    while columns.len() < target {
        let name = format!("{filler_prefix}_{index}");
        if !has_column(columns, &name) {
            columns.push(Column::new(name, FILLER_TYPE));
        }
        index += 1;
    }
}

pub fn has_column(columns: &[Column], name: &str) -> bool {
    columns.iter().any(|column| column.name == name)
}

/// Assemble a table whose primary key is the given column list, in order.
pub fn build_table(
    name: impl Into<String>,
    columns: Vec<Column>,
    primary_keys: Vec<String>,
    foreign_keys: Vec<ForeignKey>,
) -> Table {
    Table {
        name: name.into(),
        columns,
        primary_keys,
        foreign_keys,
    }
}
