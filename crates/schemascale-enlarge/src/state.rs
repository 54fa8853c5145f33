use schemascale_core::{Schema, Table};

use crate::names::UsedNames;

/// Mutable state of one enlargement run.
///
/// Owned by the engine for the duration of a run and lent to one generator
/// call at a time. A fresh state is built for every database.
#[derive(Debug, Clone)]
pub struct GenerationState {
    /// Original tables followed by the synthetic tables created so far.
    pub schema: Schema,
    /// Seeded with every original table and column name.
    pub used_names: UsedNames,
    pub anchor_links_used: usize,
    /// Entity tables (plain, family and bridge) eligible for join pairing.
    pub entity_tables: Vec<String>,
    pub family_tables: Vec<String>,
    pub bridge_tables: Vec<String>,
    pub join_tables: Vec<String>,
    pub meta_tables: Vec<String>,
}

impl GenerationState {
    pub fn new(original: &Schema) -> Self {
        let mut used_names = UsedNames::new();
        for table in &original.tables {
            used_names.claim(&table.name);
            for column in &table.columns {
                used_names.claim(&column.name);
            }
        }

        Self {
            schema: original.clone(),
            used_names,
            anchor_links_used: 0,
            entity_tables: Vec::new(),
            family_tables: Vec::new(),
            bridge_tables: Vec::new(),
            join_tables: Vec::new(),
            meta_tables: Vec::new(),
        }
    }

    pub fn push_table(&mut self, table: Table) {
        self.schema.tables.push(table);
    }

    pub fn table_count(&self) -> usize {
        self.schema.tables.len()
    }
}
