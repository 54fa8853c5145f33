use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::schema::Schema;

/// Validate internal consistency of a schema object.
///
/// This checks:
/// - duplicate tables/columns
/// - primary key columns exist
/// - foreign key local columns exist on the owning table
///
/// Referenced tables are not required to exist; see [`validate_references`].
pub fn validate_schema(schema: &Schema) -> Result<()> {
    let mut tables = BTreeSet::new();

    for table in &schema.tables {
        if !tables.insert(table.name.as_str()) {
            return Err(Error::InvalidSchema(format!(
                "duplicate table name: {}.{}",
                schema.db_id, table.name
            )));
        }

        let mut columns = BTreeSet::new();
        for column in &table.columns {
            if !columns.insert(column.name.as_str()) {
                return Err(Error::InvalidSchema(format!(
                    "duplicate column name: {}.{}.{}",
                    schema.db_id, table.name, column.name
                )));
            }
        }

        for key in &table.primary_keys {
            if !columns.contains(key.as_str()) {
                return Err(Error::InvalidSchema(format!(
                    "primary key column not found: {}.{}.{}",
                    schema.db_id, table.name, key
                )));
            }
        }

        for fk in &table.foreign_keys {
            if !columns.contains(fk.target_column.as_str()) {
                return Err(Error::InvalidSchema(format!(
                    "foreign key column not found: {}.{}.{}",
                    schema.db_id, table.name, fk.target_column
                )));
            }
        }
    }

    Ok(())
}

/// Check that every foreign key references a table present in the schema.
pub fn validate_references(schema: &Schema) -> Result<()> {
    for table in &schema.tables {
        for fk in &table.foreign_keys {
            if !schema.contains_table(&fk.source_table) {
                return Err(Error::InvalidSchema(format!(
                    "referenced table not found: {}.{} -> {}",
                    schema.db_id, table.name, fk.source_table
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Column, ForeignKey, Table};

    fn table(name: &str, columns: &[&str], pk: &[&str]) -> Table {
        let mut table = Table::new(name);
        table.columns = columns
            .iter()
            .map(|column| Column::new(*column, "INT"))
            .collect();
        table.primary_keys = pk.iter().map(|key| key.to_string()).collect();
        table
    }

    #[test]
    fn rejects_missing_primary_key_column() {
        let mut schema = Schema::new("spider", "db");
        schema.tables.push(table("users", &["name"], &["id"]));

        let err = validate_schema(&schema).unwrap_err();
        assert!(err.to_string().contains("primary key column not found"));
    }

    #[test]
    fn rejects_duplicate_columns() {
        let mut schema = Schema::new("spider", "db");
        schema.tables.push(table("users", &["id", "id"], &["id"]));

        assert!(validate_schema(&schema).is_err());
    }

    #[test]
    fn dangling_reference_is_only_caught_by_reference_check() {
        let mut orders = table("orders", &["id", "user_id"], &["id"]);
        orders
            .foreign_keys
            .push(ForeignKey::new("users", "id", "user_id"));
        let mut schema = Schema::new("spider", "db");
        schema.tables.push(orders);

        assert!(validate_schema(&schema).is_ok());
        let err = validate_references(&schema).unwrap_err();
        assert!(err.to_string().contains("referenced table not found"));

        schema.tables.push(table("users", &["id"], &["id"]));
        assert!(validate_references(&schema).is_ok());
    }
}
