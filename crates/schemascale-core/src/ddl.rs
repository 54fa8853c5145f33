use crate::schema::Table;

/// Render a SQLite `CREATE TABLE` statement for a table.
///
/// A single-column primary key is declared inline on its column; a composite
/// key becomes a trailing `PRIMARY KEY (...)` clause. Each foreign key renders
/// as `FOREIGN KEY (target_column) REFERENCES source_table(source_column)`.
pub fn create_table_sql(table: &Table) -> String {
    let inline_pk = match table.primary_keys.as_slice() {
        [single] => Some(single.as_str()),
        _ => None,
    };

    let mut lines = Vec::with_capacity(table.columns.len() + table.foreign_keys.len() + 1);

    for column in &table.columns {
        let mut line = quote_ident(&column.name);
        if !column.declared_type.is_empty() {
            line.push(' ');
            line.push_str(&column.declared_type);
        }
        if column.not_null {
            line.push_str(" NOT NULL");
        }
        if inline_pk == Some(column.name.as_str()) {
            line.push_str(" PRIMARY KEY");
        }
        lines.push(line);
    }

    if table.is_composite_key() {
        let keys = table
            .primary_keys
            .iter()
            .map(|key| quote_ident(key))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("PRIMARY KEY ({keys})"));
    }

    for fk in &table.foreign_keys {
        lines.push(format!(
            "FOREIGN KEY ({}) REFERENCES {}({})",
            quote_ident(&fk.target_column),
            quote_ident(&fk.source_table),
            quote_ident(&fk.source_column)
        ));
    }

    format!(
        "CREATE TABLE {} (\n  {}\n);",
        quote_ident(&table.name),
        lines.join(",\n  ")
    )
}

/// Double-quote an identifier, escaping embedded quotes.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Column, ForeignKey, Table};

    #[test]
    fn single_key_is_declared_inline() {
        let mut table = Table::new("singer");
        table.columns = vec![
            Column::new("singer_id", "INT").primary_key(1),
            Column::new("name", "TEXT"),
        ];
        table.primary_keys = vec!["singer_id".to_string()];

        let sql = create_table_sql(&table);
        assert_eq!(
            sql,
            "CREATE TABLE \"singer\" (\n  \"singer_id\" INT NOT NULL PRIMARY KEY,\n  \"name\" TEXT\n);"
        );
    }

    #[test]
    fn composite_key_and_foreign_keys_render_as_trailing_clauses() {
        let mut table = Table::new("a_b");
        table.columns = vec![
            Column::new("a_id", "INT").primary_key(1),
            Column::new("b_id", "INT").primary_key(2),
        ];
        table.primary_keys = vec!["a_id".to_string(), "b_id".to_string()];
        table.foreign_keys = vec![
            ForeignKey::new("a", "a_id", "a_id"),
            ForeignKey::new("b", "b_id", "b_id"),
        ];

        let sql = create_table_sql(&table);
        assert!(!sql.contains("NOT NULL PRIMARY KEY"));
        assert!(sql.contains("PRIMARY KEY (\"a_id\", \"b_id\")"));
        assert!(sql.contains("FOREIGN KEY (\"a_id\") REFERENCES \"a\"(\"a_id\")"));
        assert!(sql.contains("FOREIGN KEY (\"b_id\") REFERENCES \"b\"(\"b_id\")"));
    }

    #[test]
    fn untyped_columns_and_quotes() {
        let mut table = Table::new("odd\"name");
        table.columns = vec![Column::new("payload", "")];

        let sql = create_table_sql(&table);
        assert_eq!(sql, "CREATE TABLE \"odd\"\"name\" (\n  \"payload\"\n);");
    }
}
