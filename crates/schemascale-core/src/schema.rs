use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;
use crate::types::TypeGroup;

/// Schema object for one database: dataset, database id and its tables.
///
/// Tables keep their insertion order: original tables first, followed by any
/// tables appended by an enlargement run. On the wire the tables are a JSON
/// object keyed by table name (`"schema"`), which is what the downstream
/// evaluation tooling reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Schema {
    pub dataset: String,
    pub db_id: String,
    #[serde(rename = "schema", with = "table_map")]
    #[schemars(with = "BTreeMap<String, TableBody>")]
    pub tables: Vec<Table>,
}

/// A table with ordered columns, its primary key and outgoing foreign keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    /// Primary key column names in key order (composite keys keep ordinal order).
    pub primary_keys: Vec<String>,
    pub foreign_keys: Vec<ForeignKey>,
}

/// Wire representation of a table (the table name is the map key).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TableBody {
    pub columns: Vec<Column>,
    #[serde(default)]
    pub primary_keys: Vec<String>,
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKey>,
}

#[derive(Serialize)]
struct TableBodyRef<'a> {
    columns: &'a [Column],
    primary_keys: &'a [String],
    foreign_keys: &'a [ForeignKey],
}

/// Column metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Column {
    pub name: String,
    /// Declared SQL type; empty when the column was declared without one.
    #[serde(rename = "type", default, deserialize_with = "nullable_string")]
    pub declared_type: String,
    #[serde(rename = "typegroup")]
    pub type_group: TypeGroup,
    #[serde(rename = "notnull")]
    pub not_null: bool,
    /// 0 when not part of the primary key, else the 1-based key position.
    #[serde(rename = "pk")]
    pub pk_ordinal: u32,
}

/// Foreign key owned by a table.
///
/// `source_table.source_column` is the referenced (parent) side and
/// `target_column` is the local column on the owning table. The naming is
/// inverted relative to the usual FK vocabulary; it is kept as-is because the
/// evaluation tooling reads these exact keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKey {
    pub source_table: String,
    pub source_column: String,
    pub target_column: String,
}

impl Column {
    /// Build a nullable, non-key column; the type group is derived from the declared type.
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        let declared_type = declared_type.into();
        Self {
            name: name.into(),
            type_group: TypeGroup::from_declared(&declared_type),
            declared_type,
            not_null: false,
            pk_ordinal: 0,
        }
    }

    /// Mark the column as the `ordinal`-th primary key column (implies NOT NULL).
    pub fn primary_key(mut self, ordinal: u32) -> Self {
        self.pk_ordinal = ordinal;
        self.not_null = true;
        self
    }

    pub fn is_primary_key(&self) -> bool {
        self.pk_ordinal > 0
    }
}

impl ForeignKey {
    /// `local_column` on the owning table references `referenced_table.referenced_column`.
    pub fn new(
        referenced_table: impl Into<String>,
        referenced_column: impl Into<String>,
        local_column: impl Into<String>,
    ) -> Self {
        Self {
            source_table: referenced_table.into(),
            source_column: referenced_column.into(),
            target_column: local_column.into(),
        }
    }
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            primary_keys: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Columns that are not part of the declared primary key.
    pub fn non_key_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns
            .iter()
            .filter(|column| !self.primary_keys.contains(&column.name))
    }

    pub fn is_composite_key(&self) -> bool {
        self.primary_keys.len() > 1
    }
}

impl TableBody {
    fn into_table(self, name: String) -> Table {
        Table {
            name,
            columns: self.columns,
            primary_keys: self.primary_keys,
            foreign_keys: self.foreign_keys,
        }
    }
}

impl Schema {
    pub fn new(dataset: impl Into<String>, db_id: impl Into<String>) -> Self {
        Self {
            dataset: dataset.into(),
            db_id: db_id.into(),
            tables: Vec::new(),
        }
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|table| table.name == name)
    }

    pub fn contains_table(&self, name: &str) -> bool {
        self.table(name).is_some()
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|table| table.name.as_str())
    }

    /// Every column name used by any table.
    pub fn column_names(&self) -> BTreeSet<&str> {
        self.tables
            .iter()
            .flat_map(|table| table.columns.iter().map(|column| column.name.as_str()))
            .collect()
    }

    pub fn foreign_key_count(&self) -> usize {
        self.tables.iter().map(|table| table.foreign_keys.len()).sum()
    }

    /// Tables present in `self` but not in `original`, in schema order.
    pub fn tables_not_in<'a>(&'a self, original: &'a Schema) -> impl Iterator<Item = &'a Table> {
        self.tables
            .iter()
            .filter(move |table| !original.contains_table(&table.name))
    }

    pub fn from_json_str(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Canonical pretty JSON (4-space indent) used for persisted schema files.
    pub fn to_pretty_json(&self) -> Result<String> {
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.serialize(&mut serializer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    pub fn write_json_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_pretty_json()?)?;
        Ok(())
    }
}

fn nullable_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

mod table_map {
    use std::collections::HashSet;
    use std::fmt;

    use serde::de::{self, MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};

    use super::{Table, TableBody, TableBodyRef};

    pub fn serialize<S>(tables: &[Table], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(tables.len()))?;
        for table in tables {
            let body = TableBodyRef {
                columns: &table.columns,
                primary_keys: &table.primary_keys,
                foreign_keys: &table.foreign_keys,
            };
            map.serialize_entry(&table.name, &body)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Table>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(TableMapVisitor)
    }

    struct TableMapVisitor;

    impl<'de> Visitor<'de> for TableMapVisitor {
        type Value = Vec<Table>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a map of table name to table definition")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut tables = Vec::with_capacity(access.size_hint().unwrap_or(0));
            let mut seen = HashSet::new();
            while let Some((name, body)) = access.next_entry::<String, TableBody>()? {
                if !seen.insert(name.clone()) {
                    return Err(de::Error::custom(format!("duplicate table name: {name}")));
                }
                tables.push(body.into_table(name));
            }
            Ok(tables)
        }
    }
}
