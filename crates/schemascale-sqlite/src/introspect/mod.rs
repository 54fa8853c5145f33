use std::path::Path;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::debug;

use schemascale_core::Schema;

use crate::adapter::Adapter;
use crate::errors::SqliteError;

mod mapper;
mod queries;

/// Adapter for SQLite database files.
#[derive(Debug, Clone)]
pub struct SqliteAdapter {
    pool: SqlitePool,
}

impl SqliteAdapter {
    /// Create a new adapter using a pre-configured pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Adapter for SqliteAdapter {
    fn engine(&self) -> &'static str {
        "sqlite"
    }

    async fn introspect(&self, dataset: &str, db_id: &str) -> Result<Schema, SqliteError> {
        introspect(&self.pool, dataset, db_id).await
    }
}

/// Open a read-only pool over an existing database file.
pub async fn open_pool(path: &Path) -> Result<SqlitePool, SqliteError> {
    let options = SqliteConnectOptions::new().filename(path).read_only(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Introspect a database file into a schema object.
pub async fn introspect_sqlite(
    path: &Path,
    dataset: &str,
    db_id: &str,
) -> Result<Schema, SqliteError> {
    let pool = open_pool(path).await?;
    let schema = introspect(&pool, dataset, db_id).await;
    pool.close().await;
    schema
}

/// Tables come back in creation order; columns in declaration order.
pub async fn introspect(
    pool: &SqlitePool,
    dataset: &str,
    db_id: &str,
) -> Result<Schema, SqliteError> {
    let mut pending = Vec::new();
    for table_name in queries::list_tables(pool).await? {
        let raw_columns = queries::list_columns(pool, &table_name).await?;
        let raw_fks = queries::list_foreign_keys(pool, &table_name).await?;
        pending.push((mapper::map_table(table_name, raw_columns), raw_fks));
    }

    let tables: Vec<_> = pending.iter().map(|(table, _)| table.clone()).collect();
    let mut schema = Schema::new(dataset, db_id);
    for (mut table, raw_fks) in pending {
        table.foreign_keys = mapper::map_foreign_keys(raw_fks, &tables);
        debug!(
            db_id,
            table = %table.name,
            columns = table.columns.len(),
            foreign_keys = table.foreign_keys.len(),
            "table introspected"
        );
        schema.tables.push(table);
    }

    Ok(schema)
}
