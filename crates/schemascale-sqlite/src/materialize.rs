use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{ConnectOptions, Connection};
use tracing::{debug, info};

use schemascale_core::{Schema, create_table_sql};

use crate::errors::SqliteError;

/// What a materialization run left on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializeOutcome {
    pub db_path: PathBuf,
    /// Tables created, in execution order.
    pub created_tables: Vec<String>,
}

/// Copy `source` to `destination` and create every table of `enlarged` that
/// `original` does not have.
///
/// An existing destination file is replaced. Statements run with foreign key
/// enforcement on; the first failing `CREATE TABLE` aborts with
/// [`SqliteError::DdlExecution`] and leaves already created tables in place.
pub async fn materialize(
    source: &Path,
    destination: &Path,
    original: &Schema,
    enlarged: &Schema,
) -> Result<MaterializeOutcome, SqliteError> {
    let start = Instant::now();
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }
    if destination.exists() {
        fs::remove_file(destination)?;
    }
    fs::copy(source, destination)?;

    let mut conn = SqliteConnectOptions::new()
        .filename(destination)
        .foreign_keys(true)
        .connect()
        .await?;

    let mut created_tables = Vec::new();
    for table in enlarged.tables_not_in(original) {
        let sql = create_table_sql(table);
        if let Err(err) = sqlx::query(&sql).execute(&mut conn).await {
            return Err(SqliteError::DdlExecution {
                db_id: enlarged.db_id.clone(),
                table: table.name.clone(),
                source: err,
            });
        }
        debug!(db_id = %enlarged.db_id, table = %table.name, "table created");
        created_tables.push(table.name.clone());
    }
    conn.close().await?;

    info!(
        db_id = %enlarged.db_id,
        created = created_tables.len(),
        path = %destination.display(),
        duration_ms = start.elapsed().as_millis() as u64,
        "database materialized"
    );

    Ok(MaterializeOutcome {
        db_path: destination.to_path_buf(),
        created_tables,
    })
}
