use async_trait::async_trait;

use schemascale_core::Schema;

use crate::errors::SqliteError;

/// Trait implemented by database adapters that can produce a schema object.
#[async_trait]
pub trait Adapter {
    /// Returns the engine identifier (e.g. `sqlite`).
    fn engine(&self) -> &'static str;

    /// Introspect the database into a schema object labelled with `dataset` and `db_id`.
    async fn introspect(&self, dataset: &str, db_id: &str) -> Result<Schema, SqliteError>;
}
