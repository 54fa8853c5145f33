use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqliteError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("core error: {0}")]
    Core(#[from] schemascale_core::Error),
    /// A generated `CREATE TABLE` failed. Tables created before it are kept.
    #[error("create table failed for {db_id}.{table}: {source}")]
    DdlExecution {
        db_id: String,
        table: String,
        source: sqlx::Error,
    },
}
