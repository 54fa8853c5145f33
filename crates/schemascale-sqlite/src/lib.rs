//! SQLite plumbing: schema introspection and DDL materialization.

pub mod adapter;
pub mod errors;
pub mod introspect;
pub mod materialize;

pub use adapter::Adapter;
pub use errors::SqliteError;
pub use introspect::{SqliteAdapter, introspect_sqlite, open_pool};
pub use materialize::{MaterializeOutcome, materialize};

pub use schemascale_core::Schema;
