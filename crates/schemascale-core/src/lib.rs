//! Core contracts and helpers for schemascale.
//!
//! This crate defines the schema object exchanged between the introspection,
//! enlargement, materialization and reporting stages, together with the
//! type-group normalization, structural validation and `CREATE TABLE`
//! rendering those stages share.

pub mod ddl;
pub mod error;
pub mod fingerprint;
pub mod schema;
pub mod types;
pub mod validation;

pub use ddl::create_table_sql;
pub use error::{Error, Result};
pub use fingerprint::schema_fingerprint;
pub use schema::{Column, ForeignKey, Schema, Table, TableBody};
pub use types::TypeGroup;
pub use validation::{validate_references, validate_schema};
