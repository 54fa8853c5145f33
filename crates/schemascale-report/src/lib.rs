//! Metadata reports for enlarged schemas.

pub mod classify;
pub mod errors;
pub mod metadata;

pub use classify::{TableCategory, classify_table};
pub use errors::ReportError;
pub use metadata::{
    CreatedCounts, RatioSettings, ScaleReport, TableCounts, build_report, write_report,
};
