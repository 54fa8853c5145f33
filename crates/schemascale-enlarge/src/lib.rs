//! Schema enlargement engine for schemascale.
//!
//! Consumes an original schema object and a ranked candidate word list and
//! deterministically grows the schema to a target table count with synthetic
//! entity, join and meta tables (plus optional family and bridge tables).

pub mod anchor;
pub mod config;
pub mod engine;
pub mod errors;
pub mod factory;
pub mod generators;
pub mod model;
pub mod names;
pub mod state;

pub use config::ScaleConfig;
pub use engine::{EnlargementEngine, load_candidate_words};
pub use errors::EnlargeError;
pub use model::{EnlargementOutcome, Quota};
pub use names::NameAllocator;
pub use state::GenerationState;
