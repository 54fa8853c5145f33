//! Table generators, one per synthetic table category.
//!
//! Every generator receives the run state and (where it draws randomness)
//! the run's random stream by mutable reference for the duration of a single
//! call. Generators that can collide on a name report `false` instead of
//! failing.

pub mod bridge;
pub mod entity;
pub mod join;
pub mod meta;

pub use bridge::{bridge_table_name, make_join_bridge, make_join_bridges};
pub use entity::make_entity_table;
pub use join::{join_table_name, make_join_table};
pub use meta::make_meta_table;
