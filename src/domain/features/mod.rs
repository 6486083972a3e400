//! Feature table domain
//!
//! A `FeatureTable` is a price series extended with named derived columns.
//! Tables are immutable: adding columns or dropping rows returns a new table.

pub mod column;
pub mod table;

pub use column::{ColumnValues, FeatureColumn};
pub use table::FeatureTable;
