//! Core data structures: the unit trait, the record map, and the graph.
pub mod dag;
pub mod node;
pub mod record;

pub use dag::Dag;
pub use node::{key_list, ComputationUnit, KeyList, UnitError};
pub use record::RecordSet;
