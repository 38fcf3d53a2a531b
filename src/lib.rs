//! A small dataflow executor over named record sets.
//!
//! A graph is a caller-declared, ordered list of computation units plus a
//! global input/output key contract. Construction proves — once, against
//! placeholder availability — that the declared order is a legal schedule
//! under linear consumption (a key, once read, is gone). After that, forward
//! execution threads a concrete record set through the units any number of
//! times without re-deriving or re-verifying an ordering.
//!
//! The `units`, `data`, and `train` modules are the orchestration layer: a
//! handful of concrete units over [`Value`] records, JSON batch loading, and
//! a step-budgeted training loop with checkpointing.

pub mod analysis;
pub mod data;
pub mod execution;
pub mod graph;
pub mod train;
pub mod units;
pub mod validation;
pub mod value;

pub use execution::{Executor, ForwardError};
pub use graph::{key_list, ComputationUnit, Dag, KeyList, RecordSet, UnitError};
pub use validation::{ScheduleError, ScheduleValidator};
pub use value::Value;
