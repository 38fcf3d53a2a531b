//! The node capability set: what a graph unit must expose to be scheduled.
//!
//! A unit is anything that declares the keys it consumes and produces and can
//! transform one record subset into another. There is no shared base state;
//! the trait is the whole contract.

use smallvec::SmallVec;

use super::record::RecordSet;

/// Small inline list for unit key declarations. Most units touch one or two
/// keys, so the common case never heap-allocates.
pub type KeyList = SmallVec<[String; 4]>;

/// Builds a `KeyList` from string literals.
pub fn key_list(names: &[&str]) -> KeyList {
    names.iter().map(|s| s.to_string()).collect()
}

/// Opaque failure raised by a unit's own `apply`. The executor wraps it with
/// the unit's name; the core never inspects it further.
pub type UnitError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A single graph node: consumes a fixed set of named inputs and produces a
/// fixed set of named outputs.
///
/// Contract for `apply`: the argument's key set equals `inputs()` exactly and
/// the result's key set must equal `outputs()` exactly. Violating the output
/// side is a breach attributable to the unit implementation; the executor
/// checks for it before merging results back into the working set.
///
/// Units are shared across graphs behind `Arc`, so `apply` takes `&self`. A
/// unit holding private mutable state (learnable parameters, accumulated
/// statistics) keeps it behind interior mutability; callers that run
/// concurrent forward passes over such units must synchronize externally.
pub trait ComputationUnit<R>: Send + Sync {
    /// The keys this unit consumes, in declaration order.
    fn inputs(&self) -> &[String];

    /// The keys this unit produces, in declaration order.
    fn outputs(&self) -> &[String];

    /// Diagnostic name, unique within a graph.
    fn name(&self) -> &str;

    /// Transforms a record subset keyed exactly by `inputs()` into a subset
    /// keyed exactly by `outputs()`.
    fn apply(&self, records: RecordSet<R>) -> Result<RecordSet<R>, UnitError>;

    /// Snapshot of this unit's private state for checkpointing. Stateless
    /// units keep the default.
    fn state(&self) -> Option<serde_json::Value> {
        None
    }

    /// Restores a snapshot previously returned by [`state`](Self::state).
    fn load_state(&self, _state: &serde_json::Value) -> Result<(), UnitError> {
        Ok(())
    }
}
