//! Structural errors raised while validating a declared unit order.

use thiserror::Error;

/// A construction-time failure: the declared schedule cannot realize the
/// declared input/output contract. Any of these aborts graph construction
/// entirely; no partially-built graph is observable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// A unit requires keys that are not available at the point it runs.
    /// Keys consumed by an earlier unit are gone (linear consumption), so
    /// this also fires when two units try to read the same key.
    #[error("unresolved input(s) {missing:?} for unit '{unit}'")]
    UnresolvedInput { unit: String, missing: Vec<String> },

    /// A unit declares an output key that is already available, i.e. produced
    /// earlier and not yet consumed, or colliding with a still-available
    /// global input.
    #[error("duplicate output key '{key}' declared by unit '{unit}'")]
    DuplicateOutput { unit: String, key: String },

    /// The key set left over after the last unit differs from the declared
    /// global outputs. Both sets are reported sorted.
    #[error("schedule leaves keys {actual:?} but the declared outputs are {expected:?}")]
    OutputMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    /// Raised only by the order-derivation convenience: the units' key
    /// dependencies form a cycle, so no linear order exists.
    #[error("cyclic key dependency involving unit '{unit}'")]
    CyclicDependency { unit: String },
}
