//! Runtime key errors raised during a forward pass.

use thiserror::Error;

use crate::graph::node::UnitError;

/// A per-call failure: the forward invocation aborts with no partial result,
/// but the graph itself stays valid and reusable.
///
/// `MissingInput` and `DuplicateOutput` are defensive re-checks of what the
/// validator already proved; they are only reachable when a unit breaks its
/// key contract at runtime.
#[derive(Error, Debug)]
pub enum ForwardError {
    /// The caller's input key set differs from the declared global inputs.
    #[error("input keys {actual:?} do not match the declared inputs {expected:?}")]
    InputKeyMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    /// A required key vanished from the working set before a unit ran.
    #[error("required input '{key}' missing from the working set for unit '{unit}'")]
    MissingInput { unit: String, key: String },

    /// A unit produced a key that already exists in the working set.
    #[error("unit '{unit}' produced key '{key}' which already exists in the working set")]
    DuplicateOutput { unit: String, key: String },

    /// The final working key set differs from the declared global outputs.
    #[error("output keys {actual:?} do not match the declared outputs {expected:?}")]
    OutputKeyMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    /// A unit's own `apply` failed.
    #[error("unit '{unit}' failed")]
    Unit {
        unit: String,
        #[source]
        source: UnitError,
    },
}
