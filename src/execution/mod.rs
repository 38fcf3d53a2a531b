//! The forward execution loop over a validated graph.
pub mod engine;
pub mod error;

pub use engine::Executor;
pub use error::ForwardError;
