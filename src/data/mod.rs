//! Loading labeled batches from disk.
pub mod loader;

pub use loader::{load_batches, Batch, DataError};
