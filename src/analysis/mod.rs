//! Static analyses layered on top of the graph contract.
pub mod topology;
