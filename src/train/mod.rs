//! Training-loop orchestration around the graph executor.
pub mod checkpoint;
pub mod trainer;

pub use checkpoint::{CheckpointError, GraphState};
pub use trainer::{EpochLog, Loss, Mse, TrainError, TrainReport, Trainer};
