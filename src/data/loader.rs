//! Batch files: a JSON array of labeled record batches.
//!
//! The training loop consumes these; assembling them (tokenization, feature
//! extraction, shuffling) happens upstream of this crate.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::graph::record::RecordSet;
use crate::value::Value;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("failed to read batch file '{path}'")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse batch file '{path}'")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// One labeled batch: named input series plus the target series the loss is
/// computed against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Batch {
    pub records: HashMap<String, Vec<f64>>,
    pub targets: Vec<f64>,
}

impl Batch {
    /// Assembles the graph input record set for this batch.
    pub fn record_set(&self) -> RecordSet<Value> {
        self.records
            .iter()
            .map(|(key, series)| (key.clone(), Value::series(series.clone())))
            .collect()
    }

    pub fn target_value(&self) -> Value {
        Value::series(self.targets.clone())
    }
}

/// Reads a JSON batch file into memory.
pub fn load_batches(path: impl AsRef<Path>) -> Result<Vec<Batch>, DataError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| DataError::Parse {
        path: path.display().to_string(),
        source,
    })
}
