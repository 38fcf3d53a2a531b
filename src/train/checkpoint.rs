//! Periodic persistence of graph state.
//!
//! A checkpoint is a JSON document mapping unit names to the state snapshots
//! the units themselves produce. Stateless units simply do not appear.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::graph::dag::Dag;
use crate::graph::node::UnitError;

#[derive(Error, Debug)]
pub enum CheckpointError {
    #[error("failed to write checkpoint '{path}'")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read checkpoint '{path}'")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode checkpoint")]
    Encode(#[source] serde_json::Error),
    #[error("failed to parse checkpoint '{path}'")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("checkpoint references unknown unit '{unit}'")]
    UnknownUnit { unit: String },
    #[error("unit '{unit}' rejected its checkpointed state")]
    Restore {
        unit: String,
        #[source]
        source: UnitError,
    },
}

/// The serialized form of a graph's mutable state, keyed by unit name.
/// BTreeMap keeps the on-disk document stable across runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphState {
    pub units: BTreeMap<String, serde_json::Value>,
}

/// Collects the state of every stateful unit in the graph.
pub fn capture<R>(dag: &Dag<R>) -> GraphState {
    let mut units = BTreeMap::new();
    for unit in dag.units() {
        if let Some(state) = unit.state() {
            units.insert(unit.name().to_string(), state);
        }
    }
    GraphState { units }
}

/// Serializes the graph's state to a JSON file.
pub fn save<R>(dag: &Dag<R>, path: impl AsRef<Path>) -> Result<(), CheckpointError> {
    let path = path.as_ref();
    let state = capture(dag);
    let text = serde_json::to_string_pretty(&state).map_err(CheckpointError::Encode)?;
    fs::write(path, text).map_err(|source| CheckpointError::Write {
        path: path.display().to_string(),
        source,
    })
}

/// Restores a previously saved state into a live graph, matching units by
/// name. Every name in the file must resolve to a unit in the graph.
pub fn load<R>(dag: &Dag<R>, path: impl AsRef<Path>) -> Result<(), CheckpointError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| CheckpointError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let state: GraphState = serde_json::from_str(&text).map_err(|source| CheckpointError::Parse {
        path: path.display().to_string(),
        source,
    })?;

    for (name, unit_state) in &state.units {
        let unit = dag
            .unit(name)
            .ok_or_else(|| CheckpointError::UnknownUnit { unit: name.clone() })?;
        unit.load_state(unit_state)
            .map_err(|source| CheckpointError::Restore {
                unit: name.clone(),
                source,
            })?;
    }
    Ok(())
}
