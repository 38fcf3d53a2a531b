//! Producer-first order derivation over unit key dependencies.
//!
//! The graph contract takes the unit order as the caller declares it; this
//! module is the optional convenience layer that derives such an order from
//! the units' input/output keys. `Dag::auto_ordered` feeds the result back
//! through the normal validator, which remains the single source of truth.

use std::collections::HashMap;
use std::sync::Arc;

use crate::graph::node::ComputationUnit;
use crate::validation::ScheduleError;

/// Returns unit indices ordered so that every key's producer appears before
/// its consumer. Global input keys need no producer.
///
/// Uses DFS with a three-state visit marker: post-order emission places a
/// unit after everything it depends on, and a unit re-entered while still on
/// the stack means the key dependencies form a cycle.
pub fn derive_order<R>(
    units: &[Arc<dyn ComputationUnit<R>>],
    inputs: &[String],
) -> Result<Vec<usize>, ScheduleError> {
    // Each key has at most one producer; with linear consumption that also
    // means one dataflow edge per key.
    let mut producer: HashMap<&str, usize> = HashMap::new();
    for (i, unit) in units.iter().enumerate() {
        for key in unit.outputs() {
            if producer.insert(key.as_str(), i).is_some() {
                return Err(ScheduleError::DuplicateOutput {
                    unit: unit.name().to_string(),
                    key: key.clone(),
                });
            }
        }
    }

    let mut order = Vec::with_capacity(units.len());
    let mut state = vec![VisitState::None; units.len()];

    for i in 0..units.len() {
        if state[i] == VisitState::None {
            visit(i, units, inputs, &producer, &mut state, &mut order)?;
        }
    }

    Ok(order)
}

#[derive(Clone, PartialEq, Eq)]
enum VisitState {
    None,
    Visiting, // Used for cycle detection
    Visited,
}

fn visit<R>(
    index: usize,
    units: &[Arc<dyn ComputationUnit<R>>],
    inputs: &[String],
    producer: &HashMap<&str, usize>,
    state: &mut Vec<VisitState>,
    order: &mut Vec<usize>,
) -> Result<(), ScheduleError> {
    let unit = &units[index];

    match state[index] {
        VisitState::Visited => return Ok(()),
        VisitState::Visiting => {
            return Err(ScheduleError::CyclicDependency {
                unit: unit.name().to_string(),
            })
        }
        VisitState::None => state[index] = VisitState::Visiting,
    }

    for key in unit.inputs() {
        match producer.get(key.as_str()) {
            Some(&dep) => visit(dep, units, inputs, producer, state, order)?,
            None if inputs.iter().any(|k| k == key) => {}
            None => {
                return Err(ScheduleError::UnresolvedInput {
                    unit: unit.name().to_string(),
                    missing: vec![key.clone()],
                })
            }
        }
    }

    state[index] = VisitState::Visited;
    order.push(index);
    Ok(())
}
