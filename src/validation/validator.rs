//! The construction-time check that a declared unit order is a legal schedule.

use std::collections::HashSet;
use std::sync::Arc;

use super::error::ScheduleError;
use crate::graph::node::ComputationUnit;

/// Simulates execution over placeholder availability, without running any
/// real computation.
///
/// Starting from the declared global inputs, each unit in order must find all
/// of its required keys available; required keys are then removed (linear
/// consumption: a key, once read, is gone) and the unit's output keys are
/// added. After the last unit the available set must equal the declared
/// global outputs exactly.
///
/// A graph that passes this check once can run its forward loop forever
/// without re-deriving or re-verifying an ordering, provided units honor
/// their key contracts.
pub struct ScheduleValidator<'a, R> {
    units: &'a [Arc<dyn ComputationUnit<R>>],
    inputs: &'a [String],
    outputs: &'a [String],
}

impl<'a, R> ScheduleValidator<'a, R> {
    pub fn new(
        units: &'a [Arc<dyn ComputationUnit<R>>],
        inputs: &'a [String],
        outputs: &'a [String],
    ) -> Self {
        Self { units, inputs, outputs }
    }

    /// Accepts or rejects the declared order against the declared contract.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        let mut available: HashSet<&str> = self.inputs.iter().map(String::as_str).collect();

        for unit in self.units {
            let mut missing: Vec<String> = unit
                .inputs()
                .iter()
                .filter(|key| !available.contains(key.as_str()))
                .cloned()
                .collect();
            if !missing.is_empty() {
                missing.sort();
                return Err(ScheduleError::UnresolvedInput {
                    unit: unit.name().to_string(),
                    missing,
                });
            }

            for key in unit.inputs() {
                available.remove(key.as_str());
            }

            for key in unit.outputs() {
                if !available.insert(key.as_str()) {
                    return Err(ScheduleError::DuplicateOutput {
                        unit: unit.name().to_string(),
                        key: key.clone(),
                    });
                }
            }
        }

        let declared: HashSet<&str> = self.outputs.iter().map(String::as_str).collect();
        if available != declared {
            return Err(ScheduleError::OutputMismatch {
                expected: sorted(&declared),
                actual: sorted(&available),
            });
        }

        Ok(())
    }
}

fn sorted(keys: &HashSet<&str>) -> Vec<String> {
    let mut keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
    keys.sort();
    keys
}
