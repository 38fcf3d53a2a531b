//! A synchronous, single-pass forward executor.

use super::error::ForwardError;
use crate::graph::dag::Dag;
use crate::graph::record::RecordSet;

/// Runs a validated graph's unit sequence against a concrete record set.
///
/// Each call threads a fresh working set through the units in the order fixed
/// at validation: extract the unit's declared inputs (consuming them), invoke
/// `apply`, merge the produced records back. Execution is strictly sequential;
/// a unit's inputs may come from the immediately preceding unit.
pub struct Executor<'a, R> {
    dag: &'a Dag<R>,
}

impl<'a, R> Executor<'a, R> {
    pub fn new(dag: &'a Dag<R>) -> Self {
        Self { dag }
    }

    /// Transforms an input record set into the declared output record set.
    ///
    /// Callable any number of times; calls are independent. Fails without a
    /// partial result if the caller's keys are wrong or a unit breaks its key
    /// contract.
    pub fn forward(&self, inputs: RecordSet<R>) -> Result<RecordSet<R>, ForwardError> {
        if !inputs.key_set_matches(self.dag.input_keys()) {
            return Err(ForwardError::InputKeyMismatch {
                expected: sorted(self.dag.input_keys()),
                actual: inputs.sorted_keys(),
            });
        }

        let mut working = inputs;

        for unit in self.dag.units() {
            // Extract (and thereby consume) the unit's declared inputs.
            let mut subset = RecordSet::new();
            for key in unit.inputs() {
                match working.remove(key) {
                    Some(record) => {
                        subset.insert(key.clone(), record);
                    }
                    None => {
                        return Err(ForwardError::MissingInput {
                            unit: unit.name().to_string(),
                            key: key.clone(),
                        })
                    }
                }
            }

            let produced = unit.apply(subset).map_err(|source| ForwardError::Unit {
                unit: unit.name().to_string(),
                source,
            })?;

            for (key, record) in produced {
                if working.contains_key(&key) {
                    return Err(ForwardError::DuplicateOutput {
                        unit: unit.name().to_string(),
                        key,
                    });
                }
                working.insert(key, record);
            }
        }

        if !working.key_set_matches(self.dag.output_keys()) {
            return Err(ForwardError::OutputKeyMismatch {
                expected: sorted(self.dag.output_keys()),
                actual: working.sorted_keys(),
            });
        }

        Ok(working)
    }
}

fn sorted(keys: &[String]) -> Vec<String> {
    let mut keys = keys.to_vec();
    keys.sort();
    keys.dedup();
    keys
}
