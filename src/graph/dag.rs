//! The validated graph: an ordered unit sequence plus its key contract.

use std::sync::Arc;

use super::node::ComputationUnit;
use super::record::RecordSet;
use crate::analysis::topology;
use crate::execution::{Executor, ForwardError};
use crate::validation::{ScheduleError, ScheduleValidator};

/// A validated, ordered sequence of computation units together with the
/// declared global input and output key contracts.
///
/// Construction runs the schedule validator; a `Dag` that exists has already
/// been proven to realize its contract, and its structure is immutable from
/// then on. Units are shared behind `Arc`, so the same unit (and its private
/// state) may be referenced by several graphs.
pub struct Dag<R> {
    units: Vec<Arc<dyn ComputationUnit<R>>>,
    inputs: Vec<String>,
    outputs: Vec<String>,
}

impl<R> Dag<R> {
    /// Validates the declared unit order against the declared contract and,
    /// on success, freezes it into a runnable graph.
    pub fn new(
        units: Vec<Arc<dyn ComputationUnit<R>>>,
        inputs: Vec<String>,
        outputs: Vec<String>,
    ) -> Result<Self, ScheduleError> {
        ScheduleValidator::new(&units, &inputs, &outputs).validate()?;
        Ok(Self { units, inputs, outputs })
    }

    /// Convenience constructor: derives a producer-first order from the
    /// units' key dependencies, then validates it through the normal path.
    ///
    /// The validator stays authoritative; this only picks the order.
    pub fn auto_ordered(
        units: Vec<Arc<dyn ComputationUnit<R>>>,
        inputs: Vec<String>,
        outputs: Vec<String>,
    ) -> Result<Self, ScheduleError> {
        let order = topology::derive_order(&units, &inputs)?;
        let units = order.into_iter().map(|i| units[i].clone()).collect();
        Self::new(units, inputs, outputs)
    }

    /// Runs one forward pass. See [`Executor::forward`].
    pub fn forward(&self, inputs: RecordSet<R>) -> Result<RecordSet<R>, ForwardError> {
        Executor::new(self).forward(inputs)
    }

    /// The units in execution order.
    pub fn units(&self) -> &[Arc<dyn ComputationUnit<R>>] {
        &self.units
    }

    /// Looks a unit up by its diagnostic name.
    pub fn unit(&self, name: &str) -> Option<&Arc<dyn ComputationUnit<R>>> {
        self.units.iter().find(|u| u.name() == name)
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// The declared global input keys.
    pub fn input_keys(&self) -> &[String] {
        &self.inputs
    }

    /// The declared global output keys.
    pub fn output_keys(&self) -> &[String] {
        &self.outputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::{key_list, KeyList, UnitError};

    struct Rename {
        name: String,
        inputs: KeyList,
        outputs: KeyList,
    }

    impl ComputationUnit<u8> for Rename {
        fn inputs(&self) -> &[String] {
            &self.inputs
        }
        fn outputs(&self) -> &[String] {
            &self.outputs
        }
        fn name(&self) -> &str {
            &self.name
        }
        fn apply(&self, records: RecordSet<u8>) -> Result<RecordSet<u8>, UnitError> {
            let mut out = RecordSet::new();
            for (from, to) in self.inputs.iter().zip(self.outputs.iter()) {
                let record = records
                    .get(from)
                    .copied()
                    .ok_or_else(|| UnitError::from(format!("record '{from}' missing")))?;
                out.insert(to.clone(), record);
            }
            Ok(out)
        }
    }

    fn rename(name: &str, from: &str, to: &str) -> Arc<dyn ComputationUnit<u8>> {
        Arc::new(Rename {
            name: name.to_string(),
            inputs: key_list(&[from]),
            outputs: key_list(&[to]),
        })
    }

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_construction_rejects_bad_order() {
        let units = vec![rename("b", "y", "z"), rename("a", "x", "y")];
        let err = Dag::new(units, keys(&["x"]), keys(&["z"])).err().unwrap();
        assert!(matches!(err, ScheduleError::UnresolvedInput { .. }));
    }

    #[test]
    fn test_auto_ordered_repairs_a_shuffled_list() {
        // Same list the plain constructor rejects above.
        let units = vec![rename("b", "y", "z"), rename("a", "x", "y")];
        let dag = Dag::auto_ordered(units, keys(&["x"]), keys(&["z"])).unwrap();
        assert_eq!(dag.units()[0].name(), "a");
        assert_eq!(dag.units()[1].name(), "b");

        let mut inputs = RecordSet::new();
        inputs.insert("x", 3u8);
        let out = dag.forward(inputs).unwrap();
        assert_eq!(out.get("z"), Some(&3));
    }

    #[test]
    fn test_units_are_shareable_across_graphs() {
        let shared = rename("shared", "x", "y");
        let g1 = Dag::new(vec![shared.clone()], keys(&["x"]), keys(&["y"])).unwrap();
        let g2 = Dag::new(vec![shared], keys(&["x"]), keys(&["y"])).unwrap();
        for dag in [&g1, &g2] {
            let mut inputs = RecordSet::new();
            inputs.insert("x", 1u8);
            assert!(dag.forward(inputs).is_ok());
        }
    }

    #[test]
    fn test_unit_lookup_by_name() {
        let dag = Dag::new(vec![rename("a", "x", "y")], keys(&["x"]), keys(&["y"])).unwrap();
        assert!(dag.unit("a").is_some());
        assert!(dag.unit("missing").is_none());
        assert_eq!(dag.unit_count(), 1);
    }
}
