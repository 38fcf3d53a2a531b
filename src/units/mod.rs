//! Bundled unit implementations over [`Value`] records.
//!
//! These cover the common pipeline shapes: a learnable elementwise transform,
//! a two-input join, a fanout (the sanctioned way to hand one value to two
//! consumers under linear consumption), and a fixed nonlinearity.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::graph::node::{key_list, ComputationUnit, KeyList, UnitError};
use crate::graph::record::RecordSet;
use crate::value::Value;

fn take(records: &mut RecordSet<Value>, key: &str) -> Result<Value, UnitError> {
    records
        .remove(key)
        .ok_or_else(|| UnitError::from(format!("record '{key}' missing from apply input")))
}

/// Learnable elementwise affine transform: `out = in * scale + shift`.
///
/// Parameters live behind a `Mutex` so the unit can be shared across graphs;
/// concurrent forward passes over the same instance must be serialized by the
/// caller.
pub struct ScaleShift {
    name: String,
    inputs: KeyList,
    outputs: KeyList,
    params: Mutex<ScaleShiftParams>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleShiftParams {
    pub scale: f64,
    pub shift: f64,
}

impl ScaleShift {
    pub fn new(name: &str, input: &str, output: &str, scale: f64, shift: f64) -> Self {
        Self {
            name: name.to_string(),
            inputs: key_list(&[input]),
            outputs: key_list(&[output]),
            params: Mutex::new(ScaleShiftParams { scale, shift }),
        }
    }

    pub fn params(&self) -> Result<ScaleShiftParams, UnitError> {
        Ok(*self.lock()?)
    }

    pub fn set_params(&self, params: ScaleShiftParams) -> Result<(), UnitError> {
        *self.lock()? = params;
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ScaleShiftParams>, UnitError> {
        self.params
            .lock()
            .map_err(|_| UnitError::from("scale_shift parameter lock poisoned"))
    }
}

impl ComputationUnit<Value> for ScaleShift {
    fn inputs(&self) -> &[String] {
        &self.inputs
    }
    fn outputs(&self) -> &[String] {
        &self.outputs
    }
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, mut records: RecordSet<Value>) -> Result<RecordSet<Value>, UnitError> {
        let params = *self.lock()?;
        let input = take(&mut records, &self.inputs[0])?;
        let mut out = RecordSet::new();
        out.insert(
            self.outputs[0].clone(),
            input.map(|v| v * params.scale + params.shift),
        );
        Ok(out)
    }

    fn state(&self) -> Option<serde_json::Value> {
        let params = *self.params.lock().ok()?;
        serde_json::to_value(params).ok()
    }

    fn load_state(&self, state: &serde_json::Value) -> Result<(), UnitError> {
        let params: ScaleShiftParams = serde_json::from_value(state.clone())?;
        self.set_params(params)
    }
}

/// Elementwise sum of two inputs, broadcast per [`Value::zip_with`].
pub struct Sum {
    name: String,
    inputs: KeyList,
    outputs: KeyList,
}

impl Sum {
    pub fn new(name: &str, lhs: &str, rhs: &str, output: &str) -> Self {
        Self {
            name: name.to_string(),
            inputs: key_list(&[lhs, rhs]),
            outputs: key_list(&[output]),
        }
    }
}

impl ComputationUnit<Value> for Sum {
    fn inputs(&self) -> &[String] {
        &self.inputs
    }
    fn outputs(&self) -> &[String] {
        &self.outputs
    }
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, mut records: RecordSet<Value>) -> Result<RecordSet<Value>, UnitError> {
        let lhs = take(&mut records, &self.inputs[0])?;
        let rhs = take(&mut records, &self.inputs[1])?;
        let mut out = RecordSet::new();
        out.insert(self.outputs[0].clone(), lhs.zip_with(&rhs, |a, b| a + b));
        Ok(out)
    }
}

/// Duplicates one input under several output keys. Cheap: `Series` values
/// share their backing storage.
pub struct Fanout {
    name: String,
    inputs: KeyList,
    outputs: KeyList,
}

impl Fanout {
    pub fn new(name: &str, input: &str, outputs: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            inputs: key_list(&[input]),
            outputs: key_list(outputs),
        }
    }
}

impl ComputationUnit<Value> for Fanout {
    fn inputs(&self) -> &[String] {
        &self.inputs
    }
    fn outputs(&self) -> &[String] {
        &self.outputs
    }
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, mut records: RecordSet<Value>) -> Result<RecordSet<Value>, UnitError> {
        let input = take(&mut records, &self.inputs[0])?;
        let mut out = RecordSet::new();
        for key in &self.outputs {
            out.insert(key.clone(), input.clone());
        }
        Ok(out)
    }
}

/// Elementwise `max(0, x)`.
pub struct Relu {
    name: String,
    inputs: KeyList,
    outputs: KeyList,
}

impl Relu {
    pub fn new(name: &str, input: &str, output: &str) -> Self {
        Self {
            name: name.to_string(),
            inputs: key_list(&[input]),
            outputs: key_list(&[output]),
        }
    }
}

impl ComputationUnit<Value> for Relu {
    fn inputs(&self) -> &[String] {
        &self.inputs
    }
    fn outputs(&self) -> &[String] {
        &self.outputs
    }
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, mut records: RecordSet<Value>) -> Result<RecordSet<Value>, UnitError> {
        let input = take(&mut records, &self.inputs[0])?;
        let mut out = RecordSet::new();
        out.insert(self.outputs[0].clone(), input.map(|v| v.max(0.0)));
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::dag::Dag;
    use std::sync::Arc;

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn single(key: &str, value: Value) -> RecordSet<Value> {
        let mut set = RecordSet::new();
        set.insert(key, value);
        set
    }

    #[test]
    fn test_scale_shift_applies_affine_transform() {
        let unit = ScaleShift::new("affine", "x", "y", 2.0, 1.0);
        let out = unit.apply(single("x", Value::series(vec![1.0, 2.0]))).unwrap();
        assert_eq!(out.get("y").unwrap().to_vec(), vec![3.0, 5.0]);
    }

    #[test]
    fn test_scale_shift_state_round_trip() {
        let unit = ScaleShift::new("affine", "x", "y", 2.0, 1.0);
        let snapshot = unit.state().unwrap();

        unit.set_params(ScaleShiftParams { scale: 9.0, shift: 9.0 }).unwrap();
        unit.load_state(&snapshot).unwrap();
        assert_eq!(unit.params().unwrap(), ScaleShiftParams { scale: 2.0, shift: 1.0 });
    }

    #[test]
    fn test_relu_clamps_negative_entries() {
        let unit = Relu::new("relu", "x", "y");
        let out = unit
            .apply(single("x", Value::series(vec![-2.0, 0.5])))
            .unwrap();
        assert_eq!(out.get("y").unwrap().to_vec(), vec![0.0, 0.5]);
    }

    #[test]
    fn test_fanout_then_join_under_linear_consumption() {
        // x is consumed once by the fanout, which re-issues it as x1 and x2;
        // the join may then read both.
        let units: Vec<Arc<dyn ComputationUnit<Value>>> = vec![
            Arc::new(Fanout::new("split", "x", &["x1", "x2"])),
            Arc::new(Sum::new("join", "x1", "x2", "y")),
        ];
        let dag = Dag::new(units, keys(&["x"]), keys(&["y"])).unwrap();
        let out = dag.forward(single("x", Value::series(vec![1.0, 2.0]))).unwrap();
        assert_eq!(out.get("y").unwrap().to_vec(), vec![2.0, 4.0]);
    }
}
