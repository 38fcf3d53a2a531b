//! The step-budgeted training loop driving forward passes over a graph.
//!
//! The loop owns scheduling only: it assembles the input record set per
//! batch, runs the forward pass, scores the result against the batch targets,
//! and checkpoints graph state on a fixed cadence. How a unit learns is the
//! unit's own business.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use super::checkpoint::{self, CheckpointError};
use crate::data::Batch;
use crate::execution::ForwardError;
use crate::graph::dag::Dag;
use crate::graph::record::RecordSet;
use crate::value::Value;

#[derive(Error, Debug)]
pub enum TrainError {
    #[error(transparent)]
    Forward(#[from] ForwardError),
    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
    #[error("loss refers to output key '{key}' absent from the result set")]
    MissingOutput { key: String },
    #[error("training requires at least one batch")]
    EmptyDataset,
}

/// Scores a forward pass against the batch targets.
pub trait Loss: Send + Sync {
    fn loss(&self, outputs: &RecordSet<Value>, targets: &Value) -> Result<f64, TrainError>;
}

/// Mean squared error against one declared output key.
pub struct Mse {
    pub output_key: String,
}

impl Mse {
    pub fn new(output_key: &str) -> Self {
        Self { output_key: output_key.to_string() }
    }
}

impl Loss for Mse {
    fn loss(&self, outputs: &RecordSet<Value>, targets: &Value) -> Result<f64, TrainError> {
        let predicted = outputs.get(&self.output_key).ok_or_else(|| {
            TrainError::MissingOutput { key: self.output_key.clone() }
        })?;
        let len = predicted.len().max(targets.len()).max(1);
        let sum: f64 = (0..len)
            .map(|i| {
                let d = predicted.at(i) - targets.at(i);
                d * d
            })
            .sum();
        Ok(sum / len as f64)
    }
}

/// Log for a single epoch (one sweep over the batch list, possibly truncated
/// by the step budget).
#[derive(Debug, Clone)]
pub struct EpochLog {
    pub epoch: usize,
    pub mean_loss: f64,
    pub steps: usize,
}

/// Summary of a full training run.
#[derive(Debug, Clone)]
pub struct TrainReport {
    pub epochs: Vec<EpochLog>,
    pub final_loss: f64,
    pub steps_run: usize,
}

impl fmt::Display for TrainReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Training complete — {} steps over {} epochs", self.steps_run, self.epochs.len())?;
        for log in &self.epochs {
            writeln!(f, "  epoch {}: mean loss = {:.6} ({} steps)", log.epoch, log.mean_loss, log.steps)?;
        }
        write!(f, "  final loss: {:.6}", self.final_loss)
    }
}

/// Drives a fixed number of steps over a validated graph, checkpointing every
/// `steps_per_checkpoint` steps to `{save_path}/{save_name}_{step}.json`.
pub struct Trainer {
    steps: usize,
    dag: Dag<Value>,
    loss: Box<dyn Loss>,
    steps_per_checkpoint: usize,
    save_path: PathBuf,
    save_name: String,
}

impl Trainer {
    pub fn new(
        steps: usize,
        dag: Dag<Value>,
        loss: Box<dyn Loss>,
        steps_per_checkpoint: usize,
        save_path: impl Into<PathBuf>,
        save_name: &str,
    ) -> Self {
        Self {
            steps,
            dag,
            loss,
            steps_per_checkpoint,
            save_path: save_path.into(),
            save_name: save_name.to_string(),
        }
    }

    pub fn dag(&self) -> &Dag<Value> {
        &self.dag
    }

    /// Loops epochs over `batches` until the step budget is spent. A failed
    /// step aborts the whole run; the graph itself stays valid.
    pub fn train(&self, batches: &[Batch]) -> Result<TrainReport, TrainError> {
        if batches.is_empty() {
            return Err(TrainError::EmptyDataset);
        }

        let mut epochs = Vec::new();
        let mut final_loss = 0.0;
        let mut step = 0;
        let mut epoch = 0;

        while step < self.steps {
            epoch += 1;
            let mut epoch_loss = 0.0;
            let mut epoch_steps = 0;

            for batch in batches {
                if step >= self.steps {
                    break;
                }

                let outputs = self.dag.forward(batch.record_set())?;
                let loss = self.loss.loss(&outputs, &batch.target_value())?;

                step += 1;
                epoch_steps += 1;
                epoch_loss += loss;
                final_loss = loss;

                if self.steps_per_checkpoint > 0 && step % self.steps_per_checkpoint == 0 {
                    let file = format!("{}_{}.json", self.save_name, step);
                    checkpoint::save(&self.dag, self.save_path.join(file))?;
                }
            }

            epochs.push(EpochLog {
                epoch,
                mean_loss: epoch_loss / epoch_steps as f64,
                steps: epoch_steps,
            });
        }

        Ok(TrainReport { epochs, final_loss, steps_run: step })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::ScaleShift;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn batch(x: Vec<f64>, targets: Vec<f64>) -> Batch {
        let mut records = HashMap::new();
        records.insert("x".to_string(), x);
        Batch { records, targets }
    }

    fn identity_ish_dag() -> Dag<Value> {
        let units: Vec<Arc<dyn crate::graph::ComputationUnit<Value>>> =
            vec![Arc::new(ScaleShift::new("affine", "x", "y", 3.0, 0.0))];
        Dag::new(units, keys(&["x"]), keys(&["y"])).unwrap()
    }

    #[test]
    fn test_mse_scores_exact_prediction_as_zero() {
        let mse = Mse::new("y");
        let mut outputs = RecordSet::new();
        outputs.insert("y", Value::series(vec![3.0, 6.0]));
        let loss = mse.loss(&outputs, &Value::series(vec![3.0, 6.0])).unwrap();
        assert_eq!(loss, 0.0);
    }

    #[test]
    fn test_mse_reports_missing_output_key() {
        let mse = Mse::new("missing");
        let outputs = RecordSet::new();
        let err = mse.loss(&outputs, &Value::scalar(0.0)).unwrap_err();
        assert!(matches!(err, TrainError::MissingOutput { key } if key == "missing"));
    }

    #[test]
    fn test_train_runs_step_budget_and_checkpoints() {
        let dir = tempfile::tempdir().unwrap();
        let trainer = Trainer::new(
            5,
            identity_ish_dag(),
            Box::new(Mse::new("y")),
            2,
            dir.path(),
            "model",
        );
        // y = 3x, targets = 3x, so the loop should see zero loss throughout.
        let batches = vec![
            batch(vec![1.0, 2.0], vec![3.0, 6.0]),
            batch(vec![0.0], vec![0.0]),
        ];

        let report = trainer.train(&batches).unwrap();
        assert_eq!(report.steps_run, 5);
        // 2 batches per epoch, budget 5: epochs of 2, 2, 1 steps.
        assert_eq!(report.epochs.len(), 3);
        assert_eq!(report.epochs[2].steps, 1);
        assert_eq!(report.final_loss, 0.0);

        // Checkpoints at steps 2 and 4.
        assert!(dir.path().join("model_2.json").exists());
        assert!(dir.path().join("model_4.json").exists());
        assert!(!dir.path().join("model_5.json").exists());
    }

    #[test]
    fn test_train_rejects_empty_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let trainer = Trainer::new(
            1,
            identity_ish_dag(),
            Box::new(Mse::new("y")),
            0,
            dir.path(),
            "model",
        );
        assert!(matches!(trainer.train(&[]), Err(TrainError::EmptyDataset)));
    }

    #[test]
    fn test_report_display_mentions_final_loss() {
        let report = TrainReport {
            epochs: vec![EpochLog { epoch: 1, mean_loss: 0.5, steps: 2 }],
            final_loss: 0.25,
            steps_run: 2,
        };
        let text = report.to_string();
        assert!(text.contains("final loss: 0.250000"));
        assert!(text.contains("epoch 1"));
    }
}
