//! The concrete record type used by the orchestration layers.
//!
//! The graph core is generic over its record type; the bundled units, data
//! loading, and training loop all work over `Value`.

use std::sync::Arc;

/// A scalar or a shared batch of numbers.
///
/// `Series` is reference-counted, so fanning a value out to several consumers
/// copies a pointer, not the data.
#[derive(Debug, Clone)]
pub enum Value {
    Scalar(f64),
    Series(Arc<Vec<f64>>),
}

impl Value {
    pub fn scalar(v: f64) -> Self {
        Value::Scalar(v)
    }

    pub fn series(v: Vec<f64>) -> Self {
        Value::Series(Arc::new(v))
    }

    pub fn len(&self) -> usize {
        match self {
            Value::Scalar(_) => 1,
            Value::Series(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element access with last-value extension: a scalar repeats forever and
    /// a series past its end repeats its last element (0.0 when empty).
    pub fn at(&self, i: usize) -> f64 {
        match self {
            Value::Scalar(v) => *v,
            Value::Series(s) => *s.get(i).unwrap_or_else(|| s.last().unwrap_or(&0.0)),
        }
    }

    /// Materializes into a plain vector, cloning scalar data as needed.
    pub fn to_vec(&self) -> Vec<f64> {
        match self {
            Value::Scalar(v) => vec![*v],
            Value::Series(s) => s.to_vec(),
        }
    }

    /// Elementwise unary transform.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Value {
        match self {
            Value::Scalar(v) => Value::Scalar(f(*v)),
            Value::Series(s) => Value::series(s.iter().map(|&v| f(v)).collect()),
        }
    }

    /// Elementwise binary combine over the broadcast length of both operands.
    pub fn zip_with(&self, other: &Value, f: impl Fn(f64, f64) -> f64) -> Value {
        match (self, other) {
            (Value::Scalar(a), Value::Scalar(b)) => Value::Scalar(f(*a, *b)),
            _ => {
                let len = self.len().max(other.len());
                Value::series((0..len).map(|i| f(self.at(i), other.at(i))).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_broadcasts_against_series() {
        let s = Value::scalar(2.0);
        let v = Value::series(vec![1.0, 2.0, 3.0]);
        let out = s.zip_with(&v, |a, b| a * b);
        assert_eq!(out.to_vec(), vec![2.0, 4.0, 6.0]);
    }

    #[test]
    fn test_short_series_extends_with_last_value() {
        let a = Value::series(vec![10.0]);
        let b = Value::series(vec![1.0, 2.0, 3.0]);
        let out = a.zip_with(&b, |x, y| x + y);
        assert_eq!(out.to_vec(), vec![11.0, 12.0, 13.0]);
    }

    #[test]
    fn test_map_preserves_shape() {
        assert_eq!(Value::scalar(-1.0).map(f64::abs).to_vec(), vec![1.0]);
        assert_eq!(
            Value::series(vec![-1.0, 4.0]).map(f64::abs).to_vec(),
            vec![1.0, 4.0]
        );
    }
}
