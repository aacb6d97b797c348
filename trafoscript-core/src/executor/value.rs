//! Runtime values and the operator table between them.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::time::TimeAmount;
use crate::aggregation::AggregationSelector;
use crate::ast::BinaryOperator;
use crate::error::{ScriptError, ScriptResult};

/// A single tracked point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub timestamp: DateTime<FixedOffset>,
    pub value: f64,
    #[serde(default)]
    pub label: String,
}

impl DataPoint {
    pub fn new(timestamp: DateTime<FixedOffset>, value: f64, label: impl Into<String>) -> Self {
        Self {
            timestamp,
            value,
            label: label.into(),
        }
    }

    /// Copy of this point carrying a different value.
    pub fn with_value(&self, value: f64) -> Self {
        Self {
            timestamp: self.timestamp,
            value,
            label: self.label.clone(),
        }
    }
}

/// What the values of a point stream mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    Numerical,
    Categorical,
    /// Values are elapsed seconds.
    Time,
}

/// An ordered (oldest first) sequence of points plus its kind.
#[derive(Debug, Clone, Serialize)]
pub struct DataPoints {
    pub points: Vec<DataPoint>,
    pub kind: DataKind,
}

impl DataPoints {
    pub fn new(points: Vec<DataPoint>, kind: DataKind) -> Self {
        Self { points, kind }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn earliest(&self) -> Option<DateTime<FixedOffset>> {
        self.points.first().map(|p| p.timestamp)
    }

    pub fn ensure_kind(&self, allowed: &[DataKind]) -> ScriptResult<()> {
        if allowed.contains(&self.kind) {
            Ok(())
        } else {
            Err(ScriptError::WrongDataKind {
                expected: allowed.to_vec(),
                actual: self.kind,
            })
        }
    }

    /// Apply `f` to every value, keeping timestamps and labels.
    pub fn map_values<F>(&self, f: F, kind: DataKind) -> DataPoints
    where
        F: Fn(f64) -> f64,
    {
        DataPoints {
            points: self
                .points
                .iter()
                .map(|p| p.with_value(f(p.value)))
                .collect(),
            kind,
        }
    }
}

impl PartialEq for DataPoints {
    /// Streams are equal when their points are; the kind tag is metadata.
    fn eq(&self, other: &Self) -> bool {
        self.points == other.points
    }
}

/// Runtime value of a script expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Number(f64),
    Time(TimeAmount),
    Datapoints(DataPoints),
    Aggregation(AggregationSelector),
    String(String),
}

impl Value {
    /// Type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "Number",
            Value::Time(_) => "Time",
            Value::Datapoints(_) => "Datapoints",
            Value::Aggregation(_) => "AggregationFunction",
            Value::String(_) => "String",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_datapoints(&self) -> Option<&DataPoints> {
        match self {
            Value::Datapoints(d) => Some(d),
            _ => None,
        }
    }

    /// Evaluate `self op other`.
    pub fn apply(&self, op: BinaryOperator, other: &Value) -> ScriptResult<Value> {
        use BinaryOperator::*;

        let result = match (op, self, other) {
            (Add, Value::Number(a), Value::Number(b)) => Value::Number(a + b),
            (Subtract, Value::Number(a), Value::Number(b)) => Value::Number(a - b),
            (Multiply, Value::Number(a), Value::Number(b)) => Value::Number(a * b),
            (Divide, Value::Number(a), Value::Number(b)) => Value::Number(a / b),

            (Add, Value::Time(a), Value::Time(b)) => Value::Time(a.checked_add(b)?),
            (Subtract, Value::Time(a), Value::Time(b)) => Value::Time(a.checked_sub(b)?),
            (Multiply, Value::Time(t), Value::Number(n))
            | (Multiply, Value::Number(n), Value::Time(t)) => Value::Time(t.scale(*n)?),
            (Divide, Value::Time(t), Value::Number(n)) => Value::Time(t.divide(*n)?),
            (Divide, Value::Time(a), Value::Time(b)) => Value::Number(a.ratio(b)?),

            (Add, Value::Datapoints(d), Value::Number(n))
            | (Add, Value::Number(n), Value::Datapoints(d)) => {
                Value::Datapoints(d.map_values(|v| v + n, d.kind))
            }
            (Subtract, Value::Datapoints(d), Value::Number(n)) => {
                Value::Datapoints(d.map_values(|v| v - n, d.kind))
            }
            (Multiply, Value::Datapoints(d), Value::Number(n))
            | (Multiply, Value::Number(n), Value::Datapoints(d)) => {
                Value::Datapoints(d.map_values(|v| v * n, d.kind))
            }
            (Divide, Value::Datapoints(d), Value::Number(n)) => {
                Value::Datapoints(d.map_values(|v| v / n, d.kind))
            }

            // Rescaling by a time unit leaves seconds behind: the result is
            // plain numerical data.
            (Divide, Value::Datapoints(d), Value::Time(t)) => {
                let seconds = t.seconds()?;
                if seconds == 0.0 {
                    return Err(ScriptError::InvalidArgument(
                        "cannot divide data by a zero time amount".to_string(),
                    ));
                }
                Value::Datapoints(d.map_values(|v| v / seconds, DataKind::Numerical))
            }
            (Multiply, Value::Datapoints(d), Value::Time(t))
            | (Multiply, Value::Time(t), Value::Datapoints(d)) => {
                let seconds = t.seconds()?;
                Value::Datapoints(d.map_values(|v| v * seconds, DataKind::Time))
            }

            (op, left, right) => {
                return Err(ScriptError::UnsupportedOperands {
                    op,
                    left: left.type_name(),
                    right: right.type_name(),
                })
            }
        };

        Ok(result)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Time(t) => write!(f, "{}", t),
            Value::Datapoints(d) => write!(f, "Datapoints({:?}, {} points)", d.kind, d.len()),
            Value::Aggregation(a) => write!(f, "{}", a),
            Value::String(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<TimeAmount> for Value {
    fn from(t: TimeAmount) -> Self {
        Value::Time(t)
    }
}

impl From<DataPoints> for Value {
    fn from(d: DataPoints) -> Self {
        Value::Datapoints(d)
    }
}
