//! Builtin functions for trafoscript.
//!
//! Every builtin is a pure function of its evaluated arguments. Functions
//! that read streams expect points oldest first; the evaluator guarantees
//! this when it materializes external streams.

mod aggregate;
mod labels;
mod merge;
mod sequence;
mod timing;

use chrono::{DateTime, FixedOffset};

use super::context::Context;
use super::time::TimeAmount;
use super::value::{DataPoints, Value};
use super::EvaluationOptions;
use crate::aggregation::AggregationSelector;
use crate::error::{ScriptError, ScriptResult};

pub use sequence::DELTA_SEED;

/// What a builtin may see besides its arguments.
pub struct CallEnv<'a> {
    pub context: &'a Context,
    pub options: &'a EvaluationOptions,
}

impl CallEnv<'_> {
    /// Earliest timestamp of any stream bound in the context.
    pub fn earliest_timestamp(&self) -> Option<DateTime<FixedOffset>> {
        self.context
            .iter()
            .filter_map(|(_, value)| value.as_datapoints().and_then(DataPoints::earliest))
            .min()
    }
}

/// Container for builtin function implementations.
pub struct BuiltinFunctions;

impl BuiltinFunctions {
    /// Call a builtin function by name. Names are case sensitive.
    pub fn call(name: &str, args: &[Value], env: &CallEnv<'_>) -> ScriptResult<Value> {
        tracing::trace!(function = name, args = args.len(), "calling builtin");

        // Delta, Accumulate, Derivative
        if let Some(result) = sequence::call(name, args)? {
            return Ok(result);
        }

        // TimeBetween, TimeBetween2
        if let Some(result) = timing::call(name, args)? {
            return Ok(result);
        }

        // Filter, Exclude
        if let Some(result) = labels::call(name, args)? {
            return Ok(result);
        }

        if let Some(result) = merge::call(name, args)? {
            return Ok(result);
        }

        // Moving, Bin
        if let Some(result) = aggregate::call(name, args, env)? {
            return Ok(result);
        }

        Err(ScriptError::UnknownFunction(name.to_string()))
    }
}

/// Check that at most `max` arguments were passed.
pub(super) fn check_max_args(name: &str, args: &[Value], max: usize) -> ScriptResult<()> {
    if args.len() > max {
        return Err(ScriptError::TooManyArgs {
            function: name.to_string(),
            expected: max,
            actual: args.len(),
        });
    }
    Ok(())
}

fn get_arg<'a>(
    name: &str,
    args: &'a [Value],
    index: usize,
    expected: &'static str,
) -> ScriptResult<&'a Value> {
    args.get(index).ok_or_else(|| ScriptError::ArgMissing {
        function: name.to_string(),
        index,
        expected,
    })
}

fn wrong_type(name: &str, index: usize, expected: &'static str, actual: &Value) -> ScriptError {
    ScriptError::ArgWrongType {
        function: name.to_string(),
        index,
        expected,
        actual: actual.type_name(),
    }
}

pub(super) fn get_datapoints<'a>(
    name: &str,
    args: &'a [Value],
    index: usize,
) -> ScriptResult<&'a DataPoints> {
    const EXPECTED: &str = "Datapoints";
    match get_arg(name, args, index, EXPECTED)? {
        Value::Datapoints(d) => Ok(d),
        other => Err(wrong_type(name, index, EXPECTED, other)),
    }
}

pub(super) fn get_time<'a>(
    name: &str,
    args: &'a [Value],
    index: usize,
) -> ScriptResult<&'a TimeAmount> {
    const EXPECTED: &str = "Time";
    match get_arg(name, args, index, EXPECTED)? {
        Value::Time(t) => Ok(t),
        other => Err(wrong_type(name, index, EXPECTED, other)),
    }
}

pub(super) fn get_aggregation(
    name: &str,
    args: &[Value],
    index: usize,
) -> ScriptResult<AggregationSelector> {
    const EXPECTED: &str = "AggregationFunction";
    match get_arg(name, args, index, EXPECTED)? {
        Value::Aggregation(a) => Ok(*a),
        other => Err(wrong_type(name, index, EXPECTED, other)),
    }
}

pub(super) fn get_string<'a>(name: &str, args: &'a [Value], index: usize) -> ScriptResult<&'a str> {
    const EXPECTED: &str = "String";
    match get_arg(name, args, index, EXPECTED)? {
        Value::String(s) => Ok(s),
        other => Err(wrong_type(name, index, EXPECTED, other)),
    }
}

/// Optional trailing number: `None` if absent.
pub(super) fn get_optional_number(
    name: &str,
    args: &[Value],
    index: usize,
) -> ScriptResult<Option<f64>> {
    match args.get(index) {
        None => Ok(None),
        Some(Value::Number(n)) => Ok(Some(*n)),
        Some(other) => Err(wrong_type(name, index, "Number", other)),
    }
}
