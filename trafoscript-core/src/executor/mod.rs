//! Executor module for trafoscript programs.
//!
//! This module provides a tree-walking evaluator that runs a program against
//! any set of external point streams implementing the PointStream trait.

mod builtins;
mod context;
mod local;
mod stream;
pub mod time;
mod value;

pub use builtins::{BuiltinFunctions, CallEnv, DELTA_SEED};
pub use context::Context;
pub use local::{CollectingSink, Evaluator, PrintSink, TracingSink};
pub use stream::{ExternalData, InMemoryStream, PointStream, StreamOrder};
pub use time::{Period, TimeAmount};
pub use value::{DataKind, DataPoint, DataPoints, Value};

use chrono::{DateTime, FixedOffset};

use crate::aggregation::AggregationPreferences;

/// Settings of one evaluation run, passed explicitly to the aggregators.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationOptions {
    /// Calendar layout of fixed bins
    pub preferences: AggregationPreferences,
    /// Fixed bins are produced at least up to this time. Defaults to the
    /// last point of the binned stream.
    pub end_time: Option<DateTime<FixedOffset>>,
}

impl EvaluationOptions {
    pub fn with_preferences(preferences: AggregationPreferences) -> Self {
        Self {
            preferences,
            end_time: None,
        }
    }
}
