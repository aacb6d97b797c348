//! Windowed aggregation builtins: Moving, Bin.

use super::{check_max_args, get_aggregation, get_datapoints, get_optional_number, get_time, CallEnv};
use crate::aggregation::{reduce_bins, AggregationSelector, FixedBinAggregator, MovingAggregator};
use crate::error::ScriptResult;
use crate::executor::value::{DataKind, DataPoints, Value};

const AGGREGATABLE: [DataKind; 2] = [DataKind::Numerical, DataKind::Time];

/// COUNT yields plain numbers whatever was counted.
fn result_kind(selector: AggregationSelector, input: DataKind) -> DataKind {
    match selector {
        AggregationSelector::Count => DataKind::Numerical,
        _ => input,
    }
}

/// Call an aggregation function. Returns None if function not found.
pub fn call(name: &str, args: &[Value], env: &CallEnv<'_>) -> ScriptResult<Option<Value>> {
    let result = match name {
        "Moving" => {
            let data = get_datapoints(name, args, 0)?;
            data.ensure_kind(&AGGREGATABLE)?;
            let selector = get_aggregation(name, args, 1)?;
            let window = get_time(name, args, 2)?;
            check_max_args(name, args, 3)?;

            let bins = MovingAggregator::new(window)?.aggregate(&data.points);
            Some(Value::Datapoints(DataPoints::new(
                reduce_bins(&bins, selector, None),
                result_kind(selector, data.kind),
            )))
        }

        "Bin" => {
            let data = get_datapoints(name, args, 0)?;
            data.ensure_kind(&AGGREGATABLE)?;
            let selector = get_aggregation(name, args, 1)?;
            let window = get_time(name, args, 2)?;
            // fallback for selectors that would otherwise drop empty bins
            let fallback = get_optional_number(name, args, 3)?;
            check_max_args(name, args, 4)?;

            let bins = FixedBinAggregator::new(*window, &env.options.preferences)?
                .with_hard_start(env.earliest_timestamp())
                .with_end_time(env.options.end_time)
                .aggregate(&data.points)?;
            Some(Value::Datapoints(DataPoints::new(
                reduce_bins(&bins, selector, fallback),
                result_kind(selector, data.kind),
            )))
        }

        _ => None,
    };

    Ok(result)
}
