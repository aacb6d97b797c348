//! Point to point builtins: Delta, Accumulate, Derivative.

use super::{check_max_args, get_datapoints, get_time};
use crate::error::ScriptResult;
use crate::executor::value::{DataKind, DataPoint, DataPoints, Value};

/// Value the first point of a stream is differenced against by `Delta`.
pub const DELTA_SEED: f64 = 0.0;

const DIFFERENTIABLE: [DataKind; 2] = [DataKind::Numerical, DataKind::Time];

/// Call a sequence function. Returns None if function not found.
pub fn call(name: &str, args: &[Value]) -> ScriptResult<Option<Value>> {
    let result = match name {
        "Delta" => {
            let data = get_datapoints(name, args, 0)?;
            data.ensure_kind(&DIFFERENTIABLE)?;
            check_max_args(name, args, 1)?;

            let mut previous = DELTA_SEED;
            let points = data
                .points
                .iter()
                .map(|p| {
                    let delta = p.with_value(p.value - previous);
                    previous = p.value;
                    delta
                })
                .collect();
            Some(Value::Datapoints(DataPoints::new(points, data.kind)))
        }

        "Accumulate" => {
            let data = get_datapoints(name, args, 0)?;
            data.ensure_kind(&DIFFERENTIABLE)?;
            check_max_args(name, args, 1)?;

            let mut sum = 0.0;
            let points = data
                .points
                .iter()
                .map(|p| {
                    sum += p.value;
                    p.with_value(sum)
                })
                .collect();
            Some(Value::Datapoints(DataPoints::new(points, data.kind)))
        }

        "Derivative" => {
            let data = get_datapoints(name, args, 0)?;
            data.ensure_kind(&DIFFERENTIABLE)?;
            let per = get_time(name, args, 1)?.seconds()?;
            check_max_args(name, args, 2)?;

            let points: Vec<DataPoint> = data
                .points
                .windows(2)
                .filter_map(|pair| {
                    let elapsed = elapsed_seconds(&pair[0], &pair[1]);
                    (elapsed != 0.0)
                        .then(|| pair[1].with_value((pair[1].value - pair[0].value) / elapsed * per))
                })
                .collect();
            Some(Value::Datapoints(DataPoints::new(points, data.kind)))
        }

        _ => None,
    };

    Ok(result)
}

/// Seconds from `a` to `b`, with sub-second precision.
pub(super) fn elapsed_seconds(a: &DataPoint, b: &DataPoint) -> f64 {
    let d = b.timestamp - a.timestamp;
    d.num_milliseconds() as f64 / 1000.0
}
