//! Merge builtin: union of streams ordered by timestamp.

use super::get_datapoints;
use crate::error::ScriptResult;
use crate::executor::value::{DataPoints, Value};

/// Call the merge function. Returns None if function not found.
pub fn call(name: &str, args: &[Value]) -> ScriptResult<Option<Value>> {
    if name != "Merge" {
        return Ok(None);
    }

    let first = get_datapoints(name, args, 0)?;
    // at least two streams are required
    get_datapoints(name, args, 1)?;
    let mut inputs: Vec<&DataPoints> = Vec::with_capacity(args.len());
    for i in 0..args.len() {
        let d = get_datapoints(name, args, i)?;
        d.ensure_kind(&[first.kind])?;
        inputs.push(d);
    }

    // k-way merge; on equal timestamps the earlier argument wins
    let mut cursors = vec![0usize; inputs.len()];
    let total = inputs.iter().map(|d| d.len()).sum();
    let mut merged = Vec::with_capacity(total);
    while merged.len() < total {
        let next = inputs
            .iter()
            .enumerate()
            .filter_map(|(i, d)| d.points.get(cursors[i]).map(|p| (i, p)))
            .min_by_key(|(i, p)| (p.timestamp, *i));
        match next {
            Some((i, point)) => {
                merged.push(point.clone());
                cursors[i] += 1;
            }
            None => break,
        }
    }

    Ok(Some(Value::Datapoints(DataPoints::new(merged, first.kind))))
}
