//! Elapsed time builtins: TimeBetween, TimeBetween2.
//!
//! Both produce streams of kind Time whose values are seconds. Divide the
//! result by a time unit to rescale it (`TimeBetween(data) / HOUR`).

use super::sequence::elapsed_seconds;
use super::{check_max_args, get_datapoints};
use crate::error::ScriptResult;
use crate::executor::value::{DataKind, DataPoint, DataPoints, Value};

/// Call a timing function. Returns None if function not found.
pub fn call(name: &str, args: &[Value]) -> ScriptResult<Option<Value>> {
    let result = match name {
        "TimeBetween" => {
            let data = get_datapoints(name, args, 0)?;
            check_max_args(name, args, 1)?;

            // stamped at the earlier point; the last point has no successor
            let points = data
                .points
                .windows(2)
                .map(|pair| pair[0].with_value(elapsed_seconds(&pair[0], &pair[1])))
                .collect();
            Some(Value::Datapoints(DataPoints::new(points, DataKind::Time)))
        }

        "TimeBetween2" => {
            let main = get_datapoints(name, args, 0)?;
            let reference = get_datapoints(name, args, 1)?;
            check_max_args(name, args, 2)?;

            Some(Value::Datapoints(DataPoints::new(
                time_to_next_reference(&main.points, &reference.points),
                DataKind::Time,
            )))
        }

        _ => None,
    };

    Ok(result)
}

/// For each main point, the seconds until the first reference point at or
/// after it. A reference point answers at most one main point; later main
/// points claim first, so an earlier main point whose match is taken is
/// dropped.
fn time_to_next_reference(main: &[DataPoint], reference: &[DataPoint]) -> Vec<DataPoint> {
    let mut claimed = vec![false; reference.len()];
    let mut matched: Vec<DataPoint> = main
        .iter()
        .rev()
        .filter_map(|point| {
            let index = reference.partition_point(|r| r.timestamp < point.timestamp);
            if index >= reference.len() || claimed[index] {
                return None;
            }
            claimed[index] = true;
            Some(point.with_value(elapsed_seconds(point, &reference[index])))
        })
        .collect();
    matched.reverse();
    matched
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn test_time_between() {
        let d = data(
            DataKind::Categorical,
            &[
                (at(1, 0, 0), 1.0, "a"),
                (at(1, 0, 30), 1.0, "b"),
                (at(1, 2, 30), 1.0, "c"),
            ],
        );
        let result = call("TimeBetween", &[d]).unwrap().unwrap();
        let result = result.as_datapoints().unwrap();
        assert_eq!(result.kind, DataKind::Time);
        assert_eq!(
            result.points.iter().map(|p| p.value).collect::<Vec<_>>(),
            vec![1800.0, 7200.0]
        );
        assert_eq!(result.points[0].timestamp, at(1, 0, 0));
        assert_eq!(result.points[1].label, "b");
    }

    #[test]
    fn test_time_between_single_point() {
        let d = data(DataKind::Numerical, &[(at(1, 0, 0), 1.0, "")]);
        let result = call("TimeBetween", &[d]).unwrap().unwrap();
        assert!(values(&result).is_empty());
    }

    #[test]
    fn test_time_between2_matches_next_reference() {
        // wake ups and the following bed times
        let main = data(
            DataKind::Numerical,
            &[(at(1, 7, 0), 1.0, ""), (at(2, 7, 0), 1.0, ""), (at(3, 7, 0), 1.0, "")],
        );
        let reference = data(
            DataKind::Numerical,
            &[(at(1, 22, 0), 1.0, ""), (at(2, 23, 0), 1.0, "")],
        );
        let result = call("TimeBetween2", &[main, reference]).unwrap().unwrap();
        assert_eq!(values(&result), vec![15.0 * 3600.0, 16.0 * 3600.0]);
        assert_eq!(result.as_datapoints().unwrap().kind, DataKind::Time);
    }

    #[test]
    fn test_time_between2_closer_point_wins() {
        let main = data(
            DataKind::Numerical,
            &[(at(1, 1, 0), 1.0, "far"), (at(1, 2, 0), 1.0, "near")],
        );
        let reference = data(DataKind::Numerical, &[(at(1, 3, 0), 1.0, "")]);
        let result = call("TimeBetween2", &[main, reference]).unwrap().unwrap();
        let points = &result.as_datapoints().unwrap().points;
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].label, "near");
        assert_eq!(points[0].value, 3600.0);
    }

    #[test]
    fn test_time_between2_same_instant_matches() {
        let main = data(DataKind::Numerical, &[(at(1, 1, 0), 1.0, "")]);
        let reference = data(DataKind::Numerical, &[(at(1, 1, 0), 1.0, "")]);
        let result = call("TimeBetween2", &[main, reference]).unwrap().unwrap();
        assert_eq!(values(&result), vec![0.0]);
    }
}
