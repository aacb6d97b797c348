//! Label selection builtins: Filter, Exclude.

use super::{get_datapoints, get_string};
use crate::error::ScriptResult;
use crate::executor::value::{DataKind, DataPoints, Value};

/// Call a label function. Returns None if function not found.
pub fn call(name: &str, args: &[Value]) -> ScriptResult<Option<Value>> {
    let keep_matching = match name {
        "Filter" => true,
        "Exclude" => false,
        _ => return Ok(None),
    };

    let data = get_datapoints(name, args, 0)?;
    data.ensure_kind(&[DataKind::Categorical])?;
    // at least one label is required
    get_string(name, args, 1)?;
    let labels = (1..args.len())
        .map(|i| get_string(name, args, i))
        .collect::<ScriptResult<Vec<&str>>>()?;

    let points = data
        .points
        .iter()
        .filter(|p| labels.contains(&p.label.as_str()) == keep_matching)
        .cloned()
        .collect();

    Ok(Some(Value::Datapoints(DataPoints::new(points, data.kind))))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::error::ScriptError;

    fn moods() -> Value {
        data(
            DataKind::Categorical,
            &[
                (at(1, 0, 0), 1.0, "happy"),
                (at(1, 1, 0), 2.0, "sad"),
                (at(1, 2, 0), 3.0, "happy"),
                (at(1, 3, 0), 4.0, ""),
            ],
        )
    }

    fn label(s: &str) -> Value {
        Value::String(s.to_string())
    }

    #[test]
    fn test_filter_and_exclude() {
        let kept = call("Filter", &[moods(), label("happy")]).unwrap().unwrap();
        assert_eq!(values(&kept), vec![1.0, 3.0]);

        let dropped = call("Exclude", &[moods(), label("happy")]).unwrap().unwrap();
        assert_eq!(values(&dropped), vec![2.0, 4.0]);
    }

    #[test]
    fn test_multiple_labels() {
        let kept = call("Filter", &[moods(), label("sad"), label("")])
            .unwrap()
            .unwrap();
        assert_eq!(values(&kept), vec![2.0, 4.0]);
    }

    #[test]
    fn test_label_required() {
        assert!(matches!(
            call("Filter", &[moods()]),
            Err(ScriptError::ArgMissing { index: 1, expected: "String", .. })
        ));
        assert!(matches!(
            call("Exclude", &[moods(), label("a"), Value::Number(1.0)]),
            Err(ScriptError::ArgWrongType { index: 2, .. })
        ));
    }

    #[test]
    fn test_numerical_rejected() {
        let d = data(DataKind::Numerical, &[(at(1, 0, 0), 1.0, "happy")]);
        assert!(matches!(
            call("Filter", &[d, label("happy")]),
            Err(ScriptError::WrongDataKind { .. })
        ));
    }
}
