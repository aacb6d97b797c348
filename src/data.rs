//! JSON data files holding the external streams of a run.
//!
//! ```json
//! {
//!   "weight": {
//!     "kind": "numerical",
//!     "points": [
//!       { "timestamp": "2024-02-01T07:00:00+01:00", "value": 80.0 },
//!       { "timestamp": "2024-02-02T07:00:00+01:00", "value": 79.5 }
//!     ]
//!   },
//!   "mood": {
//!     "kind": "categorical",
//!     "newest_first": true,
//!     "points": [
//!       { "timestamp": "2024-02-02T21:00:00+01:00", "value": 2, "label": "tired" }
//!     ]
//!   }
//! }
//! ```
//!
//! Streams are registered in name order.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use trafoscript_core::{DataKind, DataPoint, ExternalData, InMemoryStream};

#[derive(Debug, Error)]
pub enum DataFileError {
    #[error("Failed to read data file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid data file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One stream as stored in a data file
#[derive(Debug, Clone, Deserialize)]
pub struct StreamFile {
    pub kind: DataKind,
    /// Points are listed newest first
    #[serde(default)]
    pub newest_first: bool,
    #[serde(default)]
    pub points: Vec<DataPoint>,
}

impl StreamFile {
    pub fn into_stream(self) -> InMemoryStream {
        let stream = InMemoryStream::new(self.points, self.kind);
        if self.newest_first {
            stream.newest_first()
        } else {
            stream
        }
    }
}

/// Parse data file content into external streams
pub fn parse_data(content: &str) -> serde_json::Result<ExternalData> {
    let streams: BTreeMap<String, StreamFile> = serde_json::from_str(content)?;

    let mut data = ExternalData::new();
    for (name, stream) in streams {
        tracing::debug!(stream = %name, points = stream.points.len(), kind = ?stream.kind, "loaded stream");
        data.insert(&name, stream.into_stream());
    }
    Ok(data)
}

/// Read and parse a data file
pub fn load_data_file(path: &Path) -> Result<ExternalData, DataFileError> {
    let content = std::fs::read_to_string(path).map_err(|source| DataFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_data(&content).map_err(|source| DataFileError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use trafoscript_core::PointStream;

    #[test]
    fn test_parse_streams_in_name_order() {
        let data = parse_data(
            r#"{
                "weight": {"kind": "numerical", "points": [
                    {"timestamp": "2024-02-01T07:00:00+01:00", "value": 80.0}
                ]},
                "mood": {"kind": "categorical", "points": []}
            }"#,
        )
        .unwrap();

        assert_eq!(data.names().collect::<Vec<_>>(), vec!["mood", "weight"]);
        assert_eq!(data.get("mood").unwrap().kind(), DataKind::Categorical);
    }

    #[test]
    fn test_label_defaults_to_empty() {
        let mut data = parse_data(
            r#"{"w": {"kind": "time", "points": [{"timestamp": "2024-02-01T07:00:00Z", "value": 3600}]}}"#,
        )
        .unwrap();

        let context = trafoscript_core::run_script("var x = w", &mut data).unwrap();
        let points = &context.get_variable("x").and_then(|v| v.as_datapoints()).unwrap().points;
        assert_eq!(points[0].label, "");
        assert_eq!(points[0].value, 3600.0);
    }

    #[test]
    fn test_newest_first_flag() {
        let stream: StreamFile = serde_json::from_str(r#"{"kind": "numerical", "newest_first": true}"#).unwrap();
        assert!(stream.newest_first);
        assert_eq!(
            stream.into_stream().order(),
            trafoscript_core::executor::StreamOrder::NewestFirst
        );
    }

    #[test]
    fn test_rejects_unknown_kind() {
        assert!(parse_data(r#"{"w": {"kind": "boolean", "points": []}}"#).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = load_data_file(Path::new("/nonexistent/data.json")).unwrap_err();
        assert!(matches!(err, DataFileError::Io { .. }));
    }
}
