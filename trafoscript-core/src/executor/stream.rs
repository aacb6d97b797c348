//! External point streams consumed by the evaluator.

use super::value::{DataKind, DataPoint};
use crate::error::{ScriptError, ScriptResult};

/// Order in which a stream yields its points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamOrder {
    #[default]
    OldestFirst,
    NewestFirst,
}

/// Trait for sources of tracked points.
///
/// Implement this trait to feed a script from your own storage. Reading may
/// block. A stream can hold a scarce resource (a cursor, a file handle):
/// whoever supplied it must call [`PointStream::dispose`] once every value
/// derived from it is no longer read. The evaluator never disposes.
pub trait PointStream {
    /// Kind of the values this stream yields.
    fn kind(&self) -> DataKind;

    /// Iteration order of [`PointStream::points`].
    fn order(&self) -> StreamOrder {
        StreamOrder::OldestFirst
    }

    /// Materialize all raw backing points in [`PointStream::order`].
    fn points(&mut self) -> ScriptResult<Vec<DataPoint>>;

    /// Release the backing resource. Reading afterwards is an error.
    fn dispose(&mut self);

    fn is_disposed(&self) -> bool;
}

/// In-memory stream for testing and for the command line runner
#[derive(Debug, Clone)]
pub struct InMemoryStream {
    points: Vec<DataPoint>,
    kind: DataKind,
    order: StreamOrder,
    disposed: bool,
    reads: usize,
}

impl InMemoryStream {
    pub fn new(points: Vec<DataPoint>, kind: DataKind) -> Self {
        Self {
            points,
            kind,
            order: StreamOrder::OldestFirst,
            disposed: false,
            reads: 0,
        }
    }

    /// Declare that `points` are stored newest first.
    pub fn newest_first(mut self) -> Self {
        self.order = StreamOrder::NewestFirst;
        self
    }

    /// How many times the points were materialized
    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl PointStream for InMemoryStream {
    fn kind(&self) -> DataKind {
        self.kind
    }

    fn order(&self) -> StreamOrder {
        self.order
    }

    fn points(&mut self) -> ScriptResult<Vec<DataPoint>> {
        if self.disposed {
            return Err(ScriptError::Stream {
                name: "in-memory".to_string(),
                message: "stream was already disposed".to_string(),
            });
        }
        self.reads += 1;
        Ok(self.points.clone())
    }

    fn dispose(&mut self) {
        self.disposed = true;
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}

/// Named external streams handed to one evaluation run, kept in insertion
/// order.
#[derive(Default)]
pub struct ExternalData {
    streams: Vec<(String, Box<dyn PointStream>)>,
}

impl ExternalData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stream, replacing any previous stream of the same name.
    pub fn insert(&mut self, name: &str, stream: impl PointStream + 'static) {
        let stream: Box<dyn PointStream> = Box::new(stream);
        match self.streams.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = stream,
            None => self.streams.push((name.to_string(), stream)),
        }
    }

    pub fn with(mut self, name: &str, stream: impl PointStream + 'static) -> Self {
        self.insert(name, stream);
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn PointStream> {
        self.streams
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s.as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.streams.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Box<dyn PointStream>)> {
        self.streams.iter_mut().map(|(n, s)| (n.as_str(), s))
    }

    /// Dispose every stream. Call once the evaluation results are consumed.
    pub fn dispose_all(&mut self) {
        for (_, stream) in &mut self.streams {
            stream.dispose();
        }
    }
}

impl std::fmt::Debug for ExternalData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
