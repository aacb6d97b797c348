//! trafoscript core - parser, validator and evaluator for a small data
//! transformation language over time-series tracking data.
//!
//! Scripts declare variables, reassign them, print values and call builtin
//! functions that transform named input point streams into scalars or
//! derived streams.
//!
//! # Main Components
//!
//! - **Parser**: Parses script text into an AST with optional source spans
//! - **Validator**: Collects every scope error of a program in one pass
//! - **Executor**: Evaluates a program against `PointStream` implementations
//! - **Aggregation**: Moving and calendar aligned fixed bin aggregation
//!
//! # Example
//!
//! ```rust
//! use chrono::{FixedOffset, TimeZone};
//! use trafoscript_core::{run_script, DataKind, DataPoint, ExternalData, InMemoryStream, Value};
//!
//! let offset = FixedOffset::east_opt(0).unwrap();
//! let points = (1..=3)
//!     .map(|day| {
//!         let t = offset.with_ymd_and_hms(2024, 1, day, 8, 0, 0).unwrap();
//!         DataPoint::new(t, day as f64 * 10.0, "")
//!     })
//!     .collect();
//!
//! let mut data = ExternalData::new()
//!     .with("weight", InMemoryStream::new(points, DataKind::Numerical));
//!
//! let context = run_script("var change = Delta(weight)\nvar total = Accumulate(change)", &mut data).unwrap();
//! let total = context.get_variable("total").and_then(Value::as_datapoints).unwrap();
//! assert_eq!(total.points[2].value, 30.0);
//!
//! data.dispose_all();
//! ```

pub mod aggregation;
pub mod ast;
pub mod error;
pub mod executor;
pub mod lexer;
pub mod parser;
pub mod validate;

// Re-export main types for convenience
pub use aggregation::{AggregationPreferences, AggregationSelector};
pub use ast::{
    BinaryOperator, Expression, ExpressionKind, Position, Program, Span, Statement, TimeUnit,
};
pub use error::{ScriptError, ScriptResult, ValidationError};
pub use executor::{
    Context, DataKind, DataPoint, DataPoints, EvaluationOptions, Evaluator, ExternalData,
    InMemoryStream, PointStream, PrintSink, TimeAmount, Value,
};
pub use lexer::{Lexer, Token};
pub use parser::{parse, parse_with_options, ParseOptions, Parser};
pub use validate::{validate, Validator};

/// Parse, validate and evaluate `source` with default options.
///
/// Refuses to evaluate a script with any scope error; use
/// [`Evaluator::evaluate`] to run an unvalidated program.
pub fn run_script(source: &str, external: &mut ExternalData) -> ScriptResult<Context> {
    Evaluator::new().run(source, external)
}
