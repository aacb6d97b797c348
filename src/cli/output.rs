//! Terminal and JSON rendering of run results

use colored::Colorize;
use std::fmt::Write as _;
use trafoscript_core::{Context, ValidationError, Value};

/// One line per error, in document order
pub fn render_errors(errors: &[ValidationError]) -> String {
    let mut out = String::new();
    for error in errors {
        let _ = writeln!(out, "{} {}", "✗".red(), error);
    }
    out
}

/// Variables in binding order; streams are followed by their points
pub fn render_context(context: &Context) -> String {
    let mut out = String::new();

    for (name, value) in context.iter() {
        let _ = writeln!(out, "{} = {}", name.bold(), value);

        if let Value::Datapoints(data) = value {
            for point in &data.points {
                let _ = write!(out, "  {} {}", "•".dimmed(), point.timestamp.to_rfc3339());
                let _ = write!(out, "  {}", point.value);
                if !point.label.is_empty() {
                    let _ = write!(out, "  {}", point.label.cyan());
                }
                out.push('\n');
            }
        }
    }

    if context.is_empty() {
        let _ = writeln!(out, "{} No variables", "•".dimmed());
    }
    out
}

pub fn render_json(context: &Context) -> serde_json::Result<String> {
    serde_json::to_string_pretty(context)
}
