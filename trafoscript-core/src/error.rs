//! Error types for trafoscript-core.
//!
//! Two disjoint taxonomies: [`ValidationError`] is collected by the static
//! validator and never raised, [`ScriptError`] aborts parsing or evaluation
//! at the first problem.

use thiserror::Error;

use crate::ast::{BinaryOperator, Position, Span};
use crate::executor::DataKind;

/// Static scope errors reported by [`crate::validate::Validator`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Variable '{name}' was already declared! at {span}")]
    DoubleDeclaration { name: String, span: Span },

    #[error("Variable '{name}' was never declared! at {span}")]
    NotDeclared { name: String, span: Span },

    #[error("There is no variable named '{name}'! at {span}")]
    UnexistingVariable { name: String, span: Span },

    #[error("You cannot refer to variable '{name}' before its declaration at {span}")]
    ReferencedBeforeDeclaration { name: String, span: Span },
}

impl ValidationError {
    pub fn name(&self) -> &str {
        match self {
            ValidationError::DoubleDeclaration { name, .. }
            | ValidationError::NotDeclared { name, .. }
            | ValidationError::UnexistingVariable { name, .. }
            | ValidationError::ReferencedBeforeDeclaration { name, .. } => name,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            ValidationError::DoubleDeclaration { span, .. }
            | ValidationError::NotDeclared { span, .. }
            | ValidationError::UnexistingVariable { span, .. }
            | ValidationError::ReferencedBeforeDeclaration { span, .. } => *span,
        }
    }
}

/// Parse and evaluation error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScriptError {
    #[error("Parse error at {position}: {message}")]
    Parse { message: String, position: Position },

    #[error("Script is invalid: {} validation error(s)", .0.len())]
    Invalid(Vec<ValidationError>),

    #[error("Variable '{name}' was already declared! at {span}")]
    DoubleDeclaration { name: String, span: Span },

    #[error("Variable '{name}' was never declared! at {span}")]
    NotDeclared { name: String, span: Span },

    #[error("Unknown function '{0}'")]
    UnknownFunction(String),

    #[error("Missing argument for function '{function}'. Expected an argument of type {expected} at position {}", .index + 1)]
    ArgMissing {
        function: String,
        index: usize,
        expected: &'static str,
    },

    #[error("Argument {} of function '{function}' has to be of type {expected}, but was of type {actual}", .index + 1)]
    ArgWrongType {
        function: String,
        index: usize,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Function '{function}' takes at most {expected} argument(s), got {actual}")]
    TooManyArgs {
        function: String,
        expected: usize,
        actual: usize,
    },

    #[error("The data has to be of type {expected:?}, but was of type {actual:?}")]
    WrongDataKind {
        expected: Vec<DataKind>,
        actual: DataKind,
    },

    #[error("Operator '{op}' is not supported between {left} and {right}")]
    UnsupportedOperands {
        op: BinaryOperator,
        left: &'static str,
        right: &'static str,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Stream '{name}' failed: {message}")]
    Stream { name: String, message: String },
}

/// Result type for trafoscript operations
pub type ScriptResult<T> = Result<T, ScriptError>;

impl serde::Serialize for ScriptError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl serde::Serialize for ValidationError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ScriptError::UnknownFunction("Foo".to_string());
        assert_eq!(err.to_string(), "Unknown function 'Foo'");

        let err = ScriptError::ArgMissing {
            function: "Delta".to_string(),
            index: 0,
            expected: "Datapoints",
        };
        assert_eq!(
            err.to_string(),
            "Missing argument for function 'Delta'. Expected an argument of type Datapoints at position 1"
        );

        let err = ScriptError::UnsupportedOperands {
            op: BinaryOperator::Add,
            left: "Number",
            right: "String",
        };
        assert_eq!(
            err.to_string(),
            "Operator '+' is not supported between Number and String"
        );
    }

    #[test]
    fn test_validation_error_accessors() {
        let err = ValidationError::UnexistingVariable {
            name: "b".to_string(),
            span: Span::at(1, 8, 1, 9),
        };
        assert_eq!(err.name(), "b");
        assert_eq!(err.span(), Span::at(1, 8, 1, 9));
        assert_eq!(err.to_string(), "There is no variable named 'b'! at (1,8)-(1,9)");
    }

    #[test]
    fn test_serialize_as_message() {
        let err = ScriptError::InvalidArgument("window must be positive".to_string());
        assert_eq!(
            serde_json::to_string(&err).unwrap(),
            "\"Invalid argument: window must be positive\""
        );
    }
}
