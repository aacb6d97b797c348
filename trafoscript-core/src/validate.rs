//! Static scope validation.
//!
//! A single forward pass over the program checks that every name is declared
//! once and before it is used. A precomputed set of every declared name
//! tells "declared later" apart from "never declared" without a second
//! pass. All problems are collected; validation never fails.

use std::collections::{HashMap, HashSet};

use crate::ast::{Expression, Program, Span, Statement};
use crate::error::ValidationError;

/// Scope validator for trafoscript programs
#[derive(Debug, Clone, Default)]
pub struct Validator {
    predeclared: Vec<String>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat `names` (typically the external streams) as declared before
    /// the first line.
    pub fn with_predeclared<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            predeclared: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Check `program`, returning every error in document order.
    pub fn validate(&self, program: &Program) -> Vec<ValidationError> {
        let mut pass = Pass::new(program);
        for name in &self.predeclared {
            pass.declared.insert(name.as_str(), Span::default());
        }

        for statement in &program.statements {
            let span = statement.span().unwrap_or_default();
            match statement {
                Statement::VarDeclaration { name, init, .. } => {
                    pass.check_references(init);
                    if pass.declared.contains_key(name.as_str()) {
                        pass.errors.push(ValidationError::DoubleDeclaration {
                            name: name.clone(),
                            span,
                        });
                    } else {
                        pass.declared.insert(name.as_str(), span);
                    }
                }
                Statement::Assignment { name, expr, .. } => {
                    if !pass.declared.contains_key(name.as_str()) {
                        let name = name.clone();
                        pass.errors.push(if pass.declared_anywhere(&name) {
                            ValidationError::ReferencedBeforeDeclaration { name, span }
                        } else {
                            ValidationError::NotDeclared { name, span }
                        });
                    }
                    pass.check_references(expr);
                }
                Statement::Print { expr, .. } => pass.check_references(expr),
            }
        }

        tracing::debug!(
            statements = program.statements.len(),
            errors = pass.errors.len(),
            "validated program"
        );
        pass.errors
    }
}

/// State of one validation run.
struct Pass<'a> {
    declared_somewhere: HashSet<&'a str>,
    declared: HashMap<&'a str, Span>,
    errors: Vec<ValidationError>,
}

impl<'a> Pass<'a> {
    fn new(program: &'a Program) -> Self {
        Self {
            declared_somewhere: program.declared_names().collect(),
            declared: HashMap::new(),
            errors: Vec::new(),
        }
    }

    fn declared_anywhere(&self, name: &str) -> bool {
        self.declared_somewhere.contains(name)
    }

    fn check_references(&mut self, expr: &'a Expression) {
        let mut found = Vec::new();
        expr.for_each_reference(&mut |name, span| found.push((name, span)));

        for (name, span) in found {
            if self.declared.contains_key(name) {
                continue;
            }
            let name_owned = name.to_string();
            let span = span.unwrap_or_default();
            self.errors.push(if self.declared_anywhere(name) {
                ValidationError::ReferencedBeforeDeclaration {
                    name: name_owned,
                    span,
                }
            } else {
                ValidationError::UnexistingVariable {
                    name: name_owned,
                    span,
                }
            });
        }
    }
}

/// Validate `program` with no predeclared names.
pub fn validate(program: &Program) -> Vec<ValidationError> {
    Validator::new().validate(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, parse_with_options, ParseOptions};

    fn errors_of(source: &str) -> Vec<ValidationError> {
        validate(&parse(source).unwrap())
    }

    #[test]
    fn test_valid_program() {
        assert!(errors_of("var a = 1\nvar b = a * 2\na = b\nprint(a + b)").is_empty());
    }

    #[test]
    fn test_double_declaration() {
        let errors = errors_of("var a = 1\nvar a = 2");
        assert_eq!(
            errors,
            vec![ValidationError::DoubleDeclaration {
                name: "a".to_string(),
                span: Span::at(2, 0, 2, 9),
            }]
        );
    }

    #[test]
    fn test_unexisting_variable() {
        assert_eq!(
            errors_of("var a = b + 2"),
            vec![ValidationError::UnexistingVariable {
                name: "b".to_string(),
                span: Span::at(1, 8, 1, 9),
            }]
        );
    }

    #[test]
    fn test_referenced_before_declaration() {
        assert_eq!(
            errors_of("var a = b + 2\nvar b = 2"),
            vec![ValidationError::ReferencedBeforeDeclaration {
                name: "b".to_string(),
                span: Span::at(1, 8, 1, 9),
            }]
        );
    }

    #[test]
    fn test_assignment_to_undeclared() {
        assert_eq!(
            errors_of("a = 3"),
            vec![ValidationError::NotDeclared {
                name: "a".to_string(),
                span: Span::at(1, 0, 1, 5),
            }]
        );
        assert_eq!(
            errors_of("a = 3\nvar a = 1"),
            vec![ValidationError::ReferencedBeforeDeclaration {
                name: "a".to_string(),
                span: Span::at(1, 0, 1, 5),
            }]
        );
    }

    #[test]
    fn test_self_reference_in_initializer() {
        let errors = errors_of("var a = a");
        assert!(matches!(
            errors.as_slice(),
            [ValidationError::ReferencedBeforeDeclaration { name, .. }] if name == "a"
        ));
    }

    #[test]
    fn test_collects_every_error() {
        let errors = errors_of("print(x)\nvar a = 1\nvar a = y\nz = a");
        let names: Vec<&str> = errors.iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["x", "y", "a", "z"]);
    }

    #[test]
    fn test_predeclared_names() {
        let program = parse("var w = Delta(weight)\nweight = w").unwrap();
        assert_eq!(errors_of("var w = Delta(weight)").len(), 1);
        assert!(Validator::with_predeclared(["weight"])
            .validate(&program)
            .is_empty());

        let errors = Validator::with_predeclared(["weight"]).validate(&parse("var weight = 1").unwrap());
        assert!(matches!(errors[0], ValidationError::DoubleDeclaration { .. }));
    }

    #[test]
    fn test_revalidation_is_stable() {
        let program = parse("var a = 1\nvar b = a").unwrap();
        assert!(validate(&program).is_empty());
        assert!(validate(&program).is_empty());
    }

    #[test]
    fn test_untagged_program_uses_zero_span() {
        let program = parse_with_options("var a = b", ParseOptions { with_positions: false }).unwrap();
        assert_eq!(validate(&program)[0].span(), Span::default());
    }
}
