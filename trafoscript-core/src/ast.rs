//! Abstract syntax tree for trafoscript programs.
//!
//! Every node optionally carries the [`Span`] it was parsed from. Spans are
//! only attached when the parser runs with position tagging enabled.

use std::fmt;

use serde::Serialize;

use crate::aggregation::AggregationSelector;

/// A location in the source text.
///
/// Lines are 1-based, columns are 0-based character offsets within the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Half-open source range: `end` points one past the last character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Shorthand used heavily by tests: `Span::at(1, 8, 1, 9)`.
    pub fn at(start_line: usize, start_col: usize, end_line: usize, end_col: usize) -> Self {
        Self::new(
            Position::new(start_line, start_col),
            Position::new(end_line, end_col),
        )
    }

    /// Smallest span covering both `self` and `other`.
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{})-({},{})",
            self.start.line, self.start.column, self.end.line, self.end.column
        )
    }
}

/// A complete script: statements in document order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    /// Names introduced by `var` statements, in declaration order.
    pub fn declared_names(&self) -> impl Iterator<Item = &str> {
        self.statements.iter().filter_map(|s| match s {
            Statement::VarDeclaration { name, .. } => Some(name.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `var NAME = EXPR`
    VarDeclaration {
        name: String,
        init: Expression,
        span: Option<Span>,
    },
    /// `NAME = EXPR`
    Assignment {
        name: String,
        expr: Expression,
        span: Option<Span>,
    },
    /// `print(EXPR)`
    Print { expr: Expression, span: Option<Span> },
}

impl Statement {
    pub fn span(&self) -> Option<Span> {
        match self {
            Statement::VarDeclaration { span, .. }
            | Statement::Assignment { span, .. }
            | Statement::Print { span, .. } => *span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Time unit keywords. SECOND, MINUTE and HOUR denote exact durations; the
/// remaining units are calendar periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl TimeUnit {
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "SECOND" => Some(TimeUnit::Second),
            "MINUTE" => Some(TimeUnit::Minute),
            "HOUR" => Some(TimeUnit::Hour),
            "DAY" => Some(TimeUnit::Day),
            "WEEK" => Some(TimeUnit::Week),
            "MONTH" => Some(TimeUnit::Month),
            "YEAR" => Some(TimeUnit::Year),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            TimeUnit::Second => "SECOND",
            TimeUnit::Minute => "MINUTE",
            TimeUnit::Hour => "HOUR",
            TimeUnit::Day => "DAY",
            TimeUnit::Week => "WEEK",
            TimeUnit::Month => "MONTH",
            TimeUnit::Year => "YEAR",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub span: Option<Span>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    IntLit(i64),
    DecimalLit(f64),
    StringLit(String),
    VarReference(String),
    BinaryOp {
        left: Box<Expression>,
        op: BinaryOperator,
        right: Box<Expression>,
    },
    FunctionCall {
        name: String,
        args: Vec<Expression>,
    },
    TimeUnit(TimeUnit),
    Aggregation(AggregationSelector),
}

impl Expression {
    pub fn new(kind: ExpressionKind, span: Option<Span>) -> Self {
        Self { kind, span }
    }

    /// Expression without position information.
    pub fn bare(kind: ExpressionKind) -> Self {
        Self { kind, span: None }
    }

    pub fn binary(left: Expression, op: BinaryOperator, right: Expression) -> Self {
        let span = match (left.span, right.span) {
            (Some(l), Some(r)) => Some(l.merge(r)),
            _ => None,
        };
        Self {
            kind: ExpressionKind::BinaryOp {
                left: Box::new(left),
                op,
                right: Box::new(right),
            },
            span,
        }
    }

    /// Visit every variable reference below this node, left to right.
    pub fn for_each_reference<'a, F>(&'a self, f: &mut F)
    where
        F: FnMut(&'a str, Option<Span>),
    {
        match &self.kind {
            ExpressionKind::VarReference(name) => f(name, self.span),
            ExpressionKind::BinaryOp { left, right, .. } => {
                left.for_each_reference(f);
                right.for_each_reference(f);
            }
            ExpressionKind::FunctionCall { args, .. } => {
                for arg in args {
                    arg.for_each_reference(f);
                }
            }
            ExpressionKind::IntLit(_)
            | ExpressionKind::DecimalLit(_)
            | ExpressionKind::StringLit(_)
            | ExpressionKind::TimeUnit(_)
            | ExpressionKind::Aggregation(_) => {}
        }
    }
}
