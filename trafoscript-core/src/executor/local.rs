//! Local evaluator for trafoscript programs.
//!
//! Walks the statements of a program top to bottom against a fresh
//! [`Context`] seeded from the external streams. The first error aborts the
//! run; no partial context is returned.

use crate::ast::*;
use crate::error::{ScriptError, ScriptResult};
use crate::parser;
use crate::validate::Validator;

use super::builtins::{BuiltinFunctions, CallEnv};
use super::context::Context;
use super::stream::{ExternalData, StreamOrder};
use super::time::TimeAmount;
use super::value::{DataPoints, Value};
use super::EvaluationOptions;

/// Receiver of values passed to `print(...)`.
pub trait PrintSink {
    fn print(&mut self, value: &Value);
}

/// Logs printed values at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl PrintSink for TracingSink {
    fn print(&mut self, value: &Value) {
        tracing::info!(target: "trafoscript::print", "{}", value);
    }
}

/// Keeps printed values, in order.
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    pub printed: Vec<Value>,
}

impl PrintSink for CollectingSink {
    fn print(&mut self, value: &Value) {
        self.printed.push(value.clone());
    }
}

/// Tree-walking evaluator.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    options: EvaluationOptions,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: EvaluationOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EvaluationOptions {
        &self.options
    }

    /// Parse, validate and evaluate `source`. Any static error refuses the
    /// run with [`ScriptError::Invalid`] before a single statement executes.
    pub fn run(&self, source: &str, external: &mut ExternalData) -> ScriptResult<Context> {
        self.run_with_sink(source, external, &mut TracingSink)
    }

    pub fn run_with_sink(
        &self,
        source: &str,
        external: &mut ExternalData,
        sink: &mut dyn PrintSink,
    ) -> ScriptResult<Context> {
        let program = parser::parse(source)?;
        let errors = Validator::with_predeclared(external.names()).validate(&program);
        if !errors.is_empty() {
            tracing::debug!(errors = errors.len(), "refusing to evaluate invalid script");
            return Err(ScriptError::Invalid(errors));
        }
        self.evaluate_with_sink(&program, external, sink)
    }

    /// Evaluate an already parsed program without validating it first.
    ///
    /// Scope violations are still caught, but as the coarser
    /// [`ScriptError::NotDeclared`] whether the name is declared later or
    /// never.
    pub fn evaluate(&self, program: &Program, external: &mut ExternalData) -> ScriptResult<Context> {
        self.evaluate_with_sink(program, external, &mut TracingSink)
    }

    pub fn evaluate_with_sink(
        &self,
        program: &Program,
        external: &mut ExternalData,
        sink: &mut dyn PrintSink,
    ) -> ScriptResult<Context> {
        let mut context = Self::seed_context(external)?;

        for statement in &program.statements {
            self.execute_statement(statement, &mut context, sink)?;
        }

        Ok(context)
    }

    /// Materialize every external stream, oldest point first.
    fn seed_context(external: &mut ExternalData) -> ScriptResult<Context> {
        let mut context = Context::new();

        for (name, stream) in external.iter_mut() {
            if stream.is_disposed() {
                return Err(ScriptError::Stream {
                    name: name.to_string(),
                    message: "stream was already disposed".to_string(),
                });
            }
            let mut points = stream.points().map_err(|e| match e {
                ScriptError::Stream { message, .. } => ScriptError::Stream {
                    name: name.to_string(),
                    message,
                },
                other => other,
            })?;
            if stream.order() == StreamOrder::NewestFirst {
                points.reverse();
            }
            if points.windows(2).any(|w| w[0].timestamp > w[1].timestamp) {
                points.sort_by_key(|p| p.timestamp);
            }

            tracing::debug!(stream = name, points = points.len(), "seeded stream");
            context.declare(name, Value::Datapoints(DataPoints::new(points, stream.kind())));
        }

        Ok(context)
    }

    fn execute_statement(
        &self,
        statement: &Statement,
        context: &mut Context,
        sink: &mut dyn PrintSink,
    ) -> ScriptResult<()> {
        let span = statement.span().unwrap_or_default();

        match statement {
            Statement::VarDeclaration { name, init, .. } => {
                // redeclaration is refused before the initializer runs
                if context.contains(name) {
                    return Err(ScriptError::DoubleDeclaration {
                        name: name.clone(),
                        span,
                    });
                }
                let value = self.evaluate_expression(init, context)?;
                tracing::debug!(variable = %name, kind = value.type_name(), "declare");
                context.declare(name, value);
            }
            Statement::Assignment { name, expr, .. } => {
                if !context.contains(name) {
                    return Err(ScriptError::NotDeclared {
                        name: name.clone(),
                        span,
                    });
                }
                let value = self.evaluate_expression(expr, context)?;
                tracing::debug!(variable = %name, kind = value.type_name(), "assign");
                context.set_variable(name, value);
            }
            Statement::Print { expr, .. } => {
                let value = self.evaluate_expression(expr, context)?;
                sink.print(&value);
            }
        }

        Ok(())
    }

    fn evaluate_expression(&self, expr: &Expression, context: &Context) -> ScriptResult<Value> {
        match &expr.kind {
            ExpressionKind::IntLit(n) => Ok(Value::Number(*n as f64)),
            ExpressionKind::DecimalLit(n) => Ok(Value::Number(*n)),
            ExpressionKind::StringLit(s) => Ok(Value::String(s.clone())),
            ExpressionKind::TimeUnit(unit) => Ok(Value::Time(TimeAmount::from_unit(*unit))),
            ExpressionKind::Aggregation(selector) => Ok(Value::Aggregation(*selector)),

            ExpressionKind::VarReference(name) => {
                context
                    .get_variable(name)
                    .cloned()
                    .ok_or_else(|| ScriptError::NotDeclared {
                        name: name.clone(),
                        span: expr.span.unwrap_or_default(),
                    })
            }

            ExpressionKind::BinaryOp { left, op, right } => {
                let left_val = self.evaluate_expression(left, context)?;
                let right_val = self.evaluate_expression(right, context)?;
                left_val.apply(*op, &right_val)
            }

            ExpressionKind::FunctionCall { name, args } => {
                let arg_values = args
                    .iter()
                    .map(|a| self.evaluate_expression(a, context))
                    .collect::<ScriptResult<Vec<_>>>()?;
                let env = CallEnv {
                    context,
                    options: &self.options,
                };
                BuiltinFunctions::call(name, &arg_values, &env)
            }
        }
    }
}
