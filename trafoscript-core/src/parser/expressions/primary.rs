//! Primary expression parsing for trafoscript.
//!
//! Handles:
//! - Literals: integers, decimals, strings
//! - Time unit and aggregation keywords
//! - Variable references and function calls
//! - Parenthesized expressions

use crate::ast::{Expression, ExpressionKind};
use crate::error::ScriptResult;
use crate::lexer::Token;
use crate::parser::Parser;

impl Parser {
    pub(super) fn parse_primary_expression(&mut self) -> ScriptResult<Expression> {
        let start = self.current_span();

        let kind = match self.current_token().clone() {
            Token::Integer(n) => {
                self.advance();
                ExpressionKind::IntLit(n)
            }
            Token::Decimal(n) => {
                self.advance();
                ExpressionKind::DecimalLit(n)
            }
            Token::String(s) => {
                self.advance();
                ExpressionKind::StringLit(s)
            }
            Token::TimeUnit(unit) => {
                self.advance();
                ExpressionKind::TimeUnit(unit)
            }
            Token::Aggregation(selector) => {
                self.advance();
                ExpressionKind::Aggregation(selector)
            }
            Token::Identifier(name) => {
                self.advance();
                if matches!(self.current_token(), Token::LeftParen) {
                    self.advance(); // consume '('
                    let args = self.parse_function_call_args()?;
                    ExpressionKind::FunctionCall { name, args }
                } else {
                    ExpressionKind::VarReference(name)
                }
            }
            Token::LeftParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(Token::RightParen)?;
                return Ok(inner);
            }
            other => {
                return self.error(format!("Unexpected token in expression: {:?}", other));
            }
        };

        Ok(Expression::new(kind, self.tag_from(start)))
    }
}
