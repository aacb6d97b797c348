//! Expression parsing methods for trafoscript.
//!
//! - `precedence`: additive and multiplicative operator chain
//! - `primary`: literals, variable references, function calls, parentheses

mod precedence;
mod primary;

use crate::ast::Expression;
use crate::error::ScriptResult;
use crate::lexer::Token;
use crate::parser::Parser;

impl Parser {
    /// Entry point for expression parsing
    pub(crate) fn parse_expression(&mut self) -> ScriptResult<Expression> {
        self.parse_additive_expression()
    }

    /// Parse function call arguments: (arg1, arg2, ...)
    /// Assumes the opening '(' has already been consumed.
    pub(super) fn parse_function_call_args(&mut self) -> ScriptResult<Vec<Expression>> {
        let mut args = Vec::new();

        while !matches!(self.current_token(), Token::RightParen | Token::Eof) {
            args.push(self.parse_expression()?);

            if matches!(self.current_token(), Token::Comma) {
                self.advance();
            } else {
                break;
            }
        }

        self.expect(Token::RightParen)?;
        Ok(args)
    }
}
