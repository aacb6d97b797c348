//! Binary operator precedence: `*` and `/` bind tighter than `+` and `-`,
//! all operators are left associative. Spans of binary nodes cover both
//! operands and stay empty when the operands are untagged.

use crate::ast::{BinaryOperator, Expression};
use crate::error::ScriptResult;
use crate::lexer::Token;
use crate::parser::Parser;

impl Parser {
    /// Parse additive expression (+, -)
    pub(super) fn parse_additive_expression(&mut self) -> ScriptResult<Expression> {
        let mut left = self.parse_multiplicative_expression()?;

        while matches!(self.current_token(), Token::Plus | Token::Minus) {
            let op = match self.current_token() {
                Token::Plus => BinaryOperator::Add,
                _ => BinaryOperator::Subtract,
            };
            self.advance();
            let right = self.parse_multiplicative_expression()?;
            left = Expression::binary(left, op, right);
        }

        Ok(left)
    }

    /// Parse multiplicative expression (*, /)
    fn parse_multiplicative_expression(&mut self) -> ScriptResult<Expression> {
        let mut left = self.parse_primary_expression()?;

        while matches!(self.current_token(), Token::Star | Token::Slash) {
            let op = match self.current_token() {
                Token::Star => BinaryOperator::Multiply,
                _ => BinaryOperator::Divide,
            };
            self.advance();
            let right = self.parse_primary_expression()?;
            left = Expression::binary(left, op, right);
        }

        Ok(left)
    }
}
