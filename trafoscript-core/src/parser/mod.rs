//! Parser module for trafoscript.
//!
//! Converts tokenized input into a [`Program`]. The parser builds the AST
//! directly; source spans are attached to every node unless position
//! tagging is switched off through [`ParseOptions`].

mod expressions;
#[cfg(test)]
mod tests;

use crate::ast::*;
use crate::error::{ScriptError, ScriptResult};
use crate::lexer::{Lexer, SpannedToken, Token};

/// Options controlling AST construction.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Attach source spans to statements and expressions.
    pub with_positions: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            with_positions: true,
        }
    }
}

/// Parser for trafoscript programs
pub struct Parser {
    pub(crate) tokens: Vec<SpannedToken>,
    pub(crate) position: usize,
    pub(crate) options: ParseOptions,
}

impl Parser {
    /// Create a new parser from an input string
    pub fn new(input: &str) -> ScriptResult<Self> {
        Self::with_options(input, ParseOptions::default())
    }

    pub fn with_options(input: &str, options: ParseOptions) -> ScriptResult<Self> {
        let mut lexer = Lexer::new(input);
        let tokens = lexer.tokenize()?;

        Ok(Self {
            tokens,
            position: 0,
            options,
        })
    }

    /// Get the current token
    pub(crate) fn current_token(&self) -> &Token {
        self.tokens
            .get(self.position)
            .map(|t| &t.token)
            .unwrap_or(&Token::Eof)
    }

    /// Peek at a token at a given offset from the current position
    pub(crate) fn peek_token(&self, offset: usize) -> &Token {
        self.tokens
            .get(self.position + offset)
            .map(|t| &t.token)
            .unwrap_or(&Token::Eof)
    }

    /// Span of the current token. The token list always ends with `Eof`.
    pub(crate) fn current_span(&self) -> Span {
        self.tokens
            .get(self.position)
            .or_else(|| self.tokens.last())
            .map(|t| t.span)
            .unwrap_or_default()
    }

    /// Span of the most recently consumed token
    pub(crate) fn previous_span(&self) -> Span {
        self.position
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.span)
            .unwrap_or_default()
    }

    /// Advance to the next token
    pub(crate) fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    pub(crate) fn error<T>(&self, message: impl Into<String>) -> ScriptResult<T> {
        Err(ScriptError::Parse {
            message: message.into(),
            position: self.current_span().start,
        })
    }

    /// Expect a specific token and advance, or return an error
    pub(crate) fn expect(&mut self, expected: Token) -> ScriptResult<()> {
        if self.current_token() == &expected {
            self.advance();
            Ok(())
        } else {
            self.error(format!(
                "Expected {:?}, got {:?}",
                expected,
                self.current_token()
            ))
        }
    }

    /// Span from `start` to the end of the last consumed token, if tagging.
    pub(crate) fn tag_from(&self, start: Span) -> Option<Span> {
        self.options
            .with_positions
            .then(|| Span::new(start.start, self.previous_span().end))
    }

    fn skip_newlines(&mut self) {
        while matches!(self.current_token(), Token::Newline) {
            self.advance();
        }
    }

    /// Parse a complete program
    pub fn parse(&mut self) -> ScriptResult<Program> {
        let mut statements = Vec::new();

        loop {
            self.skip_newlines();
            if matches!(self.current_token(), Token::Eof) {
                break;
            }

            statements.push(self.parse_statement()?);

            // One statement per line
            match self.current_token() {
                Token::Newline | Token::Eof => {}
                other => {
                    return self.error(format!("Unexpected token after statement: {:?}", other))
                }
            }
        }

        Ok(Program::new(statements))
    }

    fn parse_statement(&mut self) -> ScriptResult<Statement> {
        match self.current_token() {
            Token::Var => self.parse_var_declaration(),
            Token::Print => self.parse_print(),
            Token::Identifier(_) if matches!(self.peek_token(1), Token::Assign) => {
                self.parse_assignment()
            }
            other => self.error(format!(
                "Unexpected token: {:?}. Expected var, print or an assignment",
                other
            )),
        }
    }

    fn expect_identifier(&mut self, context: &str) -> ScriptResult<String> {
        if let Token::Identifier(name) = self.current_token() {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            self.error(format!(
                "Expected variable name {}, got {:?}",
                context,
                self.current_token()
            ))
        }
    }

    /// var NAME = EXPR
    fn parse_var_declaration(&mut self) -> ScriptResult<Statement> {
        let start = self.current_span();
        self.expect(Token::Var)?;
        let name = self.expect_identifier("after var")?;
        self.expect(Token::Assign)?;
        let init = self.parse_expression()?;

        Ok(Statement::VarDeclaration {
            name,
            init,
            span: self.tag_from(start),
        })
    }

    /// NAME = EXPR
    fn parse_assignment(&mut self) -> ScriptResult<Statement> {
        let start = self.current_span();
        let name = self.expect_identifier("in assignment")?;
        self.expect(Token::Assign)?;
        let expr = self.parse_expression()?;

        Ok(Statement::Assignment {
            name,
            expr,
            span: self.tag_from(start),
        })
    }

    /// print(EXPR)
    fn parse_print(&mut self) -> ScriptResult<Statement> {
        let start = self.current_span();
        self.expect(Token::Print)?;
        self.expect(Token::LeftParen)?;
        let expr = self.parse_expression()?;
        self.expect(Token::RightParen)?;

        Ok(Statement::Print {
            expr,
            span: self.tag_from(start),
        })
    }
}

/// Parse a trafoscript program with position tagging
pub fn parse(input: &str) -> ScriptResult<Program> {
    let mut parser = Parser::new(input)?;
    parser.parse()
}

/// Parse a trafoscript program with explicit options
pub fn parse_with_options(input: &str, options: ParseOptions) -> ScriptResult<Program> {
    let mut parser = Parser::with_options(input, options)?;
    parser.parse()
}
