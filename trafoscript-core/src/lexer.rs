use crate::aggregation::AggregationSelector;
use crate::ast::{Position, Span, TimeUnit};
use crate::error::{ScriptError, ScriptResult};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Keywords
    Var,
    Print,
    TimeUnit(TimeUnit),
    Aggregation(AggregationSelector),

    // Identifiers and literals
    Identifier(String),
    Integer(i64),
    Decimal(f64),
    String(String),

    // Operators
    Assign, // =
    Plus,   // +
    Minus,  // -
    Star,   // *
    Slash,  // /

    // Delimiters
    LeftParen,  // (
    RightParen, // )
    Comma,      // ,

    // Statement terminator
    Newline,

    // Special
    Eof,
}

/// A token together with the source range it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    current_char: Option<char>,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        let chars: Vec<char> = input.chars().collect();
        let current_char = chars.first().copied();

        Self {
            input: chars,
            position: 0,
            current_char,
            line: 1,
            column: 0,
        }
    }

    fn here(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn advance(&mut self) {
        if self.current_char == Some('\n') {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        self.position += 1;
        self.current_char = self.input.get(self.position).copied();
    }

    /// Peek at the next character without consuming it
    fn peek_char(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    /// Skips blanks and `#` comments, but not newlines: they end statements.
    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char {
            if ch == '#' {
                while !matches!(self.current_char, None | Some('\n')) {
                    self.advance();
                }
            } else if ch.is_whitespace() && ch != '\n' {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_number(&mut self) -> ScriptResult<Token> {
        let start = self.here();
        let mut num_str = String::new();
        let mut has_dot = false;

        while let Some(ch) = self.current_char {
            if ch.is_ascii_digit() {
                num_str.push(ch);
                self.advance();
            } else if ch == '.' && !has_dot && self.peek_char().is_some_and(|c| c.is_ascii_digit())
            {
                has_dot = true;
                num_str.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if has_dot {
            num_str.parse::<f64>().map(Token::Decimal).map_err(|_| {
                ScriptError::Parse {
                    message: format!("Invalid decimal number: {}", num_str),
                    position: start,
                }
            })
        } else {
            num_str.parse::<i64>().map(Token::Integer).map_err(|_| {
                ScriptError::Parse {
                    message: format!("Invalid integer number: {}", num_str),
                    position: start,
                }
            })
        }
    }

    fn read_string(&mut self) -> ScriptResult<Token> {
        let start = self.here();
        let quote = self.current_char.unwrap_or('"');
        self.advance(); // Skip opening quote

        let mut string = String::new();

        while let Some(ch) = self.current_char {
            if ch == quote {
                self.advance(); // Skip closing quote
                return Ok(Token::String(string));
            } else if ch == '\n' {
                break;
            } else if ch == '\\' {
                self.advance();
                if let Some(escaped) = self.current_char {
                    string.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        '\\' => '\\',
                        '"' => '"',
                        '\'' => '\'',
                        _ => escaped,
                    });
                    self.advance();
                }
            } else {
                string.push(ch);
                self.advance();
            }
        }

        Err(ScriptError::Parse {
            message: "Unterminated string".to_string(),
            position: start,
        })
    }

    fn read_identifier(&mut self) -> Token {
        let mut ident = String::new();

        while let Some(ch) = self.current_char {
            if ch.is_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        // Keywords are case sensitive
        match ident.as_str() {
            "var" => Token::Var,
            "print" => Token::Print,
            word => {
                if let Some(unit) = TimeUnit::from_keyword(word) {
                    Token::TimeUnit(unit)
                } else if let Some(selector) = AggregationSelector::from_keyword(word) {
                    Token::Aggregation(selector)
                } else {
                    Token::Identifier(ident)
                }
            }
        }
    }

    pub fn next_token(&mut self) -> ScriptResult<SpannedToken> {
        self.skip_whitespace();
        let start = self.here();

        let token = match self.current_char {
            None => Token::Eof,
            Some(ch) => match ch {
                '\n' => {
                    self.advance();
                    Token::Newline
                }
                '0'..='9' => self.read_number()?,
                '"' | '\'' => self.read_string()?,
                c if c.is_alphabetic() || c == '_' => self.read_identifier(),
                '=' => {
                    self.advance();
                    Token::Assign
                }
                '+' => {
                    self.advance();
                    Token::Plus
                }
                '-' => {
                    self.advance();
                    Token::Minus
                }
                '*' => {
                    self.advance();
                    Token::Star
                }
                '/' => {
                    self.advance();
                    Token::Slash
                }
                '(' => {
                    self.advance();
                    Token::LeftParen
                }
                ')' => {
                    self.advance();
                    Token::RightParen
                }
                ',' => {
                    self.advance();
                    Token::Comma
                }
                other => {
                    return Err(ScriptError::Parse {
                        message: format!("Unexpected character: '{}'", other),
                        position: start,
                    })
                }
            },
        };

        // A newline token ends on the following line; clamp it to its own.
        let end = if token == Token::Newline {
            Position::new(start.line, start.column + 1)
        } else {
            self.here()
        };

        Ok(SpannedToken {
            token,
            span: Span::new(start, end),
        })
    }

    pub fn tokenize(&mut self) -> ScriptResult<Vec<SpannedToken>> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            if token.token == Token::Eof {
                tokens.push(token);
                break;
            }
            tokens.push(token);
        }

        Ok(tokens)
    }
}
