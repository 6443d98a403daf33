//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, helper methods, and the main parse entry point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, token helpers, and coordination
//! - `statements`: Parsing one instruction per line (Spawn, Color, GoTo, assignments...)
//! - `expressions`: Parsing expressions with precedence climbing
//!
//! Parser methods are split across files using `impl Parser` blocks, so each
//! module extends the Parser while sharing the token cursor.

use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer, Token, TokenKind};
use log::trace;
use std::fmt;

/// Parser error type
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parse error at line {}, column {}: {}",
            self.location.line, self.location.column, self.message
        )
    }
}

impl std::error::Error for ParseError {}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError {
            message: err.message,
            location: err.location,
        }
    }
}

/// Parse an already tokenized program
pub fn parse(tokens: Vec<Token>) -> Result<Program, ParseError> {
    Parser::from_tokens(tokens).parse_program()
}

/// Recursive descent parser for the drawing language
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        Ok(Self::from_tokens(tokens))
    }

    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Parse the entire program (one instruction per line)
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut program = Program::new();

        while !self.is_at_end() {
            let instruction = self.parse_instruction()?;
            program.instructions.push(instruction);
        }

        trace!("parsed {} instructions", program.len());
        Ok(program)
    }

    // ===== Helper methods =====

    /// Consume the next token if it is the given punctuation or operator
    pub(crate) fn match_token(&mut self, text: &str) -> bool {
        if self.check(text) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn check(&self, text: &str) -> bool {
        self.peek().is_some_and(|t| t.is(text))
    }

    pub(crate) fn advance(&mut self) -> Option<&Token> {
        if self.is_at_end() {
            return None;
        }
        self.position += 1;
        self.tokens.get(self.position - 1)
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    pub(crate) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    pub(crate) fn previous_location(&self) -> SourceLocation {
        self.position
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.location)
            .unwrap_or_default()
    }

    /// Location of the next token, or of the last one at end of input
    pub(crate) fn current_location(&self) -> SourceLocation {
        match self.peek() {
            Some(token) => token.location,
            None => self.tokens.last().map(|t| t.location).unwrap_or_default(),
        }
    }

    /// Description of the next token for error messages
    pub(crate) fn found(&self) -> String {
        match self.peek() {
            Some(token) => token.to_string(),
            None => "end of input".to_string(),
        }
    }

    pub(crate) fn error<T>(&self, message: impl Into<String>) -> Result<T, ParseError> {
        Err(ParseError {
            message: message.into(),
            location: self.current_location(),
        })
    }

    pub(crate) fn expect_token(&mut self, text: &str, ctx: &str) -> Result<(), ParseError> {
        if self.match_token(text) {
            Ok(())
        } else {
            self.error(format!("Expected '{}' {}, found {}", text, ctx, self.found()))
        }
    }

    pub(crate) fn expect_lparen(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token("(", ctx)
    }

    pub(crate) fn expect_rparen(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(")", ctx)
    }

    pub(crate) fn expect_comma(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(",", ctx)
    }

    /// Consume a token of the given kind and return its lexeme
    pub(crate) fn expect_kind(&mut self, kind: TokenKind, what: &str) -> Result<String, ParseError> {
        match self.peek() {
            Some(token) if token.kind == kind => {
                let lexeme = token.lexeme.clone();
                self.advance();
                Ok(lexeme)
            }
            _ => self.error(format!("Expected {}, found {}", what, self.found())),
        }
    }

    /// Consume an integer literal
    pub(crate) fn expect_number(&mut self, ctx: &str) -> Result<i32, ParseError> {
        let location = self.current_location();
        let lexeme = self.expect_kind(TokenKind::Number, &format!("integer literal {ctx}"))?;
        lexeme.parse::<i32>().map_err(|_| ParseError {
            message: format!("Integer literal out of range: {}", lexeme),
            location,
        })
    }
}
