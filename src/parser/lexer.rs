//! Lexer (tokenizer) for drawing-language source code
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//!
//! Tokenization runs in two passes. The first pass scans characters and produces
//! tokens, with every non-reserved word provisionally marked as an identifier. The
//! second pass decides which of those words are variables and which are labels:
//! a word followed by `<-` anywhere in the program is a variable, every other word
//! is a label. A name that is both assigned and written alone on its own line is
//! ambiguous and rejected.

use super::ast::SourceLocation;
use rustc_hash::FxHashSet;
use std::fmt;

pub const KEYWORDS: [&str; 5] = ["Spawn", "Color", "Size", "GoTo", "Fill"];

pub const FUNCTIONS: [&str; 7] = [
    "GetActualX",
    "GetActualY",
    "GetCanvasSize",
    "GetColorCount",
    "IsBrushColor",
    "IsBrushSize",
    "IsCanvasColor",
];

pub const DRAWING_COMMANDS: [&str; 3] = ["DrawLine", "DrawCircle", "DrawRectangle"];

/// Token classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Keyword,
    Identifier,
    Label,
    Number,
    StringLiteral,
    Punctuation,
    ArithmeticOperator,
    BooleanOperator,
    AssignmentOperator,
    Function,
    DrawingCommand,
}

/// A classified lexeme. String literals store their contents without quotes.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            location,
        }
    }

    pub fn line(&self) -> usize {
        self.location.line
    }

    /// True for a punctuation or operator token with exactly this text
    pub fn is(&self, text: &str) -> bool {
        matches!(
            self.kind,
            TokenKind::Punctuation
                | TokenKind::ArithmeticOperator
                | TokenKind::BooleanOperator
                | TokenKind::AssignmentOperator
        ) && self.lexeme == text
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Keyword => write!(f, "keyword '{}'", self.lexeme),
            TokenKind::Identifier => write!(f, "variable '{}'", self.lexeme),
            TokenKind::Label => write!(f, "label '{}'", self.lexeme),
            TokenKind::Number => write!(f, "number {}", self.lexeme),
            TokenKind::StringLiteral => write!(f, "string \"{}\"", self.lexeme),
            TokenKind::Function => write!(f, "function '{}'", self.lexeme),
            TokenKind::DrawingCommand => write!(f, "command '{}'", self.lexeme),
            TokenKind::Punctuation
            | TokenKind::ArithmeticOperator
            | TokenKind::BooleanOperator
            | TokenKind::AssignmentOperator => write!(f, "'{}'", self.lexeme),
        }
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lexer error at line {}, column {}: {}",
            self.location.line, self.location.column, self.message
        )
    }
}

impl std::error::Error for LexError {}

/// Tokenize a whole source string
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize()
}

/// Lexer for drawing-language source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    open_parens: Vec<SourceLocation>,
    open_brackets: Vec<SourceLocation>,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            open_parens: Vec::new(),
            open_brackets: Vec::new(),
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace()?;

            if self.is_at_end() {
                break;
            }

            tokens.push(self.next_token()?);
        }

        if let Some(loc) = self.open_brackets.first() {
            return Err(LexError {
                message: "Unbalanced brackets: '[' is never closed".to_string(),
                location: *loc,
            });
        }
        if let Some(loc) = self.open_parens.first() {
            return Err(LexError {
                message: "Unbalanced parentheses: '(' is never closed".to_string(),
                location: *loc,
            });
        }

        classify_words(&mut tokens)?;
        Ok(tokens)
    }

    /// Get next token
    fn next_token(&mut self) -> Result<Token, LexError> {
        let loc = self.current_location();
        let ch = self.advance().ok_or_else(|| LexError {
            message: "Unexpected end of file".to_string(),
            location: loc,
        })?;

        match ch {
            '"' => self.string_literal(loc),

            '0'..='9' => self.number_literal(ch, loc),

            'a'..='z' | 'A'..='Z' => Ok(self.word(ch, loc)),

            '-' => {
                let in_operand_position = self.position == 1
                    || !matches!(self.peek_back(2), Some(c) if c.is_ascii_alphanumeric() || c == ')');

                match self.peek() {
                    Some(d) if d.is_ascii_digit() && in_operand_position => {
                        self.number_literal('-', loc)
                    }
                    Some(c) if c.is_ascii_alphabetic() && in_operand_position => Err(LexError {
                        message: "Identifiers cannot start with '-'".to_string(),
                        location: loc,
                    }),
                    _ => Ok(Token::new(TokenKind::ArithmeticOperator, "-", loc)),
                }
            }
            '+' | '/' | '%' => Ok(Token::new(
                TokenKind::ArithmeticOperator,
                ch.to_string(),
                loc,
            )),
            '*' => {
                if self.peek() == Some('*') {
                    self.advance();
                    Ok(Token::new(TokenKind::ArithmeticOperator, "**", loc))
                } else {
                    Ok(Token::new(TokenKind::ArithmeticOperator, "*", loc))
                }
            }
            '<' => {
                if self.peek() == Some('-') {
                    self.advance();
                    Ok(Token::new(TokenKind::AssignmentOperator, "<-", loc))
                } else if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::new(TokenKind::BooleanOperator, "<=", loc))
                } else {
                    Ok(Token::new(TokenKind::BooleanOperator, "<", loc))
                }
            }
            '>' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::new(TokenKind::BooleanOperator, ">=", loc))
                } else {
                    Ok(Token::new(TokenKind::BooleanOperator, ">", loc))
                }
            }
            '=' | '!' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::new(TokenKind::BooleanOperator, format!("{ch}="), loc))
                } else {
                    Err(LexError {
                        message: format!("Unexpected character: '{}'", ch),
                        location: loc,
                    })
                }
            }
            '&' | '|' => {
                if self.peek() == Some(ch) {
                    self.advance();
                    Ok(Token::new(TokenKind::BooleanOperator, format!("{ch}{ch}"), loc))
                } else {
                    Err(LexError {
                        message: format!("Unexpected character: '{}' (did you mean '{ch}{ch}'?)", ch),
                        location: loc,
                    })
                }
            }

            '(' => {
                self.open_parens.push(loc);
                Ok(Token::new(TokenKind::Punctuation, "(", loc))
            }
            '[' => {
                self.open_brackets.push(loc);
                Ok(Token::new(TokenKind::Punctuation, "[", loc))
            }
            ')' => {
                if self.open_parens.pop().is_none() {
                    return Err(LexError {
                        message: "Unbalanced parentheses: unexpected ')'".to_string(),
                        location: loc,
                    });
                }
                Ok(Token::new(TokenKind::Punctuation, ")", loc))
            }
            ']' => {
                if self.open_brackets.pop().is_none() {
                    return Err(LexError {
                        message: "Unbalanced brackets: unexpected ']'".to_string(),
                        location: loc,
                    });
                }
                Ok(Token::new(TokenKind::Punctuation, "]", loc))
            }
            ',' => Ok(Token::new(TokenKind::Punctuation, ",", loc)),

            _ => Err(LexError {
                message: format!("Unexpected character: '{}'", ch),
                location: loc,
            }),
        }
    }

    /// Parse string literal. Strings may not span lines.
    fn string_literal(&mut self, loc: SourceLocation) -> Result<Token, LexError> {
        let mut string = String::new();

        while let Some(ch) = self.peek() {
            if ch == '"' {
                self.advance();
                return Ok(Token::new(TokenKind::StringLiteral, string, loc));
            }
            if ch == '\n' {
                break;
            }
            string.push(ch);
            self.advance();
        }

        Err(LexError {
            message: "Unterminated string literal".to_string(),
            location: loc,
        })
    }

    /// Parse numeric literal; `first` is a digit or a leading '-'
    fn number_literal(&mut self, first: char, loc: SourceLocation) -> Result<Token, LexError> {
        let mut num_str = String::new();
        num_str.push(first);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                num_str.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if matches!(self.peek(), Some(c) if c.is_ascii_alphabetic() || c == '_') {
            return Err(LexError {
                message: format!("Identifiers cannot start with a digit: '{}…'", num_str),
                location: loc,
            });
        }

        num_str.parse::<i32>().map_err(|_| LexError {
            message: format!("Integer literal out of range: {}", num_str),
            location: loc,
        })?;

        Ok(Token::new(TokenKind::Number, num_str, loc))
    }

    /// Parse a keyword, function name, drawing command or (provisional) identifier
    fn word(&mut self, first_char: char, loc: SourceLocation) -> Token {
        let mut word = String::new();
        word.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                word.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let kind = if KEYWORDS.contains(&word.as_str()) {
            TokenKind::Keyword
        } else if FUNCTIONS.contains(&word.as_str()) {
            TokenKind::Function
        } else if DRAWING_COMMANDS.contains(&word.as_str()) {
            TokenKind::DrawingCommand
        } else {
            TokenKind::Identifier
        };

        Token::new(kind, word, loc)
    }

    /// Skip whitespace. A line may not begin with '-' or a digit.
    fn skip_whitespace(&mut self) -> Result<(), LexError> {
        while let Some(ch) = self.peek() {
            if !ch.is_whitespace() {
                break;
            }
            self.advance();
            if ch == '\n' {
                if let Some(next) = self.peek() {
                    if next == '-' || next.is_ascii_digit() {
                        return Err(LexError {
                            message: format!("A line cannot start with '{}'", next),
                            location: self.current_location(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek `n` characters behind the current position
    fn peek_back(&self, n: usize) -> Option<char> {
        self.position
            .checked_sub(n)
            .and_then(|pos| self.input.get(pos).copied())
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = *self.input.get(self.position)?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

/// Second pass: resolve provisional identifiers into variables or labels.
fn classify_words(tokens: &mut [Token]) -> Result<(), LexError> {
    let mut assigned = FxHashSet::default();
    let mut bare_lines = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        if token.kind != TokenKind::Identifier {
            continue;
        }
        let next = tokens.get(i + 1);
        if next.is_some_and(|t| t.kind == TokenKind::AssignmentOperator) {
            assigned.insert(token.lexeme.clone());
            continue;
        }
        let alone_before = i == 0 || tokens[i - 1].line() != token.line();
        let alone_after = next.map_or(true, |t| t.line() != token.line());
        if alone_before && alone_after {
            bare_lines.push(i);
        }
    }

    if let Some(&i) = bare_lines
        .iter()
        .find(|&&i| assigned.contains(&tokens[i].lexeme))
    {
        return Err(LexError {
            message: format!(
                "'{}' is used both as a variable and as a label",
                tokens[i].lexeme
            ),
            location: tokens[i].location,
        });
    }

    for token in tokens.iter_mut() {
        if token.kind == TokenKind::Identifier && !assigned.contains(&token.lexeme) {
            token.kind = TokenKind::Label;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_spawn_tokens() {
        let tokens = tokenize("Spawn(0, 10)").unwrap();

        assert_eq!(tokens.len(), 6);
        assert_eq!(tokens[0].kind, TokenKind::Keyword);
        assert!(tokens[1].is("("));
        assert_eq!(tokens[2].kind, TokenKind::Number);
        assert_eq!(tokens[2].lexeme, "0");
        assert!(tokens[3].is(","));
        assert_eq!(tokens[4].lexeme, "10");
        assert!(tokens[5].is(")"));
    }

    #[test]
    fn test_two_char_operators() {
        let tokens = tokenize("a <- 1 ** 2 && 3 || 4 == 5 != 6 >= 7 <= 8").unwrap();
        let ops: Vec<&str> = tokens
            .iter()
            .filter(|t| {
                matches!(
                    t.kind,
                    TokenKind::ArithmeticOperator
                        | TokenKind::BooleanOperator
                        | TokenKind::AssignmentOperator
                )
            })
            .map(|t| t.lexeme.as_str())
            .collect();

        assert_eq!(ops, vec!["<-", "**", "&&", "||", "==", "!=", ">=", "<="]);
        assert_eq!(tokens[1].kind, TokenKind::AssignmentOperator);
    }

    #[test]
    fn test_negative_number_vs_subtraction() {
        let tokens = tokenize("x <- 3\ny <- x-1\nz <- (-1)").unwrap();

        // x-1 is a subtraction
        assert_eq!(tokens[5].lexeme, "x");
        assert_eq!(tokens[6].kind, TokenKind::ArithmeticOperator);
        assert_eq!(tokens[7].lexeme, "1");

        // (-1) is a negative literal
        assert_eq!(tokens[11].kind, TokenKind::Number);
        assert_eq!(tokens[11].lexeme, "-1");
    }

    #[test]
    fn test_negative_argument() {
        let tokens = tokenize("DrawLine(-1, 0, 5)").unwrap();
        assert_eq!(tokens[2].kind, TokenKind::Number);
        assert_eq!(tokens[2].lexeme, "-1");
    }

    #[test]
    fn test_variable_and_label_classification() {
        let source = "Spawn(0, 0)\nn <- 0\nloop\nn <- n + 1\nGoTo[loop](n < 5)";
        let tokens = tokenize(source).unwrap();

        let n_kinds: Vec<TokenKind> = tokens
            .iter()
            .filter(|t| t.lexeme == "n")
            .map(|t| t.kind)
            .collect();
        assert!(n_kinds.iter().all(|k| *k == TokenKind::Identifier));

        let loop_kinds: Vec<TokenKind> = tokens
            .iter()
            .filter(|t| t.lexeme == "loop")
            .map(|t| t.kind)
            .collect();
        assert_eq!(loop_kinds, vec![TokenKind::Label, TokenKind::Label]);
    }

    #[test]
    fn test_forward_reference_is_still_a_variable() {
        // `k` is read before its assignment in source order
        let tokens = tokenize("GoTo[end](k == 0)\nk <- 1\nend").unwrap();
        let k = tokens.iter().find(|t| t.lexeme == "k").unwrap();
        assert_eq!(k.kind, TokenKind::Identifier);
    }

    #[test]
    fn test_ambiguous_name_rejected() {
        let err = tokenize("a <- 1\na\n").unwrap_err();
        assert!(err.message.contains("both as a variable and as a label"));
        assert_eq!(err.location.line, 2);
    }

    #[test]
    fn test_underscore_continues_identifier() {
        assert_eq!(
            kinds("my_var <- 1"),
            vec![
                TokenKind::Identifier,
                TokenKind::AssignmentOperator,
                TokenKind::Number
            ]
        );
    }

    #[test]
    fn test_string_literal() {
        let tokens = tokenize(r#"Color("Red")"#).unwrap();
        assert_eq!(tokens[2].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[2].lexeme, "Red");
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("Color(\"Red)\nFill()").unwrap_err();
        assert!(err.message.contains("Unterminated string"));
    }

    #[test]
    fn test_unbalanced_parentheses() {
        let err = tokenize("Spawn(0, 0").unwrap_err();
        assert!(err.message.contains("Unbalanced parentheses"));

        let err = tokenize("GoTo[a(1 == 1)").unwrap_err();
        assert!(err.message.contains("Unbalanced brackets"));

        let err = tokenize("Fill())").unwrap_err();
        assert!(err.message.contains("unexpected ')'"));
    }

    #[test]
    fn test_identifier_cannot_start_with_digit() {
        let err = tokenize("x <- 1abc").unwrap_err();
        assert!(err.message.contains("cannot start with a digit"));
    }

    #[test]
    fn test_identifier_cannot_start_with_hyphen() {
        let err = tokenize("x <- (-abc)").unwrap_err();
        assert!(err.message.contains("cannot start with '-'"));
    }

    #[test]
    fn test_line_cannot_start_with_digit_or_hyphen() {
        let err = tokenize("Spawn(0, 0)\n5").unwrap_err();
        assert_eq!(err.location.line, 2);

        let err = tokenize("Spawn(0, 0)\n-x").unwrap_err();
        assert!(err.message.contains("cannot start with '-'"));
    }

    #[test]
    fn test_unknown_character() {
        let err = tokenize("Spawn(0, 0) @").unwrap_err();
        assert!(err.message.contains("Unexpected character: '@'"));
        assert_eq!(err.location.column, 13);
    }

    #[test]
    fn test_line_numbers() {
        let tokens = tokenize("Spawn(1, 1)\n\nFill()").unwrap();
        assert_eq!(tokens.last().unwrap().line(), 3);
    }
}
