//! Expression parsing implementation
//!
//! Binary operators are parsed by precedence climbing. Levels, from loosest to
//! tightest:
//!
//! | level | operators                    | node        |
//! |-------|------------------------------|-------------|
//! | 1     | `+ -`                        | `BinaryOp`  |
//! | 2     | `* / %`                      | `BinaryOp`  |
//! | 3     | `**` (right-associative)     | `BinaryOp`  |
//! | 4     | `&&`                         | `BooleanOp` |
//! | 5     | `\|\|`                       | `BooleanOp` |
//! | 6     | `== != > < >= <=`            | `BooleanOp` |
//!
//! Comparisons bind tighter than arithmetic, so `n + 1 < 5` reads as
//! `n + (1 < 5)`; write `(n + 1) < 5` instead.
//!
//! Primaries are literals, variables, label atoms, builtin calls and
//! parenthesised expressions. Command and call arguments are primaries.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};

/// Binary operator recognised at the current token
#[derive(Debug, Clone, Copy)]
enum Operator {
    Arith(ArithOp),
    Bool(BoolOp),
}

impl Operator {
    fn from_lexeme(lexeme: &str) -> Option<Self> {
        let op = match lexeme {
            "+" => Operator::Arith(ArithOp::Add),
            "-" => Operator::Arith(ArithOp::Sub),
            "*" => Operator::Arith(ArithOp::Mul),
            "/" => Operator::Arith(ArithOp::Div),
            "%" => Operator::Arith(ArithOp::Mod),
            "**" => Operator::Arith(ArithOp::Pow),
            "&&" => Operator::Bool(BoolOp::And),
            "||" => Operator::Bool(BoolOp::Or),
            "==" => Operator::Bool(BoolOp::Eq),
            "!=" => Operator::Bool(BoolOp::Ne),
            "<" => Operator::Bool(BoolOp::Lt),
            "<=" => Operator::Bool(BoolOp::Le),
            ">" => Operator::Bool(BoolOp::Gt),
            ">=" => Operator::Bool(BoolOp::Ge),
            _ => return None,
        };
        Some(op)
    }

    fn precedence(self) -> u8 {
        match self {
            Operator::Arith(ArithOp::Add | ArithOp::Sub) => 1,
            Operator::Arith(ArithOp::Mul | ArithOp::Div | ArithOp::Mod) => 2,
            Operator::Arith(ArithOp::Pow) => 3,
            Operator::Bool(BoolOp::And) => 4,
            Operator::Bool(BoolOp::Or) => 5,
            Operator::Bool(_) => 6,
        }
    }

    fn is_right_associative(self) -> bool {
        matches!(self, Operator::Arith(ArithOp::Pow))
    }
}

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<AstNode, ParseError> {
        self.parse_binary(1)
    }

    /// Precedence climbing over all binary operators with precedence >= `min_prec`
    fn parse_binary(&mut self, min_prec: u8) -> Result<AstNode, ParseError> {
        let mut left = self.parse_primary()?;

        while let Some(op) = self.peek_operator() {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.advance();
            let location = self.previous_location();

            let next_min = if op.is_right_associative() {
                prec
            } else {
                prec + 1
            };
            let right = Box::new(self.parse_binary(next_min)?);

            left = match op {
                Operator::Arith(op) => AstNode::BinaryOp {
                    op,
                    left: Box::new(left),
                    right,
                    location,
                },
                Operator::Bool(op) => AstNode::BooleanOp {
                    op,
                    left: Box::new(left),
                    right,
                    location,
                },
            };
        }

        Ok(left)
    }

    fn peek_operator(&self) -> Option<Operator> {
        let token = self.peek()?;
        match token.kind {
            TokenKind::ArithmeticOperator | TokenKind::BooleanOperator => {
                Operator::from_lexeme(&token.lexeme)
            }
            _ => None,
        }
    }

    /// Parse primary expression (literals, names, calls, parentheses)
    pub(crate) fn parse_primary(&mut self) -> Result<AstNode, ParseError> {
        let location = self.current_location();
        let Some(token) = self.peek() else {
            return self.error("Expected expression, found end of input");
        };

        match token.kind {
            TokenKind::Number => {
                let value = self.expect_number("in expression")?;
                Ok(AstNode::NumberLit(value, location))
            }
            TokenKind::StringLiteral => {
                let text = token.lexeme.clone();
                self.advance();
                Ok(AstNode::StringLit(text, location))
            }
            TokenKind::Identifier => {
                let name = token.lexeme.clone();
                self.advance();
                Ok(AstNode::Variable(name, location))
            }
            TokenKind::Label => {
                let name = token.lexeme.clone();
                self.advance();
                Ok(AstNode::Label { name, location })
            }
            TokenKind::Function => self.parse_call(),
            TokenKind::Punctuation if token.is("(") => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_rparen("after expression")?;
                Ok(expr)
            }
            _ => self.error(format!("Expected expression, found {}", self.found())),
        }
    }

    /// Parse builtin call: `Name(arg, ...)`
    fn parse_call(&mut self) -> Result<AstNode, ParseError> {
        let location = self.current_location();
        let name = self.expect_kind(TokenKind::Function, "function name")?;
        let builtin = match Builtin::from_name(&name) {
            Some(b) => b,
            None => {
                return Err(ParseError {
                    message: format!("Unknown function '{}'", name),
                    location,
                })
            }
        };

        let args = self.parse_arguments(&format!("after '{}'", name))?;

        Ok(AstNode::Call {
            builtin,
            args,
            location,
        })
    }

    /// Parse a parenthesised, comma-separated list of primaries
    pub(crate) fn parse_arguments(&mut self, ctx: &str) -> Result<Vec<AstNode>, ParseError> {
        self.expect_lparen(ctx)?;

        let mut args = Vec::new();
        if !self.check(")") {
            loop {
                args.push(self.parse_primary()?);
                if !self.match_token(",") {
                    break;
                }
            }
        }

        self.expect_rparen("after arguments")?;
        Ok(args)
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::parse::Parser;

    fn parse_assigned(expr: &str) -> AstNode {
        let source = format!("Spawn(0, 0)\nv <- {}", expr);
        let program = Parser::new(&source).unwrap().parse_program().unwrap();
        match program.instructions.into_iter().nth(1) {
            Some(AstNode::Assign { expr, .. }) => *expr,
            other => panic!("Expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_multiplication_binds_tighter() {
        match parse_assigned("1 + 2 * 3") {
            AstNode::BinaryOp {
                op: ArithOp::Add,
                right,
                ..
            } => assert!(matches!(*right, AstNode::BinaryOp { op: ArithOp::Mul, .. })),
            other => panic!("Unexpected tree {:?}", other),
        }
    }

    #[test]
    fn test_subtraction_is_left_associative() {
        // (10 - 3) - 2
        match parse_assigned("10 - 3 - 2") {
            AstNode::BinaryOp {
                op: ArithOp::Sub,
                left,
                right,
                ..
            } => {
                assert!(matches!(*left, AstNode::BinaryOp { op: ArithOp::Sub, .. }));
                assert!(matches!(*right, AstNode::NumberLit(2, _)));
            }
            other => panic!("Unexpected tree {:?}", other),
        }
    }

    #[test]
    fn test_power_is_right_associative() {
        // 2 ** (3 ** 2)
        match parse_assigned("2 ** 3 ** 2") {
            AstNode::BinaryOp {
                op: ArithOp::Pow,
                left,
                right,
                ..
            } => {
                assert!(matches!(*left, AstNode::NumberLit(2, _)));
                assert!(matches!(*right, AstNode::BinaryOp { op: ArithOp::Pow, .. }));
            }
            other => panic!("Unexpected tree {:?}", other),
        }
    }

    #[test]
    fn test_comparison_binds_tightest() {
        match parse_assigned("1 + 2 < 3") {
            AstNode::BinaryOp {
                op: ArithOp::Add,
                right,
                ..
            } => assert!(matches!(*right, AstNode::BooleanOp { op: BoolOp::Lt, .. })),
            other => panic!("Unexpected tree {:?}", other),
        }
    }

    #[test]
    fn test_or_binds_tighter_than_and() {
        // a && (b || c)
        let source = "Spawn(0, 0)\na <- 1\nb <- 1\nc <- 1\nv <- a && b || c";
        let program = Parser::new(source).unwrap().parse_program().unwrap();
        match &program.instructions[4] {
            AstNode::Assign { expr, .. } => match expr.as_ref() {
                AstNode::BooleanOp {
                    op: BoolOp::And,
                    right,
                    ..
                } => assert!(matches!(**right, AstNode::BooleanOp { op: BoolOp::Or, .. })),
                other => panic!("Unexpected tree {:?}", other),
            },
            other => panic!("Expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_parentheses_override_precedence() {
        match parse_assigned("(1 + 2) * 3") {
            AstNode::BinaryOp {
                op: ArithOp::Mul,
                left,
                ..
            } => assert!(matches!(*left, AstNode::BinaryOp { op: ArithOp::Add, .. })),
            other => panic!("Unexpected tree {:?}", other),
        }
    }

    #[test]
    fn test_builtin_call() {
        match parse_assigned("GetColorCount(\"Red\", 0, 0, 4, 4)") {
            AstNode::Call { builtin, args, .. } => {
                assert_eq!(builtin, Builtin::GetColorCount);
                assert_eq!(args.len(), 5);
                assert!(matches!(&args[0], AstNode::StringLit(s, _) if s == "Red"));
            }
            other => panic!("Unexpected tree {:?}", other),
        }
    }

    #[test]
    fn test_missing_operand() {
        let source = "Spawn(0, 0)\nv <- 1 +";
        let err = Parser::new(source)
            .unwrap()
            .parse_program()
            .unwrap_err();
        assert!(err.message.contains("Expected expression"));
    }
}
