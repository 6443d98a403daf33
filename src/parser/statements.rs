//! Instruction parsing implementation
//!
//! A program is a sequence of instructions, one per line:
//!
//! ```text
//! instruction ::= "Spawn" "(" int "," int ")"
//!               | "Color" "(" string ")"
//!               | "Size" "(" int ")"
//!               | "Fill" "(" ")"
//!               | draw_command "(" primary { "," primary } ")"
//!               | "GoTo" "[" label "]" "(" expression ")"
//!               | identifier "<-" expression
//!               | function "(" [ primary { "," primary } ] ")"
//!               | label
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse one instruction and check that it ends its line
    pub(crate) fn parse_instruction(&mut self) -> Result<AstNode, ParseError> {
        let instruction = self.parse_instruction_body()?;

        let line = self.previous_location().line;
        if let Some(next) = self.peek() {
            if next.line() == line {
                return self.error(format!(
                    "Expected end of line after instruction, found {}",
                    self.found()
                ));
            }
        }

        Ok(instruction)
    }

    fn parse_instruction_body(&mut self) -> Result<AstNode, ParseError> {
        let location = self.current_location();
        let Some(token) = self.peek() else {
            return self.error("Expected instruction, found end of input");
        };

        match token.kind {
            TokenKind::Keyword => {
                let keyword = token.lexeme.clone();
                self.advance();
                match keyword.as_str() {
                    "Spawn" => self.parse_spawn(location),
                    "Color" => self.parse_color(location),
                    "Size" => self.parse_size(location),
                    "Fill" => self.parse_fill(location),
                    "GoTo" => self.parse_goto(location),
                    _ => Err(ParseError {
                        message: format!("Unrecognised instruction '{}'", keyword),
                        location,
                    }),
                }
            }
            TokenKind::DrawingCommand => self.parse_draw_command(),
            TokenKind::Function => self.parse_primary(),
            TokenKind::Label => {
                let name = token.lexeme.clone();
                self.advance();
                Ok(AstNode::Label { name, location })
            }
            TokenKind::Identifier
                if self
                    .peek_ahead(1)
                    .is_some_and(|t| t.kind == TokenKind::AssignmentOperator) =>
            {
                self.parse_assignment()
            }
            _ => self.error(format!("Unrecognised instruction: {}", self.found())),
        }
    }

    /// `Spawn(x, y)`
    fn parse_spawn(&mut self, location: SourceLocation) -> Result<AstNode, ParseError> {
        self.expect_lparen("after 'Spawn'")?;
        let x = self.expect_number("for Spawn x")?;
        self.expect_comma("between Spawn coordinates")?;
        let y = self.expect_number("for Spawn y")?;
        self.expect_rparen("after Spawn coordinates")?;

        Ok(AstNode::Spawn { x, y, location })
    }

    /// `Color("Name")`
    fn parse_color(&mut self, location: SourceLocation) -> Result<AstNode, ParseError> {
        self.expect_lparen("after 'Color'")?;
        let name = self.expect_kind(TokenKind::StringLiteral, "color string")?;
        self.expect_rparen("after color")?;

        Ok(AstNode::SetColor { name, location })
    }

    /// `Size(n)`
    fn parse_size(&mut self, location: SourceLocation) -> Result<AstNode, ParseError> {
        self.expect_lparen("after 'Size'")?;
        let size = self.expect_number("for brush size")?;
        self.expect_rparen("after brush size")?;

        Ok(AstNode::SetSize { size, location })
    }

    /// `Fill()`
    fn parse_fill(&mut self, location: SourceLocation) -> Result<AstNode, ParseError> {
        self.expect_lparen("after 'Fill'")?;
        self.expect_rparen("after 'Fill('")?;

        Ok(AstNode::Fill { location })
    }

    /// `GoTo[label](condition)`
    fn parse_goto(&mut self, location: SourceLocation) -> Result<AstNode, ParseError> {
        self.expect_token("[", "after 'GoTo'")?;
        let label = self.expect_kind(TokenKind::Label, "label name")?;
        self.expect_token("]", "after label")?;

        self.expect_lparen("before GoTo condition")?;
        let condition = Box::new(self.parse_expression()?);
        self.expect_rparen("after GoTo condition")?;

        Ok(AstNode::GoTo {
            label,
            condition,
            location,
        })
    }

    /// `DrawLine(...)`, `DrawCircle(...)`, `DrawRectangle(...)`
    fn parse_draw_command(&mut self) -> Result<AstNode, ParseError> {
        let location = self.current_location();
        let name = self.expect_kind(TokenKind::DrawingCommand, "drawing command")?;
        let command = match DrawCommand::from_name(&name) {
            Some(command) => command,
            None => {
                return Err(ParseError {
                    message: format!("Unknown drawing command '{}'", name),
                    location,
                })
            }
        };

        let args = self.parse_arguments(&format!("after '{}'", name))?;

        Ok(AstNode::DrawCommand {
            command,
            args,
            location,
        })
    }

    /// `name <- expression`
    fn parse_assignment(&mut self) -> Result<AstNode, ParseError> {
        let location = self.current_location();
        let name = self.expect_kind(TokenKind::Identifier, "variable name")?;
        self.expect_token("<-", "in assignment")?;
        let expr = Box::new(self.parse_expression()?);

        Ok(AstNode::Assign {
            name,
            expr,
            location,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::parse::Parser;

    fn parse(source: &str) -> Program {
        Parser::new(source).unwrap().parse_program().unwrap()
    }

    #[test]
    fn test_all_instruction_kinds() {
        let source = r#"Spawn(1, 2)
Color("Red")
Size(3)
DrawLine(1, 0, 4)
DrawCircle(0, 1, 2)
DrawRectangle(-1, -1, 2, 3, 5)
Fill()
n <- 5
start
GoTo[start](n == 0)
GetActualX()"#;
        let program = parse(source);

        assert_eq!(program.len(), 11);
        assert!(matches!(program.instructions[0], AstNode::Spawn { x: 1, y: 2, .. }));
        assert!(matches!(&program.instructions[1], AstNode::SetColor { name, .. } if name == "Red"));
        assert!(matches!(program.instructions[2], AstNode::SetSize { size: 3, .. }));
        assert!(matches!(
            &program.instructions[3],
            AstNode::DrawCommand { command: DrawCommand::Line, args, .. } if args.len() == 3
        ));
        assert!(matches!(
            &program.instructions[5],
            AstNode::DrawCommand { command: DrawCommand::Rectangle, args, .. } if args.len() == 5
        ));
        assert!(matches!(program.instructions[6], AstNode::Fill { .. }));
        assert!(matches!(&program.instructions[7], AstNode::Assign { name, .. } if name == "n"));
        assert!(matches!(&program.instructions[8], AstNode::Label { name, .. } if name == "start"));
        assert!(matches!(
            &program.instructions[9],
            AstNode::GoTo { label, condition, .. }
                if label == "start" && matches!(**condition, AstNode::BooleanOp { op: BoolOp::Eq, .. })
        ));
        assert!(matches!(
            program.instructions[10],
            AstNode::Call { builtin: Builtin::GetActualX, .. }
        ));
    }

    #[test]
    fn test_instruction_locations() {
        let program = parse("Spawn(0, 0)\n\nFill()");
        assert_eq!(program.instructions[1].location().line, 3);
    }

    #[test]
    fn test_negative_spawn_literal_parses() {
        // Bounds are the validator's job
        let program = parse("Spawn(-1, 0)");
        assert!(matches!(program.instructions[0], AstNode::Spawn { x: -1, y: 0, .. }));
    }

    #[test]
    fn test_color_requires_string() {
        let err = Parser::new("Spawn(0, 0)\nColor(5)")
            .unwrap()
            .parse_program()
            .unwrap_err();
        assert!(err.message.contains("color string"));
        assert_eq!(err.location.line, 2);
    }

    #[test]
    fn test_goto_requires_label() {
        let err = Parser::new("Spawn(0, 0)\nx <- 1\nGoTo[x](x == 1)")
            .unwrap()
            .parse_program()
            .unwrap_err();
        assert!(err.message.contains("label name"));
    }

    #[test]
    fn test_unrecognised_instruction() {
        let err = Parser::new("Spawn(0, 0)\n\"Red\"")
            .unwrap()
            .parse_program()
            .unwrap_err();
        assert!(err.message.contains("Unrecognised instruction"));
    }

    #[test]
    fn test_two_instructions_on_one_line() {
        let err = Parser::new("Spawn(0, 0) Fill()")
            .unwrap()
            .parse_program()
            .unwrap_err();
        assert!(err.message.contains("end of line"));
    }
}
