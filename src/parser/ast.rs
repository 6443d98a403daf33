// AST (Abstract Syntax Tree) definitions for the drawing language

use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Arithmetic operators (`BinaryOp` nodes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

/// Logical and comparison operators (`BooleanOp` nodes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BoolOp {
    pub fn is_logical(self) -> bool {
        matches!(self, BoolOp::And | BoolOp::Or)
    }
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
            ArithOp::Mod => "%",
            ArithOp::Pow => "**",
        };
        f.write_str(s)
    }
}

impl fmt::Display for BoolOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BoolOp::And => "&&",
            BoolOp::Or => "||",
            BoolOp::Eq => "==",
            BoolOp::Ne => "!=",
            BoolOp::Lt => "<",
            BoolOp::Le => "<=",
            BoolOp::Gt => ">",
            BoolOp::Ge => ">=",
        };
        f.write_str(s)
    }
}

/// The three drawing commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawCommand {
    Line,
    Circle,
    Rectangle,
}

impl DrawCommand {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "DrawLine" => Some(DrawCommand::Line),
            "DrawCircle" => Some(DrawCommand::Circle),
            "DrawRectangle" => Some(DrawCommand::Rectangle),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DrawCommand::Line => "DrawLine",
            DrawCommand::Circle => "DrawCircle",
            DrawCommand::Rectangle => "DrawRectangle",
        }
    }

    /// Number of arguments: `(dirY, dirX, distance)` or
    /// `(dirY, dirX, distance, width, height)`
    pub fn arity(self) -> usize {
        match self {
            DrawCommand::Line | DrawCommand::Circle => 3,
            DrawCommand::Rectangle => 5,
        }
    }
}

/// Static type of an expression or builtin parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Int,
    Str,
    Bool,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Int => write!(f, "int"),
            ValueType::Str => write!(f, "string"),
            ValueType::Bool => write!(f, "bool"),
        }
    }
}

/// Built-in query functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    GetActualX,
    GetActualY,
    GetCanvasSize,
    GetColorCount,
    IsBrushColor,
    IsBrushSize,
    IsCanvasColor,
}

impl Builtin {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "GetActualX" => Some(Builtin::GetActualX),
            "GetActualY" => Some(Builtin::GetActualY),
            "GetCanvasSize" => Some(Builtin::GetCanvasSize),
            "GetColorCount" => Some(Builtin::GetColorCount),
            "IsBrushColor" => Some(Builtin::IsBrushColor),
            "IsBrushSize" => Some(Builtin::IsBrushSize),
            "IsCanvasColor" => Some(Builtin::IsCanvasColor),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::GetActualX => "GetActualX",
            Builtin::GetActualY => "GetActualY",
            Builtin::GetCanvasSize => "GetCanvasSize",
            Builtin::GetColorCount => "GetColorCount",
            Builtin::IsBrushColor => "IsBrushColor",
            Builtin::IsBrushSize => "IsBrushSize",
            Builtin::IsCanvasColor => "IsCanvasColor",
        }
    }

    /// Parameter types, in call order
    pub fn params(self) -> &'static [ValueType] {
        use ValueType::*;
        match self {
            Builtin::GetActualX | Builtin::GetActualY | Builtin::GetCanvasSize => &[],
            Builtin::GetColorCount => &[Str, Int, Int, Int, Int],
            Builtin::IsBrushColor => &[Str],
            Builtin::IsBrushSize => &[Int],
            Builtin::IsCanvasColor => &[Str, Int, Int],
        }
    }

    pub fn return_type(self) -> ValueType {
        match self {
            Builtin::GetActualX
            | Builtin::GetActualY
            | Builtin::GetCanvasSize
            | Builtin::GetColorCount => ValueType::Int,
            Builtin::IsBrushColor | Builtin::IsBrushSize | Builtin::IsCanvasColor => {
                ValueType::Bool
            }
        }
    }
}

/// AST nodes representing instructions and expressions
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    // Instructions
    Spawn {
        x: i32,
        y: i32,
        location: SourceLocation,
    },
    SetColor {
        name: String,
        location: SourceLocation,
    },
    SetSize {
        size: i32,
        location: SourceLocation,
    },
    DrawCommand {
        command: DrawCommand,
        args: Vec<AstNode>,
        location: SourceLocation,
    },
    Fill {
        location: SourceLocation,
    },
    Assign {
        name: String,
        expr: Box<AstNode>,
        location: SourceLocation,
    },
    Label {
        name: String,
        location: SourceLocation,
    },
    GoTo {
        label: String,
        condition: Box<AstNode>,
        location: SourceLocation,
    },

    // Expressions
    Call {
        builtin: Builtin,
        args: Vec<AstNode>,
        location: SourceLocation,
    },
    BinaryOp {
        op: ArithOp,
        left: Box<AstNode>,
        right: Box<AstNode>,
        location: SourceLocation,
    },
    BooleanOp {
        op: BoolOp,
        left: Box<AstNode>,
        right: Box<AstNode>,
        location: SourceLocation,
    },
    Variable(String, SourceLocation),
    NumberLit(i32, SourceLocation),
    StringLit(String, SourceLocation),
}

impl AstNode {
    /// Get the source location of this node
    pub fn location(&self) -> SourceLocation {
        match self {
            AstNode::Spawn { location, .. }
            | AstNode::SetColor { location, .. }
            | AstNode::SetSize { location, .. }
            | AstNode::DrawCommand { location, .. }
            | AstNode::Fill { location }
            | AstNode::Assign { location, .. }
            | AstNode::Label { location, .. }
            | AstNode::GoTo { location, .. }
            | AstNode::Call { location, .. }
            | AstNode::BinaryOp { location, .. }
            | AstNode::BooleanOp { location, .. } => *location,
            AstNode::Variable(_, loc) | AstNode::NumberLit(_, loc) | AstNode::StringLit(_, loc) => {
                *loc
            }
        }
    }

    /// Integer value of a literal, used for constant folding in the validator
    pub fn as_constant(&self) -> Option<i32> {
        match self {
            AstNode::NumberLit(n, _) => Some(*n),
            _ => None,
        }
    }
}

/// Top-level program structure
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub instructions: Vec<AstNode>,
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}
