//! Static type inference for expressions
//!
//! - Number literals are `int`, string literals `string`
//! - Arithmetic yields `int`; comparisons and logical operators yield `bool`
//! - Builtin calls yield their declared return type
//! - Variables have the type of their latest assignment in program order, or no
//!   known type if that assignment could not be typed or none has been seen yet

use super::SemanticContext;
use crate::parser::ast::{AstNode, ValueType};

/// Infer the static type of an expression, `None` when it cannot be known
pub fn infer_type(expr: &AstNode, ctx: &SemanticContext) -> Option<ValueType> {
    match expr {
        AstNode::NumberLit(..) => Some(ValueType::Int),
        AstNode::StringLit(..) => Some(ValueType::Str),
        AstNode::Variable(name, _) => ctx.variable_type(name),
        AstNode::Call { builtin, .. } => Some(builtin.return_type()),
        AstNode::BinaryOp { .. } => Some(ValueType::Int),
        AstNode::BooleanOp { .. } => Some(ValueType::Bool),
        _ => None,
    }
}

/// Whether an expression can serve as a `GoTo` condition
pub fn is_boolean_condition(expr: &AstNode, ctx: &SemanticContext) -> bool {
    match expr {
        AstNode::BooleanOp { .. } => true,
        AstNode::Call { builtin, .. } => builtin.return_type() == ValueType::Bool,
        // Accepted unless known to hold something else
        AstNode::Variable(name, _) => matches!(ctx.variable_type(name), None | Some(ValueType::Bool)),
        _ => false,
    }
}

/// Whether an expression reads any state that can change between evaluations
pub fn is_dynamic(expr: &AstNode) -> bool {
    match expr {
        AstNode::Variable(..) | AstNode::Call { .. } => true,
        AstNode::BinaryOp { left, right, .. } | AstNode::BooleanOp { left, right, .. } => {
            is_dynamic(left) || is_dynamic(right)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::{ArithOp, BoolOp, Builtin, SourceLocation};

    fn loc() -> SourceLocation {
        SourceLocation::new(1, 1)
    }

    #[test]
    fn test_literal_and_operator_types() {
        let ctx = SemanticContext::new(10);
        let sum = AstNode::BinaryOp {
            op: ArithOp::Add,
            left: Box::new(AstNode::NumberLit(1, loc())),
            right: Box::new(AstNode::NumberLit(2, loc())),
            location: loc(),
        };
        assert_eq!(infer_type(&sum, &ctx), Some(ValueType::Int));
        assert_eq!(
            infer_type(&AstNode::StringLit("Red".into(), loc()), &ctx),
            Some(ValueType::Str)
        );
        assert_eq!(
            infer_type(&AstNode::Variable("x".into(), loc()), &ctx),
            None
        );
    }

    #[test]
    fn test_variable_type_from_context() {
        let mut ctx = SemanticContext::new(10);
        ctx.types.insert("flag".to_string(), ValueType::Bool);
        ctx.types.insert("n".to_string(), ValueType::Int);

        assert!(is_boolean_condition(&AstNode::Variable("flag".into(), loc()), &ctx));
        assert!(!is_boolean_condition(&AstNode::Variable("n".into(), loc()), &ctx));
        assert!(is_boolean_condition(&AstNode::Variable("unknown".into(), loc()), &ctx));
    }

    #[test]
    fn test_builtin_conditions() {
        let ctx = SemanticContext::new(10);
        let is_size = AstNode::Call {
            builtin: Builtin::IsBrushSize,
            args: vec![AstNode::NumberLit(1, loc())],
            location: loc(),
        };
        let get_x = AstNode::Call {
            builtin: Builtin::GetActualX,
            args: vec![],
            location: loc(),
        };
        assert!(is_boolean_condition(&is_size, &ctx));
        assert!(!is_boolean_condition(&get_x, &ctx));
    }

    #[test]
    fn test_dynamic_detection() {
        let constant = AstNode::BooleanOp {
            op: BoolOp::Eq,
            left: Box::new(AstNode::NumberLit(1, loc())),
            right: Box::new(AstNode::NumberLit(1, loc())),
            location: loc(),
        };
        let with_var = AstNode::BooleanOp {
            op: BoolOp::Lt,
            left: Box::new(AstNode::Variable("k".into(), loc())),
            right: Box::new(AstNode::NumberLit(5, loc())),
            location: loc(),
        };
        assert!(!is_dynamic(&constant));
        assert!(is_dynamic(&with_var));
    }
}
