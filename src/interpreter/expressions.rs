//! Expression evaluation
//!
//! Arithmetic works on `Int` only and every operation is overflow-checked.
//! Logical operators short-circuit on truthiness. Comparisons accept two strings
//! (`==`/`!=`, case-insensitive) or two numeric operands, where booleans count
//! as 1 and 0.

use crate::canvas::ColorName;
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::value::Value;
use crate::parser::ast::{ArithOp, AstNode, BoolOp, SourceLocation};

impl Interpreter {
    pub(crate) fn evaluate_expr(&self, expr: &AstNode) -> Result<Value, RuntimeError> {
        match expr {
            AstNode::NumberLit(n, _) => Ok(Value::Int(*n)),

            AstNode::StringLit(s, location) => match s.parse::<ColorName>() {
                Ok(_) => Ok(Value::Str(s.clone())),
                Err(_) => Err(RuntimeError::InvalidColor {
                    name: s.clone(),
                    location: *location,
                }),
            },

            AstNode::Variable(name, location) => {
                self.variables
                    .get(name)
                    .cloned()
                    .ok_or_else(|| RuntimeError::UndefinedVariable {
                        name: name.clone(),
                        location: *location,
                    })
            }

            // A label name used where a value is expected
            AstNode::Label { name, location } => Err(RuntimeError::UndefinedVariable {
                name: name.clone(),
                location: *location,
            }),

            AstNode::Call {
                builtin,
                args,
                location,
            } => self.call_builtin(*builtin, args, *location),

            AstNode::BinaryOp {
                op,
                left,
                right,
                location,
            } => {
                let left = self.evaluate_expr(left)?;
                let right = self.evaluate_expr(right)?;
                self.evaluate_arithmetic(*op, &left, &right, *location)
            }

            AstNode::BooleanOp {
                op,
                left,
                right,
                location,
            } => self.evaluate_boolean(*op, left, right, *location),

            other => Err(RuntimeError::TypeError {
                expected: "expression".to_string(),
                got: "instruction".to_string(),
                location: other.location(),
            }),
        }
    }

    /// Evaluate an expression that must produce an `Int`
    pub(crate) fn evaluate_int(&self, expr: &AstNode) -> Result<i32, RuntimeError> {
        let value = self.evaluate_expr(expr)?;
        value.as_int().ok_or_else(|| RuntimeError::TypeError {
            expected: "int".to_string(),
            got: value.value_type().to_string(),
            location: expr.location(),
        })
    }

    fn evaluate_arithmetic(
        &self,
        op: ArithOp,
        left: &Value,
        right: &Value,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let (a, b) = match (left, right) {
            (Value::Int(a), Value::Int(b)) => (*a, *b),
            _ => {
                return Err(RuntimeError::TypeError {
                    expected: "int".to_string(),
                    got: format!("{} {} {}", left.value_type(), op, right.value_type()),
                    location,
                })
            }
        };

        let overflow = || RuntimeError::IntegerOverflow {
            operation: format!("{} {} {}", a, op, b),
            location,
        };

        let result = match op {
            ArithOp::Add => a.checked_add(b).ok_or_else(overflow)?,
            ArithOp::Sub => a.checked_sub(b).ok_or_else(overflow)?,
            ArithOp::Mul => a.checked_mul(b).ok_or_else(overflow)?,
            ArithOp::Div => {
                if b == 0 {
                    return Err(RuntimeError::DivisionError {
                        operation: "Division by zero".to_string(),
                        location,
                    });
                }
                a.checked_div(b).ok_or_else(overflow)?
            }
            ArithOp::Mod => {
                if b == 0 {
                    return Err(RuntimeError::DivisionError {
                        operation: "Modulo by zero".to_string(),
                        location,
                    });
                }
                a.checked_rem(b).ok_or_else(overflow)?
            }
            ArithOp::Pow => checked_pow(a, b, location)?,
        };

        Ok(Value::Int(result))
    }

    fn evaluate_boolean(
        &self,
        op: BoolOp,
        left: &AstNode,
        right: &AstNode,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match op {
            BoolOp::And => {
                if !self.evaluate_expr(left)?.is_truthy() {
                    return Ok(Value::Bool(false));
                }
                Ok(Value::Bool(self.evaluate_expr(right)?.is_truthy()))
            }
            BoolOp::Or => {
                if self.evaluate_expr(left)?.is_truthy() {
                    return Ok(Value::Bool(true));
                }
                Ok(Value::Bool(self.evaluate_expr(right)?.is_truthy()))
            }
            _ => {
                let left = self.evaluate_expr(left)?;
                let right = self.evaluate_expr(right)?;
                compare_values(op, &left, &right, location).map(Value::Bool)
            }
        }
    }
}

/// `base ** exponent`; a negative exponent yields `1 / base^|exponent|` truncated
/// toward zero
fn checked_pow(base: i32, exponent: i32, location: SourceLocation) -> Result<i32, RuntimeError> {
    if exponent < 0 {
        return match base {
            0 => Err(RuntimeError::DivisionError {
                operation: format!("Division by zero: 0 ** {}", exponent),
                location,
            }),
            1 => Ok(1),
            -1 => Ok(if exponent % 2 == 0 { 1 } else { -1 }),
            _ => Ok(0),
        };
    }

    // exponent >= 0 here
    base.checked_pow(exponent.unsigned_abs())
        .ok_or_else(|| RuntimeError::IntegerOverflow {
            operation: format!("{} ** {}", base, exponent),
            location,
        })
}

fn compare_values(
    op: BoolOp,
    left: &Value,
    right: &Value,
    location: SourceLocation,
) -> Result<bool, RuntimeError> {
    if let (Value::Str(a), Value::Str(b)) = (left, right) {
        let equal = a.eq_ignore_ascii_case(b);
        return match op {
            BoolOp::Eq => Ok(equal),
            BoolOp::Ne => Ok(!equal),
            _ => Err(RuntimeError::TypeError {
                expected: "'==' or '!=' between strings".to_string(),
                got: format!("'{}'", op),
                location,
            }),
        };
    }

    let (Some(a), Some(b)) = (left.as_numeric(), right.as_numeric()) else {
        return Err(RuntimeError::TypeError {
            expected: "comparable operands".to_string(),
            got: format!("{} {} {}", left.value_type(), op, right.value_type()),
            location,
        });
    };

    let result = match op {
        BoolOp::Eq => a == b,
        BoolOp::Ne => a != b,
        BoolOp::Lt => a < b,
        BoolOp::Le => a <= b,
        BoolOp::Gt => a > b,
        BoolOp::Ge => a >= b,
        BoolOp::And => a != 0 && b != 0,
        BoolOp::Or => a != 0 || b != 0,
    };
    Ok(result)
}
