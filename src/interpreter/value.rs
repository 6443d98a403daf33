//! Runtime value representation
//!
//! - [`Value::Int`]: 32-bit signed integer
//! - [`Value::Str`]: string (only palette color names reach runtime)
//! - [`Value::Bool`]: result of comparisons, logical operators and `Is*` builtins

use crate::parser::ast::ValueType;
use std::fmt;

/// Runtime values in the interpreter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i32),
    Str(String),
    Bool(bool),
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Int(_) => ValueType::Int,
            Value::Str(_) => ValueType::Str,
            Value::Bool(_) => ValueType::Bool,
        }
    }

    /// Get the integer value, returns None if not an Int
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integer view used by comparisons: booleans count as 1/0
    pub fn as_numeric(&self) -> Option<i32> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Bool(b) => Some(i32::from(*b)),
            Value::Str(_) => None,
        }
    }

    /// Nonzero ints, non-empty strings and `true` are truthy
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Int(n) => *n != 0,
            Value::Str(s) => !s.is_empty(),
            Value::Bool(b) => *b,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "\"{}\"", s),
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(Value::Int(-3).is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(Value::Str("Red".to_string()).is_truthy());
        assert!(!Value::Str(String::new()).is_truthy());
        assert!(!Value::Bool(false).is_truthy());
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(Value::Bool(true).as_numeric(), Some(1));
        assert_eq!(Value::Int(7).as_numeric(), Some(7));
        assert_eq!(Value::Str("Red".to_string()).as_numeric(), None);
    }
}
