//! Built-in function implementations
//!
//! # Supported Built-ins
//!
//! - `GetActualX()`, `GetActualY()`: brush position
//! - `GetCanvasSize()`: canvas side length
//! - `GetColorCount(color, x1, y1, x2, y2)`: cells of `color` in the rectangle,
//!   corners included, clipped to the canvas
//! - `IsBrushColor(color)`, `IsBrushSize(size)`: brush state tests
//! - `IsCanvasColor(color, dx, dy)`: color of the cell at brush + `(dx, dy)`;
//!   false outside the canvas
//!
//! Color arguments are compared ignoring case.

use crate::canvas::ColorName;
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::value::Value;
use crate::parser::ast::{AstNode, Builtin, SourceLocation};

impl Interpreter {
    pub(crate) fn call_builtin(
        &self,
        builtin: Builtin,
        args: &[AstNode],
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let params = builtin.params();
        if args.len() != params.len() {
            return Err(RuntimeError::InvalidArgument {
                message: format!(
                    "{} expects {} argument{}, got {}",
                    builtin.name(),
                    params.len(),
                    if params.len() == 1 { "" } else { "s" },
                    args.len()
                ),
                location,
            });
        }

        let mut values = Vec::with_capacity(args.len());
        for (arg, expected) in args.iter().zip(params) {
            let value = self.evaluate_expr(arg)?;
            if value.value_type() != *expected {
                return Err(RuntimeError::TypeError {
                    expected: format!("{} argument to {}", expected, builtin.name()),
                    got: value.value_type().to_string(),
                    location: arg.location(),
                });
            }
            values.push(value);
        }

        let int_arg = |i: usize| values[i].as_int().unwrap_or_default();
        let color_arg = |i: usize| {
            let name = values[i].as_str().unwrap_or_default();
            ColorName::parse_ignore_case(name).ok_or_else(|| RuntimeError::InvalidColor {
                name: name.to_string(),
                location: args[i].location(),
            })
        };

        let result = match builtin {
            Builtin::GetActualX => Value::Int(self.brush.x),
            Builtin::GetActualY => Value::Int(self.brush.y),
            Builtin::GetCanvasSize => Value::Int(canvas_dimension(self.canvas.size())),
            Builtin::GetColorCount => {
                let color = color_arg(0)?;
                let count =
                    self.canvas
                        .count_color(color, int_arg(1), int_arg(2), int_arg(3), int_arg(4));
                Value::Int(canvas_dimension(count))
            }
            Builtin::IsBrushColor => Value::Bool(self.brush.color == color_arg(0)?),
            Builtin::IsBrushSize => Value::Bool(self.brush.size == int_arg(0)),
            Builtin::IsCanvasColor => {
                let color = color_arg(0)?;
                let x = self.brush.x.checked_add(int_arg(1));
                let y = self.brush.y.checked_add(int_arg(2));
                let cell = x.zip(y).and_then(|(x, y)| self.canvas.get(x, y));
                Value::Bool(cell == Some(color))
            }
        };

        Ok(result)
    }
}

/// Canvas sizes and cell counts are bounded by 512², so they always fit
fn canvas_dimension(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use crate::interpreter::engine::Interpreter;
    use crate::interpreter::errors::RuntimeError;
    use crate::interpreter::value::Value;
    use crate::parser::parse::Parser;

    fn run(source: &str) -> Result<Interpreter, RuntimeError> {
        let program = Parser::new(source).unwrap().parse_program().unwrap();
        let mut interp = Interpreter::new(program, 8);
        interp.run()?;
        Ok(interp)
    }

    fn var(interp: &Interpreter, name: &str) -> Value {
        interp.variables().get(name).cloned().unwrap()
    }

    #[test]
    fn test_position_and_size_queries() {
        let interp = run("Spawn(3, 5)\nx <- GetActualX()\ny <- GetActualY()\nn <- GetCanvasSize()")
            .unwrap();
        assert_eq!(var(&interp, "x"), Value::Int(3));
        assert_eq!(var(&interp, "y"), Value::Int(5));
        assert_eq!(var(&interp, "n"), Value::Int(8));
    }

    #[test]
    fn test_color_count() {
        let source = "Spawn(0, 0)\nColor(\"Red\")\nDrawLine(0, 1, 3)\n\
                      a <- GetColorCount(\"Red\", 0, 0, 7, 7)\n\
                      b <- GetColorCount(\"Red\", 3, 0, 2, 0)\n\
                      c <- GetColorCount(\"Red\", 0, 0, 8, 0)\n\
                      d <- GetColorCount(\"Red\", -1, 0, 7, 0)\n\
                      e <- GetColorCount(\"Red\", 8, 0, 20, 20)";
        let interp = run(source).unwrap();
        assert_eq!(var(&interp, "a"), Value::Int(4));
        assert_eq!(var(&interp, "b"), Value::Int(2));
        assert_eq!(var(&interp, "c"), Value::Int(4));
        assert_eq!(var(&interp, "d"), Value::Int(4));
        assert_eq!(var(&interp, "e"), Value::Int(0));
    }

    #[test]
    fn test_brush_queries() {
        let source = "Spawn(1, 1)\nColor(\"Blue\")\nSize(3)\n\
                      a <- IsBrushColor(\"Blue\")\n\
                      b <- IsBrushColor(\"Red\")\n\
                      c <- IsBrushSize(3)";
        let interp = run(source).unwrap();
        assert_eq!(var(&interp, "a"), Value::Bool(true));
        assert_eq!(var(&interp, "b"), Value::Bool(false));
        assert_eq!(var(&interp, "c"), Value::Bool(true));
    }

    #[test]
    fn test_canvas_color_relative_to_brush() {
        let source = "Spawn(0, 0)\nColor(\"Green\")\nDrawLine(0, 1, 2)\n\
                      a <- IsCanvasColor(\"Green\", -1, 0)\n\
                      b <- IsCanvasColor(\"White\", 0, 1)\n\
                      c <- IsCanvasColor(\"Green\", 0, -1)";
        let interp = run(source).unwrap();
        assert_eq!(var(&interp, "a"), Value::Bool(true));
        assert_eq!(var(&interp, "b"), Value::Bool(true));
        // Above the top row
        assert_eq!(var(&interp, "c"), Value::Bool(false));
    }

    #[test]
    fn test_argument_type_mismatch() {
        let err = run("Spawn(0, 0)\nv <- IsBrushSize(\"Red\")").err().unwrap();
        assert!(matches!(err, RuntimeError::TypeError { .. }));
    }
}
