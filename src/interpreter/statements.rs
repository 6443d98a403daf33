//! Instruction execution
//!
//! Brush state changes, drawing commands, flood fill and conditional jumps.
//! Drawing commands take `(dirY, dirX, ...)`; a Transparent brush moves without
//! painting.

use crate::canvas::brush::Brush;
use crate::canvas::ColorName;
use crate::interpreter::engine::{Flow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::parser::ast::{AstNode, DrawCommand, SourceLocation};
use log::debug;

impl Interpreter {
    pub(crate) fn execute_spawn(
        &mut self,
        x: i32,
        y: i32,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        if !self.canvas.in_bounds(x, y) {
            return Err(RuntimeError::OutOfBounds {
                x,
                y,
                size: self.canvas.size(),
                location,
            });
        }
        self.brush.move_to(x, y);
        Ok(())
    }

    pub(crate) fn execute_set_color(
        &mut self,
        name: &str,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        self.brush.color = name
            .parse::<ColorName>()
            .map_err(|_| RuntimeError::InvalidColor {
                name: name.to_string(),
                location,
            })?;
        Ok(())
    }

    pub(crate) fn execute_set_size(
        &mut self,
        size: i32,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        self.brush.size = Brush::adjusted_size(size)
            .ok_or(RuntimeError::InvalidBrushSize { size, location })?;
        Ok(())
    }

    pub(crate) fn execute_draw(
        &mut self,
        command: DrawCommand,
        args: &[AstNode],
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        if args.len() != command.arity() {
            return Err(RuntimeError::InvalidArgument {
                message: format!(
                    "{} expects {} arguments, got {}",
                    command.name(),
                    command.arity(),
                    args.len()
                ),
                location,
            });
        }

        let values = args
            .iter()
            .map(|arg| self.evaluate_int(arg))
            .collect::<Result<Vec<i32>, RuntimeError>>()?;

        let (dir_y, dir_x, distance) = (values[0], values[1], values[2]);
        if !(-1..=1).contains(&dir_x) || !(-1..=1).contains(&dir_y) {
            return Err(RuntimeError::InvalidDirection {
                dir_x,
                dir_y,
                location,
            });
        }

        let min_distance = match command {
            DrawCommand::Circle => 1,
            DrawCommand::Line | DrawCommand::Rectangle => 0,
        };
        if distance < min_distance {
            return Err(RuntimeError::InvalidArgument {
                message: format!("{} distance must be at least {}", command.name(), min_distance),
                location,
            });
        }

        let target = self.offset_brush(dir_x, dir_y, distance, location)?;
        let color = self.brush.color;
        let size = self.brush.size;
        let from = (i64::from(self.brush.x), i64::from(self.brush.y));
        let to = (i64::from(target.0), i64::from(target.1));

        match command {
            DrawCommand::Line => {
                if color != ColorName::Transparent {
                    self.canvas.draw_line(from, to, color, size);
                }
            }
            DrawCommand::Circle => {
                if color != ColorName::Transparent {
                    self.canvas
                        .draw_circle(to, i64::from(distance), color, size);
                }
            }
            DrawCommand::Rectangle => {
                let (width, height) = (values[3], values[4]);
                if width <= 0 || height <= 0 {
                    return Err(RuntimeError::InvalidArgument {
                        message: format!(
                            "rectangle width and height must be positive, got {}x{}",
                            width, height
                        ),
                        location,
                    });
                }
                if color != ColorName::Transparent {
                    self.canvas.draw_rectangle(
                        to,
                        i64::from(width),
                        i64::from(height),
                        color,
                        size,
                    );
                }
            }
        }

        self.brush.move_to(target.0, target.1);
        Ok(())
    }

    /// Brush position moved `distance` steps along `(dir_x, dir_y)`
    fn offset_brush(
        &self,
        dir_x: i32,
        dir_y: i32,
        distance: i32,
        location: SourceLocation,
    ) -> Result<(i32, i32), RuntimeError> {
        let overflow = || RuntimeError::IntegerOverflow {
            operation: format!(
                "brush ({}, {}) + {} * ({}, {})",
                self.brush.x, self.brush.y, distance, dir_x, dir_y
            ),
            location,
        };

        let x = dir_x
            .checked_mul(distance)
            .and_then(|dx| self.brush.x.checked_add(dx))
            .ok_or_else(overflow)?;
        let y = dir_y
            .checked_mul(distance)
            .and_then(|dy| self.brush.y.checked_add(dy))
            .ok_or_else(overflow)?;
        Ok((x, y))
    }

    pub(crate) fn execute_fill(&mut self, location: SourceLocation) -> Result<(), RuntimeError> {
        if self.brush.color == ColorName::Transparent {
            return Err(RuntimeError::FillTransparent { location });
        }
        let (x, y) = self.brush.position();
        if !self.canvas.in_bounds(x, y) {
            return Err(RuntimeError::OutOfBounds {
                x,
                y,
                size: self.canvas.size(),
                location,
            });
        }

        let painted = self.canvas.flood_fill(x, y, self.brush.color);
        debug!("fill at ({}, {}) painted {} cells", x, y, painted);
        Ok(())
    }

    pub(crate) fn execute_goto(
        &mut self,
        label: &str,
        condition: &AstNode,
        location: SourceLocation,
    ) -> Result<Flow, RuntimeError> {
        if !self.evaluate_expr(condition)?.is_truthy() {
            return Ok(Flow::Next);
        }

        let target = *self
            .labels
            .get(label)
            .ok_or_else(|| RuntimeError::UnknownLabel {
                name: label.to_string(),
                location,
            })?;
        debug!("line {}: jump to '{}'", location.line, label);
        Ok(Flow::JumpTo(target))
    }
}
