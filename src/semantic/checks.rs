// Per-instruction validation rules

use super::types::{infer_type, is_boolean_condition, is_dynamic};
use super::SemanticContext;
use crate::canvas::brush::Brush;
use crate::canvas::ColorName;
use crate::interpreter::constants::GOTO_WARNING_THRESHOLD;
use crate::parser::ast::{AstNode, BoolOp, Builtin, DrawCommand, SourceLocation, ValueType};

pub(super) fn check_instruction(instruction: &AstNode, ctx: &mut SemanticContext) {
    match instruction {
        AstNode::Spawn { x, y, location } => check_spawn(*x, *y, *location, ctx),
        AstNode::SetColor { name, location } => check_color(name, *location, ctx),
        AstNode::SetSize { size, location } => check_size(*size, *location, ctx),
        AstNode::DrawCommand {
            command,
            args,
            location,
        } => check_draw(*command, args, *location, ctx),
        AstNode::Fill { location } => {
            if ctx.brush.color == Some(ColorName::Transparent) {
                ctx.error("Cannot use Fill with a Transparent brush", *location);
            }
        }
        AstNode::Assign { name, expr, .. } => {
            check_expr(expr, ctx);
            ctx.declared.insert(name.clone());
            match infer_type(expr, ctx) {
                Some(t) => ctx.types.insert(name.clone(), t),
                None => ctx.types.remove(name),
            };
        }
        AstNode::Label { .. } => ctx.brush.forget(),
        AstNode::GoTo {
            label,
            condition,
            location,
        } => check_goto(label, condition, *location, ctx),
        expr => check_expr(expr, ctx),
    }
}

fn check_spawn(x: i32, y: i32, location: SourceLocation, ctx: &mut SemanticContext) {
    let size = ctx.canvas_size;
    if in_canvas(x, y, size) {
        ctx.brush.position = Some((x, y));
    } else {
        ctx.error(
            format!("Spawn position ({}, {}) is outside the {}x{} canvas", x, y, size, size),
            location,
        );
        ctx.brush.position = None;
    }
}

fn check_color(name: &str, location: SourceLocation, ctx: &mut SemanticContext) {
    match name.parse::<ColorName>() {
        Ok(color) => ctx.brush.color = Some(color),
        Err(err) => {
            ctx.error(err.to_string(), location);
            ctx.brush.color = None;
        }
    }
}

fn check_size(size: i32, location: SourceLocation, ctx: &mut SemanticContext) {
    match Brush::adjusted_size(size) {
        None => ctx.error(
            format!("Brush size must be a positive integer, got {}", size),
            location,
        ),
        Some(adjusted) if adjusted != size => ctx.warning(
            format!("Size adjusted to {}; use odd numbers", adjusted),
            location,
        ),
        Some(_) => {}
    }
}

fn check_draw(
    command: DrawCommand,
    args: &[AstNode],
    location: SourceLocation,
    ctx: &mut SemanticContext,
) {
    let name = command.name();
    if args.len() != command.arity() {
        ctx.error(
            format!(
                "{} expects {} arguments, got {}",
                name,
                command.arity(),
                args.len()
            ),
            location,
        );
        ctx.brush.position = None;
        return;
    }

    for (i, arg) in args.iter().enumerate() {
        check_expr(arg, ctx);
        if let Some(t) = infer_type(arg, ctx) {
            if t != ValueType::Int {
                ctx.error(
                    format!("Argument {} of {} must be int, got {}", i + 1, name, t),
                    arg.location(),
                );
            }
        }
    }

    let dir_y = args[0].as_constant();
    let dir_x = args[1].as_constant();
    for dir in [dir_y, dir_x].into_iter().flatten() {
        if !(-1..=1).contains(&dir) {
            ctx.error(
                format!("Invalid direction {} in {}: must be -1, 0 or 1", dir, name),
                location,
            );
        }
    }

    let distance = args[2].as_constant();
    match (command, distance) {
        (DrawCommand::Circle, Some(r)) if r <= 0 => {
            ctx.error(format!("Radius must be positive, got {}", r), args[2].location());
        }
        (DrawCommand::Line | DrawCommand::Rectangle, Some(d)) if d < 0 => {
            ctx.error(format!("Distance cannot be negative, got {}", d), args[2].location());
        }
        _ => {}
    }

    if command == DrawCommand::Rectangle {
        for arg in &args[3..] {
            if let Some(n) = arg.as_constant() {
                if n <= 0 {
                    ctx.error(
                        format!("Rectangle width and height must be positive, got {}", n),
                        arg.location(),
                    );
                }
            }
        }
    }

    // Advance the simulated brush when the whole move is known
    let next = match (ctx.brush.position, dir_y, dir_x, distance) {
        (Some((x, y)), Some(dy), Some(dx), Some(d))
            if (-1..=1).contains(&dy) && (-1..=1).contains(&dx) =>
        {
            let dest_x = i64::from(x) + i64::from(dx) * i64::from(d);
            let dest_y = i64::from(y) + i64::from(dy) * i64::from(d);
            let size = ctx.canvas_size as i64;
            if (0..size).contains(&dest_x) && (0..size).contains(&dest_y) {
                // Both fit in i32 since they are inside the canvas
                Some((dest_x as i32, dest_y as i32))
            } else {
                ctx.error(
                    format!(
                        "{} moves the brush to ({}, {}), outside the {}x{} canvas",
                        name, dest_x, dest_y, size, size
                    ),
                    location,
                );
                None
            }
        }
        _ => None,
    };
    ctx.brush.position = next;
}

fn check_goto(label: &str, condition: &AstNode, location: SourceLocation, ctx: &mut SemanticContext) {
    let target = ctx.labels.get(label).copied();
    if target.is_none() {
        ctx.error(format!("Undefined label '{}'", label), location);
    }

    check_expr(condition, ctx);
    if !is_boolean_condition(condition, ctx) {
        ctx.error("GoTo condition must be a boolean expression", condition.location());
    }

    ctx.goto_count += 1;
    if ctx.goto_count == GOTO_WARNING_THRESHOLD + 1 {
        ctx.warning(
            format!(
                "More than {} GoTo instructions; watch for infinite loops",
                GOTO_WARNING_THRESHOLD
            ),
            location,
        );
    }

    if let Some(target) = target {
        if target < ctx.current_index && !is_dynamic(condition) {
            ctx.warning(
                format!(
                    "Backward jump to '{}' has a condition that never changes; possible infinite loop",
                    label
                ),
                location,
            );
        }
    }
}

/// Checks shared by every expression position
fn check_expr(expr: &AstNode, ctx: &mut SemanticContext) {
    match expr {
        AstNode::StringLit(s, location) => {
            if let Err(err) = s.parse::<ColorName>() {
                ctx.error(err.to_string(), *location);
            }
        }
        AstNode::Variable(name, location) => {
            if !ctx.declared.contains(name) {
                ctx.warning(
                    format!("Variable '{}' is read before it is assigned", name),
                    *location,
                );
            }
        }
        AstNode::Label { name, location } => {
            ctx.error(format!("Undefined variable '{}'", name), *location);
        }
        AstNode::Call {
            builtin,
            args,
            location,
        } => check_call(*builtin, args, *location, ctx),
        AstNode::BinaryOp {
            op,
            left,
            right,
            location,
        } => {
            check_expr(left, ctx);
            check_expr(right, ctx);
            for operand in [left, right] {
                if let Some(t @ (ValueType::Str | ValueType::Bool)) = infer_type(operand, ctx) {
                    ctx.error(
                        format!("Operand of '{}' must be int, got {}", op, t),
                        *location,
                    );
                }
            }
        }
        AstNode::BooleanOp {
            op,
            left,
            right,
            location,
        } => {
            check_expr(left, ctx);
            check_expr(right, ctx);
            if op.is_logical() {
                return;
            }
            match (infer_type(left, ctx), infer_type(right, ctx)) {
                (Some(ValueType::Str), Some(ValueType::Str)) => {
                    if !matches!(op, BoolOp::Eq | BoolOp::Ne) {
                        ctx.error(
                            format!("Strings can only be compared with '==' or '!=', not '{}'", op),
                            *location,
                        );
                    }
                }
                (Some(a), Some(b)) if (a == ValueType::Str) != (b == ValueType::Str) => {
                    ctx.error(format!("Cannot compare {} with {}", a, b), *location);
                }
                _ => {}
            }
        }
        _ => {}
    }
}

fn check_call(builtin: Builtin, args: &[AstNode], location: SourceLocation, ctx: &mut SemanticContext) {
    let params = builtin.params();
    if args.len() != params.len() {
        ctx.error(
            format!(
                "{} expects {} argument{}, got {}",
                builtin.name(),
                params.len(),
                if params.len() == 1 { "" } else { "s" },
                args.len()
            ),
            location,
        );
        return;
    }

    for (i, (arg, expected)) in args.iter().zip(params).enumerate() {
        check_expr(arg, ctx);
        if let Some(actual) = infer_type(arg, ctx) {
            if actual != *expected {
                ctx.error(
                    format!(
                        "Argument {} of {} must be {}, got {}",
                        i + 1,
                        builtin.name(),
                        expected,
                        actual
                    ),
                    arg.location(),
                );
            }
        }
    }
}

fn in_canvas(x: i32, y: i32, size: usize) -> bool {
    let size = i64::try_from(size).unwrap_or(i64::MAX);
    (0..size).contains(&i64::from(x)) && (0..size).contains(&i64::from(y))
}

#[cfg(test)]
mod tests {
    use crate::parser::parse::Parser;
    use crate::semantic::{validate, SemanticContext};

    fn check(source: &str) -> SemanticContext {
        let program = Parser::new(source).unwrap().parse_program().unwrap();
        let mut ctx = SemanticContext::new(10);
        validate(&program, &mut ctx);
        ctx
    }

    fn errors(ctx: &SemanticContext) -> Vec<String> {
        ctx.errors().iter().map(|d| d.message.clone()).collect()
    }

    #[test]
    fn test_spawn_bounds() {
        let ctx = check("Spawn(10, 0)");
        assert!(errors(&ctx)[0].contains("outside the 10x10 canvas"));

        let ctx = check("Spawn(-1, 3)");
        assert!(ctx.has_errors());
    }

    #[test]
    fn test_color_palette() {
        let ctx = check("Spawn(0, 0)\nColor(\"Pink\")");
        assert_eq!(errors(&ctx), vec!["Unknown color 'Pink'"]);

        // Case-sensitive in source
        assert!(check("Spawn(0, 0)\nColor(\"red\")").has_errors());
    }

    #[test]
    fn test_size_warnings() {
        let ctx = check("Spawn(0, 0)\nSize(4)\nSize(2)\nSize(5)");
        assert!(!ctx.has_errors());
        assert_eq!(ctx.warnings().len(), 2);
        assert!(ctx.warnings()[0].message.contains("adjusted to 3"));
        assert!(ctx.warnings()[1].message.contains("adjusted to 1"));

        assert!(check("Spawn(0, 0)\nSize(0)").has_errors());
    }

    #[test]
    fn test_draw_arity_and_direction() {
        let ctx = check("Spawn(5, 5)\nDrawLine(1, 0)");
        assert!(errors(&ctx)[0].contains("expects 3 arguments"));

        let ctx = check("Spawn(5, 5)\nDrawRectangle(2, 0, 1, 2, 2)");
        assert!(errors(&ctx)[0].contains("Invalid direction 2"));
    }

    #[test]
    fn test_draw_destination_bounds() {
        let ctx = check("Spawn(5, 5)\nDrawLine(0, 1, 5)");
        assert!(errors(&ctx)[0].contains("outside the 10x10 canvas"));

        let ctx = check("Spawn(5, 5)\nDrawLine(0, 1, 4)\nDrawLine(1, 0, 4)");
        assert!(!ctx.has_errors());
        assert_eq!(ctx.brush().position, Some((9, 9)));
    }

    #[test]
    fn test_variable_distance_makes_position_unknown() {
        let ctx = check("Spawn(5, 5)\nd <- 3\nDrawLine(0, 1, d)\nDrawLine(0, 1, 100)");
        assert!(!ctx.has_errors(), "{:?}", errors(&ctx));
        assert_eq!(ctx.brush().position, None);
    }

    #[test]
    fn test_literal_extents() {
        assert!(check("Spawn(5, 5)\nDrawCircle(0, 1, 0)").has_errors());
        assert!(check("Spawn(5, 5)\nDrawLine(0, 1, -2)").has_errors());
        assert!(check("Spawn(5, 5)\nDrawRectangle(0, 0, 0, 0, 3)").has_errors());
    }

    #[test]
    fn test_fill_transparent() {
        let ctx = check("Spawn(0, 0)\nFill()");
        assert!(errors(&ctx)[0].contains("Transparent"));

        // Unknown after a label
        let ctx = check("Spawn(0, 0)\nL\nFill()");
        assert!(!ctx.has_errors());
    }

    #[test]
    fn test_call_arguments() {
        let ctx = check("Spawn(0, 0)\nn <- GetColorCount(\"Red\", 0, 0)");
        assert!(errors(&ctx)[0].contains("expects 5 arguments"));

        let ctx = check("Spawn(0, 0)\nb <- IsBrushColor(3)");
        assert!(errors(&ctx)[0].contains("must be string"));

        let ctx = check("Spawn(0, 0)\nb <- IsCanvasColor(\"Mauve\", 0, 0)");
        assert!(errors(&ctx)[0].contains("Unknown color 'Mauve'"));
    }

    #[test]
    fn test_goto_rules() {
        let ctx = check("Spawn(0, 0)\nn <- 1\nGoTo[end](n + 1)\nend");
        assert!(errors(&ctx)[0].contains("must be a boolean"));

        let ctx = check("Spawn(0, 0)\nk <- 0\nL\nk <- k + 1\nGoTo[L](k < 5)");
        assert!(!ctx.has_errors());
        assert!(ctx.warnings().is_empty());
    }

    #[test]
    fn test_backward_constant_goto_warns() {
        let ctx = check("Spawn(0, 0)\nL\nGoTo[L](1 == 1)");
        assert!(!ctx.has_errors());
        assert!(ctx.warnings()[0].message.contains("never changes"));
    }

    #[test]
    fn test_goto_threshold_warns_once() {
        let mut source = String::from("Spawn(0, 0)\nk <- 0\n");
        for _ in 0..60 {
            source.push_str("GoTo[end](k == 1)\n");
        }
        source.push_str("end");
        let ctx = check(&source);

        let threshold_warnings = ctx
            .warnings()
            .iter()
            .filter(|d| d.message.contains("GoTo instructions"))
            .count();
        assert_eq!(threshold_warnings, 1);
        assert_eq!(ctx.goto_count(), 60);
    }

    #[test]
    fn test_expression_rules() {
        let ctx = check("Spawn(0, 0)\nv <- \"Red\" + 1");
        assert!(errors(&ctx)[0].contains("must be int"));

        let ctx = check("Spawn(0, 0)\nv <- \"Red\" < \"Blue\"");
        assert!(errors(&ctx)[0].contains("'==' or '!='"));

        let ctx = check("Spawn(0, 0)\nv <- \"Red\" == 1");
        assert!(errors(&ctx)[0].contains("Cannot compare"));
    }

    #[test]
    fn test_label_in_value_position() {
        let ctx = check("Spawn(0, 0)\nv <- nowhere + 1");
        assert!(errors(&ctx)[0].contains("Undefined variable 'nowhere'"));
    }

    #[test]
    fn test_read_before_assignment_warns() {
        let ctx = check("Spawn(0, 0)\nGoTo[skip](k == 0)\nk <- 1\nskip");
        assert!(!ctx.has_errors());
        assert!(ctx.warnings()[0].message.contains("read before it is assigned"));
    }
}
