// End-to-end drawing scenarios

use pixwall::canvas::ColorName;
use pixwall::config::Config;
use pixwall::interpreter::{Interpreter, RuntimeError, Value};
use pixwall::parser::Parser;
use pixwall::session::{Outcome, Session};

fn session(size: usize) -> Session {
    Session::new(Config::new().with_canvas_size(size))
}

fn count(session: &Session, color: ColorName) -> usize {
    let last = session.canvas().size() as i32 - 1;
    session.canvas().count_color(color, 0, 0, last, last)
}

#[test]
fn test_thick_red_line() {
    let mut session = session(10);
    let report = session.run("Spawn(0, 0)\nColor(\"Red\")\nSize(3)\nDrawLine(0, 1, 5)");
    assert_eq!(report.outcome, Outcome::Success);

    let interpreter = report.interpreter.expect("run should start");
    assert_eq!(interpreter.brush().position(), (5, 0));

    // A 3-wide footprint around row 0, clipped at the top edge
    let canvas = session.canvas();
    for x in 0..=6 {
        assert_eq!(canvas.get(x, 0), Some(ColorName::Red), "({}, 0)", x);
        assert_eq!(canvas.get(x, 1), Some(ColorName::Red), "({}, 1)", x);
        assert_eq!(canvas.get(x, 2), Some(ColorName::White), "({}, 2)", x);
    }
    assert_eq!(count(&session, ColorName::Red), 14);
}

#[test]
fn test_invalid_color_never_touches_canvas() {
    for source in [
        "Spawn(0, 0)\nColor(\"Pink\")\nFill()",
        "Spawn(0, 0)\nColor(\"Red\")\nFill()\nColor(\"Pink\")",
        "Spawn(0, 0)\nColor(\"Black\")\nDrawLine(1, 0, 3)\nb <- IsBrushColor(\"Pink\")",
    ] {
        let mut session = session(6);
        let report = session.run(source);
        assert_eq!(report.outcome, Outcome::Failed, "{}", source);
        assert!(report.interpreter.is_none());
        assert_eq!(
            report
                .diagnostics
                .iter()
                .filter(|line| line.contains("Unknown color 'Pink'"))
                .count(),
            1
        );
        assert_eq!(count(&session, ColorName::White), 36);
    }
}

#[test]
fn test_even_size_warns_and_completes() {
    let mut session = session(8);
    let report = session.run("Spawn(4, 4)\nColor(\"Blue\")\nSize(4)\nDrawLine(0, 1, 0)");
    assert_eq!(report.outcome, Outcome::SuccessWithWarnings);
    assert_eq!(report.diagnostics.len(), 1);
    assert!(report.diagnostics[0].starts_with("[Warning] line 3:"));

    let interpreter = report.interpreter.expect("run should start");
    assert_eq!(interpreter.brush().size, 3);
    // A single 3x3 stamp
    assert_eq!(count(&session, ColorName::Blue), 9);
}

#[test]
fn test_goto_lands_after_label() {
    let source = "Spawn(0, 0)\n\
                  Color(\"Green\")\n\
                  k <- 0\n\
                  L\n\
                  DrawLine(0, 1, 1)\n\
                  k <- k + 1\n\
                  GoTo[L](k < 5)\n\
                  done <- 1";
    let mut session = session(8);
    let report = session.run(source);
    assert_eq!(report.outcome, Outcome::Success, "{:?}", report.diagnostics);

    let interpreter = report.interpreter.expect("run should start");
    assert_eq!(interpreter.variables().get("k"), Some(&Value::Int(5)));
    assert_eq!(interpreter.variables().get("done"), Some(&Value::Int(1)));
    assert_eq!(interpreter.brush().position(), (5, 0));
    assert_eq!(count(&session, ColorName::Green), 6);
}

#[test]
fn test_goto_false_condition_falls_through() {
    let source = "Spawn(0, 0)\n\
                  Color(\"Green\")\n\
                  k <- 7\n\
                  L\n\
                  DrawLine(0, 1, 1)\n\
                  k <- k + 1\n\
                  GoTo[L](k < 5)";
    let report = session(8).run(source);
    assert_eq!(report.outcome, Outcome::Success);

    let interpreter = report.interpreter.expect("run should start");
    assert_eq!(interpreter.variables().get("k"), Some(&Value::Int(8)));
    assert_eq!(interpreter.brush().position(), (1, 0));
}

#[test]
fn test_forward_goto_skips_instructions() {
    let source = "Spawn(1, 1)\n\
                  Color(\"Red\")\n\
                  GoTo[skip](GetActualX() == 1)\n\
                  Color(\"Blue\")\n\
                  skip\n\
                  Fill()";
    let mut session = session(3);
    let report = session.run(source);
    assert!(report.is_success());
    assert_eq!(count(&session, ColorName::Red), 9);
}

#[test]
fn test_fill_with_transparent_is_caught_before_running() {
    let mut session = session(5);
    let report = session.run("Spawn(2, 2)\nFill()");
    assert_eq!(report.outcome, Outcome::Failed);
    assert!(report.interpreter.is_none());
    assert_eq!(count(&session, ColorName::White), 25);
}

#[test]
fn test_fill_with_transparent_fails_at_runtime() {
    // After a label the brush color cannot be known statically
    let source = "Spawn(0, 0)\n\
                  Color(\"Red\")\n\
                  DrawLine(1, 0, 4)\n\
                  Color(\"Transparent\")\n\
                  L\n\
                  Fill()";
    let mut session = session(5);
    let report = session.run(source);
    assert_eq!(report.outcome, Outcome::Failed);
    assert!(report
        .diagnostics
        .last()
        .is_some_and(|line| line.starts_with("[Error] line 6:")));

    // Everything before the failing Fill stays
    assert_eq!(count(&session, ColorName::Red), 5);
    assert_eq!(count(&session, ColorName::White), 20);
}

#[test]
fn test_overflowing_move_leaves_state_unchanged() {
    let source = "Spawn(2, 2)\n\
                  Color(\"Yellow\")\n\
                  Fill()\n\
                  Color(\"Black\")\n\
                  DrawRectangle(1, 1, 2147483647, 2, 2)";
    let program = Parser::new(source)
        .and_then(|mut parser| parser.parse_program())
        .expect("Parsing failed");
    let mut interpreter = Interpreter::new(program, 6);
    let result = interpreter.run();

    assert!(matches!(result, Err(RuntimeError::IntegerOverflow { .. })));
    assert_eq!(interpreter.failed_instruction(), Some(4));
    assert_eq!(interpreter.canvas().count_color(ColorName::Yellow, 0, 0, 5, 5), 36);
    assert_eq!(interpreter.brush().position(), (2, 2));
}
