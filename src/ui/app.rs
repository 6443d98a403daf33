//! Main TUI application state and logic

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::ui::panes::{self, SourceScrollState, StatusRenderData};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

const PLAY_INTERVAL: Duration = Duration::from_millis(400);

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Variables,
    Diagnostics,
}

impl FocusedPane {
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Variables,
            FocusedPane::Variables => FocusedPane::Diagnostics,
            FocusedPane::Diagnostics => FocusedPane::Source,
        }
    }
}

/// The main application state
pub struct App {
    /// Interpreter that already ran, holding the recorded history
    pub interpreter: Interpreter,

    pub source_code: String,

    /// Diagnostic lines produced by the run
    pub diagnostics: Vec<String>,

    pub focused_pane: FocusedPane,

    pub source_scroll: SourceScrollState,
    pub variables_scroll: usize,
    pub diagnostics_scroll: usize,

    pub should_quit: bool,

    pub status_message: String,

    /// Whether auto-play mode is active
    pub is_playing: bool,
    pub last_play_time: Instant,
}

impl App {
    pub fn new(interpreter: Interpreter, source_code: String, diagnostics: Vec<String>) -> Self {
        App {
            interpreter,
            source_code,
            diagnostics,
            focused_pane: FocusedPane::Source,
            source_scroll: SourceScrollState::default(),
            variables_scroll: 0,
            diagnostics_scroll: 0,
            should_quit: false,
            status_message: String::from("Ready!"),
            is_playing: false,
            last_play_time: Instant::now(),
        }
    }

    /// Run the TUI event loop until the user quits
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.is_playing && self.last_play_time.elapsed() >= PLAY_INTERVAL {
                if self.interpreter.step_forward().is_ok() {
                    self.status_message = "Playing...".to_string();
                } else {
                    self.is_playing = false;
                    self.status_message = "Playback complete".to_string();
                }
                self.last_play_time = Instant::now();
            }

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());

        // Canvas on the left, source | variables | diagnostics on the right
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(main_chunks[0]);

        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(50),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
            ])
            .split(columns[1]);

        panes::render_canvas_pane(
            frame,
            columns[0],
            self.interpreter.canvas(),
            self.interpreter.brush(),
        );

        panes::render_source_pane(
            frame,
            right_rows[0],
            &self.source_code,
            self.interpreter.current_location().line,
            self.error_line(),
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        panes::render_variables_pane(
            frame,
            right_rows[1],
            self.interpreter.variables(),
            self.focused_pane == FocusedPane::Variables,
            &mut self.variables_scroll,
        );

        panes::render_diagnostics_pane(
            frame,
            right_rows[2],
            &self.diagnostics,
            self.focused_pane == FocusedPane::Diagnostics,
            &mut self.diagnostics_scroll,
        );

        panes::render_status_bar(
            frame,
            main_chunks[1],
            StatusRenderData {
                message: &self.status_message,
                current_step: self.interpreter.history_position(),
                total_steps: self.interpreter.total_snapshots(),
                failed: self.interpreter.failed_instruction().is_some(),
                is_playing: self.is_playing,
                truncated: self.interpreter.history_truncated(),
            },
        );
    }

    fn is_at_end(&self) -> bool {
        self.interpreter.history_position() + 1 >= self.interpreter.total_snapshots()
    }

    /// Source line of the failed instruction, shown only at the end of history
    pub fn error_line(&self) -> Option<usize> {
        if !self.is_at_end() {
            return None;
        }
        let index = self.interpreter.failed_instruction()?;
        self.interpreter
            .program()
            .instructions
            .get(index)
            .map(|instruction| instruction.location().line)
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            // Number keys step forward N times
            KeyCode::Char(c @ '1'..='9') => {
                self.is_playing = false;
                let n = c.to_digit(10).unwrap_or(1);
                let stepped = (0..n)
                    .take_while(|_| self.interpreter.step_forward().is_ok())
                    .count();
                self.status_message = format!("Stepped forward {} step(s)", stepped);
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Left => {
                self.is_playing = false;
                let result = self.interpreter.step_backward();
                self.report("Stepped backward", "Cannot step backward", result);
            }
            KeyCode::Right => {
                self.is_playing = false;
                let result = self.interpreter.step_forward();
                self.report("Stepped forward", "Cannot step forward", result);
            }
            KeyCode::Up => self.scroll(-1),
            KeyCode::Down => self.scroll(1),
            KeyCode::Char(' ') => {
                self.is_playing = !self.is_playing;
                if self.is_playing {
                    self.last_play_time = Instant::now()
                        .checked_sub(PLAY_INTERVAL)
                        .unwrap_or_else(Instant::now);
                    self.status_message = "Playing...".to_string();
                } else {
                    self.status_message = "Paused".to_string();
                }
            }
            KeyCode::Enter | KeyCode::End => {
                self.is_playing = false;
                let result = self.interpreter.jump_to_end();
                self.report("Jumped to end", "Cannot jump to end", result);
            }
            KeyCode::Backspace | KeyCode::Home => {
                self.is_playing = false;
                let result = self.interpreter.rewind_to_start();
                self.report("Jumped to start", "Cannot jump to start", result);
            }
            _ => {}
        }
    }

    fn report(&mut self, done: &str, failed: &str, result: Result<(), RuntimeError>) {
        self.status_message = match result {
            Ok(()) => done.to_string(),
            Err(RuntimeError::HistoryOperationFailed { message, .. }) => {
                format!("{}: {}", failed, message)
            }
            Err(err) => format!("Error: {}", err),
        };
    }

    fn scroll(&mut self, delta: isize) {
        match self.focused_pane {
            FocusedPane::Source => {
                // Scrolling down moves the current line up on screen
                if let Some(row) = self.source_scroll.target_line_row {
                    self.source_scroll.target_line_row = Some(row.saturating_add_signed(-delta));
                }
            }
            FocusedPane::Variables => {
                self.variables_scroll = self.variables_scroll.saturating_add_signed(delta);
            }
            FocusedPane::Diagnostics => {
                self.diagnostics_scroll = self.diagnostics_scroll.saturating_add_signed(delta);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse::Parser;
    use crossterm::event::KeyModifiers;

    fn app(source: &str) -> App {
        let program = Parser::new(source).unwrap().parse_program().unwrap();
        let mut interpreter = Interpreter::new(program, 5).with_history(1 << 20);
        let _ = interpreter.run();
        interpreter.rewind_to_start().unwrap();
        App::new(interpreter, source.to_string(), Vec::new())
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_stepping_through_history() {
        let mut app = app("Spawn(0, 0)\nColor(\"Red\")\nDrawLine(0, 1, 2)");
        assert_eq!(app.interpreter.total_snapshots(), 4);

        press(&mut app, KeyCode::Right);
        assert_eq!(app.interpreter.history_position(), 1);
        assert_eq!(app.status_message, "Stepped forward");

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.interpreter.history_position(), 3);

        press(&mut app, KeyCode::Right);
        assert!(app.status_message.starts_with("Cannot step forward"));

        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.interpreter.history_position(), 0);
        press(&mut app, KeyCode::Left);
        assert!(app.status_message.starts_with("Cannot step backward"));
    }

    #[test]
    fn test_number_keys_step_several() {
        let mut app = app("Spawn(0, 0)\nColor(\"Red\")\nSize(3)\nFill()");
        press(&mut app, KeyCode::Char('9'));
        assert_eq!(app.interpreter.history_position(), 4);
        assert_eq!(app.status_message, "Stepped forward 4 step(s)");
    }

    #[test]
    fn test_error_line_only_at_end() {
        let mut app = app("Spawn(0, 0)\nColor(\"Red\")\nv <- (1 / 0)");
        assert_eq!(app.error_line(), None);

        press(&mut app, KeyCode::End);
        assert_eq!(app.error_line(), Some(3));
    }

    #[test]
    fn test_focus_cycle_and_quit() {
        let mut app = app("Spawn(0, 0)");
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_pane, FocusedPane::Variables);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_pane, FocusedPane::Source);

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
