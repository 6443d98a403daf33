//! Compile-and-run entry point
//!
//! A [`Session`] owns the [`Config`] and the canvas left by the last run. Every
//! run starts from a fresh canvas; the session keeps the old one whenever a
//! program fails to compile.

use crate::canvas::Canvas;
use crate::config::Config;
use crate::interpreter::Interpreter;
use crate::parser::ast::Program;
use crate::parser::lexer::{tokenize, LexError};
use crate::parser::parse::{parse, ParseError};
use crate::semantic::{validate, Diagnostic, SemanticContext};
use log::trace;
use std::fmt;

/// Why a program could not be compiled
#[derive(Debug, Clone, PartialEq)]
pub enum CompileError {
    Lex(LexError),
    Parse(ParseError),
    /// All diagnostics of the validation pass, errors and warnings, in source order
    Validation(Vec<Diagnostic>),
}

impl CompileError {
    /// One `[Error]`/`[Warning]` line per finding
    pub fn diagnostics(&self) -> Vec<String> {
        match self {
            CompileError::Lex(err) => vec![format!(
                "[Error] line {}: {}",
                err.location.line, err.message
            )],
            CompileError::Parse(err) => vec![format!(
                "[Error] line {}: {}",
                err.location.line, err.message
            )],
            CompileError::Validation(diagnostics) => {
                diagnostics.iter().map(ToString::to_string).collect()
            }
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::Lex(err) => write!(f, "{}", err),
            CompileError::Parse(err) => write!(f, "{}", err),
            CompileError::Validation(diagnostics) => {
                let errors = diagnostics.iter().filter(|d| d.is_error()).count();
                write!(f, "Validation failed with {} error(s)", errors)
            }
        }
    }
}

impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CompileError::Lex(err) => Some(err),
            CompileError::Parse(err) => Some(err),
            CompileError::Validation(_) => None,
        }
    }
}

impl From<LexError> for CompileError {
    fn from(err: LexError) -> Self {
        CompileError::Lex(err)
    }
}

impl From<ParseError> for CompileError {
    fn from(err: ParseError) -> Self {
        CompileError::Parse(err)
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    SuccessWithWarnings,
    Failed,
}

/// Result of [`Session::run`]
pub struct RunReport {
    pub outcome: Outcome,
    /// Diagnostic lines in the order they were produced
    pub diagnostics: Vec<String>,
    /// The interpreter after the run; `None` when compilation failed
    pub interpreter: Option<Interpreter>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.outcome != Outcome::Failed
    }
}

pub struct Session {
    config: Config,
    canvas: Canvas,
}

impl Default for Session {
    fn default() -> Self {
        Session::new(Config::default())
    }
}

impl Session {
    pub fn new(config: Config) -> Self {
        let canvas = Canvas::new(config.canvas_size());
        Session { config, canvas }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Change the canvas size for the next run; out-of-range sizes are clamped
    pub fn set_canvas_size(&mut self, size: usize) {
        self.config.set_canvas_size(size);
    }

    /// Canvas produced by the last run that got past compilation
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Lex, parse and validate. On success returns the program with its warnings.
    pub fn compile(&self, source: &str) -> Result<(Program, Vec<Diagnostic>), CompileError> {
        let tokens = tokenize(source)?;
        trace!("lexed {} tokens", tokens.len());

        let program = parse(tokens)?;
        trace!("parsed {} instructions", program.len());

        let mut ctx = SemanticContext::new(self.config.canvas_size());
        validate(&program, &mut ctx);
        if ctx.has_errors() {
            return Err(CompileError::Validation(ctx.diagnostics()));
        }

        Ok((program, ctx.warnings().to_vec()))
    }

    /// Interpreter for a compiled program, configured from this session
    pub fn interpreter(&self, program: Program) -> Interpreter {
        let interpreter = Interpreter::new(program, self.config.canvas_size())
            .with_max_steps(self.config.max_steps());
        match self.config.history_limit() {
            Some(limit) => interpreter.with_history(limit),
            None => interpreter,
        }
    }

    /// Compile and run `source`
    pub fn run(&mut self, source: &str) -> RunReport {
        let (program, warnings) = match self.compile(source) {
            Ok(compiled) => compiled,
            Err(err) => {
                trace!("compilation failed: {}", err);
                return RunReport {
                    outcome: Outcome::Failed,
                    diagnostics: err.diagnostics(),
                    interpreter: None,
                };
            }
        };

        let mut diagnostics: Vec<String> = warnings.iter().map(ToString::to_string).collect();
        let mut interpreter = self.interpreter(program);
        let result = interpreter.run();
        trace!("executed {} steps", interpreter.steps());

        // A failed instruction has already been rolled back
        self.canvas = interpreter.canvas().clone();

        let outcome = match result {
            Err(err) => {
                diagnostics.push(format!("[Error] line {}: {}", err.location().line, err));
                Outcome::Failed
            }
            Ok(()) if warnings.is_empty() => Outcome::Success,
            Ok(()) => Outcome::SuccessWithWarnings,
        };

        RunReport {
            outcome,
            diagnostics,
            interpreter: Some(interpreter),
        }
    }
}
