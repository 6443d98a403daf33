// pixwall: pixel-drawing language interpreter with a terminal canvas viewer

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use pixwall::config::Config;
use pixwall::interpreter::constants::{DEFAULT_CANVAS_SIZE, DEFAULT_MAX_STEPS};
use pixwall::interpreter::Interpreter;
use pixwall::session::{Outcome, Session};
use pixwall::ui::App;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Program source file
    file: PathBuf,

    /// Canvas side length, clamped to 1..=512
    #[arg(long, default_value_t = DEFAULT_CANVAS_SIZE)]
    size: usize,

    /// Abort after this many executed instructions
    #[arg(long, default_value_t = DEFAULT_MAX_STEPS)]
    max_steps: usize,

    /// Open the terminal viewer instead of printing the canvas
    #[arg(long)]
    view: bool,

    /// Snapshot history budget in MiB for the viewer
    #[arg(long, default_value_t = 256)]
    history_mb: usize,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    if !cli.file.exists() {
        eprintln!("Error: File '{}' not found", cli.file.display());
        return Ok(ExitCode::FAILURE);
    }
    let source = fs::read_to_string(&cli.file)?;

    let mut config = Config::new()
        .with_canvas_size(cli.size)
        .with_max_steps(cli.max_steps);
    if cli.view {
        config = config.with_history(cli.history_mb.saturating_mul(1024 * 1024));
    }
    let mut session = Session::new(config);

    eprintln!("Running {}...", cli.file.display());
    let report = session.run(&source);
    for line in &report.diagnostics {
        eprintln!("{}", line);
    }

    match report.outcome {
        Outcome::Success => eprintln!("Compiled and ran successfully."),
        Outcome::SuccessWithWarnings => eprintln!("Compiled with warnings and ran successfully."),
        Outcome::Failed => eprintln!("Failed."),
    }
    let exit = if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    };

    match report.interpreter {
        Some(interpreter) if cli.view => {
            eprintln!("Total snapshots: {}", interpreter.total_snapshots());
            run_viewer(interpreter, source, report.diagnostics)?;
        }
        _ => print!("{}", session.canvas().to_text()),
    }

    Ok(exit)
}

fn run_viewer(
    mut interpreter: Interpreter,
    source: String,
    diagnostics: Vec<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = interpreter.rewind_to_start() {
        eprintln!("Warning: Failed to rewind to start: {}", e);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(interpreter, source, diagnostics);
    let res = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {}", err);
    }
    Ok(())
}
