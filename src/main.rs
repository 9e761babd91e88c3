#[macro_use]
mod errors;
mod eval;
mod exec;
mod state;

use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::RwLock;

use clap::{Parser, ValueEnum};
use crossterm::style::Stylize;
use crossterm::tty::IsTty;
use log::LevelFilter;
use simplelog::{ColorChoice, Config as LogConfig, TermLogger, TerminalMode, WriteLogger};

use errors::{Result, ShellError};
use eval::{build_command_trie, Dispatcher, Input, LineEditor};
use state::{read_state, write_state, Configuration, ShellState};

#[derive(Parser, Debug)]
#[command(name = "crabsh", version, about = "A small interactive shell")]
struct Cli {
    #[arg(long, value_name = "FILE", help = "Read settings from a configuration file")]
    config: Option<PathBuf>,
    #[arg(long, value_enum, help = "Override the log level from the configuration file")]
    log_level: Option<LogLevel>,
    #[arg(long, value_name = "FILE", help = "Write logs to a file instead of stderr")]
    log_file: Option<PathBuf>,
    #[arg(short = 'c', value_name = "COMMAND", help = "Run one command line and exit")]
    command: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // A broken configuration file is reported once logging is up, and the defaults are used instead
    let (config, config_error) = match &cli.config {
        Some(path) => match Configuration::from_file(path) {
            Ok(config) => (config, None),
            Err(error) => (Configuration::default(), Some(error)),
        },
        None => (Configuration::default(), None),
    };

    let level = cli.log_level.map(LevelFilter::from).unwrap_or(config.log_level);
    init_logging(level, cli.log_file.as_deref());
    if let Some(error) = config_error {
        print_error(&error);
    }

    let history_file = env::var_os("HISTFILE")
        .map(PathBuf::from)
        .or_else(|| config.history_file.clone());

    // The ShellState type stores all of the state for the shell, including its configuration,
    // its environment, and the command history
    let shell = match ShellState::new(config) {
        Ok(shell) => shell,
        Err(error) => {
            print_error(&error);
            return ExitCode::FAILURE;
        }
    };
    // The Dispatcher type is responsible for resolving command names to builtins or executables,
    // and for running whole lines, pipelines included
    let dispatcher = Dispatcher::default();

    let code = match cli.command {
        Some(line) => run_command(&shell, &dispatcher, &line),
        None => {
            if let Some(path) = &history_file {
                load_history(&shell, path);
            }
            let code = run_interactive(&shell, &dispatcher);
            if let Some(path) = &history_file {
                save_history(&shell, path);
            }
            code
        }
    };

    // Exit statuses are truncated to a byte, as with any other process
    ExitCode::from((code & 0xff) as u8)
}

fn init_logging(level: LevelFilter, log_file: Option<&Path>) {
    let config = LogConfig::default();
    let result = match log_file.map(fs_err::File::create) {
        Some(Ok(file)) => WriteLogger::init(level, config, file),
        Some(Err(error)) => {
            eprintln!("crabsh: {}", error);
            TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto)
        }
        None => TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto),
    };

    if let Err(error) = result {
        eprintln!("crabsh: failed to initialize logging: {}", error);
    }
}

// Runs a single line given with `-c`, exiting with its status
fn run_command(shell: &RwLock<ShellState>, dispatcher: &Dispatcher, line: &str) -> i32 {
    let status = dispatcher.eval(shell, line);
    handle_error(status, shell);
    exit_code(shell)
}

fn run_interactive(shell: &RwLock<ShellState>, dispatcher: &Dispatcher) -> i32 {
    let commands = build_command_trie(
        dispatcher.builtin_names(),
        &read_state(shell).environment.PATH,
    );
    // The LineEditor type is responsible for reading lines of input from the user,
    // providing tab completion and arrow-key history
    let mut line_editor = match LineEditor::new(commands) {
        Ok(line_editor) => line_editor,
        Err(error) => {
            eprintln!("crabsh: could not start line editor: {}", error);
            return 1;
        }
    };

    line_editor.seed_history(read_state(shell).history.entries());

    loop {
        let prompt = read_state(shell).prompt();
        match line_editor.prompt_and_read_line(&prompt) {
            Input::Line(line) => {
                let status = dispatcher.eval(shell, &line);
                handle_error(status, shell);
                if let Some(code) = read_state(shell).should_exit {
                    return code;
                }
            }
            Input::Interrupted => continue,
            Input::EndOfInput => return exit_code(shell),
        }
    }
}

fn exit_code(shell: &RwLock<ShellState>) -> i32 {
    let state = read_state(shell);
    match (state.should_exit, state.last_command_succeeded) {
        (Some(code), _) => code,
        (None, true) => 0,
        (None, false) => 1,
    }
}

// Loads the history file, if there is one yet, so only new entries are appended on exit
fn load_history(shell: &RwLock<ShellState>, path: &Path) {
    if !path.exists() {
        return;
    }

    let mut state = write_state(shell);
    match state.history.read_file(path) {
        Ok(()) => {
            state.history.mark_flushed();
            log::debug!("loaded {} history entries", state.history.entries().len());
        }
        Err(error) => {
            let failure = state_err!(FailedToLoadHistory(path.to_path_buf()));
            log::warn!("{}: {}", failure, error);
        }
    }
}

fn save_history(shell: &RwLock<ShellState>, path: &Path) {
    if let Err(error) = write_state(shell).history.append_file(path) {
        log::warn!("failed to save history: {}", error);
    }
}

// Records the outcome of a line and prints an appropriate error message, if applicable
fn handle_error(status: Result<bool>, shell: &RwLock<ShellState>) {
    let mut state = write_state(shell);
    match status {
        Ok(succeeded) => state.last_command_succeeded = succeeded,
        Err(error) => {
            if state.config.show_errors || error.always_reported() {
                print_error(&error);
            }

            state.last_command_succeeded = false;
        }
    }
}

fn print_error(error: &ShellError) {
    let mut stderr = io::stderr();
    let message = error.to_string();
    let _ = match stderr.is_tty() {
        true => writeln!(stderr, "{}", message.red()),
        false => writeln!(stderr, "{}", message),
    };
}
