use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;

/// `Result` alias which automatically uses `ShellError` as the error type.
pub type Result<T> = std::result::Result<T, ShellError>;

pub trait Handle<T> {
    /// Replaces any error kind with a new one, without overriding the default error message.
    /// Useful in situations where additional context provides no additional clarity.
    fn replace_err(self, new_error: impl FnOnce() -> ShellError) -> Result<T>;
    /// Replaces any error kind with a new one, overriding the default error message with the
    /// provided one. Useful in situations where additional context can provide additional clarity.
    fn replace_err_with_msg(self, new_error: impl FnOnce() -> ShellError, context: &str)
        -> Result<T>;
}

impl<T, E> Handle<T> for std::result::Result<T, E> {
    fn replace_err(self, new_error: impl FnOnce() -> ShellError) -> Result<T> {
        self.map_err(|_| new_error())
    }

    fn replace_err_with_msg(
        self,
        new_error: impl FnOnce() -> ShellError,
        context: &str,
    ) -> Result<T> {
        self.map_err(|_| new_error().set_context(context))
    }
}

impl<T> Handle<T> for std::option::Option<T> {
    fn replace_err(self, new_error: impl FnOnce() -> ShellError) -> Result<T> {
        self.ok_or_else(new_error)
    }

    fn replace_err_with_msg(
        self,
        new_error: impl FnOnce() -> ShellError,
        context: &str,
    ) -> Result<T> {
        self.ok_or_else(|| new_error().set_context(context))
    }
}

/// Error type for the shell.
/// Contains an error kind and optionally a custom message,
/// which is used to override the default error message.
#[derive(Debug)]
pub struct ShellError {
    kind: ErrorKind,
    custom_message: Option<String>,
}

impl Display for ShellError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.custom_message {
            Some(message) => write!(f, "{}", message),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for ShellError {}

impl ShellError {
    /// Creates a `ShellError` with no custom message.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            custom_message: None,
        }
    }

    /// Takes a `ShellError` and gives it a custom message.
    pub fn set_context(mut self, context: &str) -> Self {
        self.custom_message = Some(context.to_owned());
        self
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Whether the read loop should print this error even when `show-errors` is disabled.
    /// These are the messages a user of any POSIX shell expects to see.
    pub fn always_reported(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Syntax(_) | ErrorKind::Spawn(SpawnError::CommandNotFound(_))
        )
    }
}

/// Enum representing every type of error which can occur in the shell.
/// Downstream error variants will typically include data providing basic information
/// about how the error occurred, such as the name of a command which was not found.
#[derive(Debug)]
pub enum ErrorKind {
    Syntax(SyntaxError),
    Spawn(SpawnError),
    Redirect(RedirectError),
    Pipe(PipeError),
    Builtin(BuiltinError),
    State(StateError),
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Syntax(error) => write!(f, "{}", error),
            ErrorKind::Spawn(error) => write!(f, "{}", error),
            ErrorKind::Redirect(error) => write!(f, "{}", error),
            ErrorKind::Pipe(error) => write!(f, "{}", error),
            ErrorKind::Builtin(error) => write!(f, "{}", error),
            ErrorKind::State(error) => write!(f, "{}", error),
        }
    }
}

/// Error type for malformed input lines.
#[derive(Debug, PartialEq, Eq)]
pub enum SyntaxError {
    UnexpectedToken(String),
}

impl Display for SyntaxError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SyntaxError::UnexpectedToken(token) => {
                write!(f, "syntax error near unexpected token `{}'", token)
            }
        }
    }
}

/// Error type for errors which occur while starting or reaping external commands.
#[derive(Debug)]
pub enum SpawnError {
    CommandNotFound(String),
    FailedToSpawn(String, io::Error),
    FailedToWait(String),
}

impl Display for SpawnError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SpawnError::CommandNotFound(name) => write!(f, "{}: command not found", name),
            SpawnError::FailedToSpawn(name, cause) => write!(f, "{}: {}", name, cause),
            SpawnError::FailedToWait(name) => write!(f, "{}: failed to wait for process", name),
        }
    }
}

/// Error type for errors which occur while opening redirect targets.
#[derive(Debug)]
pub enum RedirectError {
    CouldNotOpen(PathBuf, io::Error),
    CouldNotDuplicate(PathBuf),
}

impl Display for RedirectError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RedirectError::CouldNotOpen(path, cause) => {
                write!(f, "{}: {}", path.display(), cause)
            }
            RedirectError::CouldNotDuplicate(path) => {
                write!(f, "{}: could not duplicate file handle", path.display())
            }
        }
    }
}

/// Error type for errors which occur while wiring pipeline segments together.
#[derive(Debug)]
pub enum PipeError {
    CouldNotAllocate(io::Error),
    CouldNotDuplicate,
    EndAlreadyTaken(usize),
}

impl Display for PipeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PipeError::CouldNotAllocate(cause) => write!(f, "pipe: {}", cause),
            PipeError::CouldNotDuplicate => write!(f, "pipe: could not duplicate stream"),
            PipeError::EndAlreadyTaken(index) => {
                write!(f, "pipe: end {} was already handed to a segment", index)
            }
        }
    }
}

/// Error type for errors which occur during execution of builtins.
#[derive(Debug)]
pub enum BuiltinError {
    InvalidArguments(String),
    UnknownDirectory(String),
    HistoryFile(PathBuf, io::Error),
    FailedToWrite,
    TaskPanicked(String),
}

impl Display for BuiltinError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BuiltinError::InvalidArguments(usage) => write!(f, "{}", usage.trim_end()),
            BuiltinError::UnknownDirectory(path) => {
                write!(f, "{}: No such file or directory", path)
            }
            // File errors from fs-err already name the file
            BuiltinError::HistoryFile(_, cause) => write!(f, "{}", cause),
            BuiltinError::FailedToWrite => write!(f, "write error"),
            BuiltinError::TaskPanicked(name) => write!(f, "{}: builtin task panicked", name),
        }
    }
}

/// Error type for errors which occur during state operations.
#[derive(Debug)]
pub enum StateError {
    MissingEnvironmentVariable(String),
    FailedToOpenConfigFile(PathBuf),
    FailedToReadConfigFile(PathBuf),
    FailedToLoadHistory(PathBuf),
}

impl Display for StateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StateError::MissingEnvironmentVariable(variable) => {
                write!(f, "Missing environment variable: {}", variable)
            }
            StateError::FailedToOpenConfigFile(path) => {
                write!(f, "Failed to open configuration file: {}", path.display())
            }
            StateError::FailedToReadConfigFile(path) => {
                write!(f, "Failed to read configuration file: {}", path.display())
            }
            StateError::FailedToLoadHistory(path) => {
                write!(f, "Failed to load history file: {}", path.display())
            }
        }
    }
}

/// Shortcut for creating a `ShellError::Syntax` without explicit imports
macro_rules! syntax_err {
    ($content:expr) => {{
        use crate::errors::SyntaxError::*;
        use crate::errors::{ErrorKind, ShellError};
        ShellError::new(ErrorKind::Syntax($content))
    }};
}

/// Shortcut for creating a `ShellError::Spawn` without explicit imports
macro_rules! spawn_err {
    ($content:expr) => {{
        use crate::errors::SpawnError::*;
        use crate::errors::{ErrorKind, ShellError};
        ShellError::new(ErrorKind::Spawn($content))
    }};
}

/// Shortcut for creating a `ShellError::Redirect` without explicit imports
macro_rules! redirect_err {
    ($content:expr) => {{
        use crate::errors::RedirectError::*;
        use crate::errors::{ErrorKind, ShellError};
        ShellError::new(ErrorKind::Redirect($content))
    }};
}

/// Shortcut for creating a `ShellError::Pipe` without explicit imports
macro_rules! pipe_err {
    ($content:expr) => {{
        use crate::errors::PipeError::*;
        use crate::errors::{ErrorKind, ShellError};
        ShellError::new(ErrorKind::Pipe($content))
    }};
}

/// Shortcut for creating a `ShellError::Builtin` without explicit imports
macro_rules! builtin_err {
    ($content:expr) => {{
        use crate::errors::BuiltinError::*;
        use crate::errors::{ErrorKind, ShellError};
        ShellError::new(ErrorKind::Builtin($content))
    }};
}

/// Shortcut for creating a `ShellError::State` without explicit imports
macro_rules! state_err {
    ($content:expr) => {{
        use crate::errors::StateError::*;
        use crate::errors::{ErrorKind, ShellError};
        ShellError::new(ErrorKind::State($content))
    }};
}

/// Unwraps the result of parsing builtin arguments with `clap`,
/// returning the usage message as a builtin error on failure
macro_rules! clap_handle {
    ($parsed:expr) => {
        match $parsed {
            Ok(arguments) => arguments,
            Err(error) => return Err(builtin_err!(InvalidArguments(error.to_string()))),
        }
    };
}
