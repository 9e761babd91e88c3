use std::io::{Read, Write};
use std::sync::RwLock;

use super::super::streams::Streams;
use crate::errors::{BuiltinError, ErrorKind, Result};
use crate::eval::Dispatcher;
use crate::state::ShellState;

/// Everything a builtin can reach while it runs
/// Builtins never touch the process-wide standard streams, only the ones given here,
/// so several builtins can run at once in different segments of a pipeline
pub struct Context<'a> {
    pub shell: &'a RwLock<ShellState>,
    pub dispatcher: &'a Dispatcher,
    pub stdin: Box<dyn Read + Send>,
    pub stdout: Box<dyn Write + Send>,
    pub stderr: Box<dyn Write + Send>,
    in_pipeline: bool,
}

impl<'a> Context<'a> {
    pub fn new(
        shell: &'a RwLock<ShellState>,
        dispatcher: &'a Dispatcher,
        streams: Streams,
        in_pipeline: bool,
    ) -> Self {
        Self {
            shell,
            dispatcher,
            stdin: streams.stdin.into_reader(),
            stdout: streams.stdout.into_writer(),
            stderr: streams.stderr.into_writer(),
            in_pipeline,
        }
    }

    /// Whether the builtin is one segment of a pipeline rather than the whole command
    pub fn in_pipeline(&self) -> bool {
        self.in_pipeline
    }
}

pub type BuiltinFunction = dyn Fn(&mut Context, Vec<&str>) -> Result<()> + Send + Sync;

/// Represents a builtin function and its name
pub struct Builtin {
    pub true_name: String,
    function: Box<BuiltinFunction>,
}

impl Builtin {
    pub fn new<F: Fn(&mut Context, Vec<&str>) -> Result<()> + Send + Sync + 'static>(
        true_name: &str,
        function: F,
    ) -> Self {
        Self {
            true_name: true_name.to_owned(),
            function: Box::new(function),
        }
    }

    /// Runs the builtin and reports whether it succeeded
    /// A failure is written to the builtin's own error stream rather than returned,
    /// since that stream may be redirected or belong to a pipeline segment
    pub fn run(&self, context: &mut Context, arguments: Vec<&str>) -> bool {
        let result = (self.function)(context, arguments);
        if let Err(error) = &result {
            log::debug!("builtin {} failed: {}", self.true_name, error);
            // A later segment that stops reading early is an ordinary end to a pipeline
            let reader_gone = context.in_pipeline()
                && matches!(error.kind(), ErrorKind::Builtin(BuiltinError::FailedToWrite));
            if !reader_gone {
                // Nothing is left to report a failed error write to
                let _ = writeln!(context.stderr, "{}: {}", self.true_name, error);
            }
        }

        let _ = context.stdout.flush();
        let _ = context.stderr.flush();
        result.is_ok()
    }
}

impl std::fmt::Debug for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builtin")
            .field("true_name", &self.true_name)
            .finish_non_exhaustive()
    }
}
