use std::sync::RwLock;
use std::thread::{self, Scope};

use super::builtins::command::Context;
use super::executable::Executable;
use super::pipes::PipeSet;
use super::redirect::{open_redirects, OpenRedirects};
use super::segment::SegmentHandle;
use super::streams::{InputStream, OutputStream, Streams};
use crate::errors::Result;
use crate::eval::parser::parse_command;
use crate::eval::Dispatcher;
use crate::state::{read_state, ShellState};

/// Runs the segments of a pipeline concurrently, each connected to the next through a pipe
/// Builtin segments run on scoped threads and external segments as child processes.
/// The call returns only once every started segment has finished
pub struct Pipeline<'a> {
    shell: &'a RwLock<ShellState>,
    dispatcher: &'a Dispatcher,
}

impl<'a> Pipeline<'a> {
    pub fn new(shell: &'a RwLock<ShellState>, dispatcher: &'a Dispatcher) -> Self {
        Self { shell, dispatcher }
    }

    /// Runs the raw segments, using `boundary` as the input of the first segment,
    /// the output of the last one, and the error stream of all of them
    /// Returns whether the last segment succeeded
    pub fn run(&self, segments: &[String], boundary: Streams) -> Result<bool> {
        // Every pipe is allocated before any segment starts
        let mut pipes = PipeSet::allocate(segments.len().saturating_sub(1))?;
        let mut redirects = Vec::new();

        thread::scope(|scope| {
            let mut started = Vec::with_capacity(segments.len());
            let outcome = self.start_segments(
                scope,
                segments,
                &boundary,
                &mut pipes,
                &mut redirects,
                &mut started,
            );

            // The ends still held here belong to segments that never started
            pipes.close_all();
            if let Err(error) = &outcome {
                log::debug!(
                    "aborting pipeline after {} of {} segments: {}",
                    started.len(),
                    segments.len(),
                    error
                );
            }

            let mut last_succeeded = false;
            let mut wait_error = None;
            for segment in started {
                match segment.wait() {
                    Ok(succeeded) => last_succeeded = succeeded,
                    Err(error) => {
                        last_succeeded = false;
                        wait_error.get_or_insert(error);
                    }
                }
            }

            for opened in redirects.drain(..) {
                opened.cleanup();
            }

            outcome?;
            match wait_error {
                Some(error) => Err(error),
                None => Ok(last_succeeded),
            }
        })
    }

    fn start_segments<'scope, 'env>(
        &self,
        scope: &'scope Scope<'scope, 'env>,
        segments: &[String],
        boundary: &Streams,
        pipes: &mut PipeSet,
        redirects: &mut Vec<OpenRedirects>,
        started: &mut Vec<SegmentHandle<'scope>>,
    ) -> Result<()>
    where
        'a: 'scope,
    {
        let last = segments.len().saturating_sub(1);

        for (index, segment) in segments.iter().enumerate() {
            let command = parse_command(segment)?;
            if command.is_empty() {
                return Err(syntax_err!(UnexpectedToken("|".to_owned())));
            }

            let stdin = match index {
                0 => boundary.stdin.try_clone()?,
                _ => InputStream::Pipe(pipes.take_reader(index - 1)?),
            };
            let stdout = match index == last {
                true => boundary.stdout.try_clone()?,
                false => OutputStream::Pipe(pipes.take_writer(index)?),
            };
            let mut streams = Streams {
                stdin,
                stdout,
                stderr: boundary.stderr.try_clone()?,
            };

            // Redirect targets stay open until the whole pipeline has finished
            let opened = open_redirects(&command.redirects)?;
            opened.apply(&mut streams)?;
            redirects.push(opened);

            let handle = match self.dispatcher.resolve(&command.name) {
                Some(builtin) => {
                    let mut context = Context::new(self.shell, self.dispatcher, streams, true);
                    let name = command.name.clone();
                    let handle = scope.spawn(move || builtin.run(&mut context, command.args()));
                    SegmentHandle::Task { name, handle }
                }
                None => {
                    let executable = {
                        let shell = read_state(self.shell);
                        Executable::resolve(&command.name, &shell.environment)?
                    };
                    let child = executable.spawn(&command.args(), streams)?;
                    SegmentHandle::Process {
                        name: command.name,
                        child,
                    }
                }
            };

            log::debug!("started segment {}: {}", index, handle.name());
            started.push(handle);
        }

        Ok(())
    }
}
