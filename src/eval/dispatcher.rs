use std::sync::RwLock;

use super::parser::parse_command;
use super::pipeline::split_pipeline;
use crate::errors::Result;
use crate::exec::{builtin_funcs, open_redirects, Builtin, Context, Executable, Pipeline, Streams};
use crate::state::{read_state, write_state, ShellState};

/// Represents a collection of builtin commands
/// Allows for command resolution and execution of whole input lines
pub struct Dispatcher {
    commands: Vec<Builtin>,
}

impl Default for Dispatcher {
    /// Initializes the `Dispatcher` with the default shell builtins
    #[rustfmt::skip]
    fn default() -> Self {
        let mut dispatcher = Self::new();

        dispatcher.add_builtin("echo", builtin_funcs::echo);
        dispatcher.add_builtin("pwd", builtin_funcs::working_directory);
        dispatcher.add_builtin("cd", builtin_funcs::change_directory);
        dispatcher.add_builtin("type", builtin_funcs::type_of);
        dispatcher.add_builtin("exit", builtin_funcs::exit);
        dispatcher.add_builtin("history", builtin_funcs::history);

        dispatcher
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Adds a builtin to the `Dispatcher`
    fn add_builtin<F: Fn(&mut Context, Vec<&str>) -> Result<()> + Send + Sync + 'static>(
        &mut self,
        true_name: &str,
        function: F,
    ) {
        self.commands.push(Builtin::new(true_name, function))
    }

    /// Attempts to locate a builtin command by name
    pub fn resolve(&self, command_name: &str) -> Option<&Builtin> {
        self.commands
            .iter()
            .find(|command| command.true_name == command_name)
    }

    /// The names of every registered builtin
    pub fn builtin_names(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().map(|command| command.true_name.as_str())
    }

    /// Evaluates and executes a line of input with the shell's own standard streams
    pub fn eval(&self, shell: &RwLock<ShellState>, line: &str) -> Result<bool> {
        self.eval_with_streams(shell, line, Streams::inherit())
    }

    /// Evaluates and executes a line of input, returning whether the command succeeded
    pub fn eval_with_streams(
        &self,
        shell: &RwLock<ShellState>,
        line: &str,
        streams: Streams,
    ) -> Result<bool> {
        let line = line.trim_end_matches('\n');
        if line.trim().is_empty() {
            return Ok(true);
        }

        write_state(shell).history.record(line);

        let segments = split_pipeline(line);
        log::debug!("evaluating {} segment(s): {:?}", segments.len(), segments);
        match segments.as_slice() {
            [segment] => self.dispatch(shell, segment, streams),
            _ => Pipeline::new(shell, self).run(&segments, streams),
        }
    }

    /// Resolves and runs a single command to the appropriate builtin or executable
    fn dispatch(
        &self,
        shell: &RwLock<ShellState>,
        segment: &str,
        mut streams: Streams,
    ) -> Result<bool> {
        let command = parse_command(segment)?;
        if command.is_empty() {
            return Ok(true);
        }

        // The redirect targets are closed when `opened` is dropped, on every path out of here
        let opened = open_redirects(&command.redirects)?;
        opened.apply(&mut streams)?;

        let arguments = command.args();
        match self.resolve(&command.name) {
            // Builtins run on the shell's own thread
            Some(builtin) => {
                let mut context = Context::new(shell, self, streams, false);
                Ok(builtin.run(&mut context, arguments))
            }
            None => {
                let executable =
                    Executable::resolve(&command.name, &read_state(shell).environment)?;
                executable.run(&arguments, streams)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use tempfile::NamedTempFile;

    use super::*;
    use crate::exec::streams::{InputStream, OutputStream};
    use crate::state::shell::test_state;

    fn eval_captured(shell: &RwLock<ShellState>, line: &str) -> (Result<bool>, String) {
        let output = NamedTempFile::new().unwrap();
        let streams = Streams {
            stdin: InputStream::Inherit,
            stdout: OutputStream::File(output.as_file().try_clone().unwrap()),
            stderr: OutputStream::Stderr,
        };

        let status = Dispatcher::default().eval_with_streams(shell, line, streams);
        (status, fs_err::read_to_string(output.path()).unwrap())
    }

    #[test]
    fn resolves_builtins_by_name() {
        let dispatcher = Dispatcher::default();
        assert!(dispatcher.resolve("echo").is_some());
        assert!(dispatcher.resolve("ls").is_none());
        assert_eq!(
            dispatcher.builtin_names().collect::<Vec<_>>(),
            ["echo", "pwd", "cd", "type", "exit", "history"]
        );
    }

    #[test]
    fn single_builtin() {
        let shell = test_state();
        let (status, output) = eval_captured(&shell, "echo 'hello   world' again\n");
        assert!(status.unwrap());
        assert_eq!(output, "hello   world again\n");
    }

    #[test]
    fn single_external() {
        let shell = test_state();
        let (status, output) = eval_captured(&shell, "printf '%s-%s' a b");
        assert!(status.unwrap());
        assert_eq!(output, "a-b");
    }

    #[test]
    fn pipeline_line() {
        let shell = test_state();
        let (status, output) = eval_captured(&shell, "echo \"a|b\" | cat");
        assert!(status.unwrap());
        assert_eq!(output, "a|b\n");
    }

    #[test]
    fn records_history_before_parsing() {
        let shell = test_state();
        let (status, _) = eval_captured(&shell, "echo >");
        assert!(status.is_err());
        eval_captured(&shell, "   ");
        assert_eq!(read_state(&shell).history.entries(), ["echo >"]);
    }

    #[test]
    fn unknown_command() {
        let shell = test_state();
        let (status, _) = eval_captured(&shell, "nosuchcommand-crabsh arg");
        assert_eq!(
            status.unwrap_err().to_string(),
            "nosuchcommand-crabsh: command not found"
        );
    }

    #[test]
    fn redirect_single_command() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.txt");
        let shell = test_state();

        let line = format!("echo first > {0} second 1>> {0}", target.display());
        let (status, output) = eval_captured(&shell, &line);
        assert!(status.unwrap());
        assert_eq!(output, "");
        assert_eq!(
            fs_err::read_to_string(&target).unwrap(),
            "first second\n"
        );
    }

    #[test]
    fn failing_external_is_not_an_error() {
        let shell = test_state();
        let (status, _) = eval_captured(&shell, "false");
        assert!(!status.unwrap());
    }
}
