use std::io::ErrorKind as IoErrorKind;
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Child, Command as Process};

use super::streams::Streams;
use crate::errors::{Handle, Result};
use crate::state::Environment;

/// Represents an executable (external command) found on disk
#[derive(Debug, Clone)]
pub struct Executable {
    name: String,
    path: PathBuf,
}

impl Executable {
    // * The path must already have been resolved through the PATH,
    // * the name is what the user typed and becomes the process's argv[0]
    pub fn new(name: &str, path: PathBuf) -> Self {
        Self {
            name: name.to_owned(),
            path,
        }
    }

    /// Locates a command through the PATH of the given environment
    pub fn resolve(name: &str, environment: &Environment) -> Result<Self> {
        let path = environment
            .find_executable(name)
            .replace_err(|| spawn_err!(CommandNotFound(name.to_owned())))?;

        log::trace!("resolved {} to {}", name, path.display());
        Ok(Self::new(name, path))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Starts the process with the given streams and returns without waiting for it
    /// The streams are moved into the child's configuration, and the parent's copies are closed
    /// as soon as the process has started
    pub fn spawn(&self, arguments: &[&str], streams: Streams) -> Result<Child> {
        let mut process = Process::new(self.path());
        process
            .arg0(self.name())
            .args(arguments)
            .stdin(streams.stdin.into_stdio())
            .stdout(streams.stdout.into_stdio())
            .stderr(streams.stderr.into_stdio());

        let child = process.spawn().map_err(|cause| match cause.kind() {
            // The file can disappear between PATH resolution and spawning
            IoErrorKind::NotFound => spawn_err!(CommandNotFound(self.name.clone())),
            _ => spawn_err!(FailedToSpawn(self.name.clone(), cause)),
        })?;
        drop(process);

        log::debug!("spawned {} (pid {})", self.name(), child.id());
        Ok(child)
    }

    /// Runs the process to completion and reports whether it exited successfully
    pub fn run(&self, arguments: &[&str], streams: Streams) -> Result<bool> {
        let mut child = self.spawn(arguments, streams)?;
        let status = child
            .wait()
            .replace_err(|| spawn_err!(FailedToWait(self.name.clone())))?;

        log::debug!("{} exited with {}", self.name(), status);
        Ok(status.success())
    }
}

#[cfg(test)]
mod test {
    use std::io::Read;

    use super::*;
    use crate::exec::streams::OutputStream;

    fn sh() -> Executable {
        Executable::new("sh", PathBuf::from("/bin/sh"))
    }

    #[test]
    fn reports_exit_status() {
        assert!(sh().run(&["-c", "exit 0"], Streams::inherit()).unwrap());
        assert!(!sh().run(&["-c", "exit 3"], Streams::inherit()).unwrap());
    }

    #[test]
    fn writes_to_the_given_stdout() {
        let (mut reader, writer) = os_pipe::pipe().unwrap();
        let streams = Streams {
            stdout: OutputStream::Pipe(writer),
            ..Streams::inherit()
        };

        assert!(sh().run(&["-c", "echo $0"], streams).unwrap());

        let mut output = String::new();
        reader.read_to_string(&mut output).unwrap();
        assert_eq!(output, "sh\n");
    }

    #[test]
    fn resolves_through_path() {
        let environment = Environment {
            HOME: PathBuf::from("/"),
            PATH: vec![PathBuf::from("/bin")],
        };

        let found = Executable::resolve("sh", &environment).unwrap();
        assert_eq!(found.name(), "sh");
        assert_eq!(found.path(), Path::new("/bin/sh"));

        let error = Executable::resolve("nosuchcommand", &environment).unwrap_err();
        assert!(error.always_reported());
    }

    #[test]
    fn missing_file_is_command_not_found() {
        let missing = Executable::new("ghost", PathBuf::from("/no/such/ghost"));
        let error = missing.run(&[], Streams::inherit()).unwrap_err();
        assert_eq!(error.to_string(), "ghost: command not found");
    }
}
