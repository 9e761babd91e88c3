use std::fs::File;
use std::io::{self, Read, Write};
use std::process::Stdio;

use os_pipe::{PipeReader, PipeWriter};

use crate::errors::{Handle, Result, ShellError};

/// Where a segment reads its standard input from
#[derive(Debug)]
pub enum InputStream {
    Inherit,
    Pipe(PipeReader),
    File(File),
}

impl InputStream {
    pub fn try_clone(&self) -> Result<Self> {
        Ok(match self {
            InputStream::Inherit => InputStream::Inherit,
            InputStream::Pipe(reader) => {
                InputStream::Pipe(reader.try_clone().replace_err(duplicate_failed)?)
            }
            InputStream::File(file) => {
                InputStream::File(file.try_clone().replace_err(duplicate_failed)?)
            }
        })
    }

    /// Hands the stream to a child process
    pub fn into_stdio(self) -> Stdio {
        match self {
            InputStream::Inherit => Stdio::inherit(),
            InputStream::Pipe(reader) => Stdio::from(reader),
            InputStream::File(file) => Stdio::from(file),
        }
    }

    /// Hands the stream to a builtin task
    pub fn into_reader(self) -> Box<dyn Read + Send> {
        match self {
            InputStream::Inherit => Box::new(io::stdin()),
            InputStream::Pipe(reader) => Box::new(reader),
            InputStream::File(file) => Box::new(file),
        }
    }
}

/// Where a segment writes its standard output or error to
#[derive(Debug)]
pub enum OutputStream {
    Stdout,
    Stderr,
    Pipe(PipeWriter),
    File(File),
}

impl OutputStream {
    pub fn try_clone(&self) -> Result<Self> {
        Ok(match self {
            OutputStream::Stdout => OutputStream::Stdout,
            OutputStream::Stderr => OutputStream::Stderr,
            OutputStream::Pipe(writer) => {
                OutputStream::Pipe(writer.try_clone().replace_err(duplicate_failed)?)
            }
            OutputStream::File(file) => {
                OutputStream::File(file.try_clone().replace_err(duplicate_failed)?)
            }
        })
    }

    pub fn into_stdio(self) -> Stdio {
        match self {
            OutputStream::Stdout | OutputStream::Stderr => Stdio::inherit(),
            OutputStream::Pipe(writer) => Stdio::from(writer),
            OutputStream::File(file) => Stdio::from(file),
        }
    }

    pub fn into_writer(self) -> Box<dyn Write + Send> {
        match self {
            OutputStream::Stdout => Box::new(io::stdout()),
            OutputStream::Stderr => Box::new(io::stderr()),
            OutputStream::Pipe(writer) => Box::new(writer),
            OutputStream::File(file) => Box::new(file),
        }
    }
}

fn duplicate_failed() -> ShellError {
    pipe_err!(CouldNotDuplicate)
}

/// The full set of standard streams handed to one command
#[derive(Debug)]
pub struct Streams {
    pub stdin: InputStream,
    pub stdout: OutputStream,
    pub stderr: OutputStream,
}

impl Streams {
    /// The shell's own standard streams
    pub fn inherit() -> Self {
        Self {
            stdin: InputStream::Inherit,
            stdout: OutputStream::Stdout,
            stderr: OutputStream::Stderr,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn cloned_pipe_writer_feeds_the_same_pipe() {
        let (mut reader, writer) = os_pipe::pipe().unwrap();
        let original = OutputStream::Pipe(writer);
        let clone = original.try_clone().unwrap();

        original.into_writer().write_all(b"one ").unwrap();
        clone.into_writer().write_all(b"two").unwrap();

        let mut output = String::new();
        reader.read_to_string(&mut output).unwrap();
        assert_eq!(output, "one two");
    }

    #[test]
    fn file_input_is_readable() {
        let mut file = tempfile::tempfile().unwrap();
        file.write_all(b"contents").unwrap();
        std::io::Seek::rewind(&mut file).unwrap();

        let mut input = String::new();
        InputStream::File(file)
            .into_reader()
            .read_to_string(&mut input)
            .unwrap();
        assert_eq!(input, "contents");
    }
}
