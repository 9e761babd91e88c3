use std::error::Error;
use std::fs::File;
use std::io;
use std::path::PathBuf;

use fs_err::OpenOptions;

use super::streams::{OutputStream, Streams};
use crate::errors::{Handle, Result};
use crate::eval::redirect::{Redirect, RedirectOp, StreamFd};

/// An opened redirect target
#[derive(Debug)]
struct Target {
    path: PathBuf,
    file: fs_err::File,
}

/// The files opened for one command's redirects
/// The originals stay here until `cleanup` (or drop) while each command receives its own duplicate,
/// so a target remains open for as long as the command that writes to it
#[derive(Debug, Default)]
pub struct OpenRedirects {
    stdout: Option<Target>,
    stderr: Option<Target>,
}

/// Opens every redirect target in order, the last redirect for a stream taking precedence
/// If any open fails, the files already opened by this call are closed before the error is returned
pub fn open_redirects(redirects: &[Redirect]) -> Result<OpenRedirects> {
    let mut opened = OpenRedirects::default();

    for redirect in redirects {
        let path = PathBuf::from(&redirect.file);
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(redirect.op == RedirectOp::Truncate)
            .append(redirect.op == RedirectOp::Append)
            .open(&path)
            .map_err(|cause| redirect_err!(CouldNotOpen(path.clone(), os_cause(cause))))?;

        log::debug!("opened redirect target {}", redirect);
        let target = Some(Target { path, file });
        match redirect.fd {
            StreamFd::Stdout => opened.stdout = target,
            StreamFd::Stderr => opened.stderr = target,
        }
    }

    Ok(opened)
}

impl OpenRedirects {
    pub fn is_empty(&self) -> bool {
        self.stdout.is_none() && self.stderr.is_none()
    }

    /// Replaces the output streams of a command with duplicates of the redirect targets
    /// The stream being replaced is dropped, which closes it if it was a pipe end
    pub fn apply(&self, streams: &mut Streams) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }

        if let Some(target) = &self.stdout {
            streams.stdout = OutputStream::File(duplicate(target)?);
        }
        if let Some(target) = &self.stderr {
            streams.stderr = OutputStream::File(duplicate(target)?);
        }

        Ok(())
    }

    /// Closes every file this set opened
    pub fn cleanup(mut self) {
        self.close();
    }

    fn close(&mut self) {
        for target in [self.stdout.take(), self.stderr.take()].into_iter().flatten() {
            log::trace!("closing redirect target {}", target.path.display());
        }
    }
}

impl Drop for OpenRedirects {
    fn drop(&mut self) {
        self.close();
    }
}

fn duplicate(target: &Target) -> Result<File> {
    target
        .file
        .file()
        .try_clone()
        .replace_err(|| redirect_err!(CouldNotDuplicate(target.path.clone())))
}

// fs_err names the file in its own message, which the error already carries as a path
fn os_cause(error: io::Error) -> io::Error {
    let code = error
        .get_ref()
        .and_then(|inner| inner.source())
        .and_then(|source| source.downcast_ref::<io::Error>())
        .and_then(io::Error::raw_os_error);

    match code {
        Some(code) => io::Error::from_raw_os_error(code),
        None => error,
    }
}
