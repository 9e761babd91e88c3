use std::process::Child;
use std::thread::ScopedJoinHandle;

use crate::errors::{Handle, Result};

/// A started pipeline segment, either an external process or a builtin running on its own thread
#[derive(Debug)]
pub enum SegmentHandle<'scope> {
    Process {
        name: String,
        child: Child,
    },
    Task {
        name: String,
        handle: ScopedJoinHandle<'scope, bool>,
    },
}

impl<'scope> SegmentHandle<'scope> {
    pub fn name(&self) -> &str {
        match self {
            SegmentHandle::Process { name, .. } | SegmentHandle::Task { name, .. } => name,
        }
    }

    /// Blocks until the segment has finished and reports whether it succeeded
    pub fn wait(self) -> Result<bool> {
        match self {
            SegmentHandle::Process { name, mut child } => {
                let status = child
                    .wait()
                    .replace_err(|| spawn_err!(FailedToWait(name.clone())))?;
                log::debug!("segment {} exited with {}", name, status);
                Ok(status.success())
            }
            SegmentHandle::Task { name, handle } => {
                let succeeded = handle
                    .join()
                    .replace_err(|| builtin_err!(TaskPanicked(name.clone())))?;
                log::debug!("builtin segment {} finished, success: {}", name, succeeded);
                Ok(succeeded)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use std::process::Command;
    use std::thread;

    use super::*;

    #[test]
    fn waits_for_processes() {
        let child = Command::new("/bin/sh").args(["-c", "exit 1"]).spawn().unwrap();
        let segment = SegmentHandle::Process {
            name: "sh".to_owned(),
            child,
        };

        assert_eq!(segment.name(), "sh");
        assert!(!segment.wait().unwrap());
    }

    #[test]
    fn waits_for_tasks() {
        thread::scope(|scope| {
            let segment = SegmentHandle::Task {
                name: "echo".to_owned(),
                handle: scope.spawn(|| true),
            };
            assert!(segment.wait().unwrap());

            let panicking = SegmentHandle::Task {
                name: "broken".to_owned(),
                handle: scope.spawn(|| -> bool { panic!("builtin failure") }),
            };
            assert_eq!(
                panicking.wait().unwrap_err().to_string(),
                "broken: builtin task panicked"
            );
        });
    }
}
