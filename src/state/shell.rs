use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::config::Configuration;
use super::environment::Environment;
use super::history::History;
use crate::errors::Result;

/// Represents the shell state and provides methods for interacting with it
#[derive(Debug)]
pub struct ShellState {
    pub environment: Environment,
    pub config: Configuration,
    pub history: History,
    pub last_command_succeeded: bool,
    // Set by the `exit` builtin, holds the status the shell should exit with
    pub should_exit: Option<i32>,
}

impl ShellState {
    pub fn new(config: Configuration) -> Result<Arc<RwLock<Self>>> {
        Ok(Arc::new(RwLock::new(Self::with_environment(
            Environment::new()?,
            config,
        ))))
    }

    pub fn with_environment(environment: Environment, config: Configuration) -> Self {
        Self {
            environment,
            config,
            history: History::new(),
            last_command_succeeded: true,
            should_exit: None,
        }
    }

    /// Generates the prompt string used by the `LineEditor`
    pub fn prompt(&self) -> String {
        self.config.prompt.clone()
    }
}

// A panicking builtin task must not take the whole shell down with it,
// so poisoned locks are recovered rather than propagated
pub fn read_state(shell: &RwLock<ShellState>) -> RwLockReadGuard<'_, ShellState> {
    shell.read().unwrap_or_else(PoisonError::into_inner)
}

pub fn write_state(shell: &RwLock<ShellState>) -> RwLockWriteGuard<'_, ShellState> {
    shell.write().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
pub(crate) fn test_state() -> RwLock<ShellState> {
    use std::path::PathBuf;

    let environment = Environment {
        HOME: std::env::temp_dir(),
        PATH: std::env::var_os("PATH")
            .map(|path| std::env::split_paths(&path).collect())
            .unwrap_or_else(|| vec![PathBuf::from("/bin"), PathBuf::from("/usr/bin")]),
    };

    RwLock::new(ShellState::with_environment(
        environment,
        Configuration::default(),
    ))
}
