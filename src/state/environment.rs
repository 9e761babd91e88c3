use std::env;
use std::path::PathBuf;

use super::path::{expand_home, resolve_executable};
use crate::errors::{Handle, Result};

// Represents the parts of the process environment the shell relies on
// * Environment variables are represented in all caps by convention
#[allow(non_snake_case)]
#[derive(Debug, Clone)]
pub struct Environment {
    pub HOME: PathBuf,
    // * PATH is a list of directories which the shell will search for executables in,
    // * not to be confused with the current working directory
    pub PATH: Vec<PathBuf>,
}

#[allow(non_snake_case)]
impl Environment {
    pub fn new() -> Result<Self> {
        let HOME = env::var_os("HOME")
            .map(PathBuf::from)
            .replace_err(|| state_err!(MissingEnvironmentVariable("HOME".to_owned())))?;
        let PATH = env::var_os("PATH")
            .map(|path| env::split_paths(&path).collect())
            .unwrap_or_default();

        Ok(Self { HOME, PATH })
    }

    /// Attempts to locate an executable in the PATH
    pub fn find_executable(&self, name: &str) -> Option<PathBuf> {
        resolve_executable(name, &self.PATH)
    }

    /// Resolves a directory argument given to `cd`
    pub fn resolve_directory(&self, path: &str) -> PathBuf {
        expand_home(path, &self.HOME)
    }
}
