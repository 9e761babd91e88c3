use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

const HOME_SHORTHAND: &str = "~";

/// Expands the home directory shorthand in a path string
/// Only a bare `~` or a leading `~/` is expanded, matching what a user types at a prompt
pub fn expand_home(path: &str, home_directory: &Path) -> PathBuf {
    if path == HOME_SHORTHAND {
        return home_directory.to_path_buf();
    }

    match path.strip_prefix("~/") {
        Some(rest) => home_directory.join(rest),
        None => PathBuf::from(path),
    }
}

/// Attempts to locate an executable file by name
/// A name containing a slash is used as-is, otherwise each directory is searched in order
pub fn resolve_executable(name: &str, directories: &[PathBuf]) -> Option<PathBuf> {
    if name.is_empty() {
        return None;
    }

    if name.contains('/') {
        let path = PathBuf::from(name);
        return is_executable(&path).then_some(path);
    }

    directories
        .iter()
        .map(|dir| dir.join(name))
        .find(|path| is_executable(path))
}

// Checks that a path is a regular file with at least one executable bit set
pub fn is_executable(path: &Path) -> bool {
    match fs_err::metadata(path) {
        // 0o111 is the mask of the owner, group and other executable bits
        Ok(metadata) => metadata.is_file() && metadata.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}
