use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use fs_err::File;
use log::LevelFilter;

use crate::errors::{Handle, Result};

pub const DEFAULT_PROMPT: &str = "$ ";

// Represents any settings for the shell, most of which can be configured by the user
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    // Whether or not to print out error messages other than syntax and command-not-found errors
    pub show_errors: bool,
    // The file history is loaded from at startup and appended to on exit
    pub history_file: Option<PathBuf>,
    // The log level used when none is given on the command line
    pub log_level: LevelFilter,
    pub prompt: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            show_errors: true,
            history_file: None,
            log_level: LevelFilter::Warn,
            prompt: DEFAULT_PROMPT.to_owned(),
        }
    }
}

impl Configuration {
    // Scans a configuration file for settings and updates the configuration accordingly
    pub fn from_file(filename: &Path) -> Result<Self> {
        let dirname = filename.parent().unwrap_or(Path::new("."));

        let mut config = Self::default();
        let file = File::open(filename)
            .replace_err(|| state_err!(FailedToOpenConfigFile(filename.to_path_buf())))?;
        let reader = BufReader::new(file);

        for (number, line) in reader.lines().enumerate() {
            let line =
                line.replace_err(|| state_err!(FailedToReadConfigFile(filename.to_path_buf())))?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let malformed = || {
                state_err!(FailedToReadConfigFile(filename.to_path_buf())).set_context(&format!(
                    "{}:{}: invalid setting '{}'",
                    filename.display(),
                    number + 1,
                    line
                ))
            };

            let (key, value) = line.split_once(':').replace_err(malformed)?;
            let value = value.trim();

            match key.trim() {
                "show-errors" => config.show_errors = value.parse::<bool>().replace_err(malformed)?,
                "history-file" => config.history_file = Some(dirname.join(value)),
                "log-level" => {
                    config.log_level = LevelFilter::from_str(value).replace_err(malformed)?
                }
                "prompt" => config.prompt = unquote(value).to_owned(),
                _ => return Err(malformed()),
            }
        }

        log::debug!("loaded configuration from {}", filename.display());
        Ok(config)
    }
}

// Allows a prompt with trailing spaces to be written as "$ "
fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
