pub mod config;
pub mod environment;
pub mod history;
pub mod path;
pub mod shell;

pub use config::Configuration;
pub use environment::Environment;
pub use shell::{read_state, write_state, ShellState};
