use std::iter;
use std::path::PathBuf;

use clap::Parser;

/// Parses builtin arguments, supplying the builtin's name as the program name clap expects
pub fn parse_arguments<T: Parser>(name: &str, arguments: &[&str]) -> Result<T, clap::Error> {
    T::try_parse_from(iter::once(name).chain(arguments.iter().copied()))
}

#[derive(Parser, Debug)]
#[command(name = "exit")]
pub struct ExitArgs {
    #[arg(allow_negative_numbers = true, help = "The status to exit with")]
    pub code: Option<i32>,
}

#[derive(Parser, Debug)]
#[command(name = "pwd")]
pub struct WorkingDirectoryArgs {}

#[derive(Parser, Debug)]
#[command(name = "cd")]
pub struct ChangeDirectoryArgs {
    #[arg(help = "The path of the directory to switch to, home if absent")]
    pub path: Option<String>,
}

#[derive(Parser, Debug)]
#[command(name = "type")]
pub struct TypeArgs {
    #[arg(required = true, help = "The command names to describe")]
    pub names: Vec<String>,
}

#[derive(Parser, Debug)]
#[command(name = "history")]
pub struct HistoryArgs {
    #[arg(
        short = 'r',
        value_name = "FILE",
        conflicts_with_all = ["write", "append"],
        help = "Append the lines of a file to the history"
    )]
    pub read: Option<PathBuf>,
    #[arg(
        short = 'w',
        value_name = "FILE",
        conflicts_with = "append",
        help = "Overwrite a file with the whole history"
    )]
    pub write: Option<PathBuf>,
    #[arg(
        short = 'a',
        value_name = "FILE",
        help = "Append the entries added since the last append to a file"
    )]
    pub append: Option<PathBuf>,
    #[arg(
        allow_negative_numbers = true,
        help = "The number of recent entries to print, all if absent"
    )]
    pub count: Option<i64>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_history_flags() {
        let args: HistoryArgs = parse_arguments("history", &["-w", "out.txt"]).unwrap();
        assert_eq!(args.write, Some(PathBuf::from("out.txt")));
        assert_eq!(args.count, None);

        let args: HistoryArgs = parse_arguments("history", &["3"]).unwrap();
        assert_eq!(args.count, Some(3));

        assert!(parse_arguments::<HistoryArgs>("history", &["-r", "a", "-w", "b"]).is_err());
    }

    #[test]
    fn parses_negative_exit_codes() {
        let args: ExitArgs = parse_arguments("exit", &["-1"]).unwrap();
        assert_eq!(args.code, Some(-1));
        assert!(parse_arguments::<ExitArgs>("exit", &["soon"]).is_err());
    }

    #[test]
    fn type_needs_a_name() {
        assert!(parse_arguments::<TypeArgs>("type", &[]).is_err());
    }
}
