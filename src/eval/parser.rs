use super::redirect::{parse_redirection, Redirect};
use super::tokenizer::tokenize;
use crate::errors::Result;

/// A single command after quote resolution and redirect extraction
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedCommand {
    pub name: String,
    pub args: Vec<String>,
    pub redirects: Vec<Redirect>,
}

impl ParsedCommand {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }

    pub fn args(&self) -> Vec<&str> {
        self.args.iter().map(String::as_str).collect()
    }
}

/// Parses one raw pipeline segment into a command name, its arguments and its redirects
/// A blank segment yields an empty name rather than an error
pub fn parse_command(segment: &str) -> Result<ParsedCommand> {
    let (command, redirects) = parse_redirection(segment)?;
    let mut words = tokenize(&command).into_iter();

    let Some(name) = words.next() else {
        return Ok(ParsedCommand {
            redirects,
            ..Default::default()
        });
    };

    Ok(ParsedCommand {
        name,
        args: words.collect(),
        redirects,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::eval::redirect::{RedirectOp, StreamFd};

    macro_rules! command {
        ($name:literal) => {
            ParsedCommand {
                name: $name.to_owned(),
                ..Default::default()
            }
        };
        ($name:literal, [$($arg:literal),*]) => {
            ParsedCommand {
                name: $name.to_owned(),
                args: vec![$($arg.to_owned()),*],
                redirects: Vec::new(),
            }
        };
    }

    #[test]
    fn simple_command() {
        assert_eq!(parse_command("echo hello").unwrap(), command!("echo", ["hello"]));
        assert_eq!(parse_command("  pwd  ").unwrap(), command!("pwd"));
    }

    #[test]
    fn escaped_space_is_one_argument() {
        assert_eq!(parse_command("echo a\\ b\n").unwrap(), command!("echo", ["a b"]));
    }

    #[test]
    fn command_with_redirect() {
        let parsed = parse_command("echo \"hello world\" > file.txt").unwrap();
        assert_eq!(parsed.name, "echo");
        assert_eq!(parsed.args, vec!["hello world".to_owned()]);
        assert_eq!(
            parsed.redirects,
            vec![Redirect {
                fd: StreamFd::Stdout,
                op: RedirectOp::Truncate,
                file: "file.txt".to_owned(),
            }]
        );
    }

    #[test]
    fn quoted_command_name() {
        assert_eq!(
            parse_command("'my program' arg").unwrap(),
            command!("my program", ["arg"])
        );
    }

    #[test]
    fn blank_segment_is_empty() {
        let parsed = parse_command("   ").unwrap();
        assert!(parsed.is_empty());
        assert!(parsed.args.is_empty());
    }

    #[test]
    fn redirect_errors_propagate() {
        assert!(parse_command("echo >").is_err());
    }
}
