use std::fmt::{Display, Formatter};

use strum::Display as StrumDisplay;

use super::quote::{Action, Lexer};
use super::symbols::{BACKSLASH, GREATER_THAN, STDERR_FD, STDOUT_FD, WHITESPACE};
use super::tokenizer::next_token;
use crate::errors::Result;

/// The standard stream a redirect applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamFd {
    Stdout,
    Stderr,
}

impl StreamFd {
    pub fn number(self) -> u8 {
        match self {
            StreamFd::Stdout => 1,
            StreamFd::Stderr => 2,
        }
    }
}

/// How a redirect target is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay)]
pub enum RedirectOp {
    #[strum(serialize = ">")]
    Truncate,
    #[strum(serialize = ">>")]
    Append,
}

/// A single output redirection, such as `> out.txt` or `2>> err.log`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub fd: StreamFd,
    pub op: RedirectOp,
    pub file: String,
}

impl Display for Redirect {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{} {}", self.fd.number(), self.op, self.file)
    }
}

/// Removes every unquoted, unescaped redirection from a command
/// Returns the remaining command text, still unresolved, along with the redirects in the order
/// they were written. A command without redirects is returned unchanged
pub fn parse_redirection(input: &str) -> Result<(String, Vec<Redirect>)> {
    let mut command = String::with_capacity(input.len());
    let mut redirects = Vec::new();
    let mut lexer = Lexer::new(input, &[GREATER_THAN]);

    while let Some((_, action)) = lexer.next() {
        match action {
            Action::Literal(c) | Action::QuoteToggled(c) => command.push(c),
            Action::EscapedPair(escaped) => {
                command.push(BACKSLASH);
                command.extend(escaped);
            }
            Action::Boundary(_) => {
                let fd = match command.chars().last() {
                    Some(STDERR_FD) => {
                        command.pop();
                        StreamFd::Stderr
                    }
                    Some(STDOUT_FD) => {
                        command.pop();
                        StreamFd::Stdout
                    }
                    _ => StreamFd::Stdout,
                };

                let op = match lexer.peek_char() {
                    Some(GREATER_THAN) => {
                        lexer.seek(lexer.position() + GREATER_THAN.len_utf8());
                        RedirectOp::Append
                    }
                    _ => RedirectOp::Truncate,
                };

                let rest = &input[lexer.position()..];
                let start =
                    lexer.position() + (rest.len() - rest.trim_start_matches(WHITESPACE).len());
                let (file, end) = next_token(input, start, &[GREATER_THAN]);
                if file.is_empty() {
                    let token = match input[end..].chars().next() {
                        Some(c) => c.to_string(),
                        None => "newline".to_owned(),
                    };
                    return Err(syntax_err!(UnexpectedToken(token)));
                }

                lexer.seek(end);
                let redirect = Redirect { fd, op, file };
                log::trace!("extracted redirect {}", redirect);
                redirects.push(redirect);
            }
        }
    }

    if redirects.is_empty() {
        return Ok((input.to_owned(), redirects));
    }

    Ok((command, redirects))
}
