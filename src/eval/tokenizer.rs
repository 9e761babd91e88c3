use super::quote::{Action, Lexer};
use super::symbols::{WHITESPACE, WORD_BOUNDARIES};

/// Lexes one token starting at byte offset `start`, resolving quotes and backslash escapes
/// Returns the literal value and the offset where scanning stopped, which is either the end of
/// the input or the unquoted space, newline or `stops` character that ended the token
/// An unterminated quote simply runs to the end of the input
pub fn next_token(input: &str, start: usize, stops: &[char]) -> (String, usize) {
    let boundaries: Vec<char> = WORD_BOUNDARIES.iter().chain(stops).copied().collect();
    let mut lexer = Lexer::starting_at(input, start, &boundaries);
    let mut token = String::new();

    for (offset, action) in lexer.by_ref() {
        match action {
            Action::Literal(c) => token.push(c),
            Action::EscapedPair(Some(escaped)) => token.push(escaped),
            // A trailing backslash has nothing to escape, so it is dropped
            Action::EscapedPair(None) | Action::QuoteToggled(_) => (),
            Action::Boundary(_) => return (token, offset),
        }
    }

    (token, lexer.position())
}

/// Splits a command into quote- and escape-resolved words
/// Zero-length tokens such as `''` are discarded
pub fn tokenize(input: &str) -> Vec<String> {
    let input = input.trim();
    let mut tokens = Vec::new();
    let mut position = 0;

    while position < input.len() {
        position += input[position..]
            .find(|c: char| c != WHITESPACE)
            .unwrap_or(input.len() - position);
        if position >= input.len() {
            break;
        }

        let (token, next_position) = next_token(input, position, &[]);
        if !token.is_empty() {
            tokens.push(token);
        }

        // A boundary that is not a space (an unquoted newline) still has to be stepped over
        position = match next_position == position {
            true => position + input[position..].chars().next().map_or(1, char::len_utf8),
            false => next_position,
        };
    }

    tokens
}
