use bitflags::bitflags;

use super::symbols::{BACKSLASH, DOUBLE_QUOTE, SINGLE_QUOTE};

bitflags! {
    /// Tracks which kind of quote the scanner is currently inside.
    /// At most one flag is ever set, because a quote of the other kind is literal while one is open.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct QuoteState: u8 {
        const SINGLE = 0b01;
        const DOUBLE = 0b10;
    }
}

/// What a scanner should do with the character it just fed to a `QuoteState`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// An ordinary character, to be copied as-is
    Literal(char),
    /// A quote character which opened or closed a quoted section
    QuoteToggled(char),
    /// A backslash escape, holding the escaped character
    /// `None` means the backslash was the last character of the input
    EscapedPair(Option<char>),
    /// One of the scanner's boundary characters, found outside of any quotes
    Boundary(char),
}

impl QuoteState {
    pub fn is_quoted(self) -> bool {
        !self.is_empty()
    }

    /// Feeds one character through the state machine
    /// `next` is the character after `c`, which decides whether a backslash escapes anything
    pub fn advance(&mut self, c: char, next: Option<char>, boundaries: &[char]) -> Action {
        match c {
            BACKSLASH if self.contains(Self::SINGLE) => Action::Literal(c),
            BACKSLASH if self.contains(Self::DOUBLE) => match next {
                Some(escaped @ (BACKSLASH | DOUBLE_QUOTE)) => Action::EscapedPair(Some(escaped)),
                _ => Action::Literal(c),
            },
            BACKSLASH => Action::EscapedPair(next),
            SINGLE_QUOTE if !self.contains(Self::DOUBLE) => {
                self.toggle(Self::SINGLE);
                Action::QuoteToggled(c)
            }
            DOUBLE_QUOTE if !self.contains(Self::SINGLE) => {
                self.toggle(Self::DOUBLE);
                Action::QuoteToggled(c)
            }
            _ if !self.is_quoted() && boundaries.contains(&c) => Action::Boundary(c),
            _ => Action::Literal(c),
        }
    }
}

/// Drives a `QuoteState` across a string, yielding the byte offset of each character with its `Action`
/// An escaped character is consumed together with its backslash
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    state: QuoteState,
    boundaries: &'a [char],
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str, boundaries: &'a [char]) -> Self {
        Self::starting_at(input, 0, boundaries)
    }

    pub fn starting_at(input: &'a str, position: usize, boundaries: &'a [char]) -> Self {
        Self {
            input,
            position: position.min(input.len()),
            state: QuoteState::default(),
            boundaries,
        }
    }

    /// Byte offset of the next character to be scanned
    pub fn position(&self) -> usize {
        self.position
    }

    /// Moves the scan position, keeping the current quote state
    pub fn seek(&mut self, position: usize) {
        self.position = position.min(self.input.len());
    }

    pub fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }
}

impl Iterator for Lexer<'_> {
    type Item = (usize, Action);

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.position;
        let mut chars = self.input[start..].chars();
        let c = chars.next()?;
        let action = self.state.advance(c, chars.next(), self.boundaries);

        self.position += c.len_utf8();
        if let Action::EscapedPair(Some(escaped)) = action {
            self.position += escaped.len_utf8();
        }

        Some((start, action))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn actions(input: &str, boundaries: &[char]) -> Vec<Action> {
        Lexer::new(input, boundaries).map(|(_, action)| action).collect()
    }

    #[test]
    fn quotes_toggle_and_are_reported() {
        use Action::*;
        assert_eq!(
            actions("'a'", &[]),
            vec![QuoteToggled('\''), Literal('a'), QuoteToggled('\'')]
        );
    }

    #[test]
    fn other_quote_is_literal_inside_quotes() {
        let mut state = QuoteState::default();
        assert_eq!(state.advance('"', None, &[]), Action::QuoteToggled('"'));
        assert_eq!(state.advance('\'', None, &[]), Action::Literal('\''));
        assert_eq!(state, QuoteState::DOUBLE);
        assert_eq!(state.advance('"', None, &[]), Action::QuoteToggled('"'));
        assert!(!state.is_quoted());
    }

    #[test]
    fn boundaries_only_apply_outside_quotes() {
        use Action::*;
        assert_eq!(
            actions("a|'|'", &['|']),
            vec![
                Literal('a'),
                Boundary('|'),
                QuoteToggled('\''),
                Literal('|'),
                QuoteToggled('\'')
            ]
        );
    }

    #[test]
    fn backslash_outside_quotes_escapes_anything() {
        use Action::*;
        assert_eq!(actions(r"\|x", &['|']), vec![EscapedPair(Some('|')), Literal('x')]);
        assert_eq!(actions(r"a\", &[]), vec![Literal('a'), EscapedPair(None)]);
    }

    #[test]
    fn backslash_inside_double_quotes_is_selective() {
        use Action::*;
        assert_eq!(
            actions(r#""\"\n""#, &[]),
            vec![
                QuoteToggled('"'),
                EscapedPair(Some('"')),
                Literal('\\'),
                Literal('n'),
                QuoteToggled('"')
            ]
        );
    }

    #[test]
    fn backslash_inside_single_quotes_is_literal() {
        use Action::*;
        assert_eq!(
            actions(r"'\''", &[]),
            vec![QuoteToggled('\''), Literal('\\'), QuoteToggled('\''), QuoteToggled('\'')]
        );
    }

    #[test]
    fn lexer_tracks_multibyte_offsets() {
        let offsets: Vec<usize> = Lexer::new("é\\ü|", &['|']).map(|(i, _)| i).collect();
        assert_eq!(offsets, vec![0, 2, 5]);
    }
}
