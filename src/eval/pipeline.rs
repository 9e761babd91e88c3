use super::quote::{Action, Lexer};
use super::symbols::PIPE;

/// Splits a line into pipeline segments on every unquoted, unescaped `|`
/// Segments keep their raw text (quotes, escapes and redirects are resolved later, per segment)
/// A line without a separator yields one segment equal to the whole line
pub fn split_pipeline(line: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut segment_start = 0;

    for (offset, action) in Lexer::new(line, &[PIPE]) {
        if let Action::Boundary(_) = action {
            segments.push(line[segment_start..offset].to_owned());
            segment_start = offset + PIPE.len_utf8();
        }
    }

    segments.push(line[segment_start..].to_owned());
    segments
}
