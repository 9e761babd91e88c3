// Separators
pub const WHITESPACE: char = ' ';
pub const NEWLINE: char = '\n';

// Quoting
pub const SINGLE_QUOTE: char = '\'';
pub const DOUBLE_QUOTE: char = '"';
pub const BACKSLASH: char = '\\';

// Operators
pub const PIPE: char = '|';
pub const GREATER_THAN: char = '>';

// File descriptor selectors that may prefix a redirect operator
pub const STDOUT_FD: char = '1';
pub const STDERR_FD: char = '2';

/// Characters that end a bare word
pub const WORD_BOUNDARIES: [char; 2] = [WHITESPACE, NEWLINE];
