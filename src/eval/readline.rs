use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, Config, Context, Editor, Helper, Highlighter, Hinter, Validator};

use super::completion::CommandTrie;
use super::symbols::WHITESPACE;

/// Completes command names, the first word of a line, from a `CommandTrie`
/// Listing and ringing the bell on ambiguous completions is left to the editor's list mode
#[derive(Helper, Hinter, Highlighter, Validator)]
pub struct ShellHelper {
    commands: CommandTrie,
}

impl ShellHelper {
    pub fn new(commands: CommandTrie) -> Self {
        Self { commands }
    }

    fn candidates(&self, line: &str, pos: usize) -> Vec<Pair> {
        let prefix = &line[..pos];
        if prefix.contains(WHITESPACE) {
            return Vec::new();
        }

        let matches = self.commands.find_by_prefix(prefix);
        let unique = matches.len() == 1;
        matches
            .into_iter()
            .map(|name| Pair {
                replacement: match unique {
                    true => format!("{} ", name),
                    false => name.clone(),
                },
                display: name,
            })
            .collect()
    }
}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        Ok((0, self.candidates(line, pos)))
    }
}

/// What the read loop should do after prompting
#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    Line(String),
    // Ctrl-C, the line is discarded and the prompt shown again
    Interrupted,
    // Ctrl-D or a closed input stream
    EndOfInput,
}

pub struct LineEditor {
    editor: Editor<ShellHelper, DefaultHistory>,
}

impl LineEditor {
    // Creates a LineEditor which completes from the given command names
    pub fn new(commands: CommandTrie) -> Result<Self, ReadlineError> {
        let config = Config::builder()
            .completion_type(CompletionType::List)
            .build();

        let mut editor = Editor::with_config(config)?;
        editor.set_helper(Some(ShellHelper::new(commands)));
        Ok(Self { editor })
    }

    /// Makes previously saved entries reachable with the arrow keys
    pub fn seed_history(&mut self, entries: &[String]) {
        for entry in entries {
            let _ = self.editor.add_history_entry(entry.as_str());
        }
    }

    pub fn prompt_and_read_line(&mut self, prompt: &str) -> Input {
        match self.editor.readline(prompt) {
            Ok(line) => {
                self.remember(&line);
                Input::Line(line)
            }
            Err(ReadlineError::Interrupted) => Input::Interrupted,
            Err(ReadlineError::Eof) => Input::EndOfInput,
            Err(error) => {
                log::warn!("unhandled error occurred while line-editing: {}", error);
                Input::EndOfInput
            }
        }
    }

    // Every non-blank line is recallable, including ones starting with a space
    fn remember(&mut self, line: &str) {
        if !line.trim().is_empty() {
            // * This fails in the case of a line that is already the latest entry,
            // * which requires no special handling
            let _ = self.editor.add_history_entry(line);
        }
    }
}

#[cfg(test)]
mod test {
    use rustyline::history::History;

    use super::*;

    fn helper(words: &[&str]) -> ShellHelper {
        let mut trie = CommandTrie::new();
        words.iter().for_each(|word| trie.insert(word));
        ShellHelper::new(trie)
    }

    fn replacements(helper: &ShellHelper, line: &str) -> Vec<String> {
        helper
            .candidates(line, line.len())
            .into_iter()
            .map(|pair| pair.replacement)
            .collect()
    }

    #[test]
    fn unique_match_gets_a_trailing_space() {
        let helper = helper(&["echo", "exit", "type"]);
        assert_eq!(replacements(&helper, "ty"), ["type "]);
    }

    #[test]
    fn ambiguous_matches_are_listed() {
        let helper = helper(&["echo", "exit", "type"]);
        assert_eq!(replacements(&helper, "e"), ["echo", "exit"]);
        assert!(replacements(&helper, "x").is_empty());
    }

    #[test]
    fn only_the_command_name_completes() {
        let helper = helper(&["echo", "exit"]);
        assert!(replacements(&helper, "echo e").is_empty());
    }

    #[test]
    fn lines_with_leading_space_are_recallable() {
        let mut editor = LineEditor::new(CommandTrie::new()).unwrap();
        editor.remember("  echo indented");
        editor.remember("   ");
        editor.remember("echo plain");
        assert_eq!(editor.editor.history().len(), 2);
    }
}
