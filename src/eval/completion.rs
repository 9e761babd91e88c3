use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

/// A prefix tree of command names used for TAB completion
#[derive(Debug, Default)]
pub struct CommandTrie {
    root: Node,
}

#[derive(Debug, Default)]
struct Node {
    // Ordered children keep collected words sorted without a separate sort
    children: BTreeMap<char, Node>,
    is_end: bool,
}

impl CommandTrie {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, word: &str) {
        let node = word
            .chars()
            .fold(&mut self.root, |node, c| node.children.entry(c).or_default());
        node.is_end = true;
    }

    /// Returns every word starting with `prefix`, in sorted order
    pub fn find_by_prefix(&self, prefix: &str) -> Vec<String> {
        let mut node = &self.root;
        for c in prefix.chars() {
            match node.children.get(&c) {
                Some(child) => node = child,
                None => return Vec::new(),
            }
        }

        let mut words = Vec::new();
        collect(node, &mut prefix.to_owned(), &mut words);
        words
    }
}

fn collect(node: &Node, word: &mut String, words: &mut Vec<String>) {
    if node.is_end {
        words.push(word.clone());
    }

    for (c, child) in &node.children {
        word.push(*c);
        collect(child, word, words);
        word.pop();
    }
}

/// Builds the completion trie from the builtin names and every non-directory entry of the PATH
/// Each directory is read on its own thread, and the names are inserted by this thread as they arrive
pub fn build_command_trie<'a>(
    builtins: impl Iterator<Item = &'a str>,
    directories: &[PathBuf],
) -> CommandTrie {
    let mut trie = CommandTrie::new();
    builtins.for_each(|name| trie.insert(name));

    let (sender, receiver) = mpsc::channel::<String>();
    thread::scope(|scope| {
        for directory in directories {
            let sender = sender.clone();
            scope.spawn(move || {
                // Unreadable or missing PATH entries are skipped
                let Ok(entries) = fs_err::read_dir(directory) else {
                    return;
                };

                for entry in entries.flatten() {
                    let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(true);
                    if is_dir {
                        continue;
                    }
                    if let Some(name) = entry.file_name().to_str() {
                        // The receiver outlives every sender
                        let _ = sender.send(name.to_owned());
                    }
                }
            });
        }

        // Dropping the original sender lets the receiver finish once every scan is done
        drop(sender);
        for name in receiver {
            trie.insert(&name);
        }
    });

    log::debug!("built completion trie from {} PATH directories", directories.len());
    trie
}

#[cfg(test)]
mod test {
    use super::*;

    macro_rules! trie {
        ($($word:literal),*) => {{
            let mut trie = CommandTrie::new();
            $(trie.insert($word);)*
            trie
        }};
    }

    #[test]
    fn finds_sorted_words_by_prefix() {
        let trie = trie!("exit", "echo", "type", "ex");
        assert_eq!(trie.find_by_prefix("e"), ["echo", "ex", "exit"]);
        assert_eq!(trie.find_by_prefix("ex"), ["ex", "exit"]);
        assert_eq!(trie.find_by_prefix("t"), ["type"]);
        assert!(trie.find_by_prefix("z").is_empty());
    }

    #[test]
    fn empty_prefix_lists_everything() {
        let trie = trie!("b", "a");
        assert_eq!(trie.find_by_prefix(""), ["a", "b"]);
        assert!(CommandTrie::new().find_by_prefix("").is_empty());
    }

    #[test]
    fn scans_path_directories() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        fs_err::write(first.path().join("custom_exe_1"), "").unwrap();
        fs_err::write(second.path().join("custom_exe_2"), "").unwrap();
        fs_err::create_dir(second.path().join("custom_dir")).unwrap();

        let directories = vec![
            first.path().to_path_buf(),
            second.path().to_path_buf(),
            PathBuf::from("/no/such/directory"),
        ];
        let trie = build_command_trie(["echo", "exit"].into_iter(), &directories);

        assert_eq!(trie.find_by_prefix("custom"), ["custom_exe_1", "custom_exe_2"]);
        assert_eq!(trie.find_by_prefix("e"), ["echo", "exit"]);
    }
}
