use std::io::{self, BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use fs_err::{File, OpenOptions};

/// In-memory command history with file persistence
/// `last_flushed` marks the boundary used by `append_file`, so repeated appends never duplicate entries
#[derive(Debug, Default, Clone)]
pub struct History {
    entries: Vec<String>,
    last_flushed: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Appends a raw input line
    pub fn record(&mut self, line: &str) {
        self.entries.push(line.to_owned());
    }

    /// Moves the flush cursor to the end, so only entries recorded afterwards are appended
    pub fn mark_flushed(&mut self) {
        self.last_flushed = self.entries.len();
    }

    /// Appends the non-empty lines of a file to the in-memory history
    pub fn read_file(&mut self, path: &Path) -> io::Result<()> {
        let reader = BufReader::new(File::open(path)?);
        for line in reader.lines() {
            let line = line?;
            if !line.is_empty() {
                self.entries.push(line);
            }
        }

        Ok(())
    }

    /// Overwrites a file with every entry, one per line
    pub fn write_file(&self, path: &Path) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        for line in &self.entries {
            writeln!(writer, "{}", line)?;
        }

        writer.flush()
    }

    /// Appends the entries recorded since the last append to a file, creating it if needed
    /// Trailing blank lines of the existing file are trimmed first so the new entries follow cleanly
    pub fn append_file(&mut self, path: &Path) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)?;
        let kept = contents.len() - contents.iter().rev().take_while(|&&b| b == b'\n').count();
        if kept < contents.len() {
            // Keep the newline that ends the last real line
            file.set_len(kept as u64 + 1)?;
        }
        file.seek(SeekFrom::End(0))?;

        let mut writer = BufWriter::new(file);
        if kept > 0 && kept == contents.len() {
            writeln!(writer)?;
        }
        for line in &self.entries[self.last_flushed..] {
            writeln!(writer, "{}", line)?;
        }
        writer.flush()?;

        self.last_flushed = self.entries.len();
        Ok(())
    }

    /// Formats the last `count` entries (all of them when `count` is zero) with their numbers
    pub fn render(&self, count: usize) -> String {
        let start = match count > 0 && count < self.entries.len() {
            true => self.entries.len() - count,
            false => 0,
        };

        self.entries
            .iter()
            .enumerate()
            .skip(start)
            .map(|(i, line)| format!("{:>5}  {}\n", i + 1, line))
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn history_of(lines: &[&str]) -> History {
        let mut history = History::new();
        for line in lines {
            history.record(line);
        }
        history
    }

    #[test]
    fn renders_numbered_entries() {
        let history = history_of(&["echo a", "pwd", "ls"]);
        assert_eq!(history.render(0), "    1  echo a\n    2  pwd\n    3  ls\n");
        assert_eq!(history.render(2), "    2  pwd\n    3  ls\n");
        assert_eq!(history.render(10), history.render(0));
    }

    #[test]
    fn write_then_read_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history");
        fs_err::write(&path, "one\n\ntwo\n").unwrap();

        let mut history = history_of(&["zero"]);
        history.read_file(&path).unwrap();
        assert_eq!(history.entries(), ["zero", "one", "two"]);

        history.write_file(&path).unwrap();
        assert_eq!(fs_err::read_to_string(&path).unwrap(), "zero\none\ntwo\n");
    }

    #[test]
    fn append_only_writes_new_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history");
        fs_err::write(&path, "old\n\n\n").unwrap();

        let mut history = history_of(&["first"]);
        history.append_file(&path).unwrap();
        history.record("second");
        history.append_file(&path).unwrap();

        assert_eq!(
            fs_err::read_to_string(&path).unwrap(),
            "old\nfirst\nsecond\n"
        );
    }

    #[test]
    fn append_respects_mark_flushed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history");

        let mut history = history_of(&["loaded"]);
        history.mark_flushed();
        history.record("typed");
        history.append_file(&path).unwrap();

        assert_eq!(fs_err::read_to_string(&path).unwrap(), "typed\n");
    }

    #[test]
    fn missing_file_cannot_be_read() {
        let mut history = History::new();
        assert!(history.read_file(Path::new("/no/such/history")).is_err());
    }
}
