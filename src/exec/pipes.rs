use os_pipe::{PipeReader, PipeWriter};

use crate::errors::{Handle, Result};

/// The pipes connecting the segments of one pipeline
/// Pipe `i` is written by segment `i` and read by segment `i + 1`.
/// Each end is held in a slot which is emptied when the end is handed to a segment,
/// so an end can be given away once and is closed exactly once, by whoever holds it last
#[derive(Debug)]
pub struct PipeSet {
    readers: Vec<Option<PipeReader>>,
    writers: Vec<Option<PipeWriter>>,
}

impl PipeSet {
    /// Allocates `count` pipes up front
    /// If the operating system refuses one, every pipe allocated so far is closed
    pub fn allocate(count: usize) -> Result<Self> {
        let mut pipes = Self {
            readers: Vec::with_capacity(count),
            writers: Vec::with_capacity(count),
        };

        for _ in 0..count {
            let (reader, writer) =
                os_pipe::pipe().map_err(|cause| pipe_err!(CouldNotAllocate(cause)))?;
            pipes.readers.push(Some(reader));
            pipes.writers.push(Some(writer));
        }

        log::debug!("allocated {} pipes", pipes.len());
        Ok(pipes)
    }

    pub fn len(&self) -> usize {
        self.readers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readers.is_empty()
    }

    /// Transfers ownership of the read end of pipe `index` to the caller
    pub fn take_reader(&mut self, index: usize) -> Result<PipeReader> {
        self.readers
            .get_mut(index)
            .and_then(Option::take)
            .replace_err(|| pipe_err!(EndAlreadyTaken(index)))
    }

    /// Transfers ownership of the write end of pipe `index` to the caller
    pub fn take_writer(&mut self, index: usize) -> Result<PipeWriter> {
        self.writers
            .get_mut(index)
            .and_then(Option::take)
            .replace_err(|| pipe_err!(EndAlreadyTaken(index)))
    }

    /// The number of ends still held by the set
    pub fn open_ends(&self) -> usize {
        let readers = self.readers.iter().filter(|end| end.is_some()).count();
        let writers = self.writers.iter().filter(|end| end.is_some()).count();
        readers + writers
    }

    /// Closes every end that has not been handed out
    pub fn close_all(&mut self) {
        if self.is_empty() {
            return;
        }

        let remaining = self.open_ends();
        self.readers.iter_mut().for_each(|end| drop(end.take()));
        self.writers.iter_mut().for_each(|end| drop(end.take()));

        if remaining > 0 {
            log::trace!("closed {} unused pipe ends", remaining);
        }
    }
}

impl Drop for PipeSet {
    fn drop(&mut self) {
        self.close_all();
    }
}

#[cfg(test)]
mod test {
    use std::io::{Read, Write};

    use super::*;

    #[test]
    fn allocates_two_ends_per_pipe() {
        let pipes = PipeSet::allocate(3).unwrap();
        assert_eq!(pipes.len(), 3);
        assert_eq!(pipes.open_ends(), 6);

        let none = PipeSet::allocate(0).unwrap();
        assert!(none.is_empty());
        assert_eq!(none.open_ends(), 0);
    }

    #[test]
    fn ends_are_taken_once() {
        let mut pipes = PipeSet::allocate(2).unwrap();

        let _reader = pipes.take_reader(1).unwrap();
        assert_eq!(pipes.open_ends(), 3);
        assert!(pipes.take_reader(1).is_err());
        assert!(pipes.take_writer(2).is_err());

        pipes.close_all();
        assert_eq!(pipes.open_ends(), 0);
        assert!(pipes.take_writer(0).is_err());
    }

    #[test]
    fn reader_sees_eof_once_the_set_releases_the_writer() {
        let mut pipes = PipeSet::allocate(1).unwrap();
        let mut writer = pipes.take_writer(0).unwrap();
        let mut reader = pipes.take_reader(0).unwrap();
        assert_eq!(pipes.open_ends(), 0);

        writer.write_all(b"through the pipe").unwrap();
        drop(writer);

        let mut received = String::new();
        reader.read_to_string(&mut received).unwrap();
        assert_eq!(received, "through the pipe");
    }
}
