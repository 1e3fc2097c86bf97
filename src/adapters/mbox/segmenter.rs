//! Mbox segmentation. Splits a raw mailbox stream into per-message blocks.
//!
//! A boundary is any line whose first five characters are `From ` at column 0.
//! Everything before the first boundary is discarded. Each line is repaired
//! for invalid UTF-8 before it is tested or accumulated, so boundary matching
//! never fails on corrupt input.

use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Start-of-message marker (capital F, trailing space).
pub const FROM_MARKER: &str = "From ";

/// Replace invalid UTF-8 byte sequences in one raw line with U+FFFD.
///
/// Applied per line, not per file: corruption is usually localized and must
/// not poison boundary detection for the rest of the archive.
pub fn repair_line(raw: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(raw)
}

/// Lazy iterator over raw message blocks of an mbox stream.
///
/// Holds at most one block in memory. Stops reading as soon as the consumer
/// stops pulling, so a message limit is just `Iterator::take`.
pub struct MessageBlocks<R> {
    reader: R,
    line_buf: Vec<u8>,
    current: String,
    started: bool,
    done: bool,
}

impl MessageBlocks<BufReader<File>> {
    pub fn from_path(path: &Path) -> io::Result<Self> {
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: BufRead> MessageBlocks<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_buf: Vec::new(),
            current: String::new(),
            started: false,
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for MessageBlocks<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            self.line_buf.clear();
            match self.reader.read_until(b'\n', &mut self.line_buf) {
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
                Ok(0) => {
                    self.done = true;
                    if self.started && !self.current.is_empty() {
                        return Some(Ok(std::mem::take(&mut self.current)));
                    }
                    return None;
                }
                Ok(_) => {
                    let line = repair_line(&self.line_buf);
                    if line.starts_with(FROM_MARKER) {
                        if self.started {
                            return Some(Ok(std::mem::take(&mut self.current)));
                        }
                        self.started = true;
                    } else if self.started {
                        self.current.push_str(&line);
                    }
                }
            }
        }
    }
}
