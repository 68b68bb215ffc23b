//! Append-only per-session transcript.

pub use voxdrive_common::transcript::{CommandLogEntry, TranscriptView};

/// Ordered record of command/response pairs. `append` is the only mutator;
/// entries are never edited or removed.
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<CommandLogEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: CommandLogEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CommandLogEntry] {
        &self.entries
    }

    pub fn snapshot(&self) -> Vec<CommandLogEntry> {
        self.entries.clone()
    }
}
