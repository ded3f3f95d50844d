//! Append-only record of timestamped operator-visible messages.
//!
//! The log is the single audit trail for an operation: validation refusals,
//! start/completion messages, and tagged sub-events (file-deletion notices)
//! all land here in insertion order. Entries are never removed, reordered,
//! or deduplicated.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Marker prefix for file-deletion notices emitted during reconciliation.
pub const DELETED_FILE_TAG: &str = "🗑️ ";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub text: String,
}

/// Ordered, append-only sequence of [`LogEntry`] values.
#[derive(Debug, Clone, Default)]
pub struct LogBook {
    entries: Vec<LogEntry>,
}

impl LogBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message stamped with the current time.
    pub fn append(&mut self, text: impl Into<String>) {
        self.entries.push(LogEntry {
            timestamp: Utc::now(),
            text: text.into(),
        });
    }

    /// Append a tagged sub-event (`{tag}{text}`) so it can later be
    /// extracted with [`LogBook::tagged`].
    pub fn append_tagged(&mut self, tag: &str, text: &str) {
        self.append(format!("{}{}", tag, text));
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lazy view of the entries whose text starts with `prefix`, with the
    /// prefix stripped. Insertion order is preserved and the iterator can be
    /// rebuilt any number of times without side effects.
    pub fn tagged<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter_map(move |entry| entry.text.strip_prefix(prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_preserves_insertion_order() {
        let mut log = LogBook::new();
        log.append("first");
        log.append("second");
        log.append("third");

        let texts: Vec<&str> = log.entries().iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[test]
    fn append_never_deduplicates() {
        let mut log = LogBook::new();
        log.append("repeat");
        log.append("repeat");

        assert_eq!(log.len(), 2);
    }

    #[test]
    fn tagged_strips_marker_and_keeps_order() {
        let mut log = LogBook::new();
        log.append("Starting Safe wipe on D:\\");
        log.append_tagged(DELETED_FILE_TAG, "a.txt");
        log.append("unrelated");
        log.append_tagged(DELETED_FILE_TAG, "b.txt");

        let files: Vec<&str> = log.tagged(DELETED_FILE_TAG).collect();
        assert_eq!(files, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn tagged_is_restartable() {
        let mut log = LogBook::new();
        log.append_tagged(DELETED_FILE_TAG, "a.txt");

        let first: Vec<&str> = log.tagged(DELETED_FILE_TAG).collect();
        let second: Vec<&str> = log.tagged(DELETED_FILE_TAG).collect();
        assert_eq!(first, second);
        assert_eq!(log.len(), 1, "iteration must not mutate the log");
    }

    #[test]
    fn tagged_on_empty_log_yields_nothing() {
        let log = LogBook::new();
        assert_eq!(log.tagged(DELETED_FILE_TAG).count(), 0);
    }

    #[test]
    fn timestamps_are_non_decreasing() {
        let mut log = LogBook::new();
        log.append("one");
        log.append("two");

        let entries = log.entries();
        assert!(entries[0].timestamp <= entries[1].timestamp);
    }
}
