//! Append-only battle log.
//!
//! Every pipeline step writes its human-readable record here. The log is an
//! explicit collector owned by whoever drives the battle and passed by
//! `&mut` into each rule call; entries are never edited or removed.

use core::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LogLevel {
    Info,
    /// A rule refused to act (cast failure, illegal target, dead target).
    Warning,
}

/// One causally-ordered battle event.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogEntry {
    /// Round during which the entry was written (0 before the first round).
    pub round: u32,
    pub level: LogLevel,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            LogLevel::Info => write!(f, "[round {}] {}", self.round, self.message),
            LogLevel::Warning => write!(f, "[round {}] warning: {}", self.round, self.message),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleLog {
    round: u32,
    entries: Vec<LogEntry>,
}

impl BattleLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamps subsequent entries with `round`.
    pub fn set_round(&mut self, round: u32) {
        self.round = round;
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Info, message.into());
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Warning, message.into());
    }

    fn push(&mut self, level: LogLevel, message: String) {
        self.entries.push(LogEntry {
            round: self.round,
            level,
            message,
        });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Entries written at or after position `start`, for incremental readers.
    pub fn since(&self, start: usize) -> &[LogEntry] {
        self.entries.get(start..).unwrap_or(&[])
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|entry| entry.message.as_str())
    }

    /// Returns true if any entry's message contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.messages().any(|message| message.contains(needle))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<LogEntry> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_keep_append_order_and_round_stamp() {
        let mut log = BattleLog::new();
        log.info("opening");
        log.set_round(2);
        log.warn("late");

        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].round, 0);
        assert_eq!(log.entries()[1].round, 2);
        assert_eq!(log.entries()[1].level, LogLevel::Warning);
        assert_eq!(log.since(1).len(), 1);
        assert!(log.since(10).is_empty());
        assert_eq!(log.entries()[1].to_string(), "[round 2] warning: late");
    }
}
