//! Battle text: the paged dialogue shown in `Text` state and the bounded log
//! of everything that happened.
use std::collections::VecDeque;

/// Queue of lines the player pages through with confirm.
#[derive(Clone, Debug, Default)]
pub struct Dialogue {
    lines: VecDeque<String>,
}

impl Dialogue {
    /// Replaces the queue.
    pub fn show<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines = lines.into_iter().map(Into::into).collect();
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Line currently on screen.
    pub fn current(&self) -> Option<&str> {
        self.lines.front().map(String::as_str)
    }

    /// Drops the current line. Returns `true` while lines remain.
    pub fn advance(&mut self) -> bool {
        self.lines.pop_front();
        !self.lines.is_empty()
    }
}

/// One logged battle message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    pub round: u32,
    pub text: String,
}

/// Circular buffer of resolved-action messages.
#[derive(Clone, Debug)]
pub struct BattleLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl BattleLog {
    pub fn new(capacity: usize) -> Self {
        let bounded_capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(bounded_capacity),
            capacity: bounded_capacity,
        }
    }

    pub fn push(&mut self, round: u32, text: impl Into<String>) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry {
            round,
            text: text.into(),
        });
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Newest first.
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().rev().take(limit)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }
}
