// Monitor state: the single mutable aggregate, changed one record at a time

use crate::history::RingBuffer;
use crate::models::{MonitorSnapshot, Record};
use crate::resolver::{StatusEntry, StatusResolver};

pub const DEFAULT_MODE: char = '0';

/// What a call to [`MonitorState::apply`] changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Mode,
    Sample,
    Status,
    Ignored,
}

#[derive(Debug, Clone)]
pub struct MonitorState {
    mode: char,
    history: RingBuffer<f64>,
    status: &'static StatusEntry,
    resolver: StatusResolver,
    records_applied: u64,
    unrecognized_lines: u64,
}

impl MonitorState {
    pub fn new(resolver: StatusResolver, history_capacity: usize) -> Self {
        Self {
            mode: DEFAULT_MODE,
            history: RingBuffer::new(history_capacity),
            status: resolver.initial(),
            resolver,
            records_applied: 0,
            unrecognized_lines: 0,
        }
    }

    pub fn mode(&self) -> char {
        self.mode
    }

    pub fn history(&self) -> &RingBuffer<f64> {
        &self.history
    }

    pub fn status(&self) -> &StatusEntry {
        self.status
    }

    pub fn records_applied(&self) -> u64 {
        self.records_applied
    }

    pub fn unrecognized_lines(&self) -> u64 {
        self.unrecognized_lines
    }

    /// Applies one record. Each variant touches only its own fields; a rate
    /// event swaps all four display fields at once through one table entry.
    pub fn apply(&mut self, record: &Record) -> Applied {
        let applied = match record {
            Record::ModeChange { mode } => {
                self.mode = *mode;
                Applied::Mode
            }
            Record::BeatSample { value } => {
                self.history.push(*value);
                Applied::Sample
            }
            Record::RateEvent { code } => {
                self.status = self.resolver.resolve(*code);
                Applied::Status
            }
            Record::Unrecognized { .. } => {
                self.unrecognized_lines += 1;
                return Applied::Ignored;
            }
        };
        self.records_applied += 1;
        applied
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        MonitorSnapshot {
            mode: self.mode,
            history: self.history.to_vec(),
            status: self.status.status.to_string(),
            action: self.status.action.to_string(),
            action_color: self.status.action_color.to_string(),
            badge_color: self.status.badge_color.to_string(),
            records_applied: self.records_applied,
            unrecognized_lines: self.unrecognized_lines,
        }
    }
}

impl Default for MonitorState {
    fn default() -> Self {
        Self::new(
            StatusResolver::default(),
            crate::history::DEFAULT_HISTORY_CAPACITY,
        )
    }
}
