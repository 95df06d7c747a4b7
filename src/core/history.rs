//! Bounded record of the state changes a machine has made.
//!
//! Hosts that only see the machine between ticks use the history to observe
//! progress (which states were visited, on which tick, and when) without
//! parsing logs. Only the most recent records are kept.

use super::identifier::Identifier;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single state change.
///
/// # Example
///
/// ```rust
/// use tickfsm::core::{Identifier, TransitionLog, TransitionRecord};
/// use chrono::Utc;
///
/// let mut log = TransitionLog::with_capacity(8);
/// log.record(TransitionRecord {
///     tick: 1,
///     from: Identifier::new("idle"),
///     to: Identifier::new("busy"),
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(log.len(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Tick on which the change was decided
    pub tick: u64,
    pub from: Identifier,
    pub to: Identifier,
    /// Wall-clock time of the tick, for operators only; the machine itself
    /// never reads it
    pub timestamp: DateTime<Utc>,
}

/// Ring of the most recent transition records, oldest first.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TransitionLog {
    records: VecDeque<TransitionRecord>,
    capacity: usize,
}

impl TransitionLog {
    /// A log keeping at most `capacity` records. A zero capacity records
    /// nothing.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn record(&mut self, record: TransitionRecord) {
        if self.capacity == 0 {
            return;
        }
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&TransitionRecord> {
        self.records.back()
    }

    pub fn records(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.records.iter()
    }

    /// States traversed: the source of the oldest kept record, then the
    /// destination of each record.
    pub fn get_path(&self) -> Vec<&Identifier> {
        let mut path = Vec::with_capacity(self.records.len() + 1);
        if let Some(first) = self.records.front() {
            path.push(&first.from);
        }
        for record in &self.records {
            path.push(&record.to);
        }
        path
    }

    /// Wall-clock span between the oldest and newest kept records.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.front()?, self.records.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }
}
