//! History log, cursor navigation, and branch truncation

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::group::StepGroup;
use crate::step::Step;

/// A top-level history record: one standalone step or one committed
/// transaction group
#[derive(Debug)]
pub(crate) enum Record<T> {
    /// A single recorded step
    Single(Step<T>),
    /// A committed transaction group
    Group(StepGroup<T>),
}

impl<T> Record<T> {
    fn undo(&mut self, seq: &mut Vec<T>) {
        match self {
            Record::Single(step) => step.undo(seq),
            Record::Group(group) => group.undo(seq),
        }
    }

    fn redo(&mut self, seq: &mut Vec<T>) {
        match self {
            Record::Single(step) => step.redo(seq),
            Record::Group(group) => group.redo(seq),
        }
    }

    fn steps(&self) -> usize {
        match self {
            Record::Single(_) => 1,
            Record::Group(group) => group.len(),
        }
    }

    fn label(&self) -> String {
        match self {
            Record::Single(step) => step.kind().to_string(),
            Record::Group(group) => format!("Transaction ({} steps)", group.len()),
        }
    }

    fn into_elements(self) -> Vec<T> {
        match self {
            Record::Single(step) => step.into_element().into_iter().collect(),
            Record::Group(group) => group.into_elements(),
        }
    }
}

/// A read-only snapshot of one entry in the history log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Unique identifier for this entry
    pub id: String,
    /// When the entry was recorded
    pub timestamp: DateTime<Utc>,
    /// Human-readable label ("Add", "Remove", "Update", or a transaction
    /// summary)
    pub label: String,
    /// Number of steps in the entry (1 unless it is a transaction)
    pub steps: usize,
    /// Whether this entry currently sits in the redoable suffix
    pub is_undone: bool,
}

#[derive(Debug)]
struct Recorded<T> {
    id: String,
    timestamp: DateTime<Utc>,
    record: Record<T>,
}

impl<T> Recorded<T> {
    fn new(record: Record<T>) -> Self {
        Recorded {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            record,
        }
    }
}

/// The ordered log of top-level steps plus the undo/redo cursor
///
/// Records with index `< pos` are undoable (currently applied); records with
/// index `>= pos` are redoable (previously undone). Recording a new step
/// while a redoable suffix exists destroys that suffix first; elements held
/// only by the destroyed steps land in the orphan bin for the caller to
/// reclaim.
#[derive(Debug)]
pub struct History<T> {
    records: Vec<Recorded<T>>,
    pos: usize,
    orphaned: Vec<T>,
}

impl<T> History<T> {
    /// Create a new, empty history
    pub(crate) fn new() -> Self {
        History {
            records: Vec::new(),
            pos: 0,
            orphaned: Vec::new(),
        }
    }

    /// Record a new top-level step, truncating any redoable suffix first
    pub(crate) fn record(&mut self, record: Record<T>) {
        if self.pos < self.records.len() {
            let discarded = self.records.split_off(self.pos);
            debug!(discarded = discarded.len(), "truncating redoable suffix");
            for recorded in discarded {
                self.orphaned.extend(recorded.record.into_elements());
            }
        }
        debug!(label = %record.label(), "recording step");
        self.records.push(Recorded::new(record));
        self.pos = self.records.len();
    }

    /// Undo the record before the cursor; false when nothing is undoable
    pub(crate) fn undo(&mut self, seq: &mut Vec<T>) -> bool {
        if self.pos == 0 {
            return false;
        }
        self.records[self.pos - 1].record.undo(seq);
        self.pos -= 1;
        debug!(pos = self.pos, "undo applied");
        true
    }

    /// Redo the record at the cursor; false when nothing is redoable
    pub(crate) fn redo(&mut self, seq: &mut Vec<T>) -> bool {
        if self.pos == self.records.len() {
            return false;
        }
        self.records[self.pos].record.redo(seq);
        self.pos += 1;
        debug!(pos = self.pos, "redo applied");
        true
    }

    /// Whether any record is undoable
    pub fn can_undo(&self) -> bool {
        self.pos != 0
    }

    /// Whether any record is redoable
    pub fn can_redo(&self) -> bool {
        self.pos != self.records.len()
    }

    /// Total number of records in the log
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the log holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of currently undoable records
    pub fn undoable_count(&self) -> usize {
        self.pos
    }

    /// Number of currently redoable records
    pub fn redoable_count(&self) -> usize {
        self.records.len() - self.pos
    }

    /// Get paginated snapshots of the log, oldest first
    pub fn entries(&self, limit: usize, offset: usize) -> Vec<HistoryEntry> {
        self.records
            .iter()
            .enumerate()
            .skip(offset)
            .take(limit)
            .map(|(index, recorded)| HistoryEntry {
                id: recorded.id.clone(),
                timestamp: recorded.timestamp,
                label: recorded.record.label(),
                steps: recorded.record.steps(),
                is_undone: index >= self.pos,
            })
            .collect()
    }

    /// Drain every element orphaned by branch truncation
    pub(crate) fn drain_orphaned(&mut self) -> Vec<T> {
        std::mem::take(&mut self.orphaned)
    }

    /// Consume the history, releasing every element still held by a record
    /// or the orphan bin
    pub(crate) fn into_elements(self) -> Vec<T> {
        let mut elements = self.orphaned;
        for recorded in self.records {
            elements.extend(recorded.record.into_elements());
        }
        elements
    }
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::new()
    }
}
