//! Reversible records of single sequence mutations

use std::fmt;
use std::mem;

use crate::error::StepVecError;

/// The current polarity of a step
///
/// A step toggles between polarities as it is undone and redone: undoing an
/// `Add` leaves behind a `Remove` holding the element that was taken out of
/// the sequence, and vice versa. `Update` is self-inverse and never changes
/// kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// An element was appended at the recorded index
    Add,
    /// An element was removed from the recorded index
    Remove,
    /// The element at the recorded index was replaced
    Update,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepKind::Add => write!(f, "Add"),
            StepKind::Remove => write!(f, "Remove"),
            StepKind::Update => write!(f, "Update"),
        }
    }
}

/// A reversible record of exactly one mutation applied to the backing
/// sequence
///
/// Steps are created by factory operations that perform the mutation
/// immediately and return the record. A step holds only the index it acted
/// on and, depending on polarity, the element that currently lives outside
/// the sequence. It never owns the backing storage; callers pass the live
/// sequence back in for `undo`/`redo`.
///
/// Indices recorded here are valid exactly when steps are undone and redone
/// in strict reverse/forward creation order, which the history cursor
/// guarantees.
#[derive(Debug)]
pub struct Step<T> {
    kind: StepKind,
    index: usize,
    slot: Option<T>,
}

impl<T> Step<T> {
    /// Append `element` to `seq` and return the recording `Add` step
    pub(crate) fn apply_add(seq: &mut Vec<T>, element: T) -> Self {
        seq.push(element);
        Step {
            kind: StepKind::Add,
            index: seq.len() - 1,
            slot: None,
        }
    }

    /// Remove the element at `index` from `seq` and return the recording
    /// `Remove` step, which now holds the element
    ///
    /// Fails with `OutOfRange` before touching the sequence.
    pub(crate) fn apply_remove(seq: &mut Vec<T>, index: usize) -> Result<Self, StepVecError> {
        if index >= seq.len() {
            return Err(StepVecError::out_of_range(index, seq.len()));
        }
        let element = seq.remove(index);
        Ok(Step {
            kind: StepKind::Remove,
            index,
            slot: Some(element),
        })
    }

    /// Swap `element` into `seq[index]` and return the recording `Update`
    /// step, which now holds the previous value
    ///
    /// Fails with `OutOfRange` before touching the sequence.
    pub(crate) fn apply_update(
        seq: &mut Vec<T>,
        index: usize,
        element: T,
    ) -> Result<Self, StepVecError> {
        if index >= seq.len() {
            return Err(StepVecError::out_of_range(index, seq.len()));
        }
        let previous = mem::replace(&mut seq[index], element);
        Ok(Step {
            kind: StepKind::Update,
            index,
            slot: Some(previous),
        })
    }

    /// The step's current polarity
    pub fn kind(&self) -> StepKind {
        self.kind
    }

    /// The sequence index this step acts on
    pub fn index(&self) -> usize {
        self.index
    }

    /// Reverse the most recent application of this step against `seq`
    ///
    /// Toggles polarity: `Add` becomes `Remove` (capturing the element taken
    /// out of the sequence), `Remove` becomes `Add`, `Update` swaps the held
    /// and live values in place. Calls must strictly alternate with `redo`;
    /// the history cursor enforces this.
    pub(crate) fn undo(&mut self, seq: &mut Vec<T>) {
        self.invert(seq);
    }

    /// Re-apply this step against `seq` after an `undo`
    ///
    /// Mechanically the same toggle as `undo`: redoing an `Add` that was
    /// undone means performing the add again, which is what inverting the
    /// `Remove` polarity does.
    pub(crate) fn redo(&mut self, seq: &mut Vec<T>) {
        self.invert(seq);
    }

    /// Release the element held by this step, if any
    ///
    /// `Remove` and `Update` polarities hold a value that exists nowhere
    /// else; teardown paths surface it to the caller instead of dropping it
    /// silently.
    pub(crate) fn into_element(self) -> Option<T> {
        self.slot
    }

    // The single toggle primitive shared by undo and redo. Each arm is the
    // exact inverse of the state it transitions from.
    fn invert(&mut self, seq: &mut Vec<T>) {
        match self.kind {
            StepKind::Add => {
                debug_assert!(self.slot.is_none());
                self.slot = Some(seq.remove(self.index));
                self.kind = StepKind::Remove;
            }
            StepKind::Remove => {
                if let Some(element) = self.slot.take() {
                    seq.insert(self.index, element);
                    self.kind = StepKind::Add;
                }
            }
            StepKind::Update => {
                if let Some(held) = self.slot.as_mut() {
                    mem::swap(&mut seq[self.index], held);
                }
            }
        }
    }
}
