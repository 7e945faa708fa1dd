//! Atomic grouping of steps into one undoable unit

use tracing::debug;

use crate::step::Step;

/// An ordered list of steps undone and redone as a single unit
///
/// Undo walks the children in reverse creation order (LIFO), redo in forward
/// creation order, so indices recorded by earlier children stay valid.
#[derive(Debug, Default)]
pub struct StepGroup<T> {
    steps: Vec<Step<T>>,
}

impl<T> StepGroup<T> {
    /// Create a new, empty group
    pub(crate) fn new() -> Self {
        StepGroup { steps: Vec::new() }
    }

    /// Append a child step in creation order
    pub(crate) fn push(&mut self, step: Step<T>) {
        self.steps.push(step);
    }

    /// Number of child steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the group recorded no steps
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Undo all children, last-applied first
    pub(crate) fn undo(&mut self, seq: &mut Vec<T>) {
        debug!(steps = self.steps.len(), "undoing step group");
        for step in self.steps.iter_mut().rev() {
            step.undo(seq);
        }
    }

    /// Redo all children in original application order
    pub(crate) fn redo(&mut self, seq: &mut Vec<T>) {
        debug!(steps = self.steps.len(), "redoing step group");
        for step in self.steps.iter_mut() {
            step.redo(seq);
        }
    }

    /// Release every element still held by a child step
    pub(crate) fn into_elements(self) -> Vec<T> {
        self.steps
            .into_iter()
            .filter_map(Step::into_element)
            .collect()
    }
}
